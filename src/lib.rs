//! Tidbyt 비트코인 가격 트래커.
//!
//! 이 crate는 주기적으로 비트코인 가격을 Tidbyt 디스플레이에 표시하는
//! 독립 실행형 바이너리를 제공합니다:
//! - 가격 조회 및 TTL 캐싱 (CoinDesk API)
//! - 상태 이미지 렌더링 (pixlet 렌더링 서비스)
//! - 디바이스 푸시 (Tidbyt Push API)

pub mod cache;
pub mod config;
pub mod error;
pub mod price;
pub mod push;
pub mod render;
pub mod stats;
pub mod tracker;

pub use cache::{PriceCache, PriceSample};
pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use stats::UpdateStats;
pub use tracker::{Tracker, UpdateOutcome};
