//! 설정 모듈.
//!
//! JSON 설정 파일(`tidbyt_config.json`)에서 디바이스 credential을 로드합니다.
//! 캐시 TTL과 업데이트 주기는 파일에서 생략 가능하며 환경변수로 재정의할 수 있습니다.

use std::path::Path;
use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::Deserialize;

use crate::error::{Result, TrackerError};

/// 기본 캐시 TTL (초, 4분).
const DEFAULT_CACHE_TTL_SECS: u64 = 240;
/// 기본 업데이트 주기 (초, 5분).
const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 300;

/// 트래커 전체 설정.
///
/// 시작 시 한 번 로드되며 이후 변경되지 않습니다.
/// `device_id`와 `api_key`는 필수이며, 누락 시 시작 단계에서 실패합니다.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Tidbyt 디바이스 ID
    pub device_id: String,
    /// Tidbyt API 키 (Bearer 토큰)
    pub api_key: String,
    /// 가격 캐시 TTL (초)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// 업데이트 주기 (초)
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_update_interval_secs() -> u64 {
    DEFAULT_UPDATE_INTERVAL_SECS
}

impl TrackerConfig {
    /// 설정 파일에서 로드합니다.
    ///
    /// 파일이 없거나 필수 필드가 누락된 경우 `TrackerError::Config`를 반환합니다.
    /// 로드 후 `TRACKER_CACHE_TTL_SECS`, `TRACKER_UPDATE_INTERVAL_SECS`
    /// 환경변수로 주기 값을 재정의할 수 있습니다.
    pub fn from_file(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let raw = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::Config(format!(
                "설정 파일을 읽을 수 없습니다 ({}): {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_json(&raw)?;
        config.cache_ttl_secs = env_var_parse("TRACKER_CACHE_TTL_SECS", config.cache_ttl_secs);
        config.update_interval_secs = env_var_parse(
            "TRACKER_UPDATE_INTERVAL_SECS",
            config.update_interval_secs,
        );

        Ok(config)
    }

    /// JSON 문자열에서 설정을 파싱합니다.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| TrackerError::Config(format!("설정 파일 형식이 잘못되었습니다: {}", e)))
    }

    /// 가격 캐시 TTL을 Duration으로 반환.
    pub fn cache_ttl(&self) -> Duration {
        Duration::seconds(self.cache_ttl_secs as i64)
    }

    /// 업데이트 주기를 Duration으로 반환.
    pub fn update_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.update_interval_secs)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
