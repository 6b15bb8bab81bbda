//! TTL 기반 인메모리 가격 캐시.

use chrono::{DateTime, Duration, Utc};

/// 마지막으로 조회한 가격 샘플.
///
/// 값은 성공한 가격 조회에서만 갱신되며, 항상 양수입니다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    /// USD 가격
    pub price: f64,
    /// 조회 시각
    pub fetched_at: DateTime<Utc>,
}

/// 단일 가격 값을 보관하는 TTL 캐시.
///
/// 만료는 읽기 시점에만 검사하며 백그라운드 만료는 없습니다.
/// 단일 루프에서만 접근하므로 동기화가 필요 없습니다.
#[derive(Debug, Clone)]
pub struct PriceCache {
    sample: Option<PriceSample>,
    ttl: Duration,
}

impl PriceCache {
    /// 주어진 TTL로 빈 캐시를 생성합니다.
    pub fn new(ttl: Duration) -> Self {
        Self { sample: None, ttl }
    }

    /// TTL 이내의 캐시된 가격을 반환합니다.
    ///
    /// 캐시가 비어 있거나 만료된 경우 `None`을 반환하며,
    /// 호출자가 새로 조회해야 합니다.
    pub fn get(&self, now: DateTime<Utc>) -> Option<f64> {
        self.sample
            .filter(|s| now - s.fetched_at < self.ttl)
            .map(|s| s.price)
    }

    /// 샘플을 무조건 덮어씁니다.
    pub fn set(&mut self, price: f64, now: DateTime<Utc>) {
        self.sample = Some(PriceSample {
            price,
            fetched_at: now,
        });
    }

    /// 캐시 TTL 반환.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
