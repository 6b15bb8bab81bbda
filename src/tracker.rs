//! 업데이트 오케스트레이터.
//!
//! 한 번의 업데이트 반복(캐시 확인 → 가격 조회 → 렌더링 → 푸시)을 수행합니다.
//! 반복 내 에러는 호출자에게 Result로 전달되며, 데몬 루프가
//! 로그 후 다음 주기까지 대기할지 결정합니다.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cache::PriceCache;
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::price::CoindeskClient;
use crate::push::TidbytClient;
use crate::render::PixletClient;
use crate::stats::UpdateStats;

/// 한 번의 업데이트 반복 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateOutcome {
    /// 이번 반복에서 표시한 가격
    pub price: f64,
    /// 캐시된 가격을 사용했는지 여부
    pub cache_hit: bool,
}

/// 비트코인 가격 트래커.
///
/// 가격 캐시와 세 외부 API 클라이언트를 소유하며,
/// 단일 루프에서만 사용됩니다.
pub struct Tracker {
    cache: PriceCache,
    price_client: CoindeskClient,
    render_client: PixletClient,
    push_client: TidbytClient,
    stats: UpdateStats,
}

impl Tracker {
    /// 설정에서 트래커를 생성합니다.
    pub fn new(config: &TrackerConfig) -> Self {
        Self::with_clients(
            PriceCache::new(config.cache_ttl()),
            CoindeskClient::new(),
            PixletClient::new(),
            TidbytClient::new(config.device_id.clone(), config.api_key.clone()),
        )
    }

    /// 클라이언트를 직접 주입하여 생성합니다 (테스트용).
    pub fn with_clients(
        cache: PriceCache,
        price_client: CoindeskClient,
        render_client: PixletClient,
        push_client: TidbytClient,
    ) -> Self {
        Self {
            cache,
            price_client,
            render_client,
            push_client,
            stats: UpdateStats::new(),
        }
    }

    /// 한 번의 업데이트 반복을 수행합니다.
    ///
    /// 가격 조회 또는 렌더링 실패 시 이후 단계를 건너뛰고 반복을 중단합니다.
    /// 푸시 실패도 에러로 보고되지만, 어느 경우든 다음 반복에 영향을 주지
    /// 않습니다.
    pub async fn update_once(&mut self) -> Result<UpdateOutcome> {
        self.stats.ticks += 1;
        let now = Utc::now();

        // 1. 캐시 확인, 미스 시 가격 조회
        let (price, cache_hit) = match self.cache.get(now) {
            Some(price) => {
                self.stats.cache_hits += 1;
                info!(price, "캐시된 가격 사용");
                (price, true)
            }
            None => match self.price_client.fetch().await {
                Ok(price) => {
                    self.stats.fetched += 1;
                    self.cache.set(price, now);
                    info!(price, "새 가격 조회 완료");
                    (price, false)
                }
                Err(e) => {
                    self.stats.fetch_errors += 1;
                    return Err(e.into());
                }
            },
        };

        // 2. 이미지 렌더링
        let image = match self.render_client.render(price).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "이미지 렌더링 완료");
                bytes
            }
            Err(e) => {
                self.stats.render_errors += 1;
                return Err(e.into());
            }
        };

        // 3. 디바이스 푸시
        match self.push_client.push(&image).await {
            Ok(()) => {
                self.stats.pushed += 1;
                info!(price, cache_hit, "Tidbyt 푸시 성공");
            }
            Err(e) => {
                self.stats.push_errors += 1;
                return Err(e.into());
            }
        }

        Ok(UpdateOutcome { price, cache_hit })
    }

    /// 캐시된 가격을 반환합니다 (TTL 검사 포함).
    pub fn cached_price(&self, now: DateTime<Utc>) -> Option<f64> {
        self.cache.get(now)
    }

    /// 누적 통계 반환.
    pub fn stats(&self) -> &UpdateStats {
        &self.stats
    }
}
