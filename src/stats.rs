//! 업데이트 통계 구조체.

use serde::{Deserialize, Serialize};

/// 업데이트 루프 통계.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStats {
    /// 총 반복 횟수
    pub ticks: usize,
    /// 캐시 적중 횟수
    pub cache_hits: usize,
    /// 새로 조회한 가격 수
    pub fetched: usize,
    /// 가격 조회 실패 횟수
    pub fetch_errors: usize,
    /// 렌더링 실패 횟수
    pub render_errors: usize,
    /// 푸시 실패 횟수
    pub push_errors: usize,
    /// 성공한 푸시 횟수
    pub pushed: usize,
}

impl UpdateStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 푸시 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            (self.pushed as f64 / self.ticks as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            ticks = self.ticks,
            cache_hits = self.cache_hits,
            fetched = self.fetched,
            fetch_errors = self.fetch_errors,
            render_errors = self.render_errors,
            push_errors = self.push_errors,
            pushed = self.pushed,
            success_rate = format!("{:.1}%", self.success_rate()),
            "업데이트 요약"
        );
    }
}
