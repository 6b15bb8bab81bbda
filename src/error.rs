//! 에러 타입 정의.

use thiserror::Error;

use crate::price::FetchError;
use crate::push::PushError;
use crate::render::RenderError;

/// 트래커 에러 타입.
///
/// `Config`는 시작 시점에만 발생하는 치명적 에러입니다.
/// 나머지는 모두 업데이트 반복 단위 에러로, 데몬 루프에서
/// 로그 후 다음 주기까지 대기합니다.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// 설정 에러 (시작 시 치명적)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 가격 조회 에러
    #[error("가격 조회 에러: {0}")]
    Fetch(#[from] FetchError),

    /// 이미지 렌더링 에러
    #[error("렌더링 에러: {0}")]
    Render(#[from] RenderError),

    /// 디바이스 푸시 에러
    #[error("푸시 에러: {0}")]
    Push(#[from] PushError),
}

impl TrackerError {
    /// 업데이트 반복 내에서 발생하는 에러인지 확인합니다.
    ///
    /// 반복 단위 에러는 루프를 종료시키지 않습니다.
    pub fn is_iteration_error(&self) -> bool {
        !matches!(self, TrackerError::Config(_))
    }
}

/// Result 타입 별칭.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_fatal() {
        let err = TrackerError::Config("api_key 필드가 없습니다".to_string());
        assert!(!err.is_iteration_error());
    }

    #[test]
    fn test_step_errors_are_iteration_errors() {
        let err = TrackerError::Fetch(FetchError::BadStatus(503));
        assert!(err.is_iteration_error());

        let err = TrackerError::Render(RenderError::BadStatus(500));
        assert!(err.is_iteration_error());

        let err = TrackerError::Push(PushError::BadStatus {
            code: 403,
            body: "forbidden".to_string(),
        });
        assert!(err.is_iteration_error());
    }

    #[test]
    fn test_error_display() {
        let err = TrackerError::Fetch(FetchError::BadStatus(503));
        assert!(err.to_string().contains("503"));
    }
}
