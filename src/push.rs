//! Tidbyt 디바이스 푸시 클라이언트.
//!
//! 렌더링된 이미지를 base64로 인코딩하여 Tidbyt Push API로 전송합니다.

use base64::Engine;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Tidbyt API 기본 URL.
const DEFAULT_BASE_URL: &str = "https://api.tidbyt.com";
/// HTTP 전송 타임아웃 (초).
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// 이 앱 설치를 식별하는 installation ID.
pub const INSTALLATION_ID: &str = "bitcoin-tracker";

/// 푸시 에러.
#[derive(Debug, Error)]
pub enum PushError {
    /// 네트워크/전송 에러
    #[error("네트워크 에러: {0}")]
    Network(#[from] reqwest::Error),

    /// 비정상 응답 상태 코드 (진단용 응답 본문 포함)
    #[error("푸시 실패: HTTP {code}: {body}")]
    BadStatus { code: u16, body: String },
}

/// 푸시 요청 본문.
#[derive(Debug, Serialize)]
struct PushRequest {
    /// base64 인코딩된 이미지
    image: String,
    installation_id: &'static str,
    /// 디바이스 앱 로테이션을 방해하지 않는 백그라운드 업데이트
    background: bool,
}

/// Tidbyt 디바이스 푸시 클라이언트.
#[derive(Debug, Clone)]
pub struct TidbytClient {
    client: reqwest::Client,
    base_url: String,
    device_id: String,
    api_key: String,
}

impl TidbytClient {
    /// 디바이스 credential로 생성.
    pub fn new(device_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("HTTP 클라이언트 생성 실패"),
            base_url: DEFAULT_BASE_URL.to_string(),
            device_id: device_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Base URL 재정의 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 렌더링된 이미지를 디바이스로 푸시합니다.
    pub async fn push(&self, image: &[u8]) -> Result<(), PushError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let body = PushRequest {
            image: encoded,
            installation_id: INSTALLATION_ID,
            background: true,
        };

        let url = format!("{}/v0/devices/{}/push", self.base_url, self.device_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::BadStatus { code: status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_request_body_shape() {
        let body = PushRequest {
            image: "aGVsbG8=".to_string(),
            installation_id: INSTALLATION_ID,
            background: true,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["image"], "aGVsbG8=");
        assert_eq!(json["installation_id"], "bitcoin-tracker");
        assert_eq!(json["background"], true);
    }

    #[test]
    fn test_image_base64_encoding() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"fake-webp-bytes");
        assert_eq!(encoded, "ZmFrZS13ZWJwLWJ5dGVz");
    }
}
