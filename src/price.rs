//! CoinDesk 가격 조회 클라이언트.
//!
//! CoinDesk 공개 API에서 현재 비트코인 USD 가격을 조회합니다.
//! 캐시 검사/갱신은 호출자(Tracker)의 책임이며, 이 클라이언트는
//! 네트워크 호출 외의 부수효과가 없습니다.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// CoinDesk API 기본 URL.
const DEFAULT_BASE_URL: &str = "https://api.coindesk.com";
/// HTTP 전송 타임아웃 (초).
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// 가격 조회 에러.
#[derive(Debug, Error)]
pub enum FetchError {
    /// 네트워크/전송 에러
    #[error("네트워크 에러: {0}")]
    Network(#[from] reqwest::Error),

    /// 비정상 응답 상태 코드
    #[error("가격 API 응답 실패: HTTP {0}")]
    BadStatus(u16),

    /// 응답 본문 파싱 실패
    #[error("가격 파싱 실패: {0}")]
    Parse(String),
}

/// CoinDesk currentprice.json 응답.
///
/// 고정 경로 `bpi.USD.rate_float`만 사용합니다.
#[derive(Debug, Deserialize)]
struct PriceResponse {
    bpi: Bpi,
}

#[derive(Debug, Deserialize)]
struct Bpi {
    #[serde(rename = "USD")]
    usd: UsdQuote,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    rate_float: f64,
}

/// CoinDesk 가격 조회 클라이언트.
#[derive(Debug, Clone)]
pub struct CoindeskClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoindeskClient {
    /// 기본 설정으로 생성.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("HTTP 클라이언트 생성 실패"),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Base URL 재정의 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 현재 비트코인 USD 가격을 조회합니다.
    pub async fn fetch(&self) -> Result<f64, FetchError> {
        let url = format!("{}/v1/bpi/currentprice.json", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::BadStatus(status));
        }

        let parsed: PriceResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let price = parsed.bpi.usd.rate_float;
        if price <= 0.0 {
            return Err(FetchError::Parse(format!("양수가 아닌 가격: {}", price)));
        }

        Ok(price)
    }
}

impl Default for CoindeskClient {
    fn default() -> Self {
        Self::new()
    }
}
