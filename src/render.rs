//! pixlet 렌더링 클라이언트.
//!
//! 아이콘과 가격 라벨을 배치한 starlark 스크립트를 생성하여
//! pixlet 렌더링 서비스에 제출하고, 렌더링된 이미지 바이트를 받습니다.
//! 이미지 렌더링 자체는 전적으로 외부 서비스에 위임합니다.

use std::time::Duration;
use thiserror::Error;

/// pixlet 렌더링 서비스 기본 URL.
const DEFAULT_BASE_URL: &str = "https://pixlet.tidbyt.com";
/// HTTP 전송 타임아웃 (초).
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// 비트코인 아이콘 (base64 인코딩된 PNG).
const BTC_ICON: &str = "iVBORw0KGgoAAAANSUhEUgAAABEAAAARCAYAAAA7bUf6AAAAlklEQVQ4T2NkwAH+H2T/jy7FaP+TEZtyDEG4Zi0TTPXXzoDF0A1DMQRsADbN6MZdO4NiENwQbAbERh1lWLzMmgFGo5iFZBDYEFwuwGsISCPUIKyGgDRjAyBXYXMNIz5XgDQga8TpLboYgux8DO/AwoUuLiEqTLBFMcmxQ7V0gssgklIsLAYozjsoBoE45OZi5DRBSnkCAMLhlPBiQGHlAAAAAElFTkSuQmCC";

/// 렌더링 에러.
#[derive(Debug, Error)]
pub enum RenderError {
    /// 네트워크/전송 에러
    #[error("네트워크 에러: {0}")]
    Network(#[from] reqwest::Error),

    /// 비정상 응답 상태 코드
    #[error("렌더링 실패: HTTP {0}")]
    BadStatus(u16),
}

/// 가격 라벨이 포함된 starlark 렌더링 스크립트를 생성합니다.
///
/// 아이콘을 왼쪽, 가격 텍스트를 오른쪽에 배치하고 가로로 고르게
/// 정렬합니다. 가격은 반올림하지 않고 정수로 버림 처리합니다
/// (예: 42999.9 → "42999").
pub fn build_render_script(price: f64) -> String {
    format!(
        r#"load("render.star", "render")
load("encoding/base64.star", "base64")

BTC_ICON = base64.decode("{icon}")

def main():
    return render.Root(
        child = render.Box(
            render.Row(
                expanded = True,
                main_align = "space_evenly",
                cross_align = "center",
                children = [
                    render.Image(src = BTC_ICON),
                    render.Text("${price}"),
                ],
            ),
        ),
    )
"#,
        icon = BTC_ICON,
        price = price as i64
    )
}

/// pixlet 렌더링 클라이언트.
#[derive(Debug, Clone)]
pub struct PixletClient {
    client: reqwest::Client,
    base_url: String,
}

impl PixletClient {
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

    /// 가격을 표시하는 이미지를 렌더링합니다.
    ///
    /// 성공 시 응답 본문(이미지 바이트)을 그대로 반환합니다.
    pub async fn render(&self, price: f64) -> Result<Vec<u8>, RenderError> {
        let script = build_render_script(price);
        let url = format!("{}/render", self.base_url);

        let response = self
            .client
            .post(&url)
            .body(script.into_bytes())
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(RenderError::BadStatus(status));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

impl Default for PixletClient {
    fn default() -> Self {
        Self::new()
    }
}
