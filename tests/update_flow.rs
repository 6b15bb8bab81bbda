//! 업데이트 흐름 통합 테스트 (mockito 기반).

use base64::Engine;
use chrono::Duration;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use bitcoin_tracker::price::{CoindeskClient, FetchError};
use bitcoin_tracker::push::{PushError, TidbytClient};
use bitcoin_tracker::render::PixletClient;
use bitcoin_tracker::{PriceCache, Tracker, TrackerError};

const PRICE_BODY: &str = r#"{"bpi":{"USD":{"rate_float":67890.12}}}"#;

/// 모든 엔드포인트가 mock 서버를 향하는 트래커 생성.
fn tracker_for(server: &ServerGuard) -> Tracker {
    Tracker::with_clients(
        PriceCache::new(Duration::seconds(240)),
        CoindeskClient::new().with_base_url(server.url()),
        PixletClient::new().with_base_url(server.url()),
        TidbytClient::new("test-device", "test-key").with_base_url(server.url()),
    )
}

#[tokio::test]
async fn test_fetch_parses_rate_float() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/bpi/currentprice.json")
        .with_status(200)
        .with_body(PRICE_BODY)
        .create_async()
        .await;

    let client = CoindeskClient::new().with_base_url(server.url());
    let price = client.fetch().await.expect("fetch should succeed");

    assert!((price - 67890.12).abs() < 1e-9);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_503_yields_bad_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/bpi/currentprice.json")
        .with_status(503)
        .create_async()
        .await;

    let client = CoindeskClient::new().with_base_url(server.url());
    let err = client.fetch().await.expect_err("503 should fail");

    assert!(matches!(err, FetchError::BadStatus(503)));
}

#[tokio::test]
async fn test_fetch_garbage_body_yields_parse_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/bpi/currentprice.json")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = CoindeskClient::new().with_base_url(server.url());
    let err = client.fetch().await.expect_err("garbage body should fail");

    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_failure_does_not_update_cache() {
    let mut server = Server::new_async().await;
    // 두 번 모두 503: 첫 실패 후 캐시가 비어 있어야 두 번째 조회가 발생
    let price_mock = server
        .mock("GET", "/v1/bpi/currentprice.json")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let mut tracker = tracker_for(&server);

    let err = tracker.update_once().await.expect_err("first tick fails");
    assert!(matches!(
        err,
        TrackerError::Fetch(FetchError::BadStatus(503))
    ));
    assert_eq!(tracker.cached_price(chrono::Utc::now()), None);

    let err = tracker.update_once().await.expect_err("second tick fails");
    assert!(matches!(err, TrackerError::Fetch(_)));

    price_mock.assert_async().await;
    assert_eq!(tracker.stats().fetch_errors, 2);
    assert_eq!(tracker.stats().pushed, 0);
}

#[tokio::test]
async fn test_end_to_end_update() {
    let mut server = Server::new_async().await;
    let rendered_bytes: &[u8] = b"rendered-webp-bytes";
    let expected_image = base64::engine::general_purpose::STANDARD.encode(rendered_bytes);

    let price_mock = server
        .mock("GET", "/v1/bpi/currentprice.json")
        .with_status(200)
        .with_body(PRICE_BODY)
        .create_async()
        .await;

    // 렌더링 요청 본문에 버림 처리된 가격 라벨이 포함되어야 함
    let render_mock = server
        .mock("POST", "/render")
        .match_body(Matcher::Regex(r#"render\.Text\("\$67890"\)"#.to_string()))
        .with_status(200)
        .with_body(rendered_bytes)
        .create_async()
        .await;

    let push_mock = server
        .mock("POST", "/v0/devices/test-device/push")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "image": expected_image,
            "installation_id": "bitcoin-tracker",
            "background": true,
        })))
        .with_status(200)
        .create_async()
        .await;

    let mut tracker = tracker_for(&server);
    let outcome = tracker.update_once().await.expect("update should succeed");

    assert!((outcome.price - 67890.12).abs() < 1e-9);
    assert!(!outcome.cache_hit);

    price_mock.assert_async().await;
    render_mock.assert_async().await;
    push_mock.assert_async().await;

    assert_eq!(tracker.stats().pushed, 1);
    assert_eq!(tracker.stats().fetched, 1);
}

#[tokio::test]
async fn test_cache_hit_skips_fetch_on_second_tick() {
    let mut server = Server::new_async().await;
    let price_mock = server
        .mock("GET", "/v1/bpi/currentprice.json")
        .with_status(200)
        .with_body(PRICE_BODY)
        .expect(1)
        .create_async()
        .await;
    let _render_mock = server
        .mock("POST", "/render")
        .with_status(200)
        .with_body("img")
        .expect(2)
        .create_async()
        .await;
    let _push_mock = server
        .mock("POST", "/v0/devices/test-device/push")
        .with_status(200)
        .expect(2)
        .create_async()
        .await;

    let mut tracker = tracker_for(&server);

    let first = tracker.update_once().await.expect("first update");
    assert!(!first.cache_hit);

    let second = tracker.update_once().await.expect("second update");
    assert!(second.cache_hit);
    assert!((second.price - 67890.12).abs() < 1e-9);

    // TTL 이내의 두 번째 반복은 가격 API를 호출하지 않음
    price_mock.assert_async().await;
    assert_eq!(tracker.stats().cache_hits, 1);
}

#[tokio::test]
async fn test_push_403_reports_error_and_loop_continues() {
    let mut server = Server::new_async().await;
    let price_mock = server
        .mock("GET", "/v1/bpi/currentprice.json")
        .with_status(200)
        .with_body(PRICE_BODY)
        .expect(1)
        .create_async()
        .await;
    let _render_mock = server
        .mock("POST", "/render")
        .with_status(200)
        .with_body("img")
        .expect(2)
        .create_async()
        .await;
    let push_mock = server
        .mock("POST", "/v0/devices/test-device/push")
        .with_status(403)
        .with_body("device forbidden")
        .expect(2)
        .create_async()
        .await;

    let mut tracker = tracker_for(&server);

    let err = tracker.update_once().await.expect_err("push should fail");
    match err {
        TrackerError::Push(PushError::BadStatus { code, body }) => {
            assert_eq!(code, 403);
            assert!(body.contains("device forbidden"));
        }
        other => panic!("unexpected error: {}", other),
    }

    // 다음 반복도 정상 동작 (캐시 적중, 가격 API 재호출 없음)
    let err = tracker.update_once().await.expect_err("push fails again");
    assert!(matches!(err, TrackerError::Push(_)));

    price_mock.assert_async().await;
    push_mock.assert_async().await;
    assert_eq!(tracker.stats().push_errors, 2);
    assert_eq!(tracker.stats().cache_hits, 1);
}

#[tokio::test]
async fn test_render_failure_aborts_before_push() {
    let mut server = Server::new_async().await;
    let _price_mock = server
        .mock("GET", "/v1/bpi/currentprice.json")
        .with_status(200)
        .with_body(PRICE_BODY)
        .create_async()
        .await;
    let _render_mock = server
        .mock("POST", "/render")
        .with_status(500)
        .create_async()
        .await;
    let push_mock = server
        .mock("POST", "/v0/devices/test-device/push")
        .expect(0)
        .create_async()
        .await;

    let mut tracker = tracker_for(&server);

    let err = tracker.update_once().await.expect_err("render should fail");
    assert!(matches!(err, TrackerError::Render(_)));

    // 렌더링 실패 시 푸시는 시도하지 않음
    push_mock.assert_async().await;
    assert_eq!(tracker.stats().render_errors, 1);
}
