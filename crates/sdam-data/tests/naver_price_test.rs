//! Integration tests for the Naver quote-page scraper

use httpmock::prelude::*;
use sdam_data::{DataError, FetchOutcome};
use sdam_data::naver::NaverPriceScraper;
use std::time::Duration;

const QUOTE_PAGE: &str = include_str!("fixtures/quote_page.html");
const LANDING_PAGE: &str = include_str!("fixtures/landing_page.html");

fn scraper(server: &MockServer) -> NaverPriceScraper {
    NaverPriceScraper::with_delay(Duration::from_millis(1))
        .unwrap()
        .with_base_url(server.base_url())
}

fn cp949(text: &str) -> Vec<u8> {
    encoding_rs::EUC_KR.encode(text).0.into_owned()
}

#[tokio::test]
async fn test_fetch_price_cp949_page() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/item/main.naver")
                .query_param("code", "010130");
            then.status(200)
                .header("content-type", "text/html;charset=EUC-KR")
                .body(cp949(QUOTE_PAGE));
        })
        .await;

    let price = scraper(&server).fetch_price("010130").await.unwrap();

    mock.assert_async().await;
    assert_eq!(price, 528_000);
}

#[tokio::test]
async fn test_fetch_price_without_charset() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/item/main.naver");
            then.status(200)
                .header("content-type", "text/html")
                .body(cp949(QUOTE_PAGE));
        })
        .await;

    let collected = scraper(&server).price_or_zero("010130").await;
    assert_eq!(collected.value, 528_000);
    assert_eq!(collected.outcome, FetchOutcome::Found);
}

#[tokio::test]
async fn test_landing_page_reply_is_no_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/item/main.naver");
            then.status(200)
                .header("content-type", "text/html; charset=UTF-8")
                .body(LANDING_PAGE);
        })
        .await;

    let collected = scraper(&server).price_or_zero("999999").await;
    assert_eq!(collected.value, 0);
    assert_eq!(collected.outcome, FetchOutcome::NoData);
}

#[tokio::test]
async fn test_unknown_code_redirects_to_landing_page() {
    let server = MockServer::start_async().await;
    let redirect = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/item/main.naver")
                .query_param("code", "999999");
            then.status(302).header("location", "/");
        })
        .await;
    let landing = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .header("content-type", "text/html; charset=UTF-8")
                .body(LANDING_PAGE);
        })
        .await;

    let scraper = scraper(&server);
    assert!(matches!(
        scraper.fetch_price("999999").await,
        Err(DataError::TickerNotFound(code)) if code == "999999"
    ));
    let collected = scraper.price_or_zero("999999").await;

    redirect.assert_hits_async(2).await;
    landing.assert_hits_async(2).await;
    assert_eq!(collected.value, 0);
    assert_eq!(collected.outcome, FetchOutcome::NoData);
}

#[tokio::test]
async fn test_concurrent_fetches_share_request_spacing() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/item/main.naver");
            then.status(200)
                .header("content-type", "text/html;charset=EUC-KR")
                .body(cp949(QUOTE_PAGE));
        })
        .await;

    let scraper = NaverPriceScraper::with_delay(Duration::from_millis(50))
        .unwrap()
        .with_base_url(server.base_url());
    let start = std::time::Instant::now();
    let (a, b, c) = tokio::join!(
        scraper.price_or_zero("010130"),
        scraper.price_or_zero("010130"),
        scraper.price_or_zero("010130"),
    );

    mock.assert_hits_async(3).await;
    assert!([a, b, c].iter().all(|p| p.value == 528_000));
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_server_error_degrades_to_zero() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/item/main.naver");
            then.status(503);
        })
        .await;

    let collected = scraper(&server).price_or_zero("010130").await;
    assert_eq!(collected.value, 0);
    assert_eq!(collected.outcome, FetchOutcome::Failed);
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_quote_page() {
    let scraper = NaverPriceScraper::new().unwrap();
    let price = scraper.fetch_price("005930").await.unwrap();
    assert!(price > 0);

    let missing = scraper.price_or_zero("999999").await;
    assert_eq!(missing.value, 0);
}
