//! Error scenario integration tests
//!
//! Runs the real HTTP collaborators against wiremock servers:
//! 1. Rate limiting (single fixed-delay retry)
//! 2. HTTP error responses (404, 500)
//! 3. Network timeouts
//! 4. Ticker resolution failures that abort the pipeline

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipolens::collaborators::{
    FileTextExtractor, HttpFetcher, NewsApiClient, ScreenerClient, SentimentSource,
    YahooSearchResolver,
};
use ipolens::error::{EnrichmentSource, Error, FetchError};
use ipolens::models::{Conclusion, PerformanceTrend, PipelineState};
use ipolens::pipeline::{PipelineOutcome, ProfitabilityPipeline};
use ipolens::utils::retry::RateLimitRetry;

use super::fixtures::{
    NEWS_JSON, PROSPECTUS_HTML, PROSPECTUS_TEXT, SCREENER_HTML, SEARCH_EMPTY_JSON, SEARCH_JSON,
};
use crate::common::FakeExtractor;

const RETRY_DELAY: Duration = Duration::from_millis(50);

fn fetcher() -> Arc<HttpFetcher> {
    Arc::new(
        HttpFetcher::new(
            100,
            Duration::from_secs(5),
            "ipolens-test",
            RateLimitRetry::new(RETRY_DELAY),
        )
        .unwrap(),
    )
}

fn news_client(server: &MockServer) -> NewsApiClient {
    NewsApiClient::new(fetcher(), server.uri(), Some(String::from("test-key")))
}

// ============================================================================
// Rate Limiting Tests
// ============================================================================

#[tokio::test]
async fn test_rate_limit_retried_once_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_JSON))
        .expect(1)
        .mount(&mock_server)
        .await;

    let start = Instant::now();
    let scores = news_client(&mock_server)
        .fetch_sentiment("Acme Foods")
        .await
        .unwrap();

    assert!(start.elapsed() >= RETRY_DELAY, "retry should wait the fixed delay");
    assert_eq!(scores.len(), 3);
}

#[tokio::test]
async fn test_rate_limit_twice_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2) // original request plus exactly one retry
        .mount(&mock_server)
        .await;

    let result = news_client(&mock_server).fetch_sentiment("Acme Foods").await;
    assert!(matches!(result, Err(FetchError::RateLimit)));
}

// ============================================================================
// HTTP Error Response Tests
// ============================================================================

#[tokio::test]
async fn test_server_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = news_client(&mock_server).fetch_sentiment("Acme Foods").await;
    assert!(matches!(result, Err(FetchError::ServerError(500))));
}

#[tokio::test]
async fn test_news_request_carries_query_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "Acme Foods"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_JSON))
        .expect(1)
        .mount(&mock_server)
        .await;

    let headlines = news_client(&mock_server)
        .fetch_headlines("Acme Foods")
        .await
        .unwrap();
    assert_eq!(headlines.len(), 3);
    assert!(headlines[0].starts_with("Acme Foods IPO sees strong demand"));
}

#[tokio::test]
async fn test_screener_404_degrades_market_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/company/UNKNOWN/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pipeline = ProfitabilityPipeline::builder(Arc::new(FakeExtractor::text(PROSPECTUS_TEXT)))
        .market_source(Arc::new(ScreenerClient::new(fetcher(), mock_server.uri())))
        .build()
        .unwrap();

    let result = pipeline
        .run(Path::new("prospectus.txt"), "UNKNOWN")
        .await
        .into_result()
        .unwrap();

    assert!(result.competitors.is_empty());
    assert_eq!(result.degradations[0].kind, EnrichmentSource::MarketData);
}

// ============================================================================
// Network Error Tests
// ============================================================================

#[tokio::test]
async fn test_timeout_degrades_sentiment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(NEWS_JSON)
                .set_delay(Duration::from_secs(5)), // Longer than timeout
        )
        .mount(&mock_server)
        .await;

    let short_timeout = Arc::new(
        HttpFetcher::new(
            100,
            Duration::from_millis(200),
            "ipolens-test",
            RateLimitRetry::new(RETRY_DELAY),
        )
        .unwrap(),
    );
    let news = NewsApiClient::new(short_timeout, mock_server.uri(), Some(String::from("k")));

    let pipeline = ProfitabilityPipeline::builder(Arc::new(FakeExtractor::text(PROSPECTUS_TEXT)))
        .sentiment_source(Arc::new(news))
        .build()
        .unwrap();

    let result = pipeline
        .run(Path::new("prospectus.txt"), "Acme Foods")
        .await
        .into_result()
        .unwrap();

    assert_eq!(result.sentiment.value(), 0.0);
    assert_eq!(result.degradations[0].kind, EnrichmentSource::Sentiment);
    assert!(result.degradations[0].reason.contains("timeout"));
}

// ============================================================================
// Resolution Failures
// ============================================================================

#[tokio::test]
async fn test_search_without_quotes_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/finance/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_EMPTY_JSON))
        .mount(&mock_server)
        .await;

    let pipeline = ProfitabilityPipeline::builder(Arc::new(FakeExtractor::text(PROSPECTUS_TEXT)))
        .resolver(Arc::new(YahooSearchResolver::new(fetcher(), mock_server.uri())))
        .build()
        .unwrap();

    match pipeline.run(Path::new("prospectus.txt"), "Nobody Ltd").await {
        PipelineOutcome::Aborted { stage, error, .. } => {
            assert_eq!(stage, PipelineState::Resolving);
            assert!(matches!(error, Error::Resolution { ref company, .. } if company == "Nobody Ltd"));
        }
        PipelineOutcome::Done(_) => panic!("expected abort"),
    }
}

#[tokio::test]
async fn test_search_rate_limited_twice_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/finance/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&mock_server)
        .await;

    let pipeline = ProfitabilityPipeline::builder(Arc::new(FakeExtractor::text(PROSPECTUS_TEXT)))
        .resolver(Arc::new(YahooSearchResolver::new(fetcher(), mock_server.uri())))
        .build()
        .unwrap();

    let outcome = pipeline.run(Path::new("prospectus.txt"), "Acme Foods").await;
    assert!(!outcome.is_done());
    assert_eq!(outcome.transitions().last(), Some(&PipelineState::Aborted));
}

// ============================================================================
// End-to-end against mock services
// ============================================================================

#[tokio::test]
async fn test_end_to_end_with_mock_services() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/finance/search"))
        .and(query_param("q", "Acme Foods"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_JSON))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_JSON))
        .mount(&mock_server)
        .await;

    // Exchange suffix is stripped for the screener
    Mock::given(method("GET"))
        .and(path("/company/ACMEFOODS/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SCREENER_HTML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(PROSPECTUS_TEXT.as_bytes()).unwrap();

    let http = fetcher();
    let pipeline = ProfitabilityPipeline::builder(Arc::new(FileTextExtractor::new()))
        .resolver(Arc::new(YahooSearchResolver::new(http.clone(), mock_server.uri())))
        .sentiment_source(Arc::new(NewsApiClient::new(
            http.clone(),
            mock_server.uri(),
            Some(String::from("test-key")),
        )))
        .market_source(Arc::new(ScreenerClient::new(http, mock_server.uri())))
        .build()
        .unwrap();

    let result = pipeline
        .run(file.path(), "Acme Foods")
        .await
        .into_result()
        .unwrap();

    let identity = result.identity.as_ref().unwrap();
    assert_eq!(identity.ticker, "ACMEFOODS.NS");
    assert_eq!(identity.sector.as_deref(), Some("Consumer Cyclical"));

    assert!(result.sentiment.is_positive());
    assert!(result.sentiment.value() < 1.0);

    let quote = result.quote.as_ref().unwrap();
    assert_eq!(quote.price.as_deref(), Some("₹ 412"));
    assert_eq!(quote.pe_ratio, None);

    assert_eq!(result.competitors.len(), 2);
    assert_eq!(result.competitors.records()[0].name, "Zomato Ltd");
    assert_eq!(result.competitors.records()[0].market_share_percent, 60.0);
    assert_eq!(
        result.competitors.records()[1].performance_trend,
        PerformanceTrend::Declining
    );

    assert_eq!(result.conclusion, Conclusion::RiskyOrLessProfitable);
    assert!(!result.is_degraded());
}

#[tokio::test]
async fn test_html_prospectus_extraction() {
    let mut file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
    file.write_all(PROSPECTUS_HTML.as_bytes()).unwrap();

    let pipeline = ProfitabilityPipeline::builder(Arc::new(FileTextExtractor::new()))
        .build()
        .unwrap();

    let result = pipeline
        .run(file.path(), "Acme Foods")
        .await
        .into_result()
        .unwrap();

    // Script and style contents are not counted
    assert_eq!(result.impact_table.impact_of("revenue"), Some(1.0));
    assert_eq!(result.impact_table.impact_of("growth"), Some(1.0));
}
