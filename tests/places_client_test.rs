use httpmock::prelude::*;
use places_collector::core::PlacesApi;
use places_collector::{
    BusinessCollector, BusinessRecord, CollectionEngine, CollectorConfig, CollectorError,
    GooglePlacesClient, LocalStorage, SearchRegion,
};
use std::time::Duration;
use tempfile::TempDir;

const API_KEY: &str = "test-key";
const FIELDS: &str = "name,formatted_phone_number,international_phone_number";

fn client(server: &MockServer) -> GooglePlacesClient {
    GooglePlacesClient::with_base_url(API_KEY, server.url(""), Duration::from_secs(5)).unwrap()
}

fn mock_detail<'a>(server: &'a MockServer, place_id: &str, body: serde_json::Value) -> httpmock::Mock<'a> {
    let place_id = place_id.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path("/details/json")
            .query_param("place_id", place_id.as_str())
            .query_param("fields", FIELDS)
            .query_param("key", API_KEY);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

fn detail_ok(name: &str, phone: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "result": {"name": name, "formatted_phone_number": phone}
    })
}

#[tokio::test]
async fn test_nearby_search_sends_region_and_filters() {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/nearbysearch/json")
            .query_param("location", "25.7617,-80.1918")
            .query_param("radius", "50000")
            .query_param("keyword", "restaurant")
            .query_param("type", "establishment")
            .query_param("key", API_KEY);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "OK",
                "results": [{"place_id": "p1", "name": "Joe's Diner"}, {"name": "No Id"}],
                "next_page_token": "tok-1"
            }));
    });

    let page = client(&server)
        .nearby_search(&SearchRegion::default(), "restaurant", "establishment")
        .await
        .unwrap();

    search_mock.assert();
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].place_id.as_deref(), Some("p1"));
    assert!(page.results[1].place_id.is_none());
    assert_eq!(page.next_page_token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_zero_results_is_an_empty_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/nearbysearch/json");
        then.status(200)
            .json_body(serde_json::json!({"status": "ZERO_RESULTS", "results": []}));
    });

    let page = client(&server)
        .nearby_search(&SearchRegion::default(), "igloo", "establishment")
        .await
        .unwrap();

    assert!(page.results.is_empty());
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn test_denied_status_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/nearbysearch/json");
        then.status(200).json_body(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        }));
    });

    let err = client(&server)
        .nearby_search(&SearchRegion::default(), "store", "establishment")
        .await
        .unwrap_err();

    match err {
        CollectorError::ApiStatus { status, message } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert!(message.contains("invalid"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_status_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/details/json");
        then.status(500);
    });

    let err = client(&server)
        .place_detail("p1", &["name"])
        .await
        .unwrap_err();

    assert!(matches!(err, CollectorError::Http(_)));
}

#[tokio::test]
async fn test_collector_paginates_dedups_and_saves() {
    let server = MockServer::start();

    let first_page = server.mock(|when, then| {
        when.method(GET)
            .path("/nearbysearch/json")
            .query_param("keyword", "restaurant");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [{"place_id": "p1"}, {"place_id": "p2"}],
            "next_page_token": "tok-1"
        }));
    });
    let second_page = server.mock(|when, then| {
        when.method(GET)
            .path("/nearbysearch/json")
            .query_param("pagetoken", "tok-1")
            .query_param("key", API_KEY);
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [{"place_id": "p3"}]
        }));
    });
    let diner_search = server.mock(|when, then| {
        when.method(GET)
            .path("/nearbysearch/json")
            .query_param("keyword", "diner");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [{"place_id": "p4"}]
        }));
    });

    mock_detail(&server, "p1", detail_ok("Joe's Diner", "305-555-0100"));
    // No phone: skipped
    mock_detail(
        &server,
        "p2",
        serde_json::json!({"status": "OK", "result": {"name": "Silent Shop"}}),
    );
    mock_detail(
        &server,
        "p3",
        serde_json::json!({
            "status": "OK",
            "result": {"name": "Café Ñandú", "international_phone_number": "+1 305-555-0101"}
        }),
    );
    mock_detail(&server, "p4", detail_ok("Joe's Diner", "305-555-0100"));

    let temp_dir = TempDir::new().unwrap();
    let collector = BusinessCollector::new(
        client(&server),
        LocalStorage::new(temp_dir.path()),
        SearchRegion::default(),
    )
    .with_page_delay(Duration::ZERO);

    let queries = vec!["restaurant".to_string(), "diner".to_string()];
    let (results, stats) = collector.search_with_stats(&queries, 100).await;

    first_page.assert();
    second_page.assert();
    diner_search.assert();
    assert_eq!(
        results.records(),
        &[
            BusinessRecord::new("Joe's Diner", "305-555-0100"),
            BusinessRecord::new("Café Ñandú", "+1 305-555-0101"),
        ]
    );
    assert_eq!(stats.duplicates_dropped, 1);
    assert_eq!(stats.places_skipped, 1);

    collector.save(results.records(), "businesses.json").await.unwrap();

    let text = std::fs::read_to_string(temp_dir.path().join("businesses.json")).unwrap();
    assert!(text.contains("Café Ñandú"));
    assert!(text.starts_with("[\n  {\n    \"business_name\": \"Joe's Diner\""));

    let reparsed: Vec<BusinessRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed, results.records());
}

#[tokio::test]
async fn test_failed_detail_does_not_stop_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/nearbysearch/json");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [{"place_id": "ok-1"}, {"place_id": "bad"}, {"place_id": "ok-2"}]
        }));
    });
    mock_detail(&server, "ok-1", detail_ok("First Clinic", "305-555-0110"));
    mock_detail(
        &server,
        "bad",
        serde_json::json!({"status": "NOT_FOUND", "result": {}}),
    );
    mock_detail(&server, "ok-2", detail_ok("Second Clinic", "305-555-0111"));

    let temp_dir = TempDir::new().unwrap();
    let collector = BusinessCollector::new(
        client(&server),
        LocalStorage::new(temp_dir.path()),
        SearchRegion::default(),
    );

    let records = collector.search_one("clinic", 10).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].name, "Second Clinic");
}

#[tokio::test]
async fn test_save_to_unwritable_path_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    // A regular file cannot act as a directory, even for root
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();
    let target = blocker.join("out.json");

    let server = MockServer::start();
    let collector = BusinessCollector::new(
        client(&server),
        LocalStorage::new(temp_dir.path()),
        SearchRegion::default(),
    );

    let result = collector
        .save(
            &[BusinessRecord::new("Any Gym", "305-555-0120")],
            target.to_str().unwrap(),
        )
        .await;

    assert!(matches!(result, Err(CollectorError::Io(_))));
}

#[tokio::test]
async fn test_engine_run_without_results_writes_nothing() {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/nearbysearch/json");
        then.status(200)
            .json_body(serde_json::json!({"status": "ZERO_RESULTS", "results": []}));
    });

    let temp_dir = TempDir::new().unwrap();
    let config = CollectorConfig {
        queries: vec!["hotel".to_string(), "market".to_string()],
        page_delay: Duration::ZERO,
        output_path: "empty.json".to_string(),
        ..CollectorConfig::default()
    };
    let engine = CollectionEngine::new(client(&server), LocalStorage::new(temp_dir.path()), config);

    let summary = engine.run().await;

    search_mock.assert_hits(2);
    assert_eq!(summary.records, 0);
    assert!(summary.output_path.is_none());
    assert!(!temp_dir.path().join("empty.json").exists());
}

#[tokio::test]
async fn test_engine_run_completes_when_save_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/nearbysearch/json");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [{"place_id": "s1"}]
        }));
    });
    mock_detail(&server, "s1", detail_ok("Harbor Salon", "305-555-0150"));

    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();
    let config = CollectorConfig {
        queries: vec!["salon".to_string()],
        page_delay: Duration::ZERO,
        output_path: blocker.join("out.json").to_str().unwrap().to_string(),
        ..CollectorConfig::default()
    };
    let engine = CollectionEngine::new(client(&server), LocalStorage::new(temp_dir.path()), config);

    let summary = engine.run().await;

    assert_eq!(summary.records, 1);
    assert!(summary.output_path.is_none());
}

#[tokio::test]
async fn test_engine_run_respects_max_results() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/nearbysearch/json");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [{"place_id": "a"}, {"place_id": "b"}, {"place_id": "c"}]
        }));
    });
    mock_detail(&server, "a", detail_ok("Alpha Office", "305-555-0131"));
    let b_mock = mock_detail(&server, "b", detail_ok("Beta Office", "305-555-0132"));
    let c_mock = mock_detail(&server, "c", detail_ok("Gamma Office", "305-555-0133"));

    let temp_dir = TempDir::new().unwrap();
    let config = CollectorConfig {
        queries: vec!["office".to_string()],
        max_results: 2,
        page_delay: Duration::ZERO,
        output_path: "offices.json".to_string(),
        ..CollectorConfig::default()
    };
    let engine = CollectionEngine::new(client(&server), LocalStorage::new(temp_dir.path()), config);

    let summary = engine.run().await;

    assert_eq!(summary.records, 2);
    assert_eq!(summary.output_path.as_deref(), Some("offices.json"));
    b_mock.assert();
    c_mock.assert_hits(0);

    let saved: Vec<BusinessRecord> = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("offices.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[1].name, "Beta Office");
}
