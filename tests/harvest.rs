//! End-to-end harvest tests against a mock search API

use finna_harvest::{Config, Harvester, MemoryImageStore, RetryConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointed at the mock server, with delays small enough for tests
fn test_config(server: &MockServer, buildings: &[&str]) -> Config {
    Config {
        endpoint: format!("{}/api/v1/search", server.uri()),
        page_limit: 2,
        request_delay: Duration::ZERO,
        retry: RetryConfig {
            max_attempts: 1,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            jitter: false,
        },
        buildings: buildings.iter().map(|b| b.to_string()).collect(),
        ..Config::default()
    }
}

/// A minimal record body with one image
fn record_json(id: &str, building: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Title of {id}"),
        "buildings": [{"value": building}],
        "imageRights": {"link": "http://creativecommons.org/licenses/by/4.0/"},
        "images": [format!("/Cover/Show?id={id}&index=0")],
        "subjects": [["subject"]]
    })
}

fn page_response(records: Vec<serde_json::Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "resultCount": records.len(),
        "records": records,
        "status": "OK"
    }))
}

#[tokio::test]
async fn pagination_stops_at_first_empty_page() {
    let server = MockServer::start().await;
    let building = "0/SATMUSEO/";

    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "1"))
        .respond_with(page_response(vec![
            record_json("satmuseo.1", building),
            record_json("satmuseo.2", building),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "2"))
        .respond_with(page_response(vec![record_json("satmuseo.3", building)]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "3"))
        .respond_with(page_response(vec![]))
        .mount(&server)
        .await;

    let harvester =
        Harvester::new(test_config(&server, &[building]), MemoryImageStore::new()).unwrap();
    let total = harvester.run().await.unwrap();

    assert_eq!(total, 3);

    // Exactly three pages requested: two with records, then the empty one
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3, "should stop exactly at the empty page");
}

#[tokio::test]
async fn missing_records_field_terminates_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .mount(&server)
        .await;

    let harvester =
        Harvester::new(test_config(&server, &["0/SATMUSEO/"]), MemoryImageStore::new()).unwrap();
    let total = harvester.run().await.unwrap();

    assert_eq!(total, 0);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn building_filter_is_passed_verbatim() {
    let server = MockServer::start().await;
    let building = "0/Suomen kansallismuseo/";

    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(page_response(vec![]))
        .mount(&server)
        .await;

    let harvester =
        Harvester::new(test_config(&server, &[building]), MemoryImageStore::new()).unwrap();
    harvester.run().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let filters: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| k == "filter[]")
        .map(|(_, v)| v.as_str())
        .collect();
    assert!(
        filters.contains(&r#"format:"0/Image/""#),
        "format filter missing from {filters:?}"
    );
    assert!(
        filters.contains(&r#"building:"0/Suomen kansallismuseo/""#),
        "building filter not passed verbatim: {filters:?}"
    );
    assert!(pairs.contains(&("limit".to_string(), "2".to_string())));
    assert!(pairs.contains(&("page".to_string(), "1".to_string())));
}

#[tokio::test]
async fn records_are_classified_by_sub_provider_table() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "1"))
        .respond_with(page_response(vec![
            record_json("satmuseo.1", "0/SATMUSEO/"),
            record_json("kansallismuseo.1", "0/Suomen kansallismuseo/"),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "2"))
        .respond_with(page_response(vec![]))
        .mount(&server)
        .await;

    let harvester =
        Harvester::new(test_config(&server, &["0/SATMUSEO/"]), MemoryImageStore::new()).unwrap();
    harvester.run().await.unwrap();

    let records = harvester.store().records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source, "finnish_satakunta_museum");
    // National museum has no sub-provider entry, falls back to default
    assert_eq!(records[1].source, "finna");
}

#[tokio::test]
async fn one_record_per_image_with_prefixed_urls() {
    let server = MockServer::start().await;

    let multi_image = json!({
        "id": "sakuva.42",
        "title": "Talvisota",
        "buildings": [{"value": "0/SA-kuva/"}],
        "imageRights": {"link": "http://creativecommons.org/licenses/by/4.0/"},
        "images": ["/Cover/Show?id=sakuva.42&index=0", "/Cover/Show?id=sakuva.42&index=1"],
        "subjects": []
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "1"))
        .respond_with(page_response(vec![multi_image]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "2"))
        .respond_with(page_response(vec![]))
        .mount(&server)
        .await;

    let harvester =
        Harvester::new(test_config(&server, &["0/SA-kuva/"]), MemoryImageStore::new()).unwrap();
    let total = harvester.run().await.unwrap();

    assert_eq!(total, 2);
    let records = harvester.store().records().await;
    assert_eq!(
        records[0].image_url,
        "https://api.finna.fi/Cover/Show?id=sakuva.42&index=0"
    );
    assert_eq!(
        records[1].image_url,
        "https://api.finna.fi/Cover/Show?id=sakuva.42&index=1"
    );
    assert_eq!(
        records[0].foreign_landing_url,
        "https://www.finna.fi/Record/sakuva.42"
    );
    assert_eq!(records[0].source, "finnish_defence_forces");
}

#[tokio::test]
async fn commit_total_spans_all_buildings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("filter[]", r#"building:"0/SATMUSEO/""#))
        .and(query_param("page", "1"))
        .respond_with(page_response(vec![record_json("satmuseo.1", "0/SATMUSEO/")]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("filter[]", r#"building:"0/Museovirasto/""#))
        .and(query_param("page", "1"))
        .respond_with(page_response(vec![
            record_json("musketti.1", "0/Museovirasto/"),
            record_json("musketti.2", "0/Museovirasto/"),
        ]))
        .mount(&server)
        .await;
    // Every page past the first is empty, for either building
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "2"))
        .respond_with(page_response(vec![]))
        .mount(&server)
        .await;

    let harvester = Harvester::new(
        test_config(&server, &["0/SATMUSEO/", "0/Museovirasto/"]),
        MemoryImageStore::new(),
    )
    .unwrap();
    let total = harvester.run().await.unwrap();

    assert_eq!(total, 3);
    let records = harvester.store().records().await;
    assert_eq!(records[0].source, "finnish_satakunta_museum");
    assert_eq!(records[1].source, "finnish_heritage_agency");
}

#[tokio::test]
async fn server_errors_end_pagination_after_retries_without_failing_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let harvester =
        Harvester::new(test_config(&server, &["0/SATMUSEO/"]), MemoryImageStore::new()).unwrap();
    let total = harvester.run().await.unwrap();

    assert_eq!(total, 0, "failed building yields no records but run completes");
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2, "initial attempt + 1 retry");
}

#[tokio::test]
async fn transient_error_recovers_and_pagination_continues() {
    let server = MockServer::start().await;

    // First hit on page 1 fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "1"))
        .respond_with(page_response(vec![record_json("satmuseo.1", "0/SATMUSEO/")]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("page", "2"))
        .respond_with(page_response(vec![]))
        .mount(&server)
        .await;

    let harvester =
        Harvester::new(test_config(&server, &["0/SATMUSEO/"]), MemoryImageStore::new()).unwrap();
    let total = harvester.run().await.unwrap();

    assert_eq!(total, 1);
}
