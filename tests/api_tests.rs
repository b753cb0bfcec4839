use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use covid_cases_api::api::{self, AppState};
use covid_cases_api::storage::{CaseRecord, InMemoryStore, StoreError};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

const TABLE: &str = "jbhattar-covid-19-data";

fn record(country: &str, confirmed: &str) -> CaseRecord {
    CaseRecord {
        country_region: Some(country.to_string()),
        confirmed: Some(confirmed.to_string()),
        ..Default::default()
    }
}

fn app_with(store: InMemoryStore) -> Router {
    api::router(AppState::new(Arc::new(store), TABLE))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, content_type, json)
}

#[tokio::test]
async fn test_search_scenario() {
    let app = app_with(InMemoryStore::new(vec![record("United States", "100")]));

    let (status, content_type, body) = get(&app, "/jbhattar/search?country=United").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["Country_Region"], "United States");
    assert_eq!(matches[0]["Confirmed"], "100");

    let (status, _, body) = get(&app, "/jbhattar/search?country=123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "The format of the search is search?country=US");

    let (status, _, body) = get(&app, "/jbhattar/search?country=Xz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_search_validation() {
    let app = app_with(InMemoryStore::new(vec![
        record("United States", "100"),
        record("United Kingdom", "50"),
    ]));

    let (status, _, body) = get(&app, "/jbhattar/search?country=United%20Kingdom").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _, body) = get(&app, "/jbhattar/search?country=United+States").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["Country_Region"], "United States");

    // A valid run of letters inside other characters is not enough.
    for value in ["U2", "%21%21United", "United1", "", "U"] {
        let (status, content_type, body) =
            get(&app, &format!("/jbhattar/search?country={value}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "country={value}");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, "The format of the search is search?country=US");
    }
}

#[tokio::test]
async fn test_search_repeated_country_uses_first() {
    let app = app_with(InMemoryStore::new(vec![
        record("US", "100"),
        record("United Kingdom", "50"),
    ]));

    let (status, content_type, body) = get(&app, "/jbhattar/search?country=US&country=UK").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["Country_Region"], "US");

    let (status, content_type, body) = get(&app, "/jbhattar/search?country=1&country=UK").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, "The format of the search is search?country=US");
}

#[tokio::test]
async fn test_search_requires_country() {
    let app = app_with(InMemoryStore::new(vec![record("France", "1")]));

    let (status, _, _) = get(&app, "/jbhattar/search").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(&app, "/jbhattar/search?name=France").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_count_matches_all() {
    let app = app_with(InMemoryStore::new(vec![
        record("United States", "100"),
        record("France", "20"),
        CaseRecord::default(),
    ]));

    let (status, _, all) = get(&app, "/jbhattar/all").await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap().clone();

    let (status, _, summary) = get(&app, "/jbhattar/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["table"], TABLE);
    assert_eq!(summary["recordCount"], all.len() as i64);
}

#[tokio::test]
async fn test_all_returns_exact_field_names() {
    let mut full = record("Canada", "7");
    full.province_state = Some("Ontario".to_string());
    full.long = Some("-85.3232".to_string());
    full.case_fatality_ratio = Some("1.2".to_string());
    let app = app_with(InMemoryStore::new(vec![full.clone()]));

    let (_, _, body) = get(&app, "/jbhattar/all").await;
    let item = &body[0];
    assert_eq!(item["Province_State"], "Ontario");
    assert_eq!(item["Long_"], "-85.3232");
    assert_eq!(item["Case_Fatality_Ratio"], "1.2");

    let decoded: CaseRecord = serde_json::from_value(item.clone()).unwrap();
    assert_eq!(decoded, full);
}

#[tokio::test]
async fn test_empty_table() {
    let app = app_with(InMemoryStore::default());

    let (status, _, body) = get(&app, "/jbhattar/all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    let (_, _, summary) = get(&app, "/jbhattar/status").await;
    assert_eq!(summary["recordCount"], 0);
}

#[tokio::test]
async fn test_store_failures_are_reported() {
    let app = app_with(InMemoryStore::failing(StoreError::Unavailable(
        "dispatch failure".into(),
    )));

    for uri in ["/jbhattar/all", "/jbhattar/status", "/jbhattar/search?country=US"] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert!(body.get("recordCount").is_none());
        assert!(!body.is_array());
        assert_eq!(body["message"], "backing store unavailable");
    }

    // Invalid input is rejected before the store is touched.
    let (status, _, _) = get(&app, "/jbhattar/search?country=123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = app_with(InMemoryStore::failing(StoreError::Scan("throttled".into())));
    let (status, _, body) = get(&app, "/jbhattar/search?country=US").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "500 Internal Server Error");

    let app = app_with(InMemoryStore::failing(StoreError::Decode("Lat is a list".into())));
    let (status, _, body) = get(&app, "/jbhattar/all").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "decode error");

    // The router keeps serving after failures.
    let (status, _, body) = get(&app, "/jbhattar/search?country=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "The format of the search is search?country=US");
}

#[tokio::test]
async fn test_unknown_routes() {
    let app = app_with(InMemoryStore::default());

    let (status, _, _) = get(&app, "/jbhattar/health").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jbhattar/all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
