//! Integration tests for the reqwest based fetcher against a mock server.

use serde_json::json;
use spotrs::{
    Client, Error, Fetch, FetchRequest, HttpFetcher, PagingOptions, RecommendationsOptions,
};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(server: &MockServer) -> HttpFetcher {
    HttpFetcher::new("test_token")
        .with_base_url(&format!("{}/v1", server.uri()))
        .unwrap()
}

#[tokio::test]
async fn test_get_sends_bearer_token_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .and(header("authorization", "Bearer test_token"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "a1"}, {"id": "a2"}],
            "total": 2
        })))
        .mount(&mock_server)
        .await;

    let client = Client::from_fetcher(Arc::new(fetcher(&mock_server)));

    let playlists = client
        .user()
        .get_playlists(PagingOptions::new(2, 0))
        .await
        .unwrap();

    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2"]);
}

#[tokio::test]
async fn test_no_content_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/me/tracks"))
        .and(query_param("ids", "t1,t2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(&mock_server);
    let request = FetchRequest::put().params(json!({"ids": "t1,t2"}));

    let value = fetcher.fetch("/me/tracks", request).await.unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn test_json_null_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let client = Client::from_fetcher(Arc::new(fetcher(&mock_server)));

    let err = client.user().patch_info().await.unwrap_err();
    assert!(matches!(err, Error::Api(_)));
}

#[tokio::test]
async fn test_json_body_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/playlists/pl1/tracks"))
        .and(body_json(json!({"uris": ["spotify:track:t1"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "snap2"})))
        .mount(&mock_server)
        .await;

    let client = Client::from_fetcher(Arc::new(fetcher(&mock_server)));

    let snapshot = client
        .playlists()
        .add_items("pl1", &["spotify:track:t1"], None)
        .await
        .unwrap();

    assert_eq!(snapshot.as_deref(), Some("snap2"));
}

#[tokio::test]
async fn test_error_object_is_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tracks/t1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"status": 401, "message": "The access token expired"}
        })))
        .mount(&mock_server)
        .await;

    let client = Client::from_fetcher(Arc::new(fetcher(&mock_server)));

    let err = client.tracks().get("t1", false).await.unwrap_err();

    match err {
        Error::SpotifyApiError(err) => {
            assert_eq!(err.status, 401);
            assert_eq!(err.message, "The access token expired");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unstructured_error_keeps_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/browse/categories"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(&mock_server);

    let err = fetcher
        .fetch("/browse/categories", FetchRequest::get())
        .await
        .unwrap_err();

    match err {
        Error::SpotifyApiError(err) => {
            assert_eq!(err.status, 502);
            assert_eq!(err.message, "Bad gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_token() {
    let fetcher = HttpFetcher::new("");

    let err = fetcher.fetch("/me", FetchRequest::get()).await.unwrap_err();

    assert!(matches!(err, Error::NoAccessTokenAvailable));
}

#[tokio::test]
async fn test_token_can_be_replaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer refreshed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "smedjan"})))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(&mock_server);
    fetcher.set_token("refreshed");

    let value = fetcher.fetch("/me", FetchRequest::get()).await.unwrap();
    assert_eq!(value.unwrap()["id"], "smedjan");
}

#[tokio::test]
async fn test_whole_tunables_are_sent_as_integers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/recommendations"))
        .and(query_param("seed_genres", "rock"))
        .and(query_param("target_popularity", "50"))
        .and(query_param("min_energy", "0.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "seeds": [],
            "tracks": [{"id": "t1"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::from_fetcher(Arc::new(fetcher(&mock_server)));
    let mut options = RecommendationsOptions {
        seed_genres: vec!["rock".to_string()],
        ..RecommendationsOptions::default()
    };
    options.tunables.insert("target_popularity".into(), 50.0);
    options.tunables.insert("min_energy".into(), 0.4);

    let recommendations = client.browse().get_recommendations(options).await.unwrap();
    assert_eq!(recommendations.tracks[0].id, "t1");
}

#[tokio::test]
async fn test_path_segments_are_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/smed%3Fjan%23x/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::from_fetcher(Arc::new(fetcher(&mock_server)));

    let playlists = client
        .users()
        .get_playlists("smed?jan#x", PagingOptions::default())
        .await
        .unwrap();
    assert!(playlists.is_empty());
}
