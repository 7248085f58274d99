//! Tests for the Client builder pattern functionality.
//!
//! This module tests that the "with_*" builder methods and setters configure
//! the client as expected and that clones share their state.

use spotrs::{CacheSettings, Client, Error, HttpFetcher, SpotifyApiError, Track};
use std::sync::Arc;

#[test]
fn test_builder_pattern_basic() {
    let client = Client::new("test_token");

    assert_eq!(client.get_market(), None);
    assert_eq!(client.cache().settings(), CacheSettings::none());
    assert!(client.user().info().is_none());
}

#[test]
fn test_builder_pattern_with_market() {
    let client = Client::new("test_token").with_market("GB");

    assert_eq!(client.get_market(), Some("GB"));
    assert_eq!(client.cache().settings(), CacheSettings::none()); // Should still be default
}

#[test]
fn test_builder_pattern_with_cache_settings() {
    let settings = CacheSettings {
        tracks: true,
        albums: true,
        ..CacheSettings::none()
    };
    let client = Client::new("test_token").with_cache_settings(settings);

    assert_eq!(client.cache().settings(), settings);
    assert!(client.cache().store::<Track>().is_enabled());
    assert!(!client.cache().store::<spotrs::User>().is_enabled());
}

#[test]
fn test_builder_pattern_chaining() {
    let client = Client::new("test_token")
        .with_market("SE")
        .with_cache_settings(CacheSettings::all());

    assert_eq!(client.get_market(), Some("SE"));
    assert_eq!(client.cache().settings(), CacheSettings::all());
}

#[test]
fn test_set_market() {
    let mut client = Client::new("test_token");
    client.set_market("DE");

    assert_eq!(client.get_market(), Some("DE"));
}

#[test]
fn test_clones_share_cache() {
    let client = Client::new("test_token").with_cache_settings(CacheSettings::all());
    let clone = client.clone();

    let track: Track = serde_json::from_value(serde_json::json!({"id": "t1"})).unwrap();
    let created = client.cache().create(track);

    let cached = clone.cache().get::<Track>("t1").unwrap();
    assert!(Arc::ptr_eq(&created, &cached));
}

#[test]
fn test_cache_settings_deserialize_partially() {
    let settings: CacheSettings = serde_json::from_str(r#"{"tracks": true}"#).unwrap();

    assert!(settings.tracks);
    assert!(!settings.users);
}

#[test]
fn test_http_fetcher_builder() {
    let custom_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap();

    let fetcher = HttpFetcher::new("test_token")
        .with_client(custom_client)
        .with_base_url("http://localhost:8080/v1")
        .unwrap();

    assert_eq!(fetcher.base_url().as_str(), "http://localhost:8080/v1");
    assert_eq!(fetcher.get_token().unwrap().as_str(), "test_token");
}

#[test]
fn test_http_fetcher_rejects_invalid_base_url() {
    let result = HttpFetcher::new("test_token").with_base_url("not a url");

    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_spotify_api_error_display() {
    let err: SpotifyApiError = serde_json::from_str(
        r#"{"status": 401, "message": "The access token expired"}"#,
    )
    .unwrap();

    assert_eq!(err.status, 401);
    assert_eq!(
        Error::SpotifyApiError(err).to_string(),
        "Spotify API error: 401 The access token expired"
    );
}

#[test]
fn test_api_error_message() {
    let err = Error::Api("Could not load private user data".to_string());

    assert_eq!(err.to_string(), "Could not load private user data");
}
