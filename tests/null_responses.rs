//! Tests that every endpoint degrades gracefully when the service answers
//! successfully without a payload.
//!
//! The mock fetcher answers `Ok(None)` for every path it has no canned
//! response for, so none of these tests configure any responses.

mod common;

use common::mock_client;
use spotrs::{
    ArtistAlbumsOptions, BrowseOptions, FollowedArtistsOptions, PagingOptions,
    RecentlyPlayedOptions, RecommendationsOptions, ReorderOptions, SearchOptions, SearchType,
    TopOptions,
};

#[tokio::test]
async fn test_search_without_payload_is_empty() {
    let (client, _) = mock_client();

    let results = client
        .search("anything", &[], SearchOptions::default())
        .await
        .unwrap();
    assert!(results.is_empty());

    let tracks = client
        .tracks()
        .search("anything", SearchOptions::default())
        .await
        .unwrap();
    assert!(tracks.is_empty());

    let artists = client
        .search("anything", &[SearchType::Artist], SearchOptions::default())
        .await
        .unwrap();
    assert!(artists.artists.is_empty());
}

#[tokio::test]
async fn test_single_lookups_without_payload_are_none() {
    let (client, _) = mock_client();

    assert!(client.tracks().get("t1", false).await.unwrap().is_none());
    assert!(client.albums().get("al1", false).await.unwrap().is_none());
    assert!(client.artists().get("ar1", false).await.unwrap().is_none());
    assert!(client.shows().get("sh1", false).await.unwrap().is_none());
    assert!(client.episodes().get("ep1", false).await.unwrap().is_none());
    assert!(client.playlists().get("pl1", false).await.unwrap().is_none());
    assert!(client.users().get("u1", false).await.unwrap().is_none());
    assert!(client.browse().get_category("mood", false).await.unwrap().is_none());
    assert!(client.tracks().get_audio_features("t1").await.unwrap().is_none());

    // Nothing was cached for the missing entities
    assert!(client.cache().get::<spotrs::Track>("t1").is_none());
}

#[tokio::test]
async fn test_catalog_lists_without_payload_are_empty() {
    let (client, _) = mock_client();

    assert!(client.tracks().get_multiple(&["t1", "t2"]).await.unwrap().is_empty());
    assert!(
        client
            .tracks()
            .get_multiple_audio_features(&["t1"])
            .await
            .unwrap()
            .is_empty()
    );
    assert!(client.albums().get_multiple(&["al1"]).await.unwrap().is_empty());
    assert!(
        client
            .albums()
            .get_tracks("al1", PagingOptions::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(client.artists().get_multiple(&["ar1"]).await.unwrap().is_empty());
    assert!(client.artists().get_top_tracks("ar1", None).await.unwrap().is_empty());
    assert!(client.artists().get_related_artists("ar1").await.unwrap().is_empty());
    assert!(
        client
            .artists()
            .get_albums("ar1", ArtistAlbumsOptions::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(client.shows().get_multiple(&["sh1"]).await.unwrap().is_empty());
    assert!(
        client
            .shows()
            .get_episodes("sh1", PagingOptions::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(client.episodes().get_multiple(&["ep1"]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_playlist_endpoints_without_payload() {
    let (client, _) = mock_client();
    let playlists = client.playlists();

    assert!(
        playlists
            .get_tracks("pl1", PagingOptions::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(playlists.get_images("pl1").await.unwrap().is_empty());
    assert!(
        playlists
            .create("u1", spotrs::PlaylistDetails::named("New"))
            .await
            .unwrap()
            .is_none()
    );
    assert!(playlists.add_items("pl1", &["spotify:track:t1"], None).await.unwrap().is_none());
    assert!(
        playlists
            .remove_items("pl1", &["spotify:track:t1"], None)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        playlists
            .reorder_items("pl1", ReorderOptions::default())
            .await
            .unwrap()
            .is_none()
    );
    assert!(playlists.replace_items("pl1", &["spotify:track:t1"]).await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_lists_without_payload_are_empty() {
    let (client, _) = mock_client();
    let me = client.user();

    assert!(me.get_playlists(PagingOptions::default()).await.unwrap().is_empty());
    assert!(me.get_top_artists(TopOptions::default()).await.unwrap().is_empty());
    assert!(me.get_top_tracks(TopOptions::default()).await.unwrap().is_empty());
    assert!(
        me.get_recently_played(RecentlyPlayedOptions::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(me.get_saved_albums(PagingOptions::default()).await.unwrap().is_empty());
    assert!(me.get_saved_tracks(PagingOptions::default()).await.unwrap().is_empty());
    assert!(me.get_saved_shows(PagingOptions::default()).await.unwrap().is_empty());
    assert!(me.get_saved_episodes(PagingOptions::default()).await.unwrap().is_empty());
    assert!(
        me.get_followed_artists(FollowedArtistsOptions::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        client
            .users()
            .get_playlists("u1", PagingOptions::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_membership_checks_without_payload_are_all_false() {
    let (client, _) = mock_client();
    let me = client.user();
    let ids = ["a", "b", "c"];

    assert_eq!(me.has_albums(&ids).await.unwrap(), vec![false; 3]);
    assert_eq!(me.has_tracks(&ids).await.unwrap(), vec![false; 3]);
    assert_eq!(me.has_shows(&ids).await.unwrap(), vec![false; 3]);
    assert_eq!(me.has_episodes(&ids).await.unwrap(), vec![false; 3]);
    assert_eq!(me.follows_users(&ids).await.unwrap(), vec![false; 3]);
    assert_eq!(me.follows_artists(&ids).await.unwrap(), vec![false; 3]);
    assert_eq!(
        client.users().follows_playlist("pl1", &ids).await.unwrap(),
        vec![false; 3]
    );
}

#[tokio::test]
async fn test_browse_without_payload_is_empty() {
    let (client, _) = mock_client();
    let browse = client.browse();

    assert!(browse.get_new_releases(BrowseOptions::default()).await.unwrap().is_empty());
    assert!(browse.get_categories(BrowseOptions::default()).await.unwrap().is_empty());
    assert!(
        browse
            .get_category_playlists("mood", BrowseOptions::default())
            .await
            .unwrap()
            .is_empty()
    );

    let featured = browse
        .get_featured_playlists(BrowseOptions::default())
        .await
        .unwrap();
    assert!(featured.message.is_none());
    assert!(featured.playlists.is_empty());

    let recommendations = browse
        .get_recommendations(RecommendationsOptions::default())
        .await
        .unwrap();
    assert!(recommendations.seeds.is_empty());
    assert!(recommendations.tracks.is_empty());

    assert!(browse.get_available_genre_seeds().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_id_lists_skip_the_request() {
    let (client, fetch) = mock_client();
    let none: [&str; 0] = [];

    assert!(client.tracks().get_multiple(&none).await.unwrap().is_empty());
    assert!(client.user().has_tracks(&none).await.unwrap().is_empty());
    client.user().save_tracks(&none).await.unwrap();
    client.user().follow_artists(&none).await.unwrap();
    assert!(client.playlists().add_items("pl1", &none, None).await.unwrap().is_none());
    assert!(
        client
            .playlists()
            .remove_items("pl1", &none, Some("snap1"))
            .await
            .unwrap()
            .is_none()
    );

    assert!(fetch.calls().is_empty());
}
