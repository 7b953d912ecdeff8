//! Tests for the live Spotify client against a mock server.

use playlist_migrator::{
    config::MigratorConfig,
    error::ApiError,
    migration::{CopyResult, Migrator, Phase},
    spotify::{MusicApi, SpotifyApi},
    types::{CreatePlaylistRequest, Credential, Locator, TrackReference},
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer, page_limit: u32) -> SpotifyApi {
    SpotifyApi::new(&MigratorConfig {
        api_url: format!("{}/", server.uri()),
        page_limit,
        ..MigratorConfig::default()
    })
}

fn playlist_json(server: &MockServer, id: &str, name: &str, total: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "public": true,
        "tracks": {
            "href": format!("{}/playlists/{}/tracks", server.uri(), id),
            "total": total
        }
    })
}

// =============================================================================
// Profile
// =============================================================================

mod profile {
    use super::*;

    #[tokio::test]
    async fn test_get_profile_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("Authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "alice",
                "display_name": "Alice",
                "country": "DE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let profile = api_for(&server, 50)
            .get_profile(&Credential::new("abc123"))
            .await
            .unwrap();

        assert_eq!(profile.id, "alice");
        assert_eq!(profile.label(), "Alice");
    }

    #[tokio::test]
    async fn test_null_display_name_falls_back_to_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "bob",
                "display_name": null
            })))
            .mount(&server)
            .await;

        let profile = api_for(&server, 50)
            .get_profile(&Credential::new("t"))
            .await
            .unwrap();

        assert_eq!(profile.label(), "bob");
    }

    #[tokio::test]
    async fn test_unauthorized_keeps_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "status": 401, "message": "Invalid access token" }
            })))
            .mount(&server)
            .await;

        let result = api_for(&server, 50)
            .get_profile(&Credential::new("expired"))
            .await;

        match result {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert!(message.contains("Invalid access token"));
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_error_body_uses_reason_phrase() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = api_for(&server, 50)
            .get_profile(&Credential::new("t"))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "server returned 503 Service Unavailable: Service Unavailable"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = api_for(&server, 50)
            .get_profile(&Credential::new("t"))
            .await;

        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}

// =============================================================================
// Listing
// =============================================================================

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_playlists_locator_uses_page_limit() {
        let server = MockServer::start().await;
        let api = api_for(&server, 20);

        assert_eq!(
            api.playlists_locator("alice"),
            Locator::new(format!("{}/users/alice/playlists?limit=20", server.uri()))
        );
    }

    #[tokio::test]
    async fn test_playlist_page_keeps_null_entries_and_next() {
        let server = MockServer::start().await;
        let next = format!("{}/users/alice/playlists?offset=2&limit=2", server.uri());

        Mock::given(method("GET"))
            .and(path("/users/alice/playlists"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [playlist_json(&server, "p1", "One", 3), null],
                "next": next.clone(),
                "total": 3
            })))
            .mount(&server)
            .await;

        let api = api_for(&server, 2);
        let page = api
            .list_playlists_page(&Credential::new("t"), &api.playlists_locator("alice"))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].as_ref().map(|p| p.name.as_str()), Some("One"));
        assert!(page.items[1].is_none());
        assert_eq!(page.next, Some(Locator::new(next)));
    }

    #[tokio::test]
    async fn test_track_page_with_local_and_missing_tracks() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/playlists/p1/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "track": { "uri": "spotify:track:a", "is_local": false } },
                    { "track": null },
                    { "track": { "uri": "spotify:local:x:y:z:1", "is_local": true } }
                ],
                "next": null
            })))
            .mount(&server)
            .await;

        let page = api_for(&server, 50)
            .list_tracks_page(
                &Credential::new("t"),
                &Locator::new(format!("{}/playlists/p1/tracks", server.uri())),
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 3);
        assert!(page.items[1].track.is_none());
        assert!(page.items[2].track.as_ref().unwrap().is_local);
        assert!(page.next.is_none());
    }
}

// =============================================================================
// Writing
// =============================================================================

mod writing {
    use super::*;

    #[tokio::test]
    async fn test_create_playlist_posts_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/bob/playlists"))
            .and(header("Authorization", "Bearer target"))
            .and(body_json(json!({
                "name": "Road Trip",
                "description": "Copied from Alice via Spotify Migrator",
                "public": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "new123",
                "name": "Road Trip"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CreatePlaylistRequest {
            name: "Road Trip".to_string(),
            description: "Copied from Alice via Spotify Migrator".to_string(),
            public: false,
        };
        let id = api_for(&server, 50)
            .create_playlist(&Credential::new("target"), "bob", &request)
            .await
            .unwrap();

        assert_eq!(id, "new123");
    }

    #[tokio::test]
    async fn test_add_tracks_posts_uris() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/playlists/new123/tracks"))
            .and(body_json(json!({
                "uris": ["spotify:track:1", "spotify:track:2"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "snapshot_id": "snap"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uris: Vec<TrackReference> = ["spotify:track:1", "spotify:track:2"]
            .iter()
            .filter_map(|u| TrackReference::parse(u))
            .collect();

        api_for(&server, 50)
            .add_tracks(&Credential::new("target"), "new123", &uris)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_tracks_accepts_success_without_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/playlists/new123/tracks"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/playlists/new456/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server, 50);
        let uris: Vec<TrackReference> = TrackReference::parse("spotify:track:1")
            .into_iter()
            .collect();

        let empty = api
            .add_tracks(&Credential::new("target"), "new123", &uris)
            .await;
        assert!(empty.is_ok(), "{:?}", empty);

        let plain = api
            .add_tracks(&Credential::new("target"), "new456", &uris)
            .await;
        assert!(plain.is_ok(), "{:?}", plain);
    }

    #[tokio::test]
    async fn test_add_tracks_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/playlists/new123/tracks"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "status": 400, "message": "Too many ids requested" }
            })))
            .mount(&server)
            .await;

        let uris: Vec<TrackReference> = TrackReference::parse("spotify:track:1")
            .into_iter()
            .collect();
        let result = api_for(&server, 50)
            .add_tracks(&Credential::new("target"), "new123", &uris)
            .await;

        assert!(matches!(
            result,
            Err(ApiError::Status { status, .. }) if status == StatusCode::BAD_REQUEST
        ));
    }
}

// =============================================================================
// Full migration over HTTP
// =============================================================================

mod migration {
    use super::*;

    async fn mount_profile(server: &MockServer, token: &str, id: &str, name: &str) {
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("Authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "display_name": name
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_migrate_one_playlist_over_http() {
        let server = MockServer::start().await;
        mount_profile(&server, "src", "alice", "Alice").await;
        mount_profile(&server, "dst", "bob", "Bob").await;

        // two pages of playlists
        Mock::given(method("GET"))
            .and(path("/users/alice/playlists"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [playlist_json(&server, "p1", "Mix", 3)],
                "next": format!("{}/users/alice/playlists?offset=1&limit=1", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/alice/playlists"))
            .and(query_param("offset", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [playlist_json(&server, "p2", "Other", 0)],
                "next": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/playlists/p1/tracks"))
            .and(header("Authorization", "Bearer src"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "track": { "uri": "spotify:track:a" } },
                    { "track": { "uri": "spotify:local:a:b:c:1", "is_local": true } },
                    { "track": { "uri": "spotify:track:b" } }
                ],
                "next": null
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/users/bob/playlists"))
            .and(header("Authorization", "Bearer dst"))
            .and(body_json(json!({
                "name": "Mix",
                "description": "Copied from Alice via Spotify Migrator",
                "public": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "copy1" })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/playlists/copy1/tracks"))
            .and(header("Authorization", "Bearer dst"))
            .and(body_json(json!({ "uris": ["spotify:track:a", "spotify:track:b"] })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut migrator = Migrator::new(api_for(&server, 1));
        migrator
            .connect(Credential::new("src"), Credential::new("dst"))
            .await
            .unwrap();
        assert_eq!(migrator.playlists().len(), 2);

        migrator.select("p1").unwrap();
        let report = migrator.run().await.unwrap();

        assert_eq!(migrator.phase(), Phase::Complete);
        assert_eq!(
            report.outcomes[0].result,
            CopyResult::Success { tracks_added: 2 }
        );
        assert_eq!(
            migrator.run_state().log,
            vec![
                "Starting migration for: Mix",
                "Fetched 2 tracks.",
                "Created playlist \"Mix\" on target account.",
                "Successfully added 2 tracks.",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_acks_do_not_stop_later_batches() {
        let server = MockServer::start().await;
        mount_profile(&server, "src", "alice", "Alice").await;
        mount_profile(&server, "dst", "bob", "Bob").await;

        Mock::given(method("GET"))
            .and(path("/users/alice/playlists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [playlist_json(&server, "p1", "Long", 150)],
                "next": null
            })))
            .mount(&server)
            .await;

        let items: Vec<serde_json::Value> = (0..150)
            .map(|n| json!({ "track": { "uri": format!("spotify:track:t{n}") } }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/playlists/p1/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": items,
                "next": null
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/users/bob/playlists"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "copy1" })))
            .mount(&server)
            .await;

        // both batches are acknowledged without a body
        Mock::given(method("POST"))
            .and(path("/playlists/copy1/tracks"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;

        let mut migrator = Migrator::new(api_for(&server, 50));
        migrator
            .connect(Credential::new("src"), Credential::new("dst"))
            .await
            .unwrap();
        migrator.select("p1").unwrap();
        let report = migrator.run().await.unwrap();

        assert_eq!(
            report.outcomes[0].result,
            CopyResult::Success { tracks_added: 150 }
        );
        assert!(!migrator.run_state().log.iter().any(|l| l.starts_with("ERROR")));
    }
}
