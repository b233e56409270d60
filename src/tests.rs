//! Integration tests for the Community Hub backend.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use reqwest::Client;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::models::Datastore;
use crate::store::{sample_datastore, Repository};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_datastore(sample_datastore()).await
    }

    async fn with_datastore(datastore: Datastore) -> Self {
        let app = create_router(test_state(datastore));

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

fn test_state(datastore: Datastore) -> AppState {
    let config = Config {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        log_json: false,
        seed_path: None,
        default_page_size: 3,
        max_page_size: 50,
    };

    AppState {
        repo: Arc::new(Repository::new(datastore)),
        config: Arc::new(config),
    }
}

fn names(body: &Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_health_check_in_process() {
    let app = create_router(test_state(Datastore::default()));

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_datastore_get() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/datastore").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["data"]["schemaVersion"].is_number());
    assert!(body["data"]["communities"].is_array());
    assert_eq!(body["revisionId"], 0);

    let (status, body) = fixture.get_json("/api/datastore/revision").await;
    assert_eq!(status, 200);
    assert!(body["data"]["revisionId"].is_number());
}

#[tokio::test]
async fn test_list_communities_default_page() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/communities").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalCount"], 6);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["pageSize"], 3);
    // no sortOrder means seed order
    assert_eq!(
        names(&body),
        vec!["Meditation Masters", "Book Enthusiasts", "Weekend Hikers"]
    );
}

#[tokio::test]
async fn test_list_communities_search_and_sentinels() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get_json("/api/communities?search=MeDit&category=All%20Categories&status=All%20Status")
        .await;
    assert_eq!(status, 200);
    assert_eq!(names(&body), vec!["Meditation Masters"]);
    assert_eq!(body["data"]["totalCount"], 1);

    let (_, body) = fixture
        .get_json("/api/communities?search=%20%20&category=Outdoors&pageSize=10")
        .await;
    assert_eq!(names(&body), vec!["Weekend Hikers", "Dawn Runners"]);

    let (_, body) = fixture
        .get_json("/api/communities?search=mindfulness&isPublic=false")
        .await;
    assert_eq!(names(&body), vec!["Mindful Parenting"]);
}

#[tokio::test]
async fn test_list_communities_sorted_and_paged() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture
        .get_json("/api/communities?status=active&sortBy=memberCount&sortOrder=desc&pageSize=2")
        .await;
    assert_eq!(body["data"]["totalCount"], 3);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(names(&body), vec!["Meditation Masters", "Weekend Hikers"]);

    let (_, body) = fixture
        .get_json("/api/communities?status=active&sortBy=memberCount&sortOrder=desc&pageSize=2&page=2")
        .await;
    assert_eq!(names(&body), vec!["Book Enthusiasts"]);

    let (status, body) = fixture
        .get_json("/api/communities?status=active&pageSize=2&page=3")
        .await;
    assert_eq!(status, 200);
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["totalPages"], 2);
}

#[tokio::test]
async fn test_list_communities_invalid_arguments() {
    let fixture = TestFixture::new().await;

    for query in [
        "pageSize=0",
        "pageSize=-1",
        "pageSize=51",
        "page=0",
        "sortBy=popularity",
        "sortOrder=sideways",
        "status=deleted",
        "requiresApproval=maybe",
    ] {
        let (status, body) = fixture
            .get_json(&format!("/api/communities?{}", query))
            .await;
        assert_eq!(status, 400, "{}", query);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "INVALID_ARGUMENT", "{}", query);
    }
}

#[tokio::test]
async fn test_community_stats() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/communities/stats").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["totalCount"], 6);
    assert_eq!(body["data"]["activeCount"], 3);
    // leaders are members too: 6 + 4 + 5 + 3 + 2 + 3
    assert_eq!(body["data"]["totalMembers"], 23);

    let empty = TestFixture::with_datastore(Datastore::default()).await;
    let (status, body) = empty.get_json("/api/communities/stats").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["averageRating"], 0.0);
}

#[tokio::test]
async fn test_community_lookup_by_slug() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get_json("/api/communities/meditation-masters")
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], "c-meditation");
    assert_eq!(body["data"]["reviewCount"], 4);
    assert_eq!(body["data"]["averageRating"], 4.75);

    let (status, body) = fixture.get_json("/api/communities/nope").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_community_crud() {
    let fixture = TestFixture::new().await;

    // Create community
    let create_resp = fixture
        .client
        .post(fixture.url("/api/communities"))
        .json(&json!({
            "name": "Board Game Night",
            "description": "Strategy games every Friday",
            "category": "Games",
            "tags": ["boardgames"],
            "status": "active",
            "maxMembers": 2,
            "leader": {
                "name": "Duda",
                "role": "Host",
                "email": "duda@example.com"
            }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 200);
    let create_body: Value = create_resp.json().await.unwrap();
    assert_eq!(create_body["success"], true);
    let id = create_body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(create_body["data"]["slug"], "board-game-night");
    assert_eq!(create_body["data"]["memberCount"], 1);
    let revision_after_create = create_body["revisionId"].as_i64().unwrap();
    assert_eq!(revision_after_create, 1);

    // Join until full
    let join = |name: &str| {
        fixture
            .client
            .post(fixture.url(&format!("/api/communities/{}/members", id)))
            .json(&json!({ "name": name }))
            .send()
    };
    let resp = join("Leo").await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["memberCount"], 2);

    let resp = join("Mia").await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Review
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/communities/{}/reviews", id)))
        .json(&json!({ "userName": "Leo", "rating": 4, "comment": "Fun" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["reviewCount"], 1);
    assert_eq!(body["data"]["averageRating"], 4.0);
    let version = body["data"]["version"].as_i64().unwrap();

    // Stale update
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/communities/{}", id)))
        .json(&json!({ "description": "Stale", "expectedVersion": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VERSION_MISMATCH");
    assert_eq!(body["error"]["details"]["currentVersion"], version);

    // Update
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/communities/{}", id)))
        .json(&json!({ "description": "Strategy and party games", "expectedVersion": version }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["description"], "Strategy and party games");
    let revision_after_update = body["revisionId"].as_i64().unwrap();
    assert!(revision_after_update > revision_after_create);

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/communities/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (status, _) = fixture
        .get_json(&format!("/api/communities/{}", id))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_validation_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/communities"))
        .json(&json!({
            "name": "   ",
            "description": "x",
            "category": "Games",
            "leader": { "name": "A", "role": "B", "email": "a@example.com" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .client
        .post(fixture.url("/api/sessions"))
        .json(&json!({
            "name": "Nobody",
            "email": "no-at-sign",
            "type": "individual",
            "date": "2024-06-10",
            "time": "09:00"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = fixture
        .client
        .post(fixture.url("/api/sessions"))
        .json(&json!({
            "name": "Somebody",
            "email": "some@example.com",
            "type": "individual",
            "date": "10/06/2024",
            "time": "09:00"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_quizzes_list_and_stats() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get_json("/api/quizzes?category=Wellness&sortBy=memberCount&sortOrder=desc&pageSize=10")
        .await;
    assert_eq!(status, 200);
    let titles: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Stress Awareness", "Sleep Hygiene Check"]);

    let (status, body) = fixture.get_json("/api/quizzes?status=private").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");

    let (_, body) = fixture.get_json("/api/quizzes/stats").await;
    assert_eq!(body["data"]["totalCount"], 4);
    assert_eq!(body["data"]["activeCount"], 2);
    assert_eq!(body["data"]["totalMembers"], 653);

    let (status, body) = fixture.get_json("/api/quizzes/stress-awareness").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], "q-stress");
}

#[tokio::test]
async fn test_session_conflict_check() {
    let fixture = TestFixture::new().await;

    // back-to-back with the 10:00 couple session (ends 11:30)
    let resp = fixture
        .client
        .post(fixture.url("/api/sessions/conflicts"))
        .json(&json!({
            "teamMemberId": "tm-silva",
            "date": "2024-06-10",
            "time": "11:30",
            "sessionType": "individual"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["available"], true);
    assert!(body["data"].get("conflict").is_none());

    let resp = fixture
        .client
        .post(fixture.url("/api/sessions/conflicts"))
        .json(&json!({
            "teamMemberId": "tm-silva",
            "date": "2024-06-10",
            "time": "9:30 AM",
            "durationMinutes": 15
        }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["conflict"]["sessionId"], "s-1001");
    assert_eq!(body["data"]["conflict"]["teamMemberName"], "Dr. Marta Silva");

    let resp = fixture
        .client
        .post(fixture.url("/api/sessions/conflicts"))
        .json(&json!({
            "teamMemberId": "tm-silva",
            "date": "2024-06-10",
            "time": "09:30"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_session_conflict_check_rejects_oversized_duration() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/sessions/conflicts"))
        .json(&json!({
            "teamMemberId": "tm-silva",
            "date": "2024-06-10",
            "time": "08:00",
            "durationMinutes": u32::MAX
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");

    // a full-day block still reports the real conflict
    let resp = fixture
        .client
        .post(fixture.url("/api/sessions/conflicts"))
        .json(&json!({
            "teamMemberId": "tm-silva",
            "date": "2024-06-10",
            "time": "00:00",
            "durationMinutes": 1440
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["conflict"]["sessionId"], "s-1001");
}

#[tokio::test]
async fn test_session_assignment_flow() {
    let fixture = TestFixture::new().await;

    // s-1005 (11:00 individual) overlaps Dr. Silva's 10:00 couple session
    let resp = fixture
        .client
        .put(fixture.url("/api/sessions/s-1005/assign"))
        .json(&json!({ "teamMemberId": "tm-silva" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "SCHEDULE_CONFLICT");
    assert_eq!(body["error"]["details"]["conflictingSessionId"], "s-1002");

    // inactive members cannot take sessions
    let resp = fixture
        .client
        .put(fixture.url("/api/sessions/s-1005/assign"))
        .json(&json!({ "teamMemberId": "tm-neves" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = fixture
        .client
        .put(fixture.url("/api/sessions/s-1005/assign"))
        .json(&json!({ "teamMemberId": "tm-costa", "expectedVersion": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["assignedToName"], "João Costa");
    assert_eq!(body["data"]["version"], 2);

    // reschedule onto Costa's existing rescheduled slot
    let resp = fixture
        .client
        .put(fixture.url("/api/sessions/s-1005/reschedule"))
        .json(&json!({ "date": "2024-06-12", "time": "11:30" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let resp = fixture
        .client
        .put(fixture.url("/api/sessions/s-1005/reschedule"))
        .json(&json!({ "date": "2024-06-12", "time": "11:45" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "rescheduled");
    assert_eq!(body["data"]["rescheduledTo"]["time"], "11:45");

    let (_, body) = fixture
        .get_json("/api/sessions?assignedToId=tm-costa&date=2024-06-12")
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let resp = fixture
        .client
        .put(fixture.url("/api/sessions/s-1005/status"))
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (_, body) = fixture.get_json("/api/sessions/stats").await;
    assert_eq!(body["data"]["total"], 6);
    assert_eq!(body["data"]["completed"], 2);
    assert_eq!(body["data"]["pending"], 1);
    assert_eq!(body["data"]["unassigned"], 1);
}

#[tokio::test]
async fn test_session_list_filters() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/sessions?status=All%20Status").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);

    let (_, body) = fixture.get_json("/api/sessions?status=pending").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = fixture.get_json("/api/sessions?status=lost").await;
    assert_eq!(status, 400);

    let (_, body) = fixture.get_json("/api/team-members").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_revision_increments_on_writes() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get_json("/api/datastore/revision").await;
    let initial = body["data"]["revisionId"].as_i64().unwrap();

    let resp = fixture
        .client
        .post(fixture.url("/api/sessions"))
        .json(&json!({
            "name": "New Client",
            "email": "new@example.com",
            "type": "initial",
            "date": "2024-07-01",
            "time": "2:00 PM"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["revisionId"].as_i64().unwrap(), initial + 1);

    let (_, body) = fixture.get_json("/api/datastore/revision").await;
    assert_eq!(body["data"]["revisionId"].as_i64().unwrap(), initial + 1);
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    for path in ["/api/communities/missing", "/api/quizzes/missing", "/api/sessions/missing"] {
        let (status, body) = fixture.get_json(path).await;
        assert_eq!(status, 404, "{}", path);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    let resp = fixture
        .client
        .put(fixture.url("/api/sessions/missing/assign"))
        .json(&json!({ "teamMemberId": "tm-silva" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = fixture
        .client
        .delete(fixture.url("/api/communities/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
