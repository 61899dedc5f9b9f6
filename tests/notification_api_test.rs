//! Notification API integration tests
//!
//! Admin authoring under `/api/admin/notifications` and the per-user feed.

mod helpers;

use actix_web::test;
use chrono::{Duration, Utc};
use helpers::*;
use serde_json::{json, Value};

fn broadcast(title: &str) -> Value {
    json!({
        "title": title,
        "message": "Opening ceremony in the main hall",
        "type": "ANNOUNCEMENT",
        "priority": "HIGH",
        "isBroadcast": true,
        "duration": { "type": "FIXED", "timer": 5000 },
    })
}

#[actix_web::test]
async fn test_admin_create_and_fetch() {
    let ctx = TestContext::empty().await.expect("test context");
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/notifications")
        .set_json(broadcast("Welcome"))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["status"], "ACTIVE");
    assert_eq!(body["data"]["position"], "STICKY_TOP");
    assert_eq!(body["data"]["duration"], json!({ "type": "FIXED", "timer": 5000 }));
    let id = body["data"]["id"].as_str().expect("notification id").to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/notifications/{}", id))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "Welcome");

    let req = test::TestRequest::get().uri("/api/admin/notifications/missing").to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Notification not found");
}

#[actix_web::test]
async fn test_create_validation() {
    let ctx = TestContext::empty().await.expect("test context");
    let app = test::init_service(ctx.app()).await;

    let cases = [
        (
            json!({ "title": "Team update", "message": "Hi", "isBroadcast": false }),
            "Recipients are required unless the notification is a broadcast",
        ),
        (json!({ "title": " ", "message": "Hi", "isBroadcast": true }), "Title and message are required"),
        (
            json!({ "title": "Go", "message": "Hi", "isBroadcast": true, "action": { "type": "REDIRECT" } }),
            "Action url is required",
        ),
    ];

    for (payload, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/admin/notifications")
            .set_json(&payload)
            .to_request();
        let (status, body) = json_response(test::call_service(&app, req).await).await;
        assert_eq!(status, 400, "payload {payload}");
        assert_eq!(body["message"], message);
        assert_eq!(body["errorCode"], 1);
    }

    let req = test::TestRequest::post()
        .uri("/api/admin/notifications")
        .set_json(json!({ "title": "x", "message": "y", "type": "NOT_A_TYPE" }))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().expect("message").starts_with("Invalid request body"));
}

#[actix_web::test]
async fn test_admin_list_filters_and_archive() {
    let ctx = TestContext::empty().await.expect("test context");
    let app = test::init_service(ctx.app()).await;

    let mut ids = Vec::new();
    for payload in [
        broadcast("Welcome"),
        json!({ "title": "Check in", "message": "Desk 4", "type": "REMINDER", "isBroadcast": true }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/admin/notifications")
            .set_json(&payload)
            .to_request();
        let (_, body) = json_response(test::call_service(&app, req).await).await;
        ids.push(body["data"]["id"].as_str().expect("id").to_string());
    }

    let req = test::TestRequest::get()
        .uri("/api/admin/notifications?type=REMINDER")
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["title"], "Check in");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/notifications/{}", ids[0]))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "ARCHIVED");

    let req = test::TestRequest::get().uri("/api/admin/notifications").to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::get()
        .uri("/api/admin/notifications?includeDeleted=true&status=ARCHIVED")
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"][0]["id"], ids[0].as_str());

    let req = test::TestRequest::get().uri("/api/notifications?userId=u1").to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["notifications"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_user_feed_and_mark_read() {
    let ctx = TestContext::empty().await.expect("test context");
    let app = test::init_service(ctx.app()).await;

    let tomorrow = Utc::now() + Duration::days(1);
    let yesterday = Utc::now() - Duration::days(1);
    let payloads = [
        broadcast("Everyone"),
        json!({
            "title": "For your team",
            "message": "Mentor at table 9",
            "type": "TEAM",
            "priority": "URGENT",
            "recipientIds": ["u1"],
        }),
        json!({ "title": "Later", "message": "Not yet", "isBroadcast": true, "scheduledFor": tomorrow }),
        json!({ "title": "Gone", "message": "Too late", "isBroadcast": true, "expiresAt": yesterday }),
    ];
    let mut ids = Vec::new();
    for payload in &payloads {
        let req = test::TestRequest::post()
            .uri("/api/admin/notifications")
            .set_json(payload)
            .to_request();
        let (status, body) = json_response(test::call_service(&app, req).await).await;
        assert_eq!(status, 201);
        ids.push(body["data"]["id"].as_str().expect("id").to_string());
    }

    let req = test::TestRequest::get().uri("/api/notifications?userId=u1").to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    let titles: Vec<&str> = body["data"]["notifications"]
        .as_array()
        .expect("feed")
        .iter()
        .filter_map(|n| n["title"].as_str())
        .collect();
    // urgent first
    assert_eq!(titles, vec!["For your team", "Everyone"]);
    assert_eq!(body["data"]["unreadCount"], 2);

    let req = test::TestRequest::get().uri("/api/notifications?userId=u2").to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["notifications"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::post()
        .uri(&format!("/api/notifications/{}/read?userId=u1", ids[0]))
        .to_request();
    let (status, _) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);

    let req = test::TestRequest::get().uri("/api/notifications?userId=u1").to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["unreadCount"], 1);
    assert_eq!(body["data"]["notifications"][1]["read"], true);

    // u2 is not a recipient of the team notification
    let req = test::TestRequest::post()
        .uri(&format!("/api/notifications/{}/read?userId=u2", ids[1]))
        .to_request();
    let (status, _) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::get().uri("/api/notifications").to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "userId is required");
}

#[actix_web::test]
async fn test_update_can_deactivate() {
    let ctx = TestContext::empty().await.expect("test context");
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/notifications")
        .set_json(broadcast("Welcome"))
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    let id = body["data"]["id"].as_str().expect("id").to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/notifications/{}", id))
        .set_json(json!({ "status": "INACTIVE", "duration": { "type": "INFINITE" } }))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "INACTIVE");
    assert_eq!(body["data"]["duration"], json!({ "type": "INFINITE" }));

    let req = test::TestRequest::get().uri("/api/notifications?userId=u1").to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["notifications"], json!([]));
    assert_eq!(body["data"]["unreadCount"], 0);
}

#[actix_web::test]
async fn test_update_rejects_invalid_result() {
    let ctx = TestContext::empty().await.expect("test context");
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/notifications")
        .set_json(broadcast("Welcome"))
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    let id = body["data"]["id"].as_str().expect("id").to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/notifications/{}", id))
        .set_json(json!({ "message": "" }))
        .to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Title and message are required");

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/notifications/{}", id))
        .to_request();
    let (_, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["message"], "Opening ceremony in the main hall");
}
