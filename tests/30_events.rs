mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::Api;

#[tokio::test]
async fn students_cannot_manage_events() -> Result<()> {
    let api = Api::connect().await?;
    let (_, student) = api.new_student().await?;

    let (status, body) = api.post("/api/events", Some(&student), json!({ "title": "Nope" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let id = api.create_event(10).await?;
    let (status, _) = api
        .send(Method::DELETE, &format!("/api/events/{id}"), Some(&student), None)
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn listed_events_carry_creator() -> Result<()> {
    let api = Api::connect().await?;
    let id = api.create_event(10).await?;

    let (status, body) = api.get("/api/events?category=academic", None).await?;
    assert_eq!(status, StatusCode::OK);
    let event = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == id.as_str())
        .cloned()
        .expect("created event is listed");
    assert_eq!(event["creator"]["email"], common::DEAN_EMAIL);
    assert_eq!(event["date"], "2031-02-14");
    assert_eq!(event["time"], "10:30");

    let (_, sports) = api.get("/api/events?category=sports", None).await?;
    assert!(sports["data"].as_array().unwrap().iter().all(|e| e["id"] != id.as_str()));
    Ok(())
}

#[tokio::test]
async fn event_lookup_errors() -> Result<()> {
    let api = Api::connect().await?;

    let (status, body) = api.get("/api/events/12345", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid event ID format");

    let (status, _) = api
        .get("/api/events/00000000-0000-4000-8000-000000000000", None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn rsvp_is_idempotent_and_cancel_too() -> Result<()> {
    let api = Api::connect().await?;
    let id = api.create_event(5).await?;
    let (user_id, token) = api.new_student().await?;
    let path = format!("/api/events/{id}/rsvp");

    for _ in 0..2 {
        let (status, body) = api.post(&path, Some(&token), json!({})).await?;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["event"]["registeredUsers"], json!([user_id]));
    }

    let (_, mine) = api.get("/api/users/events", Some(&token)).await?;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    for _ in 0..2 {
        let (status, body) = api.send(Method::DELETE, &path, Some(&token), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["event"]["registeredUsers"], json!([]));
    }
    Ok(())
}

#[tokio::test]
async fn capacity_is_enforced() -> Result<()> {
    let api = Api::connect().await?;
    let id = api.create_event(2).await?;
    let path = format!("/api/events/{id}/rsvp");

    for _ in 0..2 {
        let (_, token) = api.new_student().await?;
        let (status, _) = api.post(&path, Some(&token), json!({})).await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, third) = api.new_student().await?;
    let (status, body) = api.post(&path, Some(&third), json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Event is full");

    let (_, event) = api.get(&format!("/api/events/{id}"), None).await?;
    assert_eq!(event["data"]["registeredUsers"].as_array().unwrap().len(), 2);
    assert_eq!(event["data"]["seatsAvailable"], 0);
    Ok(())
}

#[tokio::test]
async fn concurrent_rsvps_for_last_seat() -> Result<()> {
    let api = Api::connect().await?;
    let id = api.create_event(1).await?;
    let path = format!("/api/events/{id}/rsvp");

    let mut tokens = Vec::new();
    for _ in 0..6 {
        tokens.push(api.new_student().await?.1);
    }

    let attempts = tokens.iter().map(|token| api.post(&path, Some(token), json!({})));
    let results = futures::future::join_all(attempts).await;

    let ok = results
        .into_iter()
        .filter(|r| r.as_ref().map_or(false, |(status, _)| *status == StatusCode::OK))
        .count();
    assert_eq!(ok, 1);

    let (_, event) = api.get(&format!("/api/events/{id}"), None).await?;
    assert_eq!(event["data"]["registeredUsers"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn admin_edits_keep_registrations() -> Result<()> {
    let api = Api::connect().await?;
    let dean = api.dean_token().await?;
    let id = api.create_event(3).await?;
    let (user_id, token) = api.new_student().await?;
    api.post(&format!("/api/events/{id}/rsvp"), Some(&token), json!({})).await?;

    let (status, body) = api
        .send(
            Method::PUT,
            &format!("/api/events/{id}"),
            Some(&dean),
            Some(json!({ "title": "Career Fair (moved)", "registeredUsers": [] })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["title"], "Career Fair (moved)");
    assert_eq!(body["data"]["registeredUsers"], json!([user_id]));
    assert_eq!(body["data"]["capacity"], 3);

    let (status, _) = api
        .send(Method::PUT, &format!("/api/events/{id}"), Some(&dean), Some(json!({ "capacity": 0 })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = api
        .send(Method::DELETE, &format!("/api/events/{id}"), Some(&dean), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Event deleted successfully");
    Ok(())
}
