//! Event and RSVP flows against the Postgres store. Skipped unless DATABASE_URL is set.

mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::Api;

#[tokio::test]
async fn rsvp_lifecycle_on_postgres() -> Result<()> {
    let Some(api) = Api::connect_postgres().await? else {
        return Ok(());
    };
    let id = api.create_event(2).await?;
    let path = format!("/api/events/{id}/rsvp");

    let (first_id, first) = api.new_student().await?;
    for _ in 0..2 {
        let (status, body) = api.post(&path, Some(&first), json!({})).await?;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["event"]["registeredUsers"], json!([first_id]));
    }

    let (_, second) = api.new_student().await?;
    let (status, _) = api.post(&path, Some(&second), json!({})).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, third) = api.new_student().await?;
    let (status, body) = api.post(&path, Some(&third), json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Event is full");

    for _ in 0..2 {
        let (status, body) = api.send(Method::DELETE, &path, Some(&first), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["event"]["registeredUsers"].as_array().unwrap().len(), 1);
    }

    let dean = api.dean_token().await?;
    api.send(Method::DELETE, &format!("/api/events/{id}"), Some(&dean), None).await?;
    Ok(())
}

#[tokio::test]
async fn registration_deadline_on_postgres() -> Result<()> {
    let Some(api) = Api::connect_postgres().await? else {
        return Ok(());
    };
    let dean = api.dean_token().await?;
    let (status, body) = api
        .post(
            "/api/events",
            Some(&dean),
            json!({
                "title": "Closed Workshop",
                "date": "2031-03-01",
                "time": "09:00",
                "location": "Library",
                "description": "Signups closed",
                "category": "academic",
                "capacity": 10,
                "registrationDeadline": "2020-01-01T00:00:00Z",
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, token) = api.new_student().await?;
    let (status, body) = api.post(&format!("/api/events/{id}/rsvp"), Some(&token), json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Registration deadline has passed");

    api.send(Method::DELETE, &format!("/api/events/{id}"), Some(&dean), None).await?;
    Ok(())
}

#[tokio::test]
async fn concurrent_rsvps_for_last_seat_on_postgres() -> Result<()> {
    let Some(api) = Api::connect_postgres().await? else {
        return Ok(());
    };
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

    let dean = api.dean_token().await?;
    api.send(Method::DELETE, &format!("/api/events/{id}"), Some(&dean), None).await?;
    Ok(())
}

#[tokio::test]
async fn capacity_cannot_drop_below_registrations_on_postgres() -> Result<()> {
    let Some(api) = Api::connect_postgres().await? else {
        return Ok(());
    };
    let dean = api.dean_token().await?;
    let id = api.create_event(3).await?;
    let path = format!("/api/events/{id}/rsvp");
    for _ in 0..2 {
        let (_, token) = api.new_student().await?;
        api.post(&path, Some(&token), json!({})).await?;
    }

    let (status, body) = api
        .send(Method::PUT, &format!("/api/events/{id}"), Some(&dean), Some(json!({ "capacity": 1 })))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (status, body) = api
        .send(Method::PUT, &format!("/api/events/{id}"), Some(&dean), Some(json!({ "capacity": 2 })))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["registeredUsers"].as_array().unwrap().len(), 2);

    api.send(Method::DELETE, &format!("/api/events/{id}"), Some(&dean), None).await?;
    Ok(())
}
