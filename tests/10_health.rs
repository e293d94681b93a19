mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let api = common::Api::connect().await?;

    let (status, body) = api.get("/health", None).await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", status);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let api = common::Api::connect().await?;

    let (status, body) = api.get("/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Campus Events API");
    assert!(body["data"]["version"].is_string());
    Ok(())
}

#[tokio::test]
async fn server_stops_with_its_client() -> Result<()> {
    let api = common::Api::connect().await?;
    let health = api.url("/health");
    drop(api);

    assert!(reqwest::get(&health).await.is_err(), "server still answering after drop");
    Ok(())
}
