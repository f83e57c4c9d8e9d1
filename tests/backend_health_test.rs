use reqwest::Client;

mod common;
use common::utils::spawn_app;

#[tokio::test]
async fn health_check_reports_database_status() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn unknown_routes_use_the_error_envelope() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(format!("{}/nowhere", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["data"].is_null());
}
