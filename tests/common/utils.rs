#![allow(dead_code)]

use once_cell::sync::Lazy;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use uuid::Uuid;

use football_league_backend::config::settings::{get_config, get_jwt_settings, DatabaseSettings};
use football_league_backend::run;
use football_league_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        init_subscriber(get_subscriber(subscriber_name, default_filter_level, std::io::stdout));
    } else {
        init_subscriber(get_subscriber(subscriber_name, default_filter_level, std::io::sink));
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    // Every test gets its own throwaway database
    configuration.database.db_url = None;
    configuration.database.db_name = Uuid::new_v4().to_string();
    let connection_pool = configure_db(&configuration.database).await;
    let jwt_settings = get_jwt_settings(&configuration);

    let server = run(listener, connection_pool.clone(), jwt_settings).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(config.connection_string_without_db().expose_secret())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Tokens and id of a freshly registered user
pub struct LoggedInUser {
    pub id: i64,
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn register_and_login(app: &TestApp, role: &str) -> LoggedInUser {
    let client = Client::new();
    let username = format!("{}_{}", role.to_lowercase(), Uuid::new_v4());
    let password = "password123";

    let register = client
        .post(format!("{}/api/v1/auth/register", app.address))
        .json(&json!({ "username": username, "password": password, "role": role }))
        .send()
        .await
        .expect("Failed to register user.");
    assert_eq!(register.status().as_u16(), 201);

    let login: Value = client
        .post(format!("{}/api/v1/auth/login", app.address))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to execute login request.")
        .json()
        .await
        .expect("Failed to parse login response");

    LoggedInUser {
        id: login["data"]["user"]["id"].as_i64().expect("No user id in response"),
        access_token: login["data"]["access_token"].as_str().expect("No access token").to_string(),
        refresh_token: login["data"]["refresh_token"].as_str().expect("No refresh token").to_string(),
    }
}

/// POST a JSON body with the bearer token and return status plus envelope
pub async fn post_json(app: &TestApp, token: &str, path: &str, body: &Value) -> (u16, Value) {
    let response = Client::new()
        .post(format!("{}{}", app.address, path))
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .expect("Failed to execute request.");
    let status = response.status().as_u16();
    (status, response.json().await.expect("Failed to parse response"))
}

pub async fn put_json(app: &TestApp, token: &str, path: &str, body: &Value) -> (u16, Value) {
    let response = Client::new()
        .put(format!("{}{}", app.address, path))
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .expect("Failed to execute request.");
    let status = response.status().as_u16();
    (status, response.json().await.expect("Failed to parse response"))
}

pub async fn get_json(app: &TestApp, token: &str, path: &str) -> (u16, Value) {
    let response = Client::new()
        .get(format!("{}{}", app.address, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request.");
    let status = response.status().as_u16();
    (status, response.json().await.expect("Failed to parse response"))
}

pub async fn create_team(app: &TestApp, admin_token: &str, name: &str) -> i64 {
    let (status, body) = post_json(
        app,
        admin_token,
        "/api/v1/teams",
        &json!({ "name": name, "city": "Bandung", "year_founded": 1933 }),
    )
    .await;
    assert_eq!(status, 201, "team creation failed: {}", body);
    body["data"]["id"].as_i64().expect("No team id")
}

pub async fn create_player(app: &TestApp, token: &str, team_id: i64, name: &str, jersey: i32) -> i64 {
    let (status, body) = post_json(
        app,
        token,
        "/api/v1/players",
        &json!({
            "team_id": team_id,
            "name": name,
            "height": 180,
            "weight": 75,
            "position": "ATTACKER",
            "jersey_number": jersey
        }),
    )
    .await;
    assert_eq!(status, 201, "player creation failed: {}", body);
    body["data"]["id"].as_i64().expect("No player id")
}
