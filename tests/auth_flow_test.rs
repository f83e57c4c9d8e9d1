use futures_util::future::join_all;
use reqwest::Client;
use serde_json::{json, Value};

mod common;
use common::utils::{get_json, post_json, register_and_login, spawn_app};

#[tokio::test]
async fn register_normalizes_the_role() {
    let app = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/v1/auth/register", app.address))
        .json(&json!({ "username": "chairman", "password": "password123", "role": "admin" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 201);

    let stored: String = sqlx::query_scalar("SELECT role FROM users WHERE username = $1")
        .bind("chairman")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch saved user.");
    assert_eq!(stored, "ADMIN");
}

#[tokio::test]
async fn register_rejects_unknown_roles_and_duplicates() {
    let app = spawn_app().await;
    let client = Client::new();
    let register = |body: Value| {
        let client = client.clone();
        let url = format!("{}/api/v1/auth/register", app.address);
        async move { client.post(url).json(&body).send().await.expect("Failed to execute request.") }
    };

    let response = register(json!({ "username": "boss", "password": "pw", "role": "superuser" })).await;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 400);
    assert!(body["data"].is_null());

    let first = register(json!({ "username": "coach", "password": "pw", "role": "STAFF" })).await;
    assert_eq!(first.status().as_u16(), 201);
    let second = register(json!({ "username": "coach", "password": "pw", "role": "STAFF" })).await;
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn login_distinguishes_unknown_user_from_wrong_password() {
    let app = spawn_app().await;
    let client = Client::new();
    let user = register_and_login(&app, "VIEWER").await;
    let (_, me) = get_json(&app, &user.access_token, "/api/v1/me").await;
    let username = me["data"]["username"].as_str().unwrap().to_string();

    let unknown = client
        .post(format!("{}/api/v1/auth/login", app.address))
        .json(&json!({ "username": "nobody", "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 404);

    let wrong = client
        .post(format!("{}/api/v1/auth/login", app.address))
        .json(&json!({ "username": username, "password": "not-it" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status().as_u16(), 400);
}

#[tokio::test]
async fn refresh_rotates_tokens_and_revokes_the_old_access_token() {
    let app = spawn_app().await;
    let user = register_and_login(&app, "STAFF").await;

    let (status, _) = get_json(&app, &user.access_token, "/api/v1/me").await;
    assert_eq!(status, 200);

    let (status, refreshed) = post_json(
        &app,
        &user.access_token,
        "/api/v1/auth/refresh",
        &json!({ "refresh_token": user.refresh_token }),
    )
    .await;
    assert_eq!(status, 200);
    let new_access = refreshed["data"]["access_token"].as_str().unwrap().to_string();
    let new_refresh = refreshed["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, _) = get_json(&app, &user.access_token, "/api/v1/me").await;
    assert_eq!(status, 401);
    let (status, _) = get_json(&app, &new_access, "/api/v1/me").await;
    assert_eq!(status, 200);

    // The consumed refresh token cannot be replayed
    let (status, _) = post_json(
        &app,
        &new_access,
        "/api/v1/auth/refresh",
        &json!({ "refresh_token": user.refresh_token }),
    )
    .await;
    assert_eq!(status, 401);

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(stored, 1);

    let (status, _) = post_json(
        &app,
        &new_access,
        "/api/v1/auth/logout",
        &json!({ "refresh_token": new_refresh }),
    )
    .await;
    assert_eq!(status, 200);
    let (status, _) = get_json(&app, &new_access, "/api/v1/me").await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn expired_refresh_token_is_rejected_and_consumed() {
    let app = spawn_app().await;
    let user = register_and_login(&app, "VIEWER").await;

    sqlx::query("UPDATE refresh_tokens SET expires_at = NOW() - INTERVAL '1 hour' WHERE user_id = $1")
        .bind(user.id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to age the refresh token.");

    let (status, body) = post_json(
        &app,
        &user.access_token,
        "/api/v1/auth/refresh",
        &json!({ "refresh_token": user.refresh_token }),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], 401);

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn concurrent_logins_leave_a_single_refresh_token() {
    let app = spawn_app().await;
    let user = register_and_login(&app, "STAFF").await;
    let (_, me) = get_json(&app, &user.access_token, "/api/v1/me").await;
    let username = me["data"]["username"].as_str().unwrap().to_string();

    let client = Client::new();
    let logins = (0..8).map(|_| {
        client
            .post(format!("{}/api/v1/auth/login", app.address))
            .json(&json!({ "username": username, "password": "password123" }))
            .send()
    });
    let responses = join_all(logins).await;

    let mut refresh_tokens = Vec::new();
    for response in responses {
        let response = response.expect("Failed to execute login request.");
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        refresh_tokens.push(body["data"]["refresh_token"].as_str().unwrap().to_string());
    }

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(stored, 1);

    // Exactly one of the issued refresh tokens is still redeemable
    let mut accepted = 0;
    for token in refresh_tokens {
        let (status, _) = post_json(
            &app,
            &user.access_token,
            "/api/v1/auth/refresh",
            &json!({ "refresh_token": token }),
        )
        .await;
        if status == 200 {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
}

#[tokio::test]
async fn protected_routes_need_a_token_and_the_right_role() {
    let app = spawn_app().await;
    let client = Client::new();

    let anonymous = client
        .get(format!("{}/api/v1/teams", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let viewer = register_and_login(&app, "VIEWER").await;
    let (status, _) = get_json(&app, &viewer.access_token, "/api/v1/teams").await;
    assert_eq!(status, 200);
    let (status, body) = post_json(&app, &viewer.access_token, "/api/v1/teams", &json!({ "name": "Persib" })).await;
    assert_eq!(status, 403);
    assert_eq!(body["code"], 403);
    let (status, _) = get_json(&app, &viewer.access_token, "/api/v1/users").await;
    assert_eq!(status, 403);
}
