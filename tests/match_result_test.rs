use serde_json::json;

mod common;
use common::utils::{create_player, create_team, get_json, post_json, put_json, register_and_login, spawn_app};

#[tokio::test]
async fn submitted_goals_resolve_the_match_and_feed_the_report() {
    let app = spawn_app().await;
    let admin = register_and_login(&app, "ADMIN").await;
    let staff = register_and_login(&app, "STAFF").await;

    let home = create_team(&app, &admin.access_token, "Persib").await;
    let away = create_team(&app, &admin.access_token, "Persija").await;
    let striker = create_player(&app, &staff.access_token, home, "Ciro", 9).await;
    let visitor = create_player(&app, &staff.access_token, away, "Marko", 10).await;

    let (status, created) = post_json(
        &app,
        &staff.access_token,
        "/api/v1/matches",
        &json!({ "match_date_time": "2025-03-01T15:00:00Z", "home_team_id": home, "away_team_id": away }),
    )
    .await;
    assert_eq!(status, 201, "{}", created);
    assert_eq!(created["data"]["status"], "SCHEDULED");
    let match_id = created["data"]["id"].as_i64().unwrap();

    // Goals are only accepted while the match is live
    let (status, _) = post_json(
        &app,
        &staff.access_token,
        "/api/v1/goals",
        &json!({ "match_id": match_id, "team_id": home, "scorer_player_id": striker, "minute": "10" }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = put_json(&app, &staff.access_token, &format!("/api/v1/matches/{}", match_id), &json!({ "status": "IN_PROGRESS" })).await;
    assert_eq!(status, 200);

    let (status, result) = post_json(
        &app,
        &staff.access_token,
        &format!("/api/v1/matches/{}/result", match_id),
        &json!({ "goals": [
            { "team_id": home, "scorer_player_id": striker, "minute": "10" },
            { "team_id": home, "scorer_player_id": striker, "minute": "50" },
            { "team_id": away, "scorer_player_id": visitor, "minute": "80" }
        ]}),
    )
    .await;
    assert_eq!(status, 200, "{}", result);
    assert_eq!(result["data"]["status"], "HOME_WIN");
    assert_eq!(result["data"]["score"], json!({ "home": 2, "away": 1 }));

    let (status, report) = get_json(&app, &staff.access_token, &format!("/api/v1/matches/{}/report", match_id)).await;
    assert_eq!(status, 200);
    let report = &report["data"];
    assert_eq!(report["status"], "Home team wins");
    assert_eq!(report["score"], json!({ "home": 2, "away": 1 }));
    assert_eq!(report["goals"].as_array().unwrap().len(), 3);
    assert_eq!(report["goals"][0]["minute"], "10");
    assert_eq!(report["goals"][2]["player"]["id"], visitor);
    assert_eq!(report["top_scorer"]["id"], striker);
    assert_eq!(report["top_scorer"]["goals"], 2);
    assert_eq!(report["home_wins"], 1);
    assert_eq!(report["away_wins"], 0);

    let (status, table) = get_json(&app, &staff.access_token, "/api/v1/matches/standing").await;
    assert_eq!(status, 200);
    assert_eq!(table["data"][0]["team_id"], home);
    assert_eq!(table["data"][0]["points"], 3);
    assert_eq!(table["data"][1]["team_id"], away);

    let (status, scorers) = get_json(&app, &staff.access_token, "/api/v1/goals/top-scorers?limit=1").await;
    assert_eq!(status, 200);
    assert_eq!(scorers["data"].as_array().unwrap().len(), 1);
    assert_eq!(scorers["data"][0]["player_id"], striker);
}

#[tokio::test]
async fn a_rejected_goal_aborts_the_whole_submission() {
    let app = spawn_app().await;
    let admin = register_and_login(&app, "ADMIN").await;

    let home = create_team(&app, &admin.access_token, "Arema").await;
    let away = create_team(&app, &admin.access_token, "Persebaya").await;
    let scorer = create_player(&app, &admin.access_token, home, "Dendi", 11).await;

    let (_, created) = post_json(
        &app,
        &admin.access_token,
        "/api/v1/matches",
        &json!({ "match_date_time": "2025-04-01T15:00:00Z", "home_team_id": home, "away_team_id": away }),
    )
    .await;
    let match_id = created["data"]["id"].as_i64().unwrap();
    put_json(&app, &admin.access_token, &format!("/api/v1/matches/{}", match_id), &json!({ "status": "IN_PROGRESS" })).await;

    let (status, body) = post_json(
        &app,
        &admin.access_token,
        &format!("/api/v1/matches/{}/result", match_id),
        &json!({ "goals": [
            { "team_id": home, "scorer_player_id": scorer, "minute": "12" },
            { "team_id": home, "scorer_player_id": scorer, "minute": "91" }
        ]}),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().starts_with("goals[1]"));

    let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM goals WHERE match_id = $1")
        .bind(match_id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(recorded, 0);

    let (_, game) = get_json(&app, &admin.access_token, &format!("/api/v1/matches/{}", match_id)).await;
    assert_eq!(game["data"]["status"], "IN_PROGRESS");
}

#[tokio::test]
async fn a_team_cannot_play_twice_at_the_same_time() {
    let app = spawn_app().await;
    let admin = register_and_login(&app, "ADMIN").await;
    let a = create_team(&app, &admin.access_token, "Bali United").await;
    let b = create_team(&app, &admin.access_token, "PSM").await;
    let c = create_team(&app, &admin.access_token, "PSIS").await;

    let kick_off = "2025-05-01T15:00:00Z";
    let (status, _) = post_json(&app, &admin.access_token, "/api/v1/matches", &json!({ "match_date_time": kick_off, "home_team_id": a, "away_team_id": b })).await;
    assert_eq!(status, 201);
    let (status, _) = post_json(&app, &admin.access_token, "/api/v1/matches", &json!({ "match_date_time": kick_off, "home_team_id": c, "away_team_id": a })).await;
    assert_eq!(status, 409);
    let (status, _) = post_json(&app, &admin.access_token, "/api/v1/matches", &json!({ "match_date_time": kick_off, "home_team_id": c, "away_team_id": c })).await;
    assert_eq!(status, 400);
}
