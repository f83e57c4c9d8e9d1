use actix_web::web;

use crate::handlers::{goal_handler, match_handler, player_handler, team_handler};

/// Teams, players, matches and goals. Literal segments are registered
/// before `{id}` so `standing`, `by-team` and `top-scorers` are not
/// parsed as ids.
pub fn init_league_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Teams
        .service(
            web::resource("/teams")
                .route(web::get().to(team_handler::get_teams))
                .route(web::post().to(team_handler::create_team)),
        )
        .service(
            web::resource("/teams/{id}")
                .route(web::get().to(team_handler::get_team))
                .route(web::put().to(team_handler::update_team))
                .route(web::delete().to(team_handler::delete_team)),
        )
        // Players
        .service(
            web::resource("/players")
                .route(web::get().to(player_handler::get_players))
                .route(web::post().to(player_handler::create_player)),
        )
        .service(
            web::resource("/players/by-team/{team_id}")
                .route(web::get().to(player_handler::get_players_by_team)),
        )
        .service(
            web::resource("/players/{id}")
                .route(web::get().to(player_handler::get_player))
                .route(web::put().to(player_handler::update_player))
                .route(web::delete().to(player_handler::delete_player)),
        )
        .service(
            web::resource("/players/{id}/transfer")
                .route(web::post().to(player_handler::transfer_player)),
        )
        .service(
            web::resource("/players/{id}/transfers")
                .route(web::get().to(player_handler::get_player_transfers)),
        )
        // Matches
        .service(
            web::resource("/matches")
                .route(web::get().to(match_handler::get_matches))
                .route(web::post().to(match_handler::create_match)),
        )
        .service(
            web::resource("/matches/standing")
                .route(web::get().to(match_handler::get_league_standing)),
        )
        .service(
            web::resource("/matches/{id}")
                .route(web::get().to(match_handler::get_match))
                .route(web::put().to(match_handler::update_match)),
        )
        .service(
            web::resource("/matches/{id}/result")
                .route(web::post().to(match_handler::submit_match_result)),
        )
        .service(
            web::resource("/matches/{id}/report")
                .route(web::get().to(match_handler::get_match_report)),
        )
        // Goals
        .service(
            web::resource("/goals")
                .route(web::post().to(goal_handler::add_goal)),
        )
        .service(
            web::resource("/goals/top-scorers")
                .route(web::get().to(goal_handler::get_top_scorers)),
        )
        .service(
            web::resource("/goals/match/{match_id}")
                .route(web::get().to(goal_handler::get_match_goals)),
        );
}
