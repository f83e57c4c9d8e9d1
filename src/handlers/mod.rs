pub mod auth_handler;
pub mod goal_handler;
pub mod health_handler;
pub mod match_handler;
pub mod player_handler;
pub mod team_handler;
pub mod user_handler;
