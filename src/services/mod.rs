pub mod auth_service;
pub mod match_service;
pub mod player_service;
pub mod team_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use match_service::MatchService;
pub use player_service::PlayerService;
pub use team_service::TeamService;
pub use user_service::UserService;
