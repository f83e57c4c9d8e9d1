pub mod goals;
pub mod helpers;
pub mod matches;
pub mod players;
pub mod refresh_tokens;
pub mod teams;
pub mod transfers;
pub mod users;
