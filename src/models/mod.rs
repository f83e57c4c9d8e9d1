pub mod auth;
pub mod common;
pub mod goal;
pub mod league;
pub mod matches;
pub mod player;
pub mod team;
pub mod user;
