pub mod access;
pub mod jwt;
