pub mod password;
pub mod query;
