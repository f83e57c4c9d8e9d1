pub mod goals;
pub mod results;
pub mod standings;
pub mod validation;
