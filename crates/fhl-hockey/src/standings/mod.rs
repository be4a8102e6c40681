pub mod aggregate;
pub mod rank;
pub mod season;
