pub mod league;
pub mod loader;
pub mod store;
