pub mod derive;
pub mod distribution;
