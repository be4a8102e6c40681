// FHL stats engine: period deltas, percentile ratings, team rankings and
// the dashboard reports built from them.

pub mod cli;
pub mod data;
pub mod report;
pub mod standings;
pub mod stats;
