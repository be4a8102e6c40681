// Report assemblers: join the engines against the reference tables and
// shape the dashboard documents.

pub mod audit;
pub mod cash;
pub mod players;
pub mod roster;
pub mod rosters;
pub mod standings;
pub mod stats;
pub mod teams;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A row refers to a key that its reference table does not contain.
    #[error("{table} has no entry for `{key}`")]
    MissingReference { table: &'static str, key: String },

    #[error("no periods loaded")]
    EmptyStore,
}

impl ReportError {
    pub(crate) fn missing(table: &'static str, key: &str) -> Self {
        ReportError::MissingReference {
            table,
            key: key.to_string(),
        }
    }
}
