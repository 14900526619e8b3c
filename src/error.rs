use thiserror::Error;

/// Failures at the JSON boundary. Resolution itself never fails; see
/// `diagnostics` for the non-fatal events it reports.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid page input: {0}")]
    InvalidPage(#[source] serde_json::Error),

    #[error("invalid resolve options: {0}")]
    InvalidOptions(#[source] serde_json::Error),

    #[error("failed to serialize resolution: {0}")]
    Serialize(#[source] serde_json::Error),
}
