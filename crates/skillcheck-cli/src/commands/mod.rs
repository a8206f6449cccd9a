pub mod init;
pub mod invite;
pub mod score;
pub mod stats;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use skillcheck_core::Submission;

/// Read and parse a submission JSON file.
pub(crate) fn load_submission(path: &Path) -> Result<Submission> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submission: {}", path.display()))?;
    Submission::from_json(&body)
        .with_context(|| format!("invalid submission: {}", path.display()))
}
