//! Run-level error types.
//!
//! Stage failures never surface here: stages fold collaborator errors into
//! the state (failure-default flags plus a user-facing message). Only
//! input-shape problems refuse a run outright.

use thiserror::Error;

/// Error refusing a run before any stage executes.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Neither `input_document` nor `input_source_ref` was provided.
    #[error("no input document or source reference provided")]
    MissingInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of MissingInput names both entry fields.
    #[test]
    fn missing_input_display() {
        let s = FlowError::MissingInput.to_string();
        assert!(s.contains("no input document"), "{}", s);
        assert!(s.contains("source reference"), "{}", s);
    }
}
