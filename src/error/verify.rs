use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Verifier not found: {key}")]
    VerifierNotFound { key: String },
}
