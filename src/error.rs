//! Error types for the materialization pipeline.
//!
//! Failures fall into two tiers, checked uniformly by the orchestrator:
//! fatal preconditions abort the whole run, everything else is recorded
//! per step and the run continues with the next independent operation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest parse error: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("{0} step(s) failed, re-run after fixing the reported settings")]
    RunFailed(usize),
}

impl Error {
    /// Whether this error aborts the entire run.
    ///
    /// Precondition and manifest failures are fatal: every later step
    /// depends on them. Per-step decode/write/render failures are not;
    /// the orchestrator records them and moves on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Precondition(_) | Error::ManifestParse(_) | Error::Io(_)
        )
    }
}

/// Hard prerequisites checked before any step runs.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("environment file not found: {0}")]
    EnvFileNotFound(PathBuf),

    #[error("manifest expects user '{expected}' but invoked as '{actual}'")]
    WrongUser { expected: String, actual: String },
}

/// A required setting that cannot be consumed as-is.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("required setting {0} is missing or empty")]
    Missing(String),

    #[error("required setting {name} still holds placeholder value '{value}'")]
    Placeholder { name: String, value: String },
}

impl ValidationError {
    /// The setting name this failure refers to.
    pub fn setting(&self) -> &str {
        match self {
            ValidationError::Missing(name) => name,
            ValidationError::Placeholder { name, .. } => name,
        }
    }
}

/// Failures while decoding or writing one secret file.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("setting {setting} is not valid base64: {reason}")]
    Decode { setting: String, reason: String },

    #[error("failed to write secret file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while rendering one template mapping.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
