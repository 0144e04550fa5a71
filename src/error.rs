//! Error types for Airlift
//!
//! Uses `thiserror` for library errors; the binary layer reports them
//! through `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Airlift operations
pub type AirliftResult<T> = Result<T, AirliftError>;

/// Main error type for Airlift operations
#[derive(Error, Debug)]
pub enum AirliftError {
    /// Required configuration file is missing
    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file exists but does not parse
    #[error("invalid configuration in {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// Requested build profile is not declared for the platform
    #[error("no build profile named '{profile}' for platform {platform} in airlift.json")]
    MissingProfile { profile: String, platform: String },

    /// Expected native project directory is absent
    #[error("no native {platform} project found at {path} - create one or switch the profile to the managed workflow")]
    MissingNativeProject { platform: String, path: PathBuf },

    /// Job draft violates the shape its workflow requires
    #[error("malformed build job: {0}")]
    MalformedJob(String),

    /// Scheme discovery found nothing to build
    #[error("no shared Xcode schemes found under {path} - open the project in Xcode and mark a scheme as shared")]
    NoSchemes { path: PathBuf },

    /// Repository root lookup failed
    #[error("not a git repository (or git is not installed): {message}")]
    GitRoot { message: String },

    /// Secret env file exists but cannot be parsed
    #[error("invalid secret env file {path}: {message}")]
    SecretEnvs { path: PathBuf, message: String },

    /// Remote build service rejected or failed a request
    #[error("build service request failed: {0}")]
    BuildService(String),

    /// Programming invariant violated upstream
    #[error("internal error: {0}")]
    Internal(String),

    /// Interactive prompt failure (closed stdin, no tty)
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
