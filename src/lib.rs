//! Airlift - cloud builds for mobile applications
//!
//! Airlift packages a local app project, gathers signing credentials
//! through a schema-driven interactive flow, and submits platform- and
//! workflow-specific build jobs to a remote build service.

pub mod build;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod job;
pub mod project;
pub mod prompt;
pub mod ui;

// Re-exports for convenience
pub use build::{start_android_build, start_ios_build, BuildContext};
pub use client::BuildServiceClient;
pub use config::{AppManifest, BuildConfig, Workflow};
pub use credentials::schema::{
    ask_for_user_provided, collect_from_user, CredentialSchema, FromAnswers, Question,
    QuestionKind,
};
pub use error::{AirliftError, AirliftResult};
pub use job::{Job, JobData};
pub use prompt::{Prompter, TerminalPrompter};
