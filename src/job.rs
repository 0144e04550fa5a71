//! Build job wire model
//!
//! Jobs accumulate as per-platform drafts and only become a [`Job`]
//! through [`Job::sanitize_android`] / [`Job::sanitize_ios`], the
//! validating constructors. No draft is ever submitted directly.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Workflow;
use crate::error::{AirliftError, AirliftResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

/// Facts gathered for one build attempt, consumed exactly once by job
/// preparation.
#[derive(Debug, Clone)]
pub struct JobData {
    pub archive_url: String,
    pub credentials: Option<BuildCredentials>,
}

/// Signing material embedded in a job's secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BuildCredentials {
    Android {
        keystore: Keystore,
    },
    #[serde(rename_all = "camelCase")]
    Ios {
        provisioning_profile_base64: String,
        distribution_certificate: DistributionCertificate,
    },
}

/// Keystore as the build service expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Keystore {
    pub data_base64: String,
    pub keystore_password: String,
    pub key_alias: String,
    pub key_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionCertificate {
    pub data_base64: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Secrets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_credentials: Option<BuildCredentials>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_envs: Option<BTreeMap<String, String>>,
}

/// Partial Android job, accumulated before sanitization.
#[derive(Debug, Clone, Default)]
pub struct AndroidJobDraft {
    pub workflow: Option<Workflow>,
    pub project_url: String,
    pub project_root_directory: String,
    pub gradle_command: Option<String>,
    pub artifact_path: Option<String>,
    pub keystore: Option<Keystore>,
    pub secret_envs: Option<BTreeMap<String, String>>,
}

/// Partial iOS job, accumulated before sanitization.
#[derive(Debug, Clone, Default)]
pub struct IosJobDraft {
    pub workflow: Option<Workflow>,
    pub project_url: String,
    pub project_root_directory: String,
    pub scheme: Option<String>,
    pub build_command: Option<String>,
    pub artifact_path: Option<String>,
    pub credentials: Option<BuildCredentials>,
    pub secret_envs: Option<BTreeMap<String, String>>,
}

/// A fully-formed, submittable build job.
///
/// Only constructed through sanitization; serialization is the exact
/// wire shape the build service consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub platform: Platform,

    #[serde(rename = "type")]
    pub job_type: Workflow,

    pub project_url: String,
    pub project_root_directory: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradle_command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Secrets>,
}

impl Job {
    /// Validate an Android draft into a submittable job.
    pub fn sanitize_android(draft: AndroidJobDraft) -> AirliftResult<Self> {
        let workflow = required_workflow(draft.workflow)?;
        validate_common(&draft.project_url, &draft.project_root_directory)?;

        match workflow {
            Workflow::Generic => {
                require_field(draft.gradle_command.as_deref(), "gradleCommand", "generic")?;
                require_field(draft.artifact_path.as_deref(), "artifactPath", "generic")?;
            }
            Workflow::Managed => {
                forbid_field(draft.gradle_command.as_deref(), "gradleCommand", "managed")?;
                forbid_field(draft.artifact_path.as_deref(), "artifactPath", "managed")?;
            }
        }

        Ok(Self {
            platform: Platform::Android,
            job_type: workflow,
            project_url: draft.project_url,
            project_root_directory: draft.project_root_directory,
            scheme: None,
            build_command: None,
            gradle_command: draft.gradle_command,
            artifact_path: draft.artifact_path,
            secrets: build_secrets(
                draft.keystore.map(|keystore| BuildCredentials::Android { keystore }),
                draft.secret_envs,
            ),
        })
    }

    /// Validate an iOS draft into a submittable job.
    pub fn sanitize_ios(draft: IosJobDraft) -> AirliftResult<Self> {
        let workflow = required_workflow(draft.workflow)?;
        validate_common(&draft.project_url, &draft.project_root_directory)?;

        match workflow {
            Workflow::Generic => {
                require_field(draft.scheme.as_deref(), "scheme", "generic")?;
            }
            Workflow::Managed => {
                forbid_field(draft.scheme.as_deref(), "scheme", "managed")?;
                forbid_field(draft.build_command.as_deref(), "buildCommand", "managed")?;
                forbid_field(draft.artifact_path.as_deref(), "artifactPath", "managed")?;
            }
        }

        if let Some(BuildCredentials::Android { .. }) = draft.credentials {
            return Err(AirliftError::Internal(
                "Android credentials passed to the iOS job".to_string(),
            ));
        }

        Ok(Self {
            platform: Platform::Ios,
            job_type: workflow,
            project_url: draft.project_url,
            project_root_directory: draft.project_root_directory,
            scheme: draft.scheme,
            build_command: draft.build_command,
            gradle_command: None,
            artifact_path: draft.artifact_path,
            secrets: build_secrets(draft.credentials, draft.secret_envs),
        })
    }
}

fn required_workflow(workflow: Option<Workflow>) -> AirliftResult<Workflow> {
    // A draft without a workflow is a precondition violation upstream,
    // not a user-facing condition.
    workflow.ok_or_else(|| AirliftError::Internal("job draft has no workflow".to_string()))
}

fn validate_common(project_url: &str, project_root_directory: &str) -> AirliftResult<()> {
    if project_url.is_empty() {
        return Err(AirliftError::MalformedJob("projectUrl is empty".to_string()));
    }
    if project_root_directory.is_empty() {
        return Err(AirliftError::MalformedJob(
            "projectRootDirectory is empty".to_string(),
        ));
    }
    Ok(())
}

fn require_field(value: Option<&str>, name: &str, workflow: &str) -> AirliftResult<()> {
    match value {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(AirliftError::MalformedJob(format!(
            "{workflow} job requires {name}"
        ))),
    }
}

fn forbid_field(value: Option<&str>, name: &str, workflow: &str) -> AirliftResult<()> {
    if value.is_some() {
        return Err(AirliftError::MalformedJob(format!(
            "{workflow} job must not set {name}"
        )));
    }
    Ok(())
}

/// Empty secret-env maps are dropped so the wire object omits the key.
fn build_secrets(
    build_credentials: Option<BuildCredentials>,
    secret_envs: Option<BTreeMap<String, String>>,
) -> Option<Secrets> {
    let secret_envs = secret_envs.filter(|envs| !envs.is_empty());
    if build_credentials.is_none() && secret_envs.is_none() {
        return None;
    }
    Some(Secrets {
        build_credentials,
        secret_envs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic_android_draft() -> AndroidJobDraft {
        AndroidJobDraft {
            workflow: Some(Workflow::Generic),
            project_url: "https://x/archive.tar.gz".to_string(),
            project_root_directory: ".".to_string(),
            gradle_command: Some("assembleRelease".to_string()),
            artifact_path: Some("app/build/outputs/apk/release/app-release.apk".to_string()),
            keystore: None,
            secret_envs: None,
        }
    }

    #[test]
    fn generic_android_job_serializes_expected_shape() {
        let job = Job::sanitize_android(generic_android_draft()).unwrap();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "platform": "android",
                "type": "generic",
                "projectUrl": "https://x/archive.tar.gz",
                "projectRootDirectory": ".",
                "gradleCommand": "assembleRelease",
                "artifactPath": "app/build/outputs/apk/release/app-release.apk"
            })
        );
    }

    #[test]
    fn keystore_maps_to_data_base64() {
        let mut draft = generic_android_draft();
        draft.keystore = Some(Keystore {
            data_base64: "BASE64".to_string(),
            keystore_password: "p1".to_string(),
            key_alias: "a".to_string(),
            key_password: "p2".to_string(),
        });
        let job = Job::sanitize_android(draft).unwrap();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(
            value["secrets"]["buildCredentials"]["keystore"],
            serde_json::json!({
                "dataBase64": "BASE64",
                "keystorePassword": "p1",
                "keyAlias": "a",
                "keyPassword": "p2"
            })
        );
    }

    #[test]
    fn managed_android_job_carries_no_build_fields() {
        let job = Job::sanitize_android(AndroidJobDraft {
            workflow: Some(Workflow::Managed),
            project_url: "https://x/archive.tar.gz".to_string(),
            project_root_directory: "app".to_string(),
            ..AndroidJobDraft::default()
        })
        .unwrap();
        let value = serde_json::to_value(&job).unwrap();
        assert!(value.get("gradleCommand").is_none());
        assert!(value.get("artifactPath").is_none());
        assert!(value.get("secrets").is_none());
    }

    #[test]
    fn managed_draft_with_gradle_command_is_rejected() {
        let err = Job::sanitize_android(AndroidJobDraft {
            workflow: Some(Workflow::Managed),
            project_url: "https://x/archive.tar.gz".to_string(),
            project_root_directory: ".".to_string(),
            gradle_command: Some("assembleRelease".to_string()),
            ..AndroidJobDraft::default()
        })
        .unwrap_err();
        assert!(matches!(err, AirliftError::MalformedJob(_)));
    }

    #[test]
    fn generic_draft_without_gradle_command_is_rejected() {
        let mut draft = generic_android_draft();
        draft.gradle_command = None;
        let err = Job::sanitize_android(draft).unwrap_err();
        assert!(err.to_string().contains("gradleCommand"));
    }

    #[test]
    fn draft_without_workflow_is_an_internal_error() {
        let err = Job::sanitize_android(AndroidJobDraft {
            project_url: "https://x/archive.tar.gz".to_string(),
            project_root_directory: ".".to_string(),
            ..AndroidJobDraft::default()
        })
        .unwrap_err();
        assert!(matches!(err, AirliftError::Internal(_)));
    }

    #[test]
    fn empty_secret_envs_are_dropped() {
        let mut draft = generic_android_draft();
        draft.secret_envs = Some(BTreeMap::new());
        let job = Job::sanitize_android(draft).unwrap();
        assert!(job.secrets.is_none());
    }

    #[test]
    fn generic_ios_job_requires_scheme() {
        let err = Job::sanitize_ios(IosJobDraft {
            workflow: Some(Workflow::Generic),
            project_url: "https://x/archive.tar.gz".to_string(),
            project_root_directory: ".".to_string(),
            ..IosJobDraft::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn ios_job_serializes_credentials_camel_case() {
        let job = Job::sanitize_ios(IosJobDraft {
            workflow: Some(Workflow::Generic),
            project_url: "https://x/archive.tar.gz".to_string(),
            project_root_directory: ".".to_string(),
            scheme: Some("App".to_string()),
            credentials: Some(BuildCredentials::Ios {
                provisioning_profile_base64: "PROFILE64".to_string(),
                distribution_certificate: DistributionCertificate {
                    data_base64: "CERT64".to_string(),
                    password: "p".to_string(),
                },
            }),
            ..IosJobDraft::default()
        })
        .unwrap();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["scheme"], "App");
        assert_eq!(
            value["secrets"]["buildCredentials"]["provisioningProfileBase64"],
            "PROFILE64"
        );
        assert_eq!(
            value["secrets"]["buildCredentials"]["distributionCertificate"]["dataBase64"],
            "CERT64"
        );
    }
}
