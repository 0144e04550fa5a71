//! Android build driver and job assembly

use crate::build::{start_build, BuildContext, StartBuildOptions};
use crate::client::BuildServiceClient;
use crate::config::{AndroidBuildProfile, BuildConfig, Workflow};
use crate::credentials::schema::Answers;
use crate::credentials::{self, ask_for_user_provided};
use crate::error::{AirliftError, AirliftResult};
use crate::job::{AndroidJobDraft, BuildCredentials, Job, JobData, Keystore};
use crate::prompt::Prompter;
use crate::{project, ui};

/// Drive one Android build attempt end to end.
pub fn start_android_build(
    prompter: &mut dyn Prompter,
    client: &BuildServiceClient,
    ctx: &BuildContext,
    config: &BuildConfig,
) -> AirliftResult<String> {
    let profile = config.android_profile(&ctx.profile_name)?.clone();
    let configure_profile = profile.clone();

    start_build(
        prompter,
        client,
        ctx,
        StartBuildOptions {
            ensure_project_configured: Box::new(move |ctx| {
                ensure_android_project(ctx, &configure_profile)
            }),
            ensure_credentials: Box::new(ensure_android_credentials),
            prepare_job: Box::new(move |ctx, job_data| {
                prepare_android_job(ctx, &profile, job_data)
            }),
        },
    )
}

fn ensure_android_project(ctx: &BuildContext, profile: &AndroidBuildProfile) -> AirliftResult<()> {
    match profile.workflow {
        Workflow::Generic => {
            let native_dir = ctx.project_dir.join("android");
            if !native_dir.is_dir() {
                return Err(AirliftError::MissingNativeProject {
                    platform: "android".to_string(),
                    path: native_dir,
                });
            }
            Ok(())
        }
        Workflow::Managed => {
            let package = ctx
                .manifest
                .android
                .as_ref()
                .and_then(|android| android.package.as_deref());
            if package.is_none() {
                return Err(AirliftError::InvalidConfig {
                    path: ctx.project_dir.join(crate::config::APP_MANIFEST_FILE),
                    message: "managed Android builds require android.package".to_string(),
                });
            }
            Ok(())
        }
    }
}

/// Obtain keystore credentials: user-provided first, then the local
/// `credentials.json` fallback. A build without either proceeds
/// unsigned, with a warning.
fn ensure_android_credentials(
    prompter: &mut dyn Prompter,
    ctx: &BuildContext,
) -> AirliftResult<Option<BuildCredentials>> {
    if ctx.interactive {
        let schema = credentials::android::keystore_schema();
        if let Some(keystore) = ask_for_user_provided(prompter, &schema, &Answers::new())? {
            return Ok(Some(to_job_credentials(keystore)));
        }
    }

    if let Some(keystore) = credentials::local::android_keystore(&ctx.project_dir)? {
        return Ok(Some(to_job_credentials(keystore)));
    }

    ui::warn("No build credentials configured - the build will not be signed.");
    Ok(None)
}

/// Field-for-field copy into the wire shape; the encoded keystore
/// contents land in `dataBase64`.
fn to_job_credentials(keystore: credentials::android::Keystore) -> BuildCredentials {
    BuildCredentials::Android {
        keystore: Keystore {
            data_base64: keystore.keystore,
            keystore_password: keystore.keystore_password,
            key_alias: keystore.key_alias,
            key_password: keystore.key_password,
        },
    }
}

/// Assemble and sanitize the Android job for one build attempt.
pub fn prepare_android_job(
    ctx: &BuildContext,
    profile: &AndroidBuildProfile,
    job_data: JobData,
) -> AirliftResult<Job> {
    let keystore = match job_data.credentials {
        Some(BuildCredentials::Android { keystore }) => Some(keystore),
        Some(BuildCredentials::Ios { .. }) => {
            return Err(AirliftError::Internal(
                "iOS credentials passed to the Android job".to_string(),
            ));
        }
        None => None,
    };

    let common = AndroidJobDraft {
        workflow: Some(profile.workflow),
        project_url: job_data.archive_url,
        project_root_directory: project::project_root_directory(
            &ctx.project_dir,
            &ctx.repo_root,
        ),
        gradle_command: None,
        artifact_path: None,
        keystore,
        secret_envs: project::read_secret_envs(&ctx.project_dir)?,
    };

    let draft = match profile.workflow {
        Workflow::Generic => AndroidJobDraft {
            gradle_command: profile.gradle_command.clone(),
            artifact_path: profile.artifact_path.clone(),
            ..common
        },
        Workflow::Managed => common,
    };

    Job::sanitize_android(draft)
}
