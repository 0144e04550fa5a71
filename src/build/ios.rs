//! iOS build driver and job assembly

use crate::build::{start_build, BuildContext, StartBuildOptions};
use crate::client::BuildServiceClient;
use crate::config::{BuildConfig, IosBuildProfile, Workflow};
use crate::credentials::schema::Answers;
use crate::credentials::{self, ask_for_user_provided};
use crate::error::{AirliftError, AirliftResult};
use crate::job::{BuildCredentials, DistributionCertificate, IosJobDraft, Job, JobData};
use crate::project::schemes;
use crate::prompt::Prompter;
use crate::{project, ui};

/// Drive one iOS build attempt end to end.
pub fn start_ios_build(
    prompter: &mut dyn Prompter,
    client: &BuildServiceClient,
    ctx: &BuildContext,
    config: &BuildConfig,
) -> AirliftResult<String> {
    let profile = config.ios_profile(&ctx.profile_name)?.clone();

    // Scheme is a generic-workflow fact; managed projects build without
    // one.
    let scheme = match (profile.workflow, profile.scheme.clone()) {
        (Workflow::Generic, Some(scheme)) => Some(scheme),
        (Workflow::Generic, None) => Some(schemes::resolve_scheme(
            prompter,
            &ctx.project_dir,
            ctx.interactive,
        )?),
        (Workflow::Managed, _) => None,
    };

    let configure_profile = profile.clone();
    let job_profile = profile.clone();

    start_build(
        prompter,
        client,
        ctx,
        StartBuildOptions {
            ensure_project_configured: Box::new(move |ctx| {
                ensure_ios_project(ctx, &configure_profile)
            }),
            ensure_credentials: Box::new(ensure_ios_credentials),
            prepare_job: Box::new(move |ctx, job_data| {
                prepare_ios_job(ctx, &job_profile, scheme, job_data)
            }),
        },
    )
}

fn ensure_ios_project(ctx: &BuildContext, profile: &IosBuildProfile) -> AirliftResult<()> {
    let bundle_identifier = ctx
        .manifest
        .ios
        .as_ref()
        .and_then(|ios| ios.bundle_identifier.as_deref());
    if bundle_identifier.is_none() {
        return Err(AirliftError::InvalidConfig {
            path: ctx.project_dir.join(crate::config::APP_MANIFEST_FILE),
            message: "iOS builds require ios.bundleIdentifier".to_string(),
        });
    }

    if profile.workflow == Workflow::Generic {
        let native_dir = ctx.project_dir.join("ios");
        if !native_dir.is_dir() {
            return Err(AirliftError::MissingNativeProject {
                platform: "ios".to_string(),
                path: native_dir,
            });
        }
    }
    Ok(())
}

/// Obtain signing credentials: user-provided first, then the local
/// `credentials.json` fallback. A build without either proceeds
/// unsigned, with a warning.
fn ensure_ios_credentials(
    prompter: &mut dyn Prompter,
    ctx: &BuildContext,
) -> AirliftResult<Option<BuildCredentials>> {
    if ctx.interactive {
        let schema = credentials::ios::ios_credentials_schema();
        if let Some(bundle) = ask_for_user_provided(prompter, &schema, &Answers::new())? {
            return Ok(Some(to_job_credentials(bundle)));
        }
    }

    if let Some(bundle) = credentials::local::ios_credentials(&ctx.project_dir)? {
        return Ok(Some(to_job_credentials(bundle)));
    }

    ui::warn("No build credentials configured - the build will not be signed.");
    Ok(None)
}

fn to_job_credentials(bundle: credentials::ios::IosCredentials) -> BuildCredentials {
    BuildCredentials::Ios {
        provisioning_profile_base64: bundle.provisioning_profile_base64,
        distribution_certificate: DistributionCertificate {
            data_base64: bundle.distribution_certificate.data_base64,
            password: bundle.distribution_certificate.password,
        },
    }
}

/// Assemble and sanitize the iOS job for one build attempt.
pub fn prepare_ios_job(
    ctx: &BuildContext,
    profile: &IosBuildProfile,
    scheme: Option<String>,
    job_data: JobData,
) -> AirliftResult<Job> {
    let common = IosJobDraft {
        workflow: Some(profile.workflow),
        project_url: job_data.archive_url,
        project_root_directory: project::project_root_directory(
            &ctx.project_dir,
            &ctx.repo_root,
        ),
        scheme: None,
        build_command: None,
        artifact_path: None,
        credentials: job_data.credentials,
        secret_envs: project::read_secret_envs(&ctx.project_dir)?,
    };

    let draft = match profile.workflow {
        Workflow::Generic => IosJobDraft {
            scheme,
            build_command: profile.build_command.clone(),
            artifact_path: profile.artifact_path.clone(),
            ..common
        },
        Workflow::Managed => common,
    };

    Job::sanitize_ios(draft)
}
