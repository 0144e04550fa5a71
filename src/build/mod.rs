//! Build orchestration
//!
//! Per-platform drivers gather workflow facts (scheme, credentials,
//! project state), then the generic starter sequences the attempt:
//! configuration check, credentials, packaging, upload, job
//! preparation, submission.

use std::path::PathBuf;

use crate::client::BuildServiceClient;
use crate::config::AppManifest;
use crate::error::AirliftResult;
use crate::job::{BuildCredentials, Job, JobData};
use crate::prompt::Prompter;
use crate::{project, ui};

pub mod android;
pub mod ios;

pub use android::start_android_build;
pub use ios::start_ios_build;

/// Everything one build attempt knows about its surroundings.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub project_dir: PathBuf,
    pub repo_root: PathBuf,
    pub manifest: AppManifest,
    pub profile_name: String,
    pub interactive: bool,
}

impl BuildContext {
    /// Resolve the repository root once, up front; later steps only
    /// consume the recorded value.
    pub fn new(
        project_dir: PathBuf,
        manifest: AppManifest,
        profile_name: String,
        interactive: bool,
    ) -> AirliftResult<Self> {
        let repo_root = project::git_root_directory(&project_dir)?;
        Ok(Self {
            project_dir,
            repo_root,
            manifest,
            profile_name,
            interactive,
        })
    }
}

/// Workflow facts and callbacks one platform hands to the generic
/// starter.
pub struct StartBuildOptions<'a> {
    pub ensure_project_configured: Box<dyn FnOnce(&BuildContext) -> AirliftResult<()> + 'a>,
    pub ensure_credentials: Box<
        dyn FnOnce(&mut dyn Prompter, &BuildContext) -> AirliftResult<Option<BuildCredentials>>
            + 'a,
    >,
    pub prepare_job: Box<dyn FnOnce(&BuildContext, JobData) -> AirliftResult<Job> + 'a>,
}

/// Generic cross-platform build starter.
///
/// Returns the build identifier assigned by the service.
pub fn start_build(
    prompter: &mut dyn Prompter,
    client: &BuildServiceClient,
    ctx: &BuildContext,
    options: StartBuildOptions<'_>,
) -> AirliftResult<String> {
    (options.ensure_project_configured)(ctx)?;
    let credentials = (options.ensure_credentials)(prompter, ctx)?;

    ui::step("Packing project archive");
    let archive_path =
        std::env::temp_dir().join(format!("airlift-{}.tar.gz", std::process::id()));
    let archive = project::archive::pack_repository(&ctx.repo_root, &archive_path)?;
    ui::step(&format!(
        "Packed {} bytes (sha256 {})",
        archive.size, archive.sha256
    ));

    ui::step("Uploading project archive");
    let archive_url = client.upload_archive(&archive.path);
    // The staging tarball is scratch either way.
    let _ = std::fs::remove_file(&archive.path);
    let archive_url = archive_url?;

    let job = (options.prepare_job)(
        ctx,
        JobData {
            archive_url,
            credentials,
        },
    )?;

    ui::step("Submitting build");
    let build_id = client.submit(&job)?;
    Ok(build_id)
}
