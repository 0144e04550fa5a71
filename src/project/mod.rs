//! Project-level facts: repository root, repo-relative paths, secret
//! environment variables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{AirliftError, AirliftResult};

pub mod archive;
pub mod schemes;

/// Relative path of the file holding secret build-time env vars.
pub const SECRET_ENV_FILE: &str = ".airlift/secrets.env";

/// Absolute path of the repository root containing `dir`.
pub fn git_root_directory(dir: &Path) -> AirliftResult<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .map_err(|err| AirliftError::GitRoot {
            message: err.to_string(),
        })?;

    if !output.status.success() {
        return Err(AirliftError::GitRoot {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

/// Path of `project_dir` relative to `repo_root`, as it appears in a
/// build job. `"."` when the two coincide.
pub fn project_root_directory(project_dir: &Path, repo_root: &Path) -> String {
    match project_dir.strip_prefix(repo_root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        // A project outside its own repository root has no meaningful
        // relative path; the service treats "." as the root.
        Err(_) => ".".to_string(),
    }
}

/// Secret environment variables declared in `.airlift/secrets.env`.
///
/// `None` when the project has no secrets file; a present-but-invalid
/// file is an error, not an empty result.
pub fn read_secret_envs(
    project_dir: &Path,
) -> AirliftResult<Option<BTreeMap<String, String>>> {
    let path = project_dir.join(SECRET_ENV_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let mut envs = BTreeMap::new();
    let entries = dotenvy::from_path_iter(&path).map_err(|err| AirliftError::SecretEnvs {
        path: path.clone(),
        message: err.to_string(),
    })?;
    for entry in entries {
        let (key, value) = entry.map_err(|err| AirliftError::SecretEnvs {
            path: path.clone(),
            message: err.to_string(),
        })?;
        envs.insert(key, value);
    }
    Ok(Some(envs))
}
