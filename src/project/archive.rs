//! Project archive packaging
//!
//! Packs the git-tracked files of the repository into a gzipped tarball
//! and reports its SHA-256 checksum. Untracked files never leave the
//! machine.

use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};

use crate::error::{AirliftError, AirliftResult};

/// A packed project archive ready for upload.
#[derive(Debug, Clone)]
pub struct ProjectArchive {
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the archive bytes.
    pub sha256: String,
    pub size: u64,
}

/// Pack the repository at `repo_root` into `dest`.
pub fn pack_repository(repo_root: &Path, dest: &Path) -> AirliftResult<ProjectArchive> {
    let files = tracked_files(repo_root)?;

    let tarball = std::fs::File::create(dest)?;
    let encoder = GzEncoder::new(tarball, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for file in &files {
        let absolute = repo_root.join(file);
        // Tracked-but-deleted entries would fail the append.
        if !absolute.is_file() {
            continue;
        }
        builder.append_path_with_name(&absolute, file)?;
    }
    builder.into_inner()?.finish()?;

    let bytes = std::fs::read(dest)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);

    Ok(ProjectArchive {
        path: dest.to_path_buf(),
        sha256: format!("{:x}", hasher.finalize()),
        size: bytes.len() as u64,
    })
}

fn tracked_files(repo_root: &Path) -> AirliftResult<Vec<PathBuf>> {
    let output = Command::new("git")
        .arg("ls-files")
        .current_dir(repo_root)
        .output()
        .map_err(|err| AirliftError::GitRoot {
            message: err.to_string(),
        })?;

    if !output.status.success() {
        return Err(AirliftError::GitRoot {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git(repo: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(repo)
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn packs_tracked_files_with_checksum() {
        let dir = tempfile::tempdir().unwrap();
        if !git(dir.path(), &["init"]) {
            // No usable git on this machine; nothing to assert.
            return;
        }
        std::fs::write(dir.path().join("app.json"), "{}").unwrap();
        std::fs::write(dir.path().join("ignored.tmp"), "scratch").unwrap();
        assert!(git(dir.path(), &["add", "app.json"]));

        let dest = dir.path().join("archive.tar.gz");
        let archive = pack_repository(dir.path(), &dest).unwrap();

        assert!(dest.is_file());
        assert!(archive.size > 0);
        assert_eq!(archive.sha256.len(), 64);
    }
}
