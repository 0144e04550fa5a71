//! Project-local credentials file
//!
//! `credentials.json` at the project root points at signing files on
//! disk. This is the automated fallback when the user declines to type
//! credentials in: the referenced files are read and encoded into the
//! same bundles the interactive path produces.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::credentials::android::Keystore;
use crate::credentials::ios::{DistributionCertificate, IosCredentials};
use crate::error::{AirliftError, AirliftResult};

pub const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsFile {
    #[serde(default)]
    android: Option<AndroidEntry>,
    #[serde(default)]
    ios: Option<IosEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AndroidEntry {
    keystore: KeystoreEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeystoreEntry {
    keystore_path: String,
    keystore_password: String,
    key_alias: String,
    key_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IosEntry {
    provisioning_profile_path: String,
    distribution_certificate: CertificateEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CertificateEntry {
    path: String,
    password: String,
}

fn load(project_dir: &Path) -> AirliftResult<Option<CredentialsFile>> {
    let path = project_dir.join(CREDENTIALS_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let parsed =
        serde_json::from_str(&raw).map_err(|err| AirliftError::InvalidConfig {
            path,
            message: err.to_string(),
        })?;
    Ok(Some(parsed))
}

fn read_base64(project_dir: &Path, relative: &str) -> AirliftResult<String> {
    let path = resolve(project_dir, relative);
    let bytes = std::fs::read(&path).map_err(|err| AirliftError::InvalidConfig {
        path: project_dir.join(CREDENTIALS_FILE),
        message: format!("cannot read {}: {err}", path.display()),
    })?;
    Ok(STANDARD.encode(bytes))
}

fn resolve(project_dir: &Path, relative: &str) -> PathBuf {
    let path = PathBuf::from(relative);
    if path.is_absolute() {
        path
    } else {
        project_dir.join(path)
    }
}

/// Android keystore from `credentials.json`, if the file declares one.
pub fn android_keystore(project_dir: &Path) -> AirliftResult<Option<Keystore>> {
    let Some(file) = load(project_dir)? else {
        return Ok(None);
    };
    let Some(entry) = file.android else {
        return Ok(None);
    };
    Ok(Some(Keystore {
        keystore: read_base64(project_dir, &entry.keystore.keystore_path)?,
        keystore_password: entry.keystore.keystore_password,
        key_alias: entry.keystore.key_alias,
        key_password: entry.keystore.key_password,
    }))
}

/// iOS signing credentials from `credentials.json`, if declared.
pub fn ios_credentials(project_dir: &Path) -> AirliftResult<Option<IosCredentials>> {
    let Some(file) = load(project_dir)? else {
        return Ok(None);
    };
    let Some(entry) = file.ios else {
        return Ok(None);
    };
    Ok(Some(IosCredentials {
        provisioning_profile_base64: read_base64(project_dir, &entry.provisioning_profile_path)?,
        distribution_certificate: DistributionCertificate {
            data_base64: read_base64(project_dir, &entry.distribution_certificate.path)?,
            password: entry.distribution_certificate.password,
        },
    }))
}
