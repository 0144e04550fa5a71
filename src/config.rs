//! Project configuration
//!
//! Two JSON files at the project root drive a build:
//! - `app.json`: the app manifest (name, slug, platform identifiers)
//! - `airlift.json`: named build profiles keyed by platform
//!
//! Unknown keys are reported as warnings rather than errors so older
//! CLIs keep working against newer config files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AirliftError, AirliftResult};

pub const APP_MANIFEST_FILE: &str = "app.json";
pub const BUILD_CONFIG_FILE: &str = "airlift.json";

/// Build strategy variant: operate on a pre-existing native project
/// (`Generic`) or on a tool-managed project (`Managed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    Generic,
    Managed,
}

/// App manifest (`app.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    pub name: String,
    pub slug: String,

    #[serde(default)]
    pub ios: Option<IosAppConfig>,

    #[serde(default)]
    pub android: Option<AndroidAppConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IosAppConfig {
    #[serde(default)]
    pub bundle_identifier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AndroidAppConfig {
    #[serde(default)]
    pub package: Option<String>,
}

/// Build configuration (`airlift.json`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildConfig {
    #[serde(default)]
    pub builds: BuildsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildsConfig {
    #[serde(default)]
    pub android: BTreeMap<String, AndroidBuildProfile>,

    #[serde(default)]
    pub ios: BTreeMap<String, IosBuildProfile>,
}

/// One named Android build profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidBuildProfile {
    pub workflow: Workflow,

    /// Gradle invocation for the generic workflow, e.g. ":app:assembleRelease".
    #[serde(default)]
    pub gradle_command: Option<String>,

    /// Build output the service should collect, relative to the project.
    #[serde(default)]
    pub artifact_path: Option<String>,
}

/// One named iOS build profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosBuildProfile {
    pub workflow: Workflow,

    /// Xcode scheme to build; resolved interactively when absent.
    #[serde(default)]
    pub scheme: Option<String>,

    /// xcodebuild invocation override for the generic workflow.
    #[serde(default)]
    pub build_command: Option<String>,

    #[serde(default)]
    pub artifact_path: Option<String>,
}

impl BuildConfig {
    pub fn android_profile(&self, name: &str) -> AirliftResult<&AndroidBuildProfile> {
        self.builds
            .android
            .get(name)
            .ok_or_else(|| AirliftError::MissingProfile {
                profile: name.to_string(),
                platform: "android".to_string(),
            })
    }

    pub fn ios_profile(&self, name: &str) -> AirliftResult<&IosBuildProfile> {
        self.builds
            .ios
            .get(name)
            .ok_or_else(|| AirliftError::MissingProfile {
                profile: name.to_string(),
                platform: "ios".to_string(),
            })
    }
}

/// Unknown key encountered while loading a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the ignored key, e.g. "builds.android.release.gradleCmd".
    pub key: String,
}

/// Load `app.json` from the project directory.
pub fn load_manifest(project_dir: &Path) -> AirliftResult<(AppManifest, Vec<ConfigWarning>)> {
    load_json(project_dir.join(APP_MANIFEST_FILE))
}

/// Load `airlift.json` from the project directory.
pub fn load_build_config(project_dir: &Path) -> AirliftResult<(BuildConfig, Vec<ConfigWarning>)> {
    load_json(project_dir.join(BUILD_CONFIG_FILE))
}

fn load_json<T: DeserializeOwned>(path: PathBuf) -> AirliftResult<(T, Vec<ConfigWarning>)> {
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AirliftError::ConfigNotFound { path });
        }
        Err(err) => return Err(err.into()),
    };

    let mut warnings = Vec::new();
    let deserializer = &mut serde_json::Deserializer::from_str(&raw);
    let value = serde_ignored::deserialize(deserializer, |ignored| {
        warnings.push(ConfigWarning {
            key: ignored.to_string(),
        });
    })
    .map_err(|err| AirliftError::InvalidConfig {
        path,
        message: err.to_string(),
    })?;

    Ok((value, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BUILD_CONFIG: &str = r#"{
      "builds": {
        "android": {
          "release": {
            "workflow": "generic",
            "gradleCommand": ":app:assembleRelease",
            "artifactPath": "android/app/build/outputs/apk/release/app-release.apk"
          },
          "store": { "workflow": "managed" }
        },
        "ios": {
          "release": { "workflow": "generic", "scheme": "App" }
        }
      }
    }"#;

    #[test]
    fn parses_profiles_per_platform() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BUILD_CONFIG_FILE), SAMPLE_BUILD_CONFIG).unwrap();

        let (config, warnings) = load_build_config(dir.path()).unwrap();
        assert!(warnings.is_empty());

        let release = config.android_profile("release").unwrap();
        assert_eq!(release.workflow, Workflow::Generic);
        assert_eq!(release.gradle_command.as_deref(), Some(":app:assembleRelease"));

        let store = config.android_profile("store").unwrap();
        assert_eq!(store.workflow, Workflow::Managed);
        assert!(store.gradle_command.is_none());

        assert_eq!(
            config.ios_profile("release").unwrap().scheme.as_deref(),
            Some("App")
        );
    }

    #[test]
    fn unknown_keys_become_warnings_with_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(BUILD_CONFIG_FILE),
            r#"{
              "builds": {
                "android": {
                  "release": { "workflow": "generic", "gradleCmd": "oops" }
                }
              }
            }"#,
        )
        .unwrap();

        let (_, warnings) = load_build_config(dir.path()).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "builds.android.release.gradleCmd");
    }

    #[test]
    fn missing_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BUILD_CONFIG_FILE), SAMPLE_BUILD_CONFIG).unwrap();

        let (config, _) = load_build_config(dir.path()).unwrap();
        let err = config.android_profile("nightly").unwrap_err();
        assert!(err.to_string().contains("nightly"));
    }

    #[test]
    fn missing_manifest_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path()).unwrap_err();
        assert!(err.to_string().contains(APP_MANIFEST_FILE));
    }

    #[test]
    fn manifest_parses_platform_sections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(APP_MANIFEST_FILE),
            r#"{
              "name": "My App",
              "slug": "my-app",
              "ios": { "bundleIdentifier": "com.example.myapp" },
              "android": { "package": "com.example.myapp" }
            }"#,
        )
        .unwrap();

        let (manifest, warnings) = load_manifest(dir.path()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(
            manifest.ios.unwrap().bundle_identifier.as_deref(),
            Some("com.example.myapp")
        );
        assert_eq!(
            manifest.android.unwrap().package.as_deref(),
            Some("com.example.myapp")
        );
    }
}
