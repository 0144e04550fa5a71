//! Xcode scheme discovery and selection
//!
//! Generic iOS builds need a scheme. Shared schemes live as
//! `*.xcscheme` files under each project/workspace container; the
//! resolver auto-selects when unambiguous and prompts otherwise.

use std::path::Path;

use crate::error::{AirliftError, AirliftResult};
use crate::prompt::Prompter;

/// Substring marking tvOS scheme variants, skipped by the
/// non-interactive pick.
const TVOS_MARKER: &str = "tvOS";

/// All shared scheme names declared under `<project>/ios`.
pub fn discover_schemes(project_dir: &Path) -> AirliftResult<Vec<String>> {
    let ios_dir = project_dir.join("ios");
    let mut schemes = Vec::new();

    let containers = match std::fs::read_dir(&ios_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(schemes),
        Err(err) => return Err(err.into()),
    };

    for entry in containers {
        let path = entry?.path();
        let is_container = path
            .extension()
            .is_some_and(|ext| ext == "xcodeproj" || ext == "xcworkspace");
        if !is_container {
            continue;
        }

        let shared = path.join("xcshareddata").join("xcschemes");
        if !shared.is_dir() {
            continue;
        }
        for scheme in std::fs::read_dir(&shared)? {
            let scheme = scheme?.path();
            if scheme.extension().is_some_and(|ext| ext == "xcscheme") {
                if let Some(stem) = scheme.file_stem().and_then(|stem| stem.to_str()) {
                    schemes.push(stem.to_string());
                }
            }
        }
    }

    schemes.sort();
    schemes.dedup();
    Ok(schemes)
}

/// Pick the scheme a generic iOS build should use.
///
/// One candidate is returned without a prompt. With several, the user
/// chooses from the sorted list; non-interactive runs take the first
/// candidate that is not a tvOS variant. No candidates at all is an
/// error: the service cannot guess a scheme name.
pub fn resolve_scheme(
    prompter: &mut dyn Prompter,
    project_dir: &Path,
    interactive: bool,
) -> AirliftResult<String> {
    let schemes = discover_schemes(project_dir)?;
    select_scheme(prompter, schemes, interactive, project_dir)
}

fn select_scheme(
    prompter: &mut dyn Prompter,
    mut schemes: Vec<String>,
    interactive: bool,
    project_dir: &Path,
) -> AirliftResult<String> {
    schemes.sort();
    match schemes.len() {
        0 => Err(AirliftError::NoSchemes {
            path: project_dir.join("ios"),
        }),
        1 => Ok(schemes.remove(0)),
        _ if !interactive => schemes
            .iter()
            .find(|scheme| !scheme.contains(TVOS_MARKER))
            .or_else(|| schemes.first())
            .cloned()
            .ok_or_else(|| AirliftError::Internal("scheme candidates vanished".to_string())),
        _ => {
            let index = prompter.select("Select the Xcode scheme to build", &schemes)?;
            schemes
                .get(index)
                .cloned()
                .ok_or_else(|| AirliftError::Internal("scheme selection out of range".to_string()))
        }
    }
}
