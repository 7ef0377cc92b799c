//! gcloud defaults
//!
//! Finds the project gcloud would use when none is given explicitly.

use std::path::{Path, PathBuf};

/// Environment variables that name the active project, in priority order
const PROJECT_ENV_VARS: &[&str] = &[
    "CLOUDSDK_CORE_PROJECT",
    "GOOGLE_CLOUD_PROJECT",
    "GCLOUD_PROJECT",
];

/// Get the gcloud configuration directory
pub fn get_gcloud_config_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CLOUDSDK_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // Default to ~/.config/gcloud on Linux/macOS
    dirs::config_dir().map(|p| p.join("gcloud"))
}

/// Validate a GCP project ID format
/// Project IDs must be 6-30 characters, lowercase letters, digits, and hyphens
/// Must start with a letter and cannot end with a hyphen
pub fn validate_project_id(project: &str) -> bool {
    if project.len() < 6 || project.len() > 30 {
        return false;
    }

    match project.chars().next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }

    if project.ends_with('-') {
        return false;
    }

    project
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Read the default project from the environment, then gcloud configuration
pub fn get_default_project() -> Option<String> {
    for var in PROJECT_ENV_VARS {
        if let Ok(project) = std::env::var(var) {
            if validate_project_id(&project) {
                return Some(project);
            }
            tracing::warn!("Invalid project ID format in {}", var);
        }
    }

    get_gcloud_config_dir().and_then(|dir| project_from_config_dir(&dir))
}

/// Look up `project` in the legacy `properties` file, then the active configuration
fn project_from_config_dir(config_dir: &Path) -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(config_dir.join("properties")) {
        if let Some(project) = find_core_project(&content, false) {
            return Some(project);
        }
    }

    let active_config = std::fs::read_to_string(config_dir.join("active_config")).ok()?;
    let config_name = active_config.trim();

    // Reject names that could escape the configurations directory
    if !config_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        tracing::warn!("Invalid characters in active_config name");
        return None;
    }

    let config_path = config_dir
        .join("configurations")
        .join(format!("config_{}", config_name));
    let content = std::fs::read_to_string(config_path).ok()?;
    find_core_project(&content, true)
}

/// Scan ini-style gcloud properties for a valid `project = ...` entry.
/// With `core_only`, only lines inside `[core]` count.
fn find_core_project(content: &str, core_only: bool) -> Option<String> {
    let mut in_core_section = !core_only;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            in_core_section = !core_only || line == "[core]";
            continue;
        }
        if !in_core_section {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "project" {
                let project = value.trim();
                if validate_project_id(project) {
                    return Some(project.to_string());
                }
            }
        }
    }
    None
}
