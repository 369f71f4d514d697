use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use url::Url;

use crate::{error::ClientError, session::AdjustmentFailurePolicy};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const SETTINGS_FILE_NAME: &str = "minuta.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub adjustment_failure_policy: AdjustmentFailurePolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            adjustment_failure_policy: AdjustmentFailurePolicy::default(),
        }
    }
}

/// Defaults, then the settings file, then environment variables. An explicit
/// `config_path` must exist; the implicit locations are optional.
pub fn load_settings(config_path: Option<&Path>) -> Result<ClientSettings, ClientError> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    config_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, ClientError> {
    let mut settings = ClientSettings::default();

    let file = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_settings_path(),
    };
    if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(raw) => apply_file_settings(&mut settings, &path, &raw)?,
            Err(source) if config_path.is_some() => {
                return Err(ClientError::FileAccess { path, source });
            }
            Err(_) => {}
        }
    }

    apply_env_overrides(&mut settings, lookup)?;
    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    Ok(settings)
}

fn default_settings_path() -> Option<PathBuf> {
    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join("minuta").join(SETTINGS_FILE_NAME))
}

fn apply_file_settings(
    settings: &mut ClientSettings,
    path: &Path,
    raw: &str,
) -> Result<(), ClientError> {
    let file_cfg =
        toml::from_str::<HashMap<String, String>>(raw).map_err(|err| ClientError::SettingsFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    if let Some(v) = file_cfg.get("api_base_url") {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("adjustment_failure_policy") {
        settings.adjustment_failure_policy = v.parse()?;
    }
    Ok(())
}

fn apply_env_overrides(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ClientError> {
    if let Some(v) = lookup("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__ADJUSTMENT_FAILURE_POLICY") {
        settings.adjustment_failure_policy = v.parse()?;
    }
    Ok(())
}

/// Trims whitespace and trailing slashes; requires an http(s) URL with a host.
pub fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(trimmed.to_string())
}
