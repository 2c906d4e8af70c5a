//! API key resolution
//!
//! The key never lives in `config.toml`. It comes from `OPENAI_API_KEY` or,
//! failing that, from `~/.config/critic/secrets.toml`:
//!
//! ```toml
//! [openai]
//! api_key = "sk-..."
//! ```
//!
//! The file is only opened when the environment has no key, and it is refused
//! unless only its owner can read it.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Environment variable holding the analysis API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const TEMPLATE: &str = r#"# critic secrets: keep out of version control, chmod 600
#
# OPENAI_API_KEY in the environment takes precedence over this file.

[openai]
api_key = ""
"#;

/// Where a resolved key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// The `OPENAI_API_KEY` variable
    Environment,
    /// A secrets file at this path
    SecretsFile(PathBuf),
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Environment => write!(f, "{} environment variable", API_KEY_ENV),
            KeySource::SecretsFile(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A non-empty API key and its origin
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    source: KeySource,
}

impl ApiKey {
    /// The key itself
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Where the key was found
    pub fn source(&self) -> &KeySource {
        &self.source
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"[redacted]")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeyFile {
    openai: OpenAiSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenAiSection {
    api_key: Option<String>,
}

/// `~/.config/critic/secrets.toml` on Linux
pub fn default_secrets_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("critic").join("secrets.toml"))
}

/// Resolve the analysis key from the environment, then the default file
pub fn resolve_api_key() -> Result<Option<ApiKey>> {
    resolve_api_key_from(
        std::env::var(API_KEY_ENV).ok(),
        default_secrets_path().as_deref(),
    )
}

/// Resolve a key from an environment value and an optional secrets file
///
/// A usable environment value wins without touching the file, so a
/// misconfigured file cannot block a key supplied through the environment.
pub fn resolve_api_key_from(
    env_value: Option<String>,
    file: Option<&Path>,
) -> Result<Option<ApiKey>> {
    if let Some(value) = non_empty(env_value) {
        debug!("Using API key from {}", API_KEY_ENV);
        return Ok(Some(ApiKey {
            value,
            source: KeySource::Environment,
        }));
    }

    let Some(path) = file.filter(|p| p.exists()) else {
        return Ok(None);
    };

    let key = non_empty(read_key_file(path)?).map(|value| ApiKey {
        value,
        source: KeySource::SecretsFile(path.to_path_buf()),
    });
    if key.is_some() {
        debug!(path = %path.display(), "Using API key from secrets file");
    }
    Ok(key)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_key_file(path: &Path) -> Result<Option<String>> {
    ensure_owner_only(path)?;

    let contents = std::fs::read_to_string(path)?;
    let parsed: KeyFile = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("invalid secrets file {}: {}", path.display(), e)))?;
    Ok(parsed.openai.api_key)
}

#[cfg(unix)]
fn ensure_owner_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)?.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        return Err(Error::Config(format!(
            "secrets file {} is readable by others (mode {:o}); run `chmod 600 {}`",
            path.display(),
            mode,
            path.display()
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_owner_only(_path: &Path) -> Result<()> {
    Ok(())
}

/// Write an empty secrets file at the default location
pub fn create_template() -> Result<PathBuf> {
    let path = default_secrets_path()
        .ok_or_else(|| Error::Config("could not determine the config directory".to_string()))?;
    create_template_at(&path)?;
    Ok(path)
}

/// Write an empty secrets file at `path` with owner-only permissions
///
/// An existing file is never overwritten.
pub fn create_template_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::Config(format!(
            "secrets file already exists at {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, TEMPLATE)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    warn!(path = %path.display(), "Created secrets template; add your API key to it");
    Ok(())
}
