//! Configuration management for sheet-cli.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sheet_client::{DEFAULT_BASE_URL, DEFAULT_REALTIME_URL};
use sheet_types::AccessKey;
use std::path::Path;

const PROFILE_FILE: &str = "profile.json";
const SESSION_FILE: &str = "session.json";

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Which backend to talk to, and as whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Access key scoping every call.
    pub access_key: AccessKey,
    /// REST base URL.
    pub base_url: String,
    /// Socket.IO URL.
    pub realtime_url: String,
    /// User id sent when opening the realtime channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// When the profile was written.
    pub created_at: u64,
}

impl Profile {
    /// Create a profile pointing at the default hosts.
    pub fn new(access_key: &str) -> Self {
        Self {
            access_key: AccessKey::new(access_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            realtime_url: DEFAULT_REALTIME_URL.to_string(),
            user_id: None,
            created_at: now_secs(),
        }
    }

    /// Load the profile from a directory.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(PROFILE_FILE);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .context("Profile not initialized. Run 'sheet-cli init' first.")?;
        serde_json::from_str(&contents).context("Invalid profile")
    }

    /// Save the profile to a directory.
    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        write_private(&data_dir.join(PROFILE_FILE), self)
            .await
            .context("Failed to save profile")
    }

    /// Check if a profile exists.
    pub async fn exists(data_dir: &Path) -> bool {
        data_dir.join(PROFILE_FILE).exists()
    }
}

/// Session cookies captured after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// URL the cookies belong to.
    pub base_url: String,
    /// `Cookie` header value.
    pub cookies: String,
    /// When the session was stored.
    pub saved_at: u64,
}

impl Session {
    /// Wrap cookies for `base_url`.
    pub fn new(base_url: &str, cookies: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            cookies: cookies.to_string(),
            saved_at: now_secs(),
        }
    }

    /// Load the stored session, if any.
    pub async fn load(data_dir: &Path) -> Result<Option<Self>> {
        let path = data_dir.join(SESSION_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let contents = tokio::fs::read_to_string(&path)
            .await
            .context("Failed to read session")?;
        let session = serde_json::from_str(&contents).context("Invalid session file")?;
        Ok(Some(session))
    }

    /// Save the session to a directory.
    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        write_private(&data_dir.join(SESSION_FILE), self)
            .await
            .context("Failed to save session")
    }

    /// Remove the stored session. Missing files are fine.
    pub async fn clear(data_dir: &Path) -> Result<()> {
        let path = data_dir.join(SESSION_FILE);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove session"),
        }
    }
}

async fn write_private<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, contents).await?;
    set_file_permissions_0600(path).await
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
async fn set_file_permissions_0600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .context("Failed to set file permissions")?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

/// Set directory permissions to 0700 (owner only) on Unix.
/// No-op on non-Unix platforms.
pub async fn set_dir_permissions_0700(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
            .await
            .context("Failed to set directory permissions")?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
