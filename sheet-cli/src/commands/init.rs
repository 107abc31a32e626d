//! Initialize the local profile.

use anyhow::Result;
use std::path::Path;

use crate::config::{set_dir_permissions_0700, Profile};

/// Options for `init`.
#[derive(Debug, Default)]
pub struct InitOptions<'a> {
    /// Access key for every call.
    pub access_key: &'a str,
    /// REST base URL override.
    pub base_url: Option<&'a str>,
    /// Realtime URL override.
    pub realtime_url: Option<&'a str>,
    /// User id for the realtime auth payload.
    pub user_id: Option<&'a str>,
    /// Overwrite an existing profile.
    pub force: bool,
}

/// Run the init command.
pub async fn run(data_dir: &Path, options: InitOptions<'_>) -> Result<Profile> {
    if options.access_key.trim().is_empty() {
        anyhow::bail!("Access key must not be empty.");
    }

    // Check if already initialized
    if Profile::exists(data_dir).await && !options.force {
        anyhow::bail!(
            "Profile already initialized. Use --force or delete {} to reinitialize.",
            data_dir.join("profile.json").display()
        );
    }

    let mut profile = Profile::new(options.access_key);
    if let Some(url) = options.base_url {
        profile.base_url = url.to_string();
    }
    if let Some(url) = options.realtime_url {
        profile.realtime_url = url.to_string();
    }
    profile.user_id = options.user_id.map(str::to_string);

    set_dir_permissions_0700(data_dir).await?;
    profile.save(data_dir).await?;

    println!("Profile initialized.");
    println!();
    println!("  API:      {}", profile.base_url);
    println!("  Realtime: {}", profile.realtime_url);
    println!("  Data dir: {}", data_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Create an account: sheet-cli register '{{\"username\":\"...\"}}'");
    println!("  2. Or log in:         sheet-cli login <username>");

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn init_creates_profile() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            access_key: "ak_test",
            user_id: Some("u-1"),
            ..InitOptions::default()
        };
        run(dir.path(), options).await.unwrap();

        let profile = Profile::load(dir.path()).await.unwrap();
        assert_eq!(profile.access_key.as_str(), "ak_test");
        assert_eq!(profile.user_id.as_deref(), Some("u-1"));
        assert_eq!(profile.base_url, "https://api.gshell.cloud");
    }

    #[tokio::test]
    async fn init_applies_url_overrides() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            access_key: "ak",
            base_url: Some("http://localhost:8080"),
            realtime_url: Some("http://localhost:3000"),
            ..InitOptions::default()
        };
        let profile = run(dir.path(), options).await.unwrap();
        assert_eq!(profile.base_url, "http://localhost:8080");
        assert_eq!(profile.realtime_url, "http://localhost:3000");
    }

    #[tokio::test]
    async fn init_fails_if_already_initialized() {
        let dir = tempdir().unwrap();
        let first = InitOptions {
            access_key: "one",
            ..InitOptions::default()
        };
        run(dir.path(), first).await.unwrap();

        let second = InitOptions {
            access_key: "two",
            ..InitOptions::default()
        };
        assert!(run(dir.path(), second).await.is_err());

        let forced = InitOptions {
            access_key: "two",
            force: true,
            ..InitOptions::default()
        };
        let profile = run(dir.path(), forced).await.unwrap();
        assert_eq!(profile.access_key.as_str(), "two");
    }

    #[tokio::test]
    async fn init_rejects_blank_key() {
        let dir = tempdir().unwrap();
        let options = InitOptions {
            access_key: " ",
            ..InitOptions::default()
        };
        assert!(run(dir.path(), options).await.is_err());
        assert!(!Profile::exists(dir.path()).await);
    }
}
