//! Show the local profile and session.

use anyhow::Result;
use std::path::Path;

use crate::config::{Profile, Session};

/// Run the status command.
pub async fn run(data_dir: &Path) -> Result<()> {
    println!("=== sheet-cli status ===");
    println!();

    let profile = match Profile::load(data_dir).await {
        Ok(profile) => profile,
        Err(_) => {
            println!("Profile: NOT INITIALIZED");
            println!();
            println!("Run 'sheet-cli init --access-key <key>' to initialize.");
            return Ok(());
        }
    };

    println!("Profile:");
    println!("  Access key: {:?}", profile.access_key);
    println!("  API:        {}", profile.base_url);
    println!("  Realtime:   {}", profile.realtime_url);
    if let Some(user_id) = &profile.user_id {
        println!("  User id:    {}", user_id);
    }
    println!();

    match Session::load(data_dir).await? {
        Some(session) if session.base_url == profile.base_url => {
            println!("Session: stored for {}", session.base_url);
        }
        Some(session) => {
            println!(
                "Session: stored for {} (profile uses {})",
                session.base_url, profile.base_url
            );
        }
        None => {
            println!("Session: NONE");
            println!();
            println!("Run 'sheet-cli login <username>' to log in.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn status_without_profile_succeeds() {
        let dir = tempdir().unwrap();
        run(dir.path()).await.unwrap();
    }

    #[tokio::test]
    async fn status_with_profile_and_session_succeeds() {
        let dir = tempdir().unwrap();
        Profile::new("ak").save(dir.path()).await.unwrap();
        Session::new("https://api.gshell.cloud", "sid=1")
            .save(dir.path())
            .await
            .unwrap();
        run(dir.path()).await.unwrap();
    }
}
