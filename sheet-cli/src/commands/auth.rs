//! Register, log in and log out.
//!
//! Login stores the session cookies in `session.json` so later invocations
//! act as the same user; logout removes them.

use anyhow::{Context, Result};
use serde_json::Value;
use sheet_client::{HttpTransport, SheetClient};
use sheet_core::{LoginUser, RegisterUser};
use sheet_types::AccessKey;
use std::path::Path;

use super::{connect, parse_row, print_json};
use crate::config::{Profile, Session};

/// Register a user from a JSON form.
pub async fn register<H: HttpTransport>(
    client: &SheetClient<H>,
    access_key: &AccessKey,
    form: &str,
    role: &str,
) -> Result<Value> {
    let request = RegisterUser::new(access_key.clone(), parse_row(form, "form")?).with_role(role);
    Ok(client.register_user(&request).await?)
}

/// Log in with a username and password.
pub async fn login<H: HttpTransport>(
    client: &SheetClient<H>,
    access_key: &AccessKey,
    username: &str,
    password: &str,
) -> Result<Value> {
    let request = LoginUser::new(access_key.clone(), username, password);
    Ok(client.login_user(&request).await?)
}

/// Run the register command.
pub async fn run_register(
    data_dir: &Path,
    base_url: Option<&str>,
    form: &str,
    role: &str,
) -> Result<()> {
    let (profile, client) = connect(data_dir, base_url).await?;
    let data = register(&client, &profile.access_key, form, role).await?;
    print_json(&data)
}

/// Run the login command. Prompts for the password when not given.
pub async fn run_login(
    data_dir: &Path,
    base_url: Option<&str>,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let (profile, client) = connect(data_dir, base_url).await?;
    let data = login(&client, &profile.access_key, username, &password).await?;

    let base_url = client.config().base_url.clone();
    match client.transport().session_cookies(&base_url) {
        Some(cookies) => Session::new(&base_url, &cookies).save(data_dir).await?,
        None => tracing::warn!("login succeeded but the server set no session cookie"),
    }

    print_json(&data)
}

/// Run the logout command.
pub async fn run_logout(data_dir: &Path, base_url: Option<&str>) -> Result<()> {
    let logged_out = if Profile::exists(data_dir).await {
        let (_, client) = connect(data_dir, base_url).await?;
        client.logout_user().await
    } else {
        false
    };
    Session::clear(data_dir).await?;

    if logged_out {
        println!("Logged out.");
    } else {
        println!("Server did not confirm logout; local session cleared.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheet_client::{ClientConfig, MockHttp};
    use sheet_core::CallBody;

    fn client() -> (SheetClient<MockHttp>, MockHttp) {
        let http = MockHttp::new();
        (SheetClient::new(ClientConfig::default(), http.clone()), http)
    }

    #[tokio::test]
    async fn register_sends_form_and_role() {
        let (client, http) = client();
        http.queue_json(json!({"success": true, "data": {"id": "u-1"}}));

        let data = register(
            &client,
            &AccessKey::new("ak"),
            r#"{"username":"ada"}"#,
            "vendor",
        )
        .await
        .unwrap();

        assert_eq!(data, json!({"id": "u-1"}));
        let request = http.last_request().unwrap();
        assert_eq!(
            request.body,
            CallBody::Json(json!({"role": "vendor", "row": {"username": "ada"}}))
        );
    }

    #[tokio::test]
    async fn register_rejects_bad_form_before_sending() {
        let (client, http) = client();
        let result = register(&client, &AccessKey::new("ak"), "not json", "customer").await;
        assert!(result.is_err());
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn login_surfaces_server_message() {
        let (client, http) = client();
        http.queue_json(json!({"success": false, "message": "Invalid credentials"}));

        let err = login(&client, &AccessKey::new("ak"), "ada", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn logout_without_profile_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        Session::new("https://api.gshell.cloud", "sid=1")
            .save(dir.path())
            .await
            .unwrap();

        run_logout(dir.path(), None).await.unwrap();

        assert_eq!(Session::load(dir.path()).await.unwrap(), None);
    }
}
