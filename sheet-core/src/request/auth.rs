//! Registration and session endpoints.

use serde_json::{json, Value};
use sheet_types::{AccessKey, Row};
use std::fmt;

use super::{ApiCall, ApiRequest, Method, Operation, DEFAULT_ROLE};
use crate::validate::{Required, ValidationError};

/// `POST /user-access/auth/register/{accessKey}`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterUser {
    /// Access key scope.
    pub access_key: AccessKey,
    /// The new user's row.
    pub form_data: Option<Row>,
    /// Role to register under (default `customer`).
    pub role: String,
}

impl RegisterUser {
    /// Register a user with the default role.
    pub fn new(access_key: impl Into<AccessKey>, form_data: Row) -> Self {
        Self {
            access_key: access_key.into(),
            form_data: Some(form_data),
            role: DEFAULT_ROLE.to_string(),
        }
    }

    /// Register under a different role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

impl Default for RegisterUser {
    fn default() -> Self {
        Self {
            access_key: AccessKey::default(),
            form_data: None,
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl ApiRequest for RegisterUser {
    fn operation(&self) -> Operation {
        Operation::RegisterUser
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Required::new()
            .key("accessKey", &self.access_key)
            .present("formData", self.form_data.is_some())
            .finish()
    }

    fn build(&self) -> ApiCall {
        let row = self.form_data.clone().map_or(Value::Null, Value::Object);
        ApiCall::new(
            Operation::RegisterUser,
            Method::Post,
            &["auth", "register", self.access_key.as_str()],
        )
        .json(json!({ "role": self.role, "row": row }))
    }
}

/// `POST /user-access/user-login/access/{accessKey}`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginUser {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Access key scope.
    pub access_key: AccessKey,
}

impl LoginUser {
    /// Log in with a username and password.
    pub fn new(
        access_key: impl Into<AccessKey>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            access_key: access_key.into(),
        }
    }
}

impl fmt::Debug for LoginUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginUser")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("access_key", &self.access_key)
            .finish()
    }
}

impl ApiRequest for LoginUser {
    fn operation(&self) -> Operation {
        Operation::LoginUser
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Required::new()
            .text("username", &self.username)
            .present("password", !self.password.is_empty())
            .key("accessKey", &self.access_key)
            .finish()
    }

    fn build(&self) -> ApiCall {
        ApiCall::new(
            Operation::LoginUser,
            Method::Post,
            &["user-login", "access", self.access_key.as_str()],
        )
        .json(json!({ "username": self.username, "password": self.password }))
    }
}

/// `POST /user-access/logout`. Takes no inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogoutUser;

impl ApiRequest for LogoutUser {
    fn operation(&self) -> Operation {
        Operation::LogoutUser
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn build(&self) -> ApiCall {
        ApiCall::new(Operation::LogoutUser, Method::Post, &["logout"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallBody;

    fn form() -> Row {
        let mut row = Row::new();
        row.insert("username".into(), json!("ada"));
        row.insert("email".into(), json!("ada@example.com"));
        row
    }

    #[test]
    fn register_defaults_role_to_customer() {
        let call = RegisterUser::new("ak1", form()).to_call().unwrap();

        assert_eq!(call.method, Method::Post);
        assert_eq!(call.path(), "/user-access/auth/register/ak1");
        assert_eq!(
            call.body,
            CallBody::Json(json!({
                "role": "customer",
                "row": {"username": "ada", "email": "ada@example.com"}
            }))
        );
    }

    #[test]
    fn register_with_custom_role() {
        let call = RegisterUser::new("ak1", form())
            .with_role("vendor")
            .to_call()
            .unwrap();
        let CallBody::Json(body) = call.body else {
            panic!("expected JSON body");
        };
        assert_eq!(body["role"], "vendor");
    }

    #[test]
    fn register_requires_key_and_form() {
        let err = RegisterUser::default().to_call().unwrap_err();
        assert_eq!(err.fields(), &["accessKey", "formData"]);

        let err = RegisterUser::new("", form()).to_call().unwrap_err();
        assert_eq!(err.fields(), &["accessKey"]);
    }

    #[test]
    fn login_builds_credentials_body() {
        let call = LoginUser::new("ak1", "ada", "pw").to_call().unwrap();
        assert_eq!(call.path(), "/user-access/user-login/access/ak1");
        assert_eq!(
            call.body,
            CallBody::Json(json!({"username": "ada", "password": "pw"}))
        );
    }

    #[test]
    fn login_requires_every_field() {
        let err = LoginUser::default().to_call().unwrap_err();
        assert_eq!(err.fields(), &["username", "password", "accessKey"]);

        let err = LoginUser::new("ak1", "ada", "").to_call().unwrap_err();
        assert_eq!(err.fields(), &["password"]);
    }

    #[test]
    fn login_debug_redacts_password() {
        let debug = format!("{:?}", LoginUser::new("ak1", "ada", "hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn logout_has_no_inputs() {
        let call = LogoutUser.to_call().unwrap();
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.path(), "/user-access/logout");
        assert_eq!(call.body, CallBody::Empty);
    }
}
