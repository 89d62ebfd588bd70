//! Login and account registration against the backend.
//!
//! Both endpoints take `application/x-www-form-urlencoded` bodies and
//! need no bearer token.

use serde::Deserialize;
use tracing::{debug, info};

use super::SessionStore;
use crate::error::{ApiError, ApiResult};
use crate::gateway::{encode_pairs, error_detail};
use crate::traits::{Headers, HttpClient};

/// Response from `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A valid session already existed; no request was sent.
    AlreadySignedIn,
    SignedIn,
}

pub struct AuthClient<C> {
    base_url: String,
    http: C,
}

impl<C: HttpClient> AuthClient<C> {
    pub fn new(base_url: impl Into<String>, http: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn form_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers
    }

    /// Exchange credentials for an access token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ApiError::InvalidInput(
                "Please enter both email and password.".to_string(),
            ));
        }

        let url = format!("{}/login", self.base_url);
        let body = encode_pairs(&[("username", username.trim()), ("password", password)]);
        debug!("POST {}", url);

        let response = self.http.post(&url, &body, &Self::form_headers()).await?;
        if !response.is_success() {
            return Err(ApiError::Server {
                status: response.status,
                detail: error_detail(&response, "Login failed"),
            });
        }

        match response.json::<TokenResponse>() {
            Ok(token) if !token.access_token.trim().is_empty() => Ok(token.access_token),
            Ok(_) => Err(ApiError::InvalidResponse("Login failed".to_string())),
            Err(e) => {
                debug!("Unreadable login response: {}", e);
                Err(ApiError::InvalidResponse("Login failed".to_string()))
            }
        }
    }

    /// Create an account. A 409 means the email is already registered.
    pub async fn register(&self, email: &str, password: &str, confirm: &str) -> ApiResult<()> {
        if email.trim().is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(ApiError::InvalidInput("Please fill in all fields.".to_string()));
        }
        if password != confirm {
            return Err(ApiError::InvalidInput("Passwords do not match.".to_string()));
        }

        let url = format!("{}/register", self.base_url);
        let body = encode_pairs(&[("email", email.trim()), ("password", password)]);
        debug!("POST {}", url);

        let response = self.http.post(&url, &body, &Self::form_headers()).await?;
        if !response.is_success() {
            return Err(ApiError::Server {
                status: response.status,
                detail: error_detail(&response, "Signup failed"),
            });
        }
        info!("Registered account {}", email.trim());
        Ok(())
    }

    /// Log in and adopt the returned token, unless a session is already
    /// active.
    pub async fn login_into(
        &self,
        session: &SessionStore,
        username: &str,
        password: &str,
    ) -> ApiResult<LoginOutcome> {
        if session.has_token() {
            return Ok(LoginOutcome::AlreadySignedIn);
        }
        let token = self.login(username, password).await?;
        session.set_token(&token)?;
        info!("Signed in as {}", username.trim());
        Ok(LoginOutcome::SignedIn)
    }
}
