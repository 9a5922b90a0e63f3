//! Auth/IAM service port and its HTTP implementation.
//!
//! # Endpoints
//!
//! - `POST {auth}/public/api/v1/auth` - `{username, password}`
//! - `POST {auth}/public/api/v1/auth/refresh` - `{username, refreshToken}`
//!
//! Both answer `201 Created` with `{accessToken, refreshToken, expiresIn,
//! refreshExpiresIn?}` on success (lifetimes in milliseconds).

use std::future::Future;

use dine_core::Username;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::AuthError;
use dine_core::http::endpoint;

use crate::config::AdminConfig;

const LOGIN_PATH: &str = "public/api/v1/auth";
const REFRESH_PATH: &str = "public/api/v1/auth/refresh";

/// Tokens issued by a successful login or refresh.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: SecretString,
    /// Absent when the service keeps the previous refresh token valid.
    pub refresh_token: Option<SecretString>,
    /// Access-token lifetime in milliseconds.
    pub expires_in_ms: Option<i64>,
    /// Refresh-token lifetime in milliseconds.
    pub refresh_expires_in_ms: Option<i64>,
}

/// Port to the auth service.
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for tokens.
    fn login(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> impl Future<Output = Result<TokenGrant, AuthError>> + Send;

    /// Exchange a refresh token for new tokens.
    fn refresh(
        &self,
        username: &str,
        refresh_token: &SecretString,
    ) -> impl Future<Output = Result<TokenGrant, AuthError>> + Send;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    username: &'a str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_expires_in: Option<i64>,
}

/// [`AuthApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    auth_url: Url,
}

impl HttpAuthApi {
    #[must_use]
    pub const fn new(client: reqwest::Client, auth_url: Url) -> Self {
        Self { client, auth_url }
    }

    /// Build from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AdminConfig) -> Result<Self, AuthError> {
        Ok(Self::new(config.http_client()?, config.auth_url.clone()))
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        bad_credentials: &[StatusCode],
    ) -> Result<TokenGrant, AuthError> {
        let response = self
            .client
            .post(endpoint(&self.auth_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        grant_from_response(status, &text, bad_credentials)
    }
}

impl AuthApi for HttpAuthApi {
    #[instrument(skip(self, password), fields(username = %username))]
    async fn login(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<TokenGrant, AuthError> {
        self.post(
            LOGIN_PATH,
            &LoginRequest {
                username: username.as_str(),
                password: password.expose_secret(),
            },
            &[
                StatusCode::BAD_REQUEST,
                StatusCode::UNAUTHORIZED,
                StatusCode::FORBIDDEN,
            ],
        )
        .await
    }

    #[instrument(skip(self, refresh_token), fields(username = %username))]
    async fn refresh(
        &self,
        username: &str,
        refresh_token: &SecretString,
    ) -> Result<TokenGrant, AuthError> {
        self.post(
            REFRESH_PATH,
            &RefreshRequest {
                username,
                refresh_token: refresh_token.expose_secret(),
            },
            &[StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN],
        )
        .await
    }
}

/// Only `201 Created` carrying an access token is a grant.
fn grant_from_response(
    status: StatusCode,
    body: &str,
    bad_credentials: &[StatusCode],
) -> Result<TokenGrant, AuthError> {
    if status != StatusCode::CREATED {
        if bad_credentials.contains(&status) {
            return Err(AuthError::InvalidCredentials);
        }
        tracing::error!(status = %status, "Auth service rejected the request");
        return Err(AuthError::Rejected {
            status: status.as_u16(),
        });
    }

    let response: TokenResponse = serde_json::from_str(body)?;
    let Some(access_token) = response.access_token.filter(|t| !t.is_empty()) else {
        tracing::error!("Auth service answered 201 without an access token");
        return Err(AuthError::Rejected {
            status: status.as_u16(),
        });
    };

    Ok(TokenGrant {
        access_token: SecretString::from(access_token),
        refresh_token: response
            .refresh_token
            .filter(|t| !t.is_empty())
            .map(SecretString::from),
        expires_in_ms: response.expires_in,
        refresh_expires_in_ms: response.refresh_expires_in,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LOGIN_BAD: &[StatusCode] = &[
        StatusCode::BAD_REQUEST,
        StatusCode::UNAUTHORIZED,
        StatusCode::FORBIDDEN,
    ];

    #[test]
    fn test_created_with_token_is_grant() {
        let grant = grant_from_response(
            StatusCode::CREATED,
            r#"{"accessToken":"a.b.c","refreshToken":"r","expiresIn":3600000}"#,
            LOGIN_BAD,
        )
        .unwrap();
        assert_eq!(grant.access_token.expose_secret(), "a.b.c");
        assert_eq!(grant.refresh_token.unwrap().expose_secret(), "r");
        assert_eq!(grant.expires_in_ms, Some(3_600_000));
        assert_eq!(grant.refresh_expires_in_ms, None);
    }

    #[test]
    fn test_ok_is_not_created() {
        let err = grant_from_response(StatusCode::OK, r#"{"accessToken":"a"}"#, LOGIN_BAD)
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected { status: 200 }));
    }

    #[test]
    fn test_created_without_token_is_rejected() {
        let err = grant_from_response(StatusCode::CREATED, "{}", LOGIN_BAD).unwrap_err();
        assert!(matches!(err, AuthError::Rejected { status: 201 }));
    }

    #[test]
    fn test_credential_statuses() {
        for status in LOGIN_BAD {
            let err = grant_from_response(*status, "", LOGIN_BAD).unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
        let err = grant_from_response(StatusCode::BAD_GATEWAY, "", LOGIN_BAD).unwrap_err();
        assert!(matches!(err, AuthError::Rejected { status: 502 }));
    }

    #[test]
    fn test_created_with_garbage_body() {
        let err = grant_from_response(StatusCode::CREATED, "<html>", LOGIN_BAD).unwrap_err();
        assert!(matches!(err, AuthError::Parse(_)));
    }
}
