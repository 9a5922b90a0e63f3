//! Token lifecycle.
//!
//! A [`SessionManager`] is either signed out or holds an [`AuthSession`].
//! Every change is written through to the [`SessionStore`] and published on
//! a watch channel, so a UI can react to a forced logout.
//!
//! Expiry is only evaluated when asked; nothing runs on a timer.

use dine_core::{StaffRole, Username};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use super::AuthError;
use super::api::{AuthApi, TokenGrant};
use super::claims::{self, Claims};
use super::clock::Clock;
use super::store::{SessionStore, StoreError, keys};

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    SignedOut,
    /// Signed in with a valid access token.
    Active,
    /// Signed in, access token past its expiry; the next use refreshes.
    Expired,
}

impl SessionStatus {
    #[must_use]
    pub const fn is_signed_in(self) -> bool {
        !matches!(self, Self::SignedOut)
    }
}

/// A signed-in staff session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    username: Option<String>,
    access_expires_at_ms: i64,
    refresh_expires_at_ms: Option<i64>,
    claims: Claims,
}

impl AuthSession {
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    #[must_use]
    pub const fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Access-token expiry, Unix milliseconds.
    #[must_use]
    pub const fn access_expires_at_ms(&self) -> i64 {
        self.access_expires_at_ms
    }

    /// Refresh-token expiry, Unix milliseconds, when known.
    #[must_use]
    pub const fn refresh_expires_at_ms(&self) -> Option<i64> {
        self.refresh_expires_at_ms
    }

    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }

    #[must_use]
    pub fn role(&self) -> Option<StaffRole> {
        self.claims.staff_role()
    }

    const fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.access_expires_at_ms
    }
}

/// Credentials for one authenticated request.
#[derive(Debug, Clone)]
pub struct Bearer {
    pub token: SecretString,
    pub role: Option<StaffRole>,
    pub username: Option<String>,
}

impl Bearer {
    /// Value for the `Authorization` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == Some(StaffRole::SuperAdmin)
    }
}

impl From<&AuthSession> for Bearer {
    fn from(session: &AuthSession) -> Self {
        Self {
            token: session.access_token.clone(),
            role: session.role(),
            username: session.username.clone(),
        }
    }
}

/// Owns the staff session and its persistence.
///
/// Operations take `&mut self`, so a login and a refresh can never overlap.
pub struct SessionManager<A, S, C> {
    api: A,
    store: S,
    clock: C,
    session: Option<AuthSession>,
    status_tx: watch::Sender<SessionStatus>,
}

impl<A: AuthApi, S: SessionStore, C: Clock> SessionManager<A, S, C> {
    /// Build a manager from whatever session the store holds.
    ///
    /// A persisted access token whose `exp` has passed, or that cannot be
    /// decoded, is refreshed before this returns. A failed refresh leaves the
    /// manager signed out.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store cannot be read.
    #[instrument(skip_all)]
    pub async fn restore(api: A, store: S, clock: C) -> Result<Self, AuthError> {
        let (status_tx, _) = watch::channel(SessionStatus::SignedOut);
        let mut manager = Self {
            api,
            store,
            clock,
            session: None,
            status_tx,
        };

        let Some(token) = manager.store.get(keys::TOKEN)? else {
            return Ok(manager);
        };

        let decoded = claims::decode(&token);
        match decoded {
            Ok(claims) if !claims.is_expired_at(manager.clock.now_ms()) => {
                let session = manager.load_session(token, claims)?;
                manager.session = Some(session);
                manager.publish();
                info!("Restored persisted session");
            }
            Ok(_) => {
                info!("Persisted access token has expired, refreshing");
                if let Err(e) = manager.refresh().await {
                    warn!(error = %e, "Could not restore session");
                }
            }
            Err(e) => {
                warn!(error = %e, "Persisted access token cannot be decoded, refreshing");
                if let Err(e) = manager.refresh().await {
                    warn!(error = %e, "Could not restore session");
                }
            }
        }

        Ok(manager)
    }

    /// Sign in with a username and password.
    ///
    /// Empty credentials are rejected before any request. On failure the
    /// current state is left as it was.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`AuthError::InvalidCredentials`], or the
    /// transport/storage error that stopped the login.
    #[instrument(skip(self, password))]
    pub async fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError> {
        let username = Username::parse(username)?;
        if password.expose_secret().is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let grant = self.api.login(&username, password).await?;
        let session = self.establish(grant, username.into_inner(), None)?;
        info!(role = ?session.role(), "Signed in");
        Ok(session)
    }

    /// Exchange the stored refresh token for new tokens.
    ///
    /// Any failure signs the manager out. A refresh token known to have
    /// expired is not sent.
    ///
    /// # Errors
    ///
    /// Returns why the refresh failed; the manager is signed out by then.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<AuthSession, AuthError> {
        match self.try_refresh().await {
            Ok(session) => {
                info!("Session refreshed");
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed, signing out");
                self.logout();
                Err(e)
            }
        }
    }

    async fn try_refresh(&mut self) -> Result<AuthSession, AuthError> {
        let username = self
            .store
            .get(keys::USERNAME)?
            .filter(|u| !u.trim().is_empty());
        let refresh_token = self
            .store
            .get(keys::REFRESH_TOKEN)?
            .filter(|t| !t.is_empty());
        let (Some(username), Some(refresh_token)) = (username, refresh_token) else {
            return Err(AuthError::MissingRefreshToken);
        };

        let refresh_expires_at_ms = parse_ms(self.store.get(keys::REFRESH_EXPIRES_AT)?);
        if refresh_expires_at_ms.is_some_and(|at| self.clock.now_ms() > at) {
            return Err(AuthError::RefreshExpired);
        }

        let refresh_token = SecretString::from(refresh_token);
        let grant = self.api.refresh(&username, &refresh_token).await?;
        self.establish(grant, username, Some((refresh_token, refresh_expires_at_ms)))
    }

    /// Whether the access token has expired. Signed out counts as expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.session
            .as_ref()
            .is_none_or(|s| s.is_expired_at(self.clock.now_ms()))
    }

    /// Forget the session. Storage failures are logged, never returned.
    pub fn logout(&mut self) {
        for key in keys::ALL {
            if let Err(e) = self.store.remove(key) {
                warn!(key, error = %e, "Failed to clear stored session key");
            }
        }

        if self.session.take().is_some() {
            info!("Signed out");
        }
        self.publish();
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match &self.session {
            None => SessionStatus::SignedOut,
            Some(s) if s.is_expired_at(self.clock.now_ms()) => SessionStatus::Expired,
            Some(_) => SessionStatus::Active,
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Receive status changes caused by login, refresh and logout.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// Credentials for a request, refreshing first if the token has expired.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SignedOut`] when there is no session, or the
    /// refresh error (the manager is then signed out).
    pub async fn bearer(&mut self) -> Result<Bearer, AuthError> {
        if self.session.is_none() {
            return Err(AuthError::SignedOut);
        }
        if self.is_expired() {
            self.refresh().await?;
        }

        self.session
            .as_ref()
            .map(Bearer::from)
            .ok_or(AuthError::SignedOut)
    }

    fn load_session(&self, token: String, claims: Claims) -> Result<AuthSession, StoreError> {
        let refresh_token = self
            .store
            .get(keys::REFRESH_TOKEN)?
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        Ok(AuthSession {
            access_token: SecretString::from(token),
            refresh_token,
            username: self.store.get(keys::USERNAME)?,
            access_expires_at_ms: parse_ms(self.store.get(keys::EXPIRES_AT)?)
                .unwrap_or_else(|| claims.expires_at_ms()),
            refresh_expires_at_ms: parse_ms(self.store.get(keys::REFRESH_EXPIRES_AT)?),
            claims,
        })
    }

    /// Install a grant as the current session and persist it.
    ///
    /// `previous_refresh` is kept when the grant carries no refresh token.
    fn establish(
        &mut self,
        grant: TokenGrant,
        username: String,
        previous_refresh: Option<(SecretString, Option<i64>)>,
    ) -> Result<AuthSession, AuthError> {
        let claims = claims::decode(grant.access_token.expose_secret())?;
        let now = self.clock.now_ms();

        let access_expires_at_ms = grant
            .expires_in_ms
            .map_or_else(|| claims.expires_at_ms(), |ms| now.saturating_add(ms));
        let granted_refresh_expiry = grant.refresh_expires_in_ms.map(|ms| now.saturating_add(ms));

        let (refresh_token, refresh_expires_at_ms) = match (grant.refresh_token, previous_refresh) {
            (Some(token), _) => {
                let expires_at = granted_refresh_expiry.or_else(|| {
                    claims::decode(token.expose_secret())
                        .ok()
                        .map(|c| c.expires_at_ms())
                });
                (Some(token), expires_at)
            }
            (None, Some((token, expires_at))) => (Some(token), granted_refresh_expiry.or(expires_at)),
            (None, None) => (None, None),
        };

        let session = AuthSession {
            access_token: grant.access_token,
            refresh_token,
            username: Some(username),
            access_expires_at_ms,
            refresh_expires_at_ms,
            claims,
        };

        if let Err(e) = self.persist(&session) {
            self.logout();
            return Err(e.into());
        }

        self.session = Some(session.clone());
        self.publish();
        Ok(session)
    }

    fn persist(&self, session: &AuthSession) -> Result<(), StoreError> {
        self.store
            .set(keys::TOKEN, session.access_token.expose_secret())?;
        self.set_or_remove(
            keys::REFRESH_TOKEN,
            session.refresh_token.as_ref().map(ExposeSecret::expose_secret),
        )?;
        self.set_or_remove(keys::USERNAME, session.username.as_deref())?;
        self.store
            .set(keys::EXPIRES_AT, &session.access_expires_at_ms.to_string())?;
        self.set_or_remove(
            keys::REFRESH_EXPIRES_AT,
            session
                .refresh_expires_at_ms
                .map(|at| at.to_string())
                .as_deref(),
        )
    }

    fn set_or_remove(&self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        match value {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        }
    }

    fn publish(&self) {
        self.status_tx.send_replace(self.status());
    }
}

fn parse_ms(value: Option<String>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}
