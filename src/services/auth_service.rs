//! Authentication service - accounts, credentials and sessions.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MIN_USERNAME_LENGTH;
use crate::domain::{Password, SessionUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{SessionStore, UnitOfWork};

/// A freshly opened session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: SessionUser,
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a seller account and log it in
    async fn register(&self, username: String, password: String) -> AppResult<AuthSession>;

    /// Check credentials and open a session
    async fn login(&self, username: String, password: String) -> AppResult<AuthSession>;

    /// End the session behind `token`
    async fn logout(&self, token: &str) -> AppResult<()>;

    /// User behind a live session token, if both still exist
    async fn resolve_session(&self, token: &str) -> AppResult<Option<User>>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    sessions: Arc<dyn SessionStore>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { uow, sessions }
    }

    async fn open_session(&self, user: &User) -> AppResult<AuthSession> {
        let token = self.sessions.create(user.id).await?;
        Ok(AuthSession {
            user: SessionUser::from(user),
            token,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, username: String, password: String) -> AppResult<AuthSession> {
        let username = username.trim().to_string();
        if username.chars().count() < MIN_USERNAME_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Username must be at least {} characters",
                MIN_USERNAME_LENGTH
            )));
        }

        if self.uow.users().find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("Username"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self.uow.users().create(username, password_hash).await?;
        tracing::info!(user_id = user.id, "Registered new seller");

        self.open_session(&user).await
    }

    async fn login(&self, username: String, password: String) -> AppResult<AuthSession> {
        let user = self.uow.users().find_by_username(username.trim()).await?;

        // Unknown usernames still pay for a hash verification
        let user = match user {
            Some(user) if Password::from_hash(user.password_hash.clone()).verify(&password) => user,
            Some(_) => return Err(AppError::InvalidCredentials),
            None => {
                Password::verify_dummy(&password);
                return Err(AppError::InvalidCredentials);
            }
        };

        self.open_session(&user).await
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        self.sessions.revoke(token).await
    }

    async fn resolve_session(&self, token: &str) -> AppResult<Option<User>> {
        let Some(user_id) = self.sessions.resolve(token).await? else {
            return Ok(None);
        };

        let user = self.uow.users().find_by_id(user_id).await?;
        if user.is_none() {
            tracing::debug!(user_id, "Session references unknown user");
        }
        Ok(user)
    }
}
