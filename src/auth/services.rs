use std::sync::Arc;

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::PublicUser,
    jwt::JwtKeys,
    password::{hash_password, verify_against_decoy, verify_password},
    repo::UserStore,
};
use crate::{
    error::{AppError, Result},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registers users and checks their credentials, handing out session tokens.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl FromRef<AppState> for CredentialStore {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), &state.keys)
    }
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserStore>, keys: &JwtKeys) -> Self {
        Self {
            users,
            keys: keys.clone(),
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<String> {
        let email = email.trim();
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email");
            return Err(AppError::Validation("Invalid email".into()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password must not be empty".into()));
        }

        if self.users.find_by_email(email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let plain = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_password(&plain))
            .await
            .map_err(AppError::internal)?
            .map_err(AppError::internal)?;

        // A concurrent signup can still win the race; the unique index turns that
        // into AlreadyExists, which converts to DuplicateEmail.
        let user = self.users.create(email, &hash).await?;

        let token = self.keys.issue(user.id).map_err(AppError::internal)?;
        info!(user_id = %user.id, "user registered");
        Ok(token)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let email = email.trim();
        let user = self.users.find_by_email(email).await?;

        let plain = password.to_owned();
        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let matched = tokio::task::spawn_blocking(move || match stored {
            Some(hash) => verify_password(&plain, &hash),
            None => Ok(verify_against_decoy(&plain)),
        })
        .await
        .map_err(AppError::internal)?
        .map_err(AppError::internal)?;

        let user = match user {
            Some(u) if matched => u,
            _ => {
                warn!(email = %email, "login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.keys.issue(user.id).map_err(AppError::internal)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Looks up the caller's public profile. A token for a user that no longer
    /// exists is treated as invalid.
    pub async fn profile(&self, user_id: Uuid) -> Result<PublicUser> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;
        Ok(PublicUser {
            id: user.id,
            email: user.email,
        })
    }
}
