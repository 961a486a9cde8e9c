pub mod commands;
pub mod identity;

use std::sync::RwLock;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    db::{models::User, repositories::slots::CURRENT_USER_KEY, Database},
    error::{AppError, AppResult},
    store::{PersistenceError, Record},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn(User),
}

/// Holds the signed-in user and mirrors it into the session slot.
pub struct SessionManager {
    db: Database,
    current: RwLock<Option<User>>,
}

impl SessionManager {
    /// Reads the session slot once. A missing or unreadable slot starts
    /// logged out.
    pub async fn restore(db: Database) -> Self {
        let user = match db.get_slot(CURRENT_USER_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!("Ignoring unreadable session slot: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("Failed to read session slot: {err:#}");
                None
            }
        };

        if let Some(user) = &user {
            info!("Restored session for {}", user.email);
        }

        Self {
            db,
            current: RwLock::new(user),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.current() {
            Some(user) => SessionState::LoggedIn(user),
            None => SessionState::LoggedOut,
        }
    }

    pub fn current(&self) -> Option<User> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn require(&self) -> AppResult<User> {
        self.current().ok_or(AppError::NotLoggedIn)
    }

    pub async fn login(&self, email: &str, display_name: Option<&str>) -> AppResult<User> {
        let user = identity::user_for_login(email, display_name)?;
        self.persist(Some(&user))
            .await
            .map_err(|err| PersistenceError::Unavailable(format!("{err:#}")))?;
        self.set(Some(user.clone()));

        info!("Logged in as {} ({})", user.email, user.id);
        Ok(user)
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.persist(None)
            .await
            .map_err(|err| PersistenceError::Unavailable(format!("{err:#}")))?;
        self.set(None);

        info!("Logged out");
        Ok(())
    }

    async fn persist(&self, user: Option<&User>) -> Result<()> {
        match user {
            Some(user) => {
                let encoded = serde_json::to_string(user).context("failed to encode session")?;
                self.db.put_slot(CURRENT_USER_KEY, encoded).await
            }
            None => self.db.clear_slot(CURRENT_USER_KEY).await.map(|_| ()),
        }
    }

    fn set(&self, user: Option<User>) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = user;
    }
}

/// Owners alone may edit, hide, or purge their records.
pub fn ensure_owner<T: Record>(user: &User, record: &T, kind: &'static str) -> AppResult<()> {
    if record.owner_id() == user.id {
        Ok(())
    } else {
        Err(AppError::NotOwner {
            kind,
            id: record.id().to_string(),
        })
    }
}
