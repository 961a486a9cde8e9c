//! Identity derivation from an email address.
//!
//! This is a stand-in for accounts, not authentication: nothing is verified
//! and anyone who types the same email gets the same id.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{db::models::User, error::AppError};

/// Lowercases the email and encodes it as base64 without `=` padding.
pub fn derive_user_id(email: &str) -> String {
    STANDARD
        .encode(email.trim().to_lowercase().as_bytes())
        .trim_end_matches('=')
        .to_string()
}

/// Builds the user for a login form submission. The display name falls back
/// to the part of the email before `@`.
pub fn user_for_login(email: &str, display_name: Option<&str>) -> Result<User, AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    let Some((local_part, domain)) = email.split_once('@') else {
        return Err(AppError::Validation(format!("'{email}' is not an email address")));
    };
    if local_part.is_empty() || domain.is_empty() {
        return Err(AppError::Validation(format!("'{email}' is not an email address")));
    }

    let display_name = display_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(local_part)
        .to_string();

    Ok(User {
        id: derive_user_id(&email),
        email,
        display_name,
    })
}
