use crate::{db::models::User, AppState};

pub async fn login(
    state: &AppState,
    email: String,
    display_name: Option<String>,
) -> Result<User, String> {
    state
        .session
        .login(&email, display_name.as_deref())
        .await
        .map_err(|e| e.to_string())
}

pub async fn logout(state: &AppState) -> Result<(), String> {
    state.session.logout().await.map_err(|e| e.to_string())
}

pub fn current_user(state: &AppState) -> Option<User> {
    state.session.current()
}
