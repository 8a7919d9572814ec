//! First-admin bootstrap.
//!
//! Role changes require an existing admin, so a fresh deployment needs one
//! seeded out of band. When `GUITAR_CLUB_ADMIN_EMAIL` and
//! `GUITAR_CLUB_ADMIN_PASSWORD` are set and no account owns that email,
//! startup creates an admin account.

use std::env;

use tracing::info;

use crate::app::AppState;
use crate::models::{Role, User};
use crate::services::password;
use crate::store::Filter;

pub async fn ensure_admin(state: &AppState) -> anyhow::Result<()> {
    let (Ok(email), Ok(raw_password)) = (
        env::var("GUITAR_CLUB_ADMIN_EMAIL"),
        env::var("GUITAR_CLUB_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let users = state.users();
    if users
        .find_one(&Filter::new().where_eq("email", &email))
        .await?
        .is_some()
    {
        return Ok(());
    }

    let password_hash = password::hash(raw_password).await?;
    let mut admin = User::new("admin".into(), email.clone(), password_hash)?;
    admin.role = Role::Admin;
    users.insert(&admin).await?;

    info!("created bootstrap admin account for {}", email);
    Ok(())
}
