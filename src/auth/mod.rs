//! Registration and credential checks on top of the user table.

use crate::db::{Database, USERNAME_TAKEN};
use crate::error::{Error, Result};
use crate::models::{User, validate_length};

/// Result of a login attempt.
///
/// A rejected login carries no reason: the login form is shown again exactly
/// as submitted, without telling the visitor which part was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(User),
    Rejected,
}

/// Validate the form, hash the password and store a new user.
///
/// Every failing field is reported, so the form can show all problems at once.
pub fn register(db: &Database, username: &str, password: &str, cost: u32) -> Result<User> {
    let mut errors = Vec::new();
    if let Err(e) = validate_length("Username", username) {
        errors.push(e);
    } else if db.find_user_by_username(username)?.is_some() {
        errors.push(USERNAME_TAKEN.to_string());
    }
    if let Err(e) = validate_length("Password", password) {
        errors.push(e);
    }
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let hashed = bcrypt::hash(password, cost)?;
    let user = db.insert_user(username, &hashed)?;
    tracing::info!(user_id = user.id, username = %user.username, "registered user");
    Ok(user)
}

/// Check a username/password pair against the stored hash.
pub fn authenticate(db: &Database, username: &str, password: &str) -> Result<LoginOutcome> {
    if validate_length("Username", username).is_err()
        || validate_length("Password", password).is_err()
    {
        return Ok(LoginOutcome::Rejected);
    }

    let Some(user) = db.find_user_by_username(username)? else {
        tracing::info!(%username, "login rejected: unknown user");
        return Ok(LoginOutcome::Rejected);
    };

    // A stored value that is not a bcrypt hash can never match.
    if bcrypt::verify(password, &user.password).unwrap_or(false) {
        tracing::info!(user_id = user.id, "login succeeded");
        Ok(LoginOutcome::Authenticated(user))
    } else {
        tracing::info!(%username, "login rejected: wrong password");
        Ok(LoginOutcome::Rejected)
    }
}
