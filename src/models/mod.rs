use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Inclusive bounds on username and password length.
pub const CREDENTIAL_MIN_LEN: usize = 4;
pub const CREDENTIAL_MAX_LEN: usize = 20;

/// Check a credential field against the length bounds.
///
/// Length is counted in characters, so multi-byte input is not penalised.
pub fn validate_length(field: &str, value: &str) -> Result<(), String> {
    let len = value.chars().count();
    if (CREDENTIAL_MIN_LEN..=CREDENTIAL_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(format!(
            "{field} must be between {CREDENTIAL_MIN_LEN} and {CREDENTIAL_MAX_LEN} characters long"
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// bcrypt hash, never the raw password.
    pub password: String,
}

/// Username/password pair as submitted by the login and registration forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub note: String,
    /// Stored exactly as submitted; no format is enforced.
    pub due_date: String,
}

/// Fields of the `/add` form. The wire names follow the form inputs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "texte")]
    pub note: String,
    #[serde(default, rename = "date_todo")]
    pub due_date: String,
}

impl Todo {
    /// Best-effort interpretation of the stored due date.
    pub fn parsed_due_date(&self) -> Option<NaiveDate> {
        parse_due_date(&self.due_date)
    }

    /// Human label for the due date, falling back to the raw string.
    pub fn due_label(&self) -> String {
        match self.parsed_due_date() {
            Some(date) => date.format("%a %d %b %Y").to_string(),
            None => self.due_date.clone(),
        }
    }

    /// True for open todos whose due date parses and lies before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.parsed_due_date().is_some_and(|d| d < today)
    }
}

fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}
