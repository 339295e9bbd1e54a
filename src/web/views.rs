use askama::Template;
use axum::response::Html;
use chrono::NaiveDate;

use super::AppError;
use crate::models::Todo;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeView;

#[derive(Template, Default)]
#[template(path = "login.html")]
pub struct LoginView {
    /// Echoed back after a rejected attempt; the password never is.
    pub username: String,
}

#[derive(Template, Default)]
#[template(path = "register.html")]
pub struct RegisterView {
    pub username: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardView {
    pub username: String,
    pub todos: Vec<TodoRow>,
}

/// A todo prepared for display.
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub note: String,
    pub due_date: String,
    pub due_label: String,
    pub completed: bool,
    pub overdue: bool,
}

impl DashboardView {
    pub fn new(username: String, todos: &[Todo], today: NaiveDate) -> Self {
        let todos = todos
            .iter()
            .map(|t| TodoRow {
                id: t.id,
                title: t.title.clone(),
                note: t.note.clone(),
                due_date: t.due_date.clone(),
                due_label: t.due_label(),
                completed: t.completed,
                overdue: t.is_overdue(today),
            })
            .collect();
        DashboardView { username, todos }
    }
}

pub fn render<T: Template>(view: &T) -> Result<Html<String>, AppError> {
    view.render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("template error: {e}")))
}
