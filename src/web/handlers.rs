use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Local;
use tower_sessions::Session;

use super::views::{DashboardView, HomeView, LoginView, RegisterView, render};
use super::session::{LOGIN_PATH, log_in, log_out};
use super::{AppError, AppState, CurrentUser};
use crate::auth::{self, LoginOutcome};
use crate::error::Error;
use crate::models::{Credentials, NewTodo};

const DASHBOARD_PATH: &str = "/dashboard";

pub async fn home() -> Result<Html<String>, AppError> {
    render(&HomeView)
}

pub async fn login_form() -> Result<Html<String>, AppError> {
    render(&LoginView::default())
}

/// Rejected logins get the form back with no message.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<Credentials>,
) -> Result<Response, AppError> {
    let username = form.username.clone();
    let outcome = state
        .with_db(move |db| auth::authenticate(db, &form.username, &form.password))
        .await??;

    match outcome {
        LoginOutcome::Authenticated(user) => {
            log_in(&session, &user).await?;
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        LoginOutcome::Rejected => Ok(render(&LoginView { username })?.into_response()),
    }
}

pub async fn register_form() -> Result<Html<String>, AppError> {
    render(&RegisterView::default())
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<Credentials>,
) -> Result<Response, AppError> {
    let username = form.username.clone();
    let cost = state.bcrypt_cost;
    let result = state
        .with_db(move |db| auth::register(db, &form.username, &form.password, cost))
        .await?;

    match result {
        Ok(_) => Ok(Redirect::to(LOGIN_PATH).into_response()),
        Err(Error::Validation(errors)) => {
            tracing::info!(%username, ?errors, "registration rejected");
            Ok(render(&RegisterView { username, errors })?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn dashboard(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let todos = state.with_db(|db| db.list_todos()).await??;
    let today = Local::now().date_naive();
    render(&DashboardView::new(user.username, &todos, today))
}

pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<NewTodo>,
) -> Result<Redirect, AppError> {
    let todo = state.with_db(move |db| db.insert_todo(&form)).await??;
    tracing::info!(todo_id = todo.id, title = %todo.title, "added todo");
    Ok(Redirect::to(DASHBOARD_PATH))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let todo = state.with_db(move |db| db.toggle_todo(id)).await??;
    tracing::info!(todo_id = id, completed = todo.completed, "toggled todo");
    Ok(Redirect::to(DASHBOARD_PATH))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.with_db(move |db| db.delete_todo(id)).await??;
    tracing::info!(todo_id = id, "deleted todo");
    Ok(Redirect::to(DASHBOARD_PATH))
}

pub async fn logout(
    CurrentUser(user): CurrentUser,
    session: Session,
) -> Result<Redirect, AppError> {
    log_out(&session).await?;
    tracing::info!(user_id = user.id, "logged out");
    Ok(Redirect::to(LOGIN_PATH))
}
