/// Registration and login checks.
pub mod auth;
/// Database layer: open, migrate, user and todo CRUD.
pub mod db;
/// Crate-wide error type.
pub mod error;
/// Data types: User, Todo, form payloads.
pub mod models;
/// Axum-based web server and router.
pub mod web;
