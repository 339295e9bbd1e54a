pub mod auth_steps;
pub mod todo_steps;
