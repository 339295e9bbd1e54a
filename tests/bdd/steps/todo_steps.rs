use cucumber::{given, then, when};

use donelist::models::Todo;

use crate::DonelistWorld;
use crate::steps::web_steps::{assert_redirected_to, http_get, http_post_form};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn all_todos(world: &DonelistWorld) -> Vec<Todo> {
    world.open_db().list_todos().expect("list_todos failed")
}

/// Look up a todo by title, remembering its id for later steps.
fn todo_by_title(world: &mut DonelistWorld, title: &str) -> Todo {
    let todo = all_todos(world)
        .into_iter()
        .find(|t| t.title == title)
        .unwrap_or_else(|| panic!("no todo titled {title:?}"));
    world.todo_ids.insert(title.to_string(), todo.id);
    todo
}

fn todo_id(world: &mut DonelistWorld, title: &str) -> i64 {
    match world.todo_ids.get(title) {
        Some(id) => *id,
        None => todo_by_title(world, title).id,
    }
}

async fn add_todo(world: &mut DonelistWorld, title: &str, note: &str, due: &str) {
    http_post_form(
        world,
        "/add",
        &[("title", title), ("texte", note), ("date_todo", due)],
    )
    .await;
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given(expr = "a todo {string} exists")]
async fn a_todo_exists(world: &mut DonelistWorld, title: String) {
    add_todo(world, &title, "", "2024-01-01").await;
    assert_redirected_to(world, "/dashboard");
    todo_by_title(world, &title);
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when(expr = "I add a todo with title {string}, note {string} and due date {string}")]
async fn i_add_a_todo(world: &mut DonelistWorld, title: String, note: String, due: String) {
    add_todo(world, &title, &note, &due).await;
}

#[when(expr = "I toggle the todo {string}")]
async fn i_toggle_the_todo(world: &mut DonelistWorld, title: String) {
    let id = todo_id(world, &title);
    http_get(world, &format!("/update/{id}")).await;
}

#[when(expr = "I delete the todo {string}")]
async fn i_delete_the_todo(world: &mut DonelistWorld, title: String) {
    let id = todo_id(world, &title);
    http_get(world, &format!("/delete/{id}")).await;
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then(expr = "there is/are exactly {int} todo(s)")]
async fn there_are_exactly_n_todos(world: &mut DonelistWorld, expected: usize) {
    let todos = all_todos(world);
    assert_eq!(
        todos.len(),
        expected,
        "expected {expected} todos but found {todos:?}"
    );
}

#[then(expr = "the todo {string} is completed")]
async fn the_todo_is_completed(world: &mut DonelistWorld, title: String) {
    let todo = todo_by_title(world, &title);
    assert!(todo.completed, "expected {title:?} to be completed: {todo:?}");
}

#[then(expr = "the todo {string} is not completed")]
async fn the_todo_is_not_completed(world: &mut DonelistWorld, title: String) {
    let todo = todo_by_title(world, &title);
    assert!(!todo.completed, "expected {title:?} to be open: {todo:?}");
}

#[then(expr = "the todo {string} has note {string} and due date {string}")]
async fn the_todo_has_fields(world: &mut DonelistWorld, title: String, note: String, due: String) {
    let todo = todo_by_title(world, &title);
    assert_eq!(todo.note, note);
    assert_eq!(todo.due_date, due);
}

#[then(expr = "the todo list contains {string}")]
async fn the_todo_list_contains(world: &mut DonelistWorld, title: String) {
    let todos = all_todos(world);
    assert!(
        todos.iter().any(|t| t.title == title),
        "expected {title:?} in {todos:?}"
    );
}

#[then(expr = "the todo list does not contain {string}")]
async fn the_todo_list_does_not_contain(world: &mut DonelistWorld, title: String) {
    let todos = all_todos(world);
    assert!(
        todos.iter().all(|t| t.title != title),
        "expected {title:?} to be gone from {todos:?}"
    );
}
