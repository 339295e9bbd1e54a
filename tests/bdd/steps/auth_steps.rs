use cucumber::{given, then, when};

use crate::DonelistWorld;
use crate::steps::web_steps::{assert_redirected_to, http_post_form};

async fn register(world: &mut DonelistWorld, username: &str, password: &str) {
    http_post_form(
        world,
        "/register",
        &[("username", username), ("password", password)],
    )
    .await;
}

async fn log_in(world: &mut DonelistWorld, username: &str, password: &str) {
    http_post_form(
        world,
        "/login",
        &[("username", username), ("password", password)],
    )
    .await;
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given(expr = "a user {string} with password {string} is registered")]
async fn a_user_is_registered(world: &mut DonelistWorld, username: String, password: String) {
    register(world, &username, &password).await;
    assert_redirected_to(world, "/login");
}

#[given(expr = "I am logged in as {string}")]
async fn i_am_logged_in_as(world: &mut DonelistWorld, username: String) {
    register(world, &username, "password").await;
    assert_redirected_to(world, "/login");
    log_in(world, &username, "password").await;
    assert_redirected_to(world, "/dashboard");
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when(expr = "I register with username {string} and password {string}")]
async fn i_register_with(world: &mut DonelistWorld, username: String, password: String) {
    register(world, &username, &password).await;
}

#[when(expr = "I log in with username {string} and password {string}")]
async fn i_log_in_with(world: &mut DonelistWorld, username: String, password: String) {
    log_in(world, &username, &password).await;
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then(expr = "there is exactly {int} user named {string}")]
async fn there_is_exactly_n_user_named(world: &mut DonelistWorld, expected: i64, username: String) {
    let db = world.open_db();
    let found = db
        .find_user_by_username(&username)
        .expect("user lookup failed");
    assert_eq!(
        i64::from(found.is_some()),
        expected,
        "unexpected presence of user {username:?}"
    );
    assert_eq!(db.count_users().expect("count failed"), expected);
}

#[then(expr = "there are {int} users")]
async fn there_are_n_users(world: &mut DonelistWorld, expected: i64) {
    let count = world.open_db().count_users().expect("count failed");
    assert_eq!(count, expected, "expected {expected} users but found {count}");
}

#[then(expr = "the stored password for {string} is not {string}")]
async fn the_stored_password_is_hashed(world: &mut DonelistWorld, username: String, raw: String) {
    let user = world
        .open_db()
        .find_user_by_username(&username)
        .expect("user lookup failed")
        .unwrap_or_else(|| panic!("no user named {username:?}"));
    assert_ne!(user.password, raw, "password stored in plain text");
    assert!(
        bcrypt::verify(&raw, &user.password).expect("stored value is not a bcrypt hash"),
        "stored hash does not match the registered password"
    );
}
