use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{NewTodo, Todo, User};

/// Message shown on the registration form when the username is taken.
pub const USERNAME_TAKEN: &str = "That username already exists. Please choose a different one.";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(Error::db("failed to open database"))?;
        Self::configure(conn)
    }

    /// Open a private in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::db("failed to open database"))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(Error::db("failed to set pragmas"))?;
        Ok(Database { conn })
    }

    /// Create the schema tables if they don't exist, then run any pending version-gated migrations.
    pub fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS todos (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                title     TEXT NOT NULL DEFAULT '',
                completed INTEGER NOT NULL DEFAULT 0,
                note      TEXT NOT NULL DEFAULT '',
                due_date  TEXT NOT NULL DEFAULT ''
            );
            ",
            )
            .map_err(Error::db("migration failed"))?;

        // Fresh databases start at version 0.
        self.conn
            .execute(
                "INSERT OR IGNORE INTO config (key, value) VALUES ('schema_version', '0')",
                [],
            )
            .map_err(Error::db("failed to seed schema_version"))?;

        run_migrations(&self.conn)
    }

    // -- Config --

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(Error::db("failed to set config"))?;
        Ok(())
    }

    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::db("query error"))
    }

    // -- Users --

    /// Insert a user whose password has already been hashed.
    ///
    /// A clash on the UNIQUE username column is reported as a validation error.
    pub fn insert_user(&self, username: &str, password_hash: &str) -> Result<User> {
        match self.conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![username, password_hash],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                return Err(Error::Validation(vec![USERNAME_TAKEN.to_string()]));
            }
            Err(e) => return Err(Error::db("failed to insert user")(e)),
        }

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            password: password_hash.to_string(),
        })
    }

    /// Exact, case-sensitive lookup.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, password FROM users WHERE username = ?1",
                params![username],
                row_to_user,
            )
            .optional()
            .map_err(Error::db("query error"))
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, password FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()
            .map_err(Error::db("query error"))
    }

    pub fn count_users(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(Error::db("query error"))
    }

    // -- Todos --

    pub fn insert_todo(&self, todo: &NewTodo) -> Result<Todo> {
        self.conn
            .execute(
                "INSERT INTO todos (title, completed, note, due_date) VALUES (?1, 0, ?2, ?3)",
                params![todo.title, todo.note, todo.due_date],
            )
            .map_err(Error::db("failed to insert todo"))?;

        Ok(Todo {
            id: self.conn.last_insert_rowid(),
            title: todo.title.clone(),
            completed: false,
            note: todo.note.clone(),
            due_date: todo.due_date.clone(),
        })
    }

    pub fn get_todo(&self, id: i64) -> Result<Option<Todo>> {
        self.conn
            .query_row(
                "SELECT id, title, completed, note, due_date FROM todos WHERE id = ?1",
                params![id],
                row_to_todo,
            )
            .optional()
            .map_err(Error::db("query error"))
    }

    /// All todos in storage order.
    pub fn list_todos(&self) -> Result<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, completed, note, due_date FROM todos")
            .map_err(Error::db("query error"))?;

        let rows = stmt
            .query_map([], row_to_todo)
            .map_err(Error::db("query error"))?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row.map_err(Error::db("row error"))?);
        }
        Ok(todos)
    }

    /// Flip the completed flag and return the updated row.
    pub fn toggle_todo(&self, id: i64) -> Result<Todo> {
        let rows_changed = self
            .conn
            .execute(
                "UPDATE todos SET completed = NOT completed WHERE id = ?1",
                params![id],
            )
            .map_err(Error::db("update failed"))?;

        if rows_changed == 0 {
            return Err(Error::TodoNotFound(id));
        }
        self.get_todo(id)?.ok_or(Error::TodoNotFound(id))
    }

    pub fn delete_todo(&self, id: i64) -> Result<()> {
        let rows_changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id])
            .map_err(Error::db("delete failed"))?;

        if rows_changed == 0 {
            return Err(Error::TodoNotFound(id));
        }
        Ok(())
    }
}

/// Read the current schema version from the config table.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM config WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::db("failed to read schema_version"))?;

    match value {
        Some(v) => v
            .parse::<i32>()
            .map_err(|e| Error::Schema(format!("invalid schema_version value {v:?}: {e}"))),
        None => Ok(0),
    }
}

/// Run all pending schema migrations in order.
///
/// Version 0 is the baseline created by `migrate()`. Later versions go here as
/// `if version < N` blocks, each inside its own transaction, followed by an
/// update of `schema_version`.
fn run_migrations(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;
    tracing::debug!(version, "schema is current");
    Ok(())
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

fn row_to_todo(row: &rusqlite::Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
        note: row.get(3)?,
        due_date: row.get(4)?,
    })
}
