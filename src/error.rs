use thiserror::Error;

/// Errors raised by the stores and the auth layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// One message per rejected form field, in field order.
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("todo not found: {0}")]
    TodoNotFound(i64),
}

impl Error {
    pub fn db(context: &'static str) -> impl FnOnce(rusqlite::Error) -> Error {
        move |source| Error::Database { context, source }
    }

    pub fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Error {
        move |source| Error::Io { context, source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
