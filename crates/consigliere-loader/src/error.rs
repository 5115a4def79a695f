use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Seed file {path}: {message}")]
    Seed { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
