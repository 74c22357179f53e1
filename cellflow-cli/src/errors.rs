use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Notebook(#[from] cellflow::Error),
    #[error("Config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("No config directory available on this platform")]
    NoConfigDir,
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}
