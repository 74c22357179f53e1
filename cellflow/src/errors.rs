pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Data(#[from] DataError),
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("cell '{cell}' would create a dependency cycle: {}", path.join(" -> "))]
    Cycle { cell: String, path: Vec<String> },
    #[error("cell '{0}' is already registered")]
    DuplicateName(String),
    #[error("cell '{0}' has dependencies and cannot be set directly")]
    NotASourceCell(String),
    #[error("cell '{0}' has not been evaluated yet")]
    NotYetEvaluated(String),
    #[error("cell '{0}' is not registered")]
    UnknownCell(String),
    #[error("cell '{cell}' read '{dependency}', which it does not declare as a dependency")]
    UndeclaredDependency { cell: String, dependency: String },
    #[error("cell '{cell}' depends on '{dependency}', which is not registered")]
    MissingDependency { cell: String, dependency: String },
    #[error("cell '{cell}' failed to compute: {source}")]
    ComputeFailed {
        cell: String,
        #[source]
        source: Box<Error>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("type mismatch for '{key}': expected '{expected}', found '{found}'")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },
    #[error("failed to serialize '{key}': {message}")]
    Serialization { key: String, message: String },
    #[error("failed to deserialize '{key}': {message}")]
    Deserialization { key: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("sample count must be positive, got {0}")]
    InvalidCount(i64),
    #[error("cannot summarize an empty dataset")]
    EmptyDataset,
}

impl Error {
    /// Strips `ComputeFailed` wrappers and returns the error a cell body raised.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Graph(GraphError::ComputeFailed { source, .. }) => source.root_cause(),
            other => other,
        }
    }
}
