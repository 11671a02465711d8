use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Cannot open or initialize the database file.
    Open(String),
    /// SQL execution error.
    Sql(String),
    /// A stored document failed to decode.
    Decode { id: String, message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(msg) => write!(f, "cannot open store: {msg}"),
            Self::Sql(msg) => write!(f, "store error: {msg}"),
            Self::Decode { id, message } => {
                write!(f, "document '{id}' failed to decode: {message}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sql(e.to_string())
    }
}
