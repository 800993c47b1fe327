use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io { path: String, reason: String },
    Json(String),
    InvalidValue { key: String, expected: &'static str },
    InvalidSetting { name: &'static str, reason: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, reason } => write!(f, "Error while reading {path}: {reason}"),
            Self::Json(reason) => write!(f, "Json error: {reason}"),
            Self::InvalidValue { key, expected } => {
                write!(f, "Value under {key} has to be a {expected}")
            }
            Self::InvalidSetting { name, reason } => write!(f, "Invalid {name}: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<json::Error> for Error {
    fn from(val: json::Error) -> Self {
        Error::Json(val.to_string())
    }
}
