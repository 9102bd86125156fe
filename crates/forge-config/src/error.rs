use std::any::Any;
use std::path::PathBuf;

use forge_error::ErrorExt;
use forge_error::Location;
use forge_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to read config file {path:?}: {source}"))]
    Read {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to parse config file {path:?}: {source}"))]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("config value {field} is out of range: {detail}"))]
    OutOfRange {
        field: String,
        detail: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("could not determine home directory to locate workspace config"))]
    HomeDirNotFound {
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConfigError::Read { .. } => StatusCode::IoError,
            ConfigError::Parse { .. } => StatusCode::ValidationFailed,
            ConfigError::OutOfRange { .. } => StatusCode::ValidationFailed,
            ConfigError::HomeDirNotFound { .. } => StatusCode::IoError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
