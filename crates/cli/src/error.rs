//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: simulation error (unknown scene, bad layout/motion config, failed tick)
//! - 11: I/O error (asset scan, spec file, snapshot write)
//! - 12: input error (bad JSON params)
//! - 13: serialization error

use cowspots_core::SpriteError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A core error (unknown scene, invalid configuration, bad timestep).
    Sim(SpriteError),
    /// An I/O error (directory scan, file read, snapshot write).
    Io(String),
    /// A user input error (bad JSON params or spec).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Sim(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Sim(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<SpriteError> for CliError {
    fn from(e: SpriteError) -> Self {
        match e {
            SpriteError::Io(msg) => CliError::Io(msg),
            other => CliError::Sim(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_error_exit_code_is_10() {
        let err = CliError::Sim(SpriteError::UnknownScene("foo".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        let err = CliError::Io("write failed".into());
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        let err = CliError::Input("bad params".into());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        let err = CliError::Serialization("json fail".into());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn from_sprite_error_io_routes_to_cli_io() {
        let cli_err = CliError::from(SpriteError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_sprite_error_non_io_routes_to_cli_sim() {
        let cli_err = CliError::from(SpriteError::InvalidTimestep(-1.0));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("-1"));
    }

    #[test]
    fn from_std_io_error_routes_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such dir");
        let cli_err = CliError::from(io);
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("no such dir"));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
