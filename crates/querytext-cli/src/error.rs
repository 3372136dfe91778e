use miette::Diagnostic;
use querytext_config::error::ConfigError;
use querytext_core::PlanError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Plan(#[from] PlanError),

    #[error("Error while {action}")]
    #[diagnostic(code(querytext::io), help("Check that the file exists and is readable"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(querytext::toml))]
    TomlError(#[from] toml::ser::Error),

    #[error(transparent)]
    #[diagnostic(code(querytext::json))]
    JsonError(#[from] serde_json::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| CliError::IoError {
            action: context(),
            source: err,
        })
    }
}
