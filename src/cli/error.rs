//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::HierarchyError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("unknown node key: {0}")]
    UnknownNode(String),

    /// A requested edit the hierarchy refuses (cycle, self-parenting, ...).
    #[error("invalid edit: {0}")]
    InvalidEdit(#[source] HierarchyError),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<HierarchyError> for CliError {
    fn from(e: HierarchyError) -> Self {
        ApplicationError::Domain(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Classify an error raised while applying a user-requested edit.
    ///
    /// Rejected edits are usage errors; anything else keeps its layer mapping.
    pub fn from_edit(e: HierarchyError) -> Self {
        match e {
            HierarchyError::InvalidOperation { .. } | HierarchyError::InvalidReference(_) => {
                CliError::InvalidEdit(e)
            }
            other => other.into(),
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::UnknownNode(_) | CliError::InvalidEdit(_) => {
                crate::exitcode::USAGE
            }
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::FixtureNotFound(_) => crate::exitcode::NOINPUT,
                InfraError::Fixture { .. } => crate::exitcode::DATAERR,
                InfraError::Application(ApplicationError::Config { .. }) => {
                    crate::exitcode::CONFIG
                }
                InfraError::Application(ApplicationError::Domain(
                    HierarchyError::IdSpaceExhausted,
                )) => crate::exitcode::SOFTWARE,
                InfraError::Application(ApplicationError::Domain(_)) => crate::exitcode::DATAERR,
            },
        }
    }
}
