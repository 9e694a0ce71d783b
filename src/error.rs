//! Run-level errors and the exit codes they map to.
use crate::hashcat::ToolError;
use crate::ledger::LedgerError;

/// Process exit codes.
///
/// - 0: completed normally, whether or not anything was cracked
/// - 1: unexpected failure
/// - 2: unusable inputs (hash file or wordlist)
/// - 3: hashcat missing or mode detection failed
/// - 4: ledger could not be read or written
/// - 5: export failed
/// - 130: interrupted by Ctrl+C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidInput = 2,
    ToolUnavailable = 3,
    LedgerFailure = 4,
    ExportFailure = 5,
    Interrupted = 130,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AutoCrackError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(
        "no candidate modes found; the hash file may be invalid or hashcat's output format changed"
    )]
    NoCandidates,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("scratch files: {0:#}")]
    Scratch(anyhow::Error),
    #[error("interrupted")]
    Interrupted,
}

impl AutoCrackError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::Tool(_) | Self::NoCandidates => ExitCode::ToolUnavailable,
            Self::Ledger(_) => ExitCode::LedgerFailure,
            Self::Scratch(_) => ExitCode::GeneralError,
            Self::Interrupted => ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_are_non_zero() {
        assert_eq!(
            AutoCrackError::Tool(ToolError::NotFound("hashcat".into()))
                .exit_code()
                .as_i32(),
            3
        );
        assert_eq!(AutoCrackError::Interrupted.exit_code().as_i32(), 130);
        assert_eq!(
            AutoCrackError::InvalidInput("x".into()).exit_code(),
            ExitCode::InvalidInput
        );
    }
}
