use std::fmt;

/// The two fatal error kinds an engine run can produce (§7). File errors and
/// analysis errors are deliberately *not* represented here — per §7 they are
/// non-fatal and are folded into the result data (skipped-file counts,
/// per-component `unknown` downgrades) rather than propagated as `Err`.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Malformed component list or unrecognized SBOM shape — fatal at the
    /// entry point, before any file is read.
    Input(String),
    /// An invariant the engine relies on internally was violated. Carries a
    /// stable message so callers can distinguish it from ordinary I/O
    /// failures; must never be raised due to untrusted input alone.
    Internal(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Input(msg) => write!(f, "input error: {msg}"),
            EngineError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Maps to the CLI usage-error exit code (2).
    pub fn is_input(&self) -> bool {
        matches!(self, EngineError::Input(_))
    }

    /// Maps to the CLI internal-error exit code (3).
    pub fn is_internal(&self) -> bool {
        matches!(self, EngineError::Internal(_))
    }
}
