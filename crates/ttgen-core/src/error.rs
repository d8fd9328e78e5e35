//! Generator error taxonomy (§7).
//!
//! - `GenError::Fatal` — a logic-error: the AST violates an invariant the
//!   generator relies on. Always a bug in the checker or generator upstream
//!   of this crate. Terminates generation with a location; no recovery.
//! - `GenError::Format` — a text-buffer formatting failure (`std::fmt::Error`
//!   from a `write!`/`writeln!` into a sink), propagated with `?` exactly
//!   like the teacher's `CodeGenError::Format`.
//!
//! Semantic-errors are *not* represented here: per §7 the checker has
//! already surfaced them before the AST reaches this crate, and the
//! generator simply skips emission for `statementtype = ERROR` nodes. That
//! skip is modeled at the call site, not as an error variant.

use crate::location::SourceLocation;

#[derive(Debug)]
pub enum GenError {
    /// A logical error in code generation: a violated invariant.
    Fatal {
        message: String,
        location: Option<SourceLocation>,
    },
    /// A formatting error while writing into a text sink.
    Format(std::fmt::Error),
}

impl GenError {
    pub fn fatal(message: impl Into<String>) -> Self {
        GenError::Fatal {
            message: message.into(),
            location: None,
        }
    }

    pub fn fatal_at(message: impl Into<String>, location: SourceLocation) -> Self {
        GenError::Fatal {
            message: message.into(),
            location: Some(location),
        }
    }
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::Fatal {
                message,
                location: Some(loc),
            } => write!(f, "{message} at {loc}"),
            GenError::Fatal {
                message,
                location: None,
            } => write!(f, "{message}"),
            GenError::Format(e) => write!(f, "code generation error: {e}"),
        }
    }
}

impl std::error::Error for GenError {}

impl From<std::fmt::Error> for GenError {
    fn from(e: std::fmt::Error) -> Self {
        GenError::Format(e)
    }
}

/// A non-fatal diagnostic (§7's Warning category): unreachable code after a
/// terminating statement, unreachable branch after `if (true)`, a busy-wait
/// `[else] { repeat }` as the first statement, or deactivating defaults from
/// within an altstep/function under the legacy runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl Warning {
    pub fn new(message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Warning {
            message: message.into(),
            location,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "warning: {} at {}", self.message, loc),
            None => write!(f, "warning: {}", self.message),
        }
    }
}
