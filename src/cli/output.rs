//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{GenError, GenErrorKind};

/// Map domain errors to a string for CLI output, prefixed by error class.
pub fn map_error(e: &GenError) -> String {
    let class = match e.kind() {
        GenErrorKind::NotFound => "not found",
        GenErrorKind::Mismatch => "mismatch",
        GenErrorKind::Conflict => "conflict",
        GenErrorKind::SchemaViolation => "schema violation",
        GenErrorKind::Io => "i/o",
        GenErrorKind::Os => "os",
        GenErrorKind::Config => "config",
    };
    format!("error [{}]: {}", class, e)
}
