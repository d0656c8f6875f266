//! Error types for external generator resolution.
//!
//! Every failure path in the engine returns one of these as an explicit value;
//! the upstream resolver decides whether a failure aborts the build or is
//! skipped with a diagnostic.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What could not be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Generator,
    Context,
    Component,
    TemplateVariable,
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotFoundKind::Generator => "generator",
            NotFoundKind::Context => "context",
            NotFoundKind::Component => "component",
            NotFoundKind::TemplateVariable => "template variable",
        };
        f.write_str(s)
    }
}

/// Conflicts between definitions or bindings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictKind {
    #[error("generator '{id}' is already defined with different content (first seen in {first})")]
    GeneratorDefinition { id: String, first: String },

    #[error(
        "component '{component}' already binds generator '{generator}' to '{existing}' \
         in context '{context}', refusing '{requested}'"
    )]
    BindingDirectory {
        context: String,
        generator: String,
        component: String,
        existing: String,
        requested: String,
    },

    #[error("context '{context}' {reason}")]
    ContextDescriptor { context: String, reason: String },

    #[error("global generator registry is already initialized")]
    RegistryInstalled,
}

/// Domain errors
#[derive(Debug, Error)]
pub enum GenError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: NotFoundKind, id: String },

    #[error("{}", describe_mismatch(.component, .requested.as_deref(), .declared.as_deref()))]
    Mismatch {
        component: String,
        /// `None` when the caller named no generator and the component declares none
        requested: Option<String>,
        declared: Option<String>,
    },

    #[error("conflict: {0}")]
    Conflict(ConflictKind),

    #[error("schema violation in {path}: {message}")]
    SchemaViolation { path: PathBuf, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OS error {code} while {context}")]
    Os { code: i32, context: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_mismatch(component: &str, requested: Option<&str>, declared: Option<&str>) -> String {
    match (requested, declared) {
        (None, None) => format!("component '{}' declares no generator", component),
        (requested, declared) => format!(
            "generator '{}' requested for component '{}' does not match \
             its declared generator ({})",
            requested.unwrap_or("none"),
            component,
            declared.unwrap_or("none")
        ),
    }
}

/// Error discriminant, for callers that branch on the class of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenErrorKind {
    NotFound,
    Mismatch,
    Conflict,
    SchemaViolation,
    Io,
    Os,
    Config,
}

impl GenError {
    pub fn kind(&self) -> GenErrorKind {
        match self {
            GenError::NotFound { .. } => GenErrorKind::NotFound,
            GenError::Mismatch { .. } => GenErrorKind::Mismatch,
            GenError::Conflict(_) => GenErrorKind::Conflict,
            GenError::SchemaViolation { .. } => GenErrorKind::SchemaViolation,
            GenError::Io { .. } => GenErrorKind::Io,
            GenError::Os { .. } => GenErrorKind::Os,
            GenError::Config(_) => GenErrorKind::Config,
        }
    }

    pub(crate) fn not_found(kind: NotFoundKind, id: impl Into<String>) -> Self {
        GenError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Wrap a document parse failure as an I/O error on that path.
    pub(crate) fn invalid_data(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        GenError::Io {
            path: path.into(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, message.to_string()),
        }
    }

    /// Build an `Os` error from an `io::Error`, keeping the raw platform code.
    pub(crate) fn from_os(err: &std::io::Error, context: impl Into<String>) -> Self {
        GenError::Os {
            code: err.raw_os_error().unwrap_or(0),
            context: context.into(),
        }
    }
}

impl From<config::ConfigError> for GenError {
    fn from(err: config::ConfigError) -> Self {
        GenError::Config(err.to_string())
    }
}
