//! # Error Module
//!
//! Every fallible operation in the library returns [`Error`]. Callers that need
//! to pick remediation text or an exit status look at [`Error::kind`] rather
//! than matching individual variants.
//!
//! ## Error Kinds
//!
//! - **Validation** - a user-supplied value (namespace, type name, schema shape)
//!   is malformed and can be corrected
//! - **Precondition** - the project is not in the state the phase needs
//!   (no settings file, no build artifact); the message names the command to run
//! - **Internal** - the generator or build tree is inconsistent (ambiguous
//!   artifacts, dangling schema references); not fixable by retrying
//! - **Io** - the file system refused an operation, including a safe-write
//!   that found an existing user file

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed user input; surfaced with a specific, correctable message
    Validation,
    /// A required earlier step has not been run
    Precondition,
    /// Internal inconsistency; should be investigated, not retried
    Internal,
    /// File-system failure
    Io,
}

impl ErrorKind {
    /// Process exit status the CLI reports for this kind
    ///
    /// Internal and I/O errors use the sysexits `EX_SOFTWARE` / `EX_IOERR` codes.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Validation => 2,
            Self::Precondition => 3,
            Self::Internal => 70,
            Self::Io => 74,
        }
    }

    /// Whether a user can fix the failure with a simple instruction
    pub const fn is_user_actionable(self) -> bool {
        matches!(self, Self::Validation | Self::Precondition)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Validation => "validation error",
            Self::Precondition => "precondition failed",
            Self::Internal => "internal error",
            Self::Io => "i/o error",
        };
        f.write_str(label)
    }
}

/// Errors raised by the generator
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid namespace '{value}': {reason}")]
    InvalidNamespace { value: String, reason: String },

    #[error("invalid resource type name '{value}': {reason}")]
    InvalidTypeName { value: String, reason: String },

    #[error("invalid resource schema at '{pointer}': {reason}")]
    Schema { pointer: String, reason: String },

    #[error("no project settings found at {0:?}")]
    ProjectNotInitialized(PathBuf),

    #[error("no build artifact matching '{pattern}' was found in {dir:?}")]
    ArtifactNotFound { dir: PathBuf, pattern: String },

    #[error("multiple build artifacts match: {}", display_paths(.0))]
    AmbiguousArtifact(Vec<PathBuf>),

    #[error("refusing to write archive {0:?} over or inside a packaged path")]
    ArchiveInsideSources(PathBuf),

    #[error("object '{from}' references undefined object '{missing}'")]
    UndefinedObject { from: String, missing: String },

    #[error("file already exists, not overwriting {0:?}")]
    FileExists(PathBuf),

    #[error("i/o failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write archive entry '{entry}': {source}")]
    Archive {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to render template {template}: {source}")]
    Template {
        template: &'static str,
        #[source]
        source: askama::Error,
    },

    #[error("failed to read project settings {path:?}: {reason}")]
    Settings { path: PathBuf, reason: String },

    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Classify this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidNamespace { .. }
            | Self::InvalidTypeName { .. }
            | Self::Schema { .. }
            | Self::ArchiveInsideSources(_) => ErrorKind::Validation,
            Self::ProjectNotInitialized(_) | Self::ArtifactNotFound { .. } => {
                ErrorKind::Precondition
            }
            Self::AmbiguousArtifact(_) | Self::UndefinedObject { .. } => ErrorKind::Internal,
            Self::FileExists(_)
            | Self::Io { .. }
            | Self::Walk { .. }
            | Self::Archive { .. }
            | Self::Template { .. }
            | Self::Settings { .. }
            | Self::Json { .. } => ErrorKind::Io,
        }
    }

    /// Remedial instruction for the user, if there is a simple one
    ///
    /// Internal errors never carry a remedy.
    pub const fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::ArtifactNotFound { .. } => Some(
                "Please run 'mvn package' or the equivalent command in your IDE \
                 to compile and package the code.",
            ),
            Self::ProjectNotInitialized(_) => {
                Some("Run 'cfn-java-gen init --type-name <Vendor::Service::Resource>' first.")
            }
            Self::FileExists(_) => {
                Some("Move or delete the existing file if you want it to be re-created.")
            }
            Self::ArchiveInsideSources(_) => {
                Some("Choose an --output path outside 'src/' and 'target/generated-sources/'.")
            }
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn template(template: &'static str, source: askama::Error) -> Self {
        Self::Template { template, source }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
