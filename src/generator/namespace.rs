//! Java package derivation and validation
//!
//! Two entry points with deliberately different contracts:
//!
//! - [`derive_namespace`] turns arbitrary resource type segments into a legal
//!   package. It never fails; keyword collisions are guarded, illegal
//!   characters are replaced.
//! - [`validate_namespace`] checks a package a user typed in. It rejects
//!   upper case, empty segments, bad characters and keywords outright.

use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use super::reserved::{guard, is_language_keyword};
use crate::error::{Error, Result};

/// First segment of every derived namespace
pub const ROOT_SEGMENT: &str = "com";

/// Pattern user-supplied segments must match.
///
/// This requires at least two characters, so `a.b` is rejected even though
/// derivation happily produces single-character segments.
pub const NAMESPACE_SEGMENT_PATTERN: &str = r"^[_a-z][_a-z0-9]+$";

#[allow(clippy::expect_used)]
static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NAMESPACE_SEGMENT_PATTERN).expect("valid namespace pattern"));

/// An ordered, immutable sequence of package segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    segments: Vec<String>,
}

impl Namespace {
    /// Segments in order, root first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Dotted form used in `package` declarations and build descriptors
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Relative directory path for sources in this package
    pub fn to_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// Derive the package for a resource type
///
/// Prepends [`ROOT_SEGMENT`], lower-cases each segment, replaces characters
/// that cannot appear in a Java identifier and guards keywords.
///
/// ```rust
/// use cfn_java_codegen::generator::derive_namespace;
///
/// let ns = derive_namespace(&["Vendor", "Service", "Resource"]);
/// assert_eq!(ns.dotted(), "com.vendor.service.resource");
/// ```
pub fn derive_namespace<S: AsRef<str>>(type_info: &[S]) -> Namespace {
    let segments = std::iter::once(ROOT_SEGMENT.to_string())
        .chain(
            type_info
                .iter()
                .map(|segment| guard(&legal_segment(&segment.as_ref().to_lowercase()))),
        )
        .collect();
    Namespace { segments }
}

fn legal_segment(segment: &str) -> String {
    let mut legal: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if legal.is_empty() {
        legal.push('_');
    }
    if legal.starts_with(|c: char| c.is_ascii_digit()) {
        legal.insert(0, '_');
    }
    legal
}

/// Validate a user-supplied dotted package name
///
/// Returns the parsed namespace on success. The segments are taken verbatim;
/// no root segment is prepended.
pub fn validate_namespace(value: &str) -> Result<Namespace> {
    let invalid = |reason: String| Error::InvalidNamespace {
        value: value.to_string(),
        reason,
    };

    if value.to_lowercase() != value {
        return Err(invalid("package names must be all lower case".to_string()));
    }

    let mut segments = Vec::new();
    for name in value.split('.') {
        if name.is_empty() {
            return Err(invalid("empty segment".to_string()));
        }
        if is_language_keyword(name) {
            return Err(invalid(format!("'{name}' is a reserved keyword")));
        }
        if !name.starts_with(|c: char| c.is_ascii_lowercase() || c == '_') {
            return Err(invalid(format!(
                "segment '{name}' must begin with a lower case letter or an underscore"
            )));
        }
        if !SEGMENT_RE.is_match(name) {
            return Err(invalid(format!(
                "segment '{name}' should match '{NAMESPACE_SEGMENT_PATTERN}'"
            )));
        }
        segments.push(name.to_string());
    }
    Ok(Namespace { segments })
}
