//! Project metadata and file access
//!
//! A project is a directory holding a `.cfn-java.toml` settings file, the
//! resource schema and the generated Maven project. [`Project`] owns the
//! metadata every phase recomputes from, and the two write modes:
//!
//! - [`Project::safe_write`] never clobbers a file a user may have edited
//! - [`Project::overwrite`] always replaces

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generator::{derive_namespace, validate_namespace, Namespace};

/// Settings file name, relative to the project root
pub const SETTINGS_FILENAME: &str = ".cfn-java.toml";

/// First line of every file the `generate` phase owns
pub const GENERATED_MARKER: &str = "// This is a generated file. Modifications will be overwritten.";

const LANGUAGE: &str = "java";

#[allow(clippy::expect_used)]
static TYPE_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{2,64}$").expect("valid type segment pattern"));

/// Persisted project settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Resource type name, e.g. `Vendor::Service::Resource`
    pub type_name: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Runtime identifier declared by `init`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Handler entrypoint declared by `init`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    /// User-chosen Java package, overriding derivation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Schema file name relative to the root, overriding the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_file: Option<String>,
}

fn default_language() -> String {
    LANGUAGE.to_string()
}

/// A resource provider project rooted at a directory
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    settings: ProjectSettings,
    type_info: Vec<String>,
}

impl Project {
    /// Create project metadata for a new project
    ///
    /// Nothing is written; call [`Project::save`] to persist the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTypeName`] if `type_name` has no segments or a
    /// segment is not 2-64 alphanumeric characters.
    pub fn new(root: impl Into<PathBuf>, type_name: &str) -> Result<Self> {
        let settings = ProjectSettings {
            type_name: type_name.to_string(),
            language: default_language(),
            runtime: None,
            entrypoint: None,
            namespace: None,
            schema_file: None,
        };
        Self::from_settings(root.into(), settings)
    }

    /// Load an existing project from its settings file
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProjectNotInitialized`] if there is no settings file,
    /// and [`Error::Settings`] if it cannot be parsed.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let path = root.join(SETTINGS_FILENAME);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ProjectNotInitialized(path));
            }
            Err(e) => return Err(Error::io(path, e)),
        };
        let settings: ProjectSettings = toml::from_str(&contents).map_err(|e| Error::Settings {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), type_name = %settings.type_name, "Loaded project settings");
        Self::from_settings(root, settings)
    }

    fn from_settings(root: PathBuf, settings: ProjectSettings) -> Result<Self> {
        let type_info = parse_type_name(&settings.type_name)?;
        Ok(Self {
            root,
            settings,
            type_info,
        })
    }

    /// Persist the settings file, replacing any previous one
    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.settings).map_err(|e| Error::Settings {
            path: self.settings_path(),
            reason: e.to_string(),
        })?;
        self.overwrite(&self.settings_path(), &contents)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILENAME)
    }

    pub fn type_name(&self) -> &str {
        &self.settings.type_name
    }

    /// Type name segments, e.g. `["Vendor", "Service", "Resource"]`
    pub fn type_info(&self) -> &[String] {
        &self.type_info
    }

    /// `vendor-service-resource`
    pub fn hyphenated_name(&self) -> String {
        self.type_info.join("-").to_lowercase()
    }

    pub fn schema_filename(&self) -> String {
        self.settings
            .schema_file
            .clone()
            .unwrap_or_else(|| format!("{}.json", self.hyphenated_name().replace('-', "")))
    }

    pub fn schema_path(&self) -> PathBuf {
        self.root.join(self.schema_filename())
    }

    pub fn runtime(&self) -> Option<&str> {
        self.settings.runtime.as_deref()
    }

    pub fn entrypoint(&self) -> Option<&str> {
        self.settings.entrypoint.as_deref()
    }

    pub fn set_runtime(&mut self, runtime: impl Into<String>) {
        self.settings.runtime = Some(runtime.into());
    }

    pub fn set_entrypoint(&mut self, entrypoint: impl Into<String>) {
        self.settings.entrypoint = Some(entrypoint.into());
    }

    /// Record a user-chosen package
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNamespace`] if the value fails validation.
    pub fn set_namespace(&mut self, namespace: &str) -> Result<()> {
        validate_namespace(namespace)?;
        self.settings.namespace = Some(namespace.to_string());
        Ok(())
    }

    /// The Java package for this project
    ///
    /// Recomputed on every call: a user-chosen package from the settings wins,
    /// otherwise the package is derived from the type name.
    pub fn namespace(&self) -> Result<Namespace> {
        match &self.settings.namespace {
            Some(chosen) => validate_namespace(chosen),
            None => Ok(derive_namespace(&self.type_info)),
        }
    }

    /// Parse the resource schema, keeping declaration order
    pub fn load_schema(&self) -> Result<Value> {
        let path = self.schema_path();
        let contents = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        serde_json::from_str(&contents).map_err(|source| Error::Json { path, source })
    }

    /// Write `contents` to `path` unless a user-owned file is already there
    ///
    /// An existing file whose first line is [`GENERATED_MARKER`] is
    /// generator-owned and gets replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileExists`] when a user-owned file is in the way.
    pub fn safe_write(&self, path: &Path, contents: &str) -> Result<()> {
        create_parent(path)?;
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())
                    .map_err(|e| Error::io(path, e))?;
                debug!(path = %path.display(), "Wrote new file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if is_generator_owned(path)? {
                    self.overwrite(path, contents)
                } else {
                    Err(Error::FileExists(path.to_path_buf()))
                }
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Write `contents` to `path`, replacing whatever is there
    pub fn overwrite(&self, path: &Path, contents: &str) -> Result<()> {
        create_parent(path)?;
        fs::write(path, contents).map_err(|e| Error::io(path, e))?;
        debug!(path = %path.display(), "Overwrote file");
        Ok(())
    }

    /// Write a starter resource schema if the project has none yet
    ///
    /// Returns whether a file was written.
    pub fn write_example_schema_if_missing(&self, contents: &str) -> Result<bool> {
        let path = self.schema_path();
        if path.exists() {
            return Ok(false);
        }
        self.safe_write(&path, contents)?;
        Ok(true)
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

fn is_generator_owned(path: &Path) -> Result<bool> {
    let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|e| Error::io(path, e))?;
    Ok(first.trim_end() == GENERATED_MARKER)
}

/// Split a resource type name on `::`, `:` or `.` and validate each segment
///
/// ```rust
/// use cfn_java_codegen::project::parse_type_name;
///
/// assert_eq!(parse_type_name("Vendor::Service::Resource").unwrap(), ["Vendor", "Service", "Resource"]);
/// assert_eq!(parse_type_name("vendor.service.resource").unwrap(), ["vendor", "service", "resource"]);
/// assert!(parse_type_name("Vendor::S").is_err());
/// ```
pub fn parse_type_name(type_name: &str) -> Result<Vec<String>> {
    let invalid = |reason: String| Error::InvalidTypeName {
        value: type_name.to_string(),
        reason,
    };
    let segments: Vec<String> = type_name
        .split([':', '.'])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if segments.is_empty() {
        return Err(invalid("expected segments like 'Vendor::Service::Resource'".to_string()));
    }
    if let Some(bad) = segments.iter().find(|s| !TYPE_SEGMENT_RE.is_match(s)) {
        return Err(invalid(format!(
            "segment '{bad}' must be 2-64 alphanumeric characters"
        )));
    }
    Ok(segments)
}
