//! The three project phases
//!
//! - [`init`] writes the scaffold once, with safe-writes only
//! - [`generate`] wipes and rebuilds the generated source root, with overwrites only
//! - [`package`] zips the single build artifact together with the sources
//!
//! Phases are independent: each one reloads what it needs from the
//! [`Project`](crate::project::Project) and recomputes the namespace.

mod generate;
mod init;
mod package;

use std::path::{Path, PathBuf};

use super::namespace::Namespace;

pub use generate::generate;
pub use init::init;
pub use package::package;

/// Runtime identifier written to the deployment descriptor
pub const RUNTIME: &str = "java8";

/// Class holding the runtime entrypoint
pub const ENTRYPOINT_CLASS: &str = "HandlerWrapper";

pub const ENTRYPOINT_METHOD: &str = "handleRequest";

/// Executable the Maven build invokes to regenerate sources
pub const EXECUTABLE: &str = "cfn-java-gen";

pub const BUILD_DESCRIPTOR: &str = "pom.xml";

/// Directory of the generated source root, relative to the project root
pub const GENERATED_ROOT: [&str; 3] = ["target", "generated-sources", "rpdk"];

/// `<package>.HandlerWrapper::handleRequest`
pub fn entrypoint(namespace: &Namespace) -> String {
    format!("{namespace}.{ENTRYPOINT_CLASS}::{ENTRYPOINT_METHOD}")
}

/// Location of the built handler jar as seen by the deployment descriptor
pub fn code_uri(hyphenated_name: &str) -> String {
    format!("./target/{hyphenated_name}-handler-1.0-SNAPSHOT.jar")
}

/// The directory wholly owned by [`generate`]
pub fn generated_root(root: &Path) -> PathBuf {
    GENERATED_ROOT.iter().fold(root.to_path_buf(), |path, segment| path.join(segment))
}

pub fn main_source_dir(root: &Path, namespace: &Namespace) -> PathBuf {
    root.join("src").join("main").join("java").join(namespace.to_path())
}

pub fn test_source_dir(root: &Path, namespace: &Namespace) -> PathBuf {
    root.join("src").join("test").join("java").join(namespace.to_path())
}
