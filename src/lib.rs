//! # cfn-java-codegen
//!
//! Generates Java 8 / Maven resource provider projects from a declarative
//! resource schema: Lombok data classes for every object in the schema, a
//! handler wrapper entrypoint, a one-time project scaffold, and a deployable
//! zip of the built jar.
//!
//! ## Architecture
//!
//! - **[`generator`]** - reserved-word guarding, namespace derivation, schema
//!   flattening, class resolution and the `init` / `generate` / `package`
//!   lifecycle
//! - **[`project`]** - project settings and the two write modes (safe-write
//!   and overwrite)
//! - **[`packager`]** - build artifact discovery and zip assembly
//! - **[`error`]** - the crate error type and its user-actionable/internal
//!   classification
//! - **[`logging`]** - `tracing` subscriber setup from the environment
//! - **[`cli`]** - the `cfn-java-gen` command line
//!
//! ## Example
//!
//! ```rust,no_run
//! use cfn_java_codegen::generator;
//! use cfn_java_codegen::project::Project;
//!
//! # fn main() -> cfn_java_codegen::Result<()> {
//! let mut project = Project::new("my-widget", "Example::Widget::Thing")?;
//! generator::init(&mut project)?;
//! generator::generate(&project)?;
//! // ... mvn package ...
//! generator::package(&project, "my-widget/example-widget-thing.zip".as_ref())?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod generator;
pub mod logging;
pub mod packager;
pub mod project;

pub use error::{Error, ErrorKind, Result};
