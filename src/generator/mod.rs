//! # Generator Module
//!
//! Turns a resource schema into Java sources and a Maven project scaffold.
//!
//! ## Pipeline
//!
//! ```text
//! type name ──► derive_namespace ──────────────┐
//!                                              ▼
//! schema ──► flatten ──► FlattenedGraph ──► resolve ──► ResolvedClasses ──► templates
//! ```
//!
//! 1. **Reserved-word guard** ([`guard`]) - suffixes Java keywords and
//!    domain-reserved names with `_`
//! 2. **Namespace** ([`derive_namespace`], [`validate_namespace`]) - the Java
//!    package, derived from the type name or chosen by the user
//! 3. **Flattening** ([`flatten()`]) - hoists nested and referenced object
//!    schemas into an ordered graph
//! 4. **Resolution** ([`resolve`]) - one collision-free class per flattened
//!    object, with guarded property identifiers
//! 5. **Lifecycle** ([`init`], [`generate`], [`package`]) - renders Askama
//!    templates and writes them through the [`Project`](crate::project::Project)
//!
//! ## Generated Structure
//!
//! ```text
//! project/
//! ├── .cfn-java.toml                 # project settings
//! ├── pom.xml                        # init, safe-write
//! ├── template.yml                   # init, safe-write
//! ├── src/main/java/<package>/       # stub handlers, CallbackContext, Configuration
//! ├── src/test/java/<package>/       # stub handler tests
//! └── target/generated-sources/rpdk/ # generate, wiped and rewritten every run
//!     └── <package>/
//!         ├── HandlerWrapper.java
//!         ├── BaseConfiguration.java
//!         ├── BaseHandler.java
//!         └── ResourceModel.java, ...
//! ```

pub mod flatten;
pub mod lifecycle;
pub mod namespace;
pub mod operations;
pub mod reserved;
pub mod resolver;
pub mod templates;

#[cfg(test)]
mod tests;

pub use flatten::{
    flatten, FlatProperty, FlatType, FlattenedGraph, FlattenedObject, ObjectKey, Primitive,
};
pub use lifecycle::{generate, init, package};
pub use namespace::{derive_namespace, validate_namespace, Namespace, ROOT_SEGMENT};
pub use operations::{Operation, ReturnShape};
pub use reserved::{guard, is_reserved, GUARD_MARKER};
pub use resolver::{
    property_ident, resolve, JavaType, ResolvedClass, ResolvedClasses, ResolvedProperty,
    ResourceIdentifiers, ROOT_CLASS_NAME,
};
