use askama::Template;

use super::operations::{Operation, ReturnShape};
use super::resolver::{IdentifierGroup, IdentifierKey, ResolvedClass, ResolvedProperty};
use crate::error::{Error, Result};

/// One `Action -> handler` binding in the handler wrapper
#[derive(Debug, Clone)]
pub struct HandlerBinding {
    /// `CREATE`, `READ`, ...
    pub action: &'static str,
    /// `CreateHandler`, `ReadHandler`, ...
    pub handler_class: String,
}

impl From<Operation> for HandlerBinding {
    fn from(op: Operation) -> Self {
        Self {
            action: op.action(),
            handler_class: op.handler_class(),
        }
    }
}

/// Template for the scaffold `.gitignore`
#[derive(Template)]
#[template(path = "java.gitignore", escape = "none")]
pub struct GitignoreTemplate;

/// Template for the fixed Lombok configuration
#[derive(Template)]
#[template(path = "lombok.config", escape = "none")]
pub struct LombokConfigTemplate;

/// Template data for the Maven build descriptor
#[derive(Template)]
#[template(path = "pom.xml", escape = "none")]
pub struct PomTemplateData {
    /// Maven group id, the dotted package
    pub group_id: String,
    /// `<hyphenated-name>-handler`
    pub artifact_id: String,
    /// Name of the generator executable, invoked from the build
    pub executable: String,
    /// Generated source root relative to the project
    pub generated_sources: String,
    pub schema_file_name: String,
}

/// Template data for the deployment descriptor
#[derive(Template)]
#[template(path = "template.yml", escape = "none")]
pub struct DeploymentTemplateData {
    pub resource_type: String,
    /// `<package>.HandlerWrapper::handleRequest`
    pub handler: String,
    pub runtime: String,
    pub code_uri: String,
}

#[derive(Template)]
#[template(path = "README.md", escape = "none")]
pub struct ReadmeTemplateData {
    pub type_name: String,
    pub schema_path: String,
    pub executable: String,
}

/// Template data for classes that only need their package
#[derive(Template)]
#[template(path = "CallbackContext.java", escape = "none")]
pub struct CallbackContextTemplateData {
    pub package_name: String,
}

#[derive(Template)]
#[template(path = "StubConfiguration.java", escape = "none")]
pub struct StubConfigurationTemplateData {
    pub package_name: String,
    pub schema_file_name: String,
}

/// Template data for a stub handler returning a single model
#[derive(Template)]
#[template(path = "StubHandler.java", escape = "none")]
pub struct StubHandlerTemplateData {
    pub package_name: String,
    /// Operation name, e.g. `Create`
    pub operation: String,
    pub pojo_name: String,
}

/// Template data for the list stub handler, which returns a page of models
#[derive(Template)]
#[template(path = "StubListHandler.java", escape = "none")]
pub struct StubListHandlerTemplateData {
    pub package_name: String,
    pub operation: String,
    pub pojo_name: String,
}

#[derive(Template)]
#[template(path = "StubHandlerTest.java", escape = "none")]
pub struct StubHandlerTestTemplateData {
    pub package_name: String,
    pub operation: String,
    pub pojo_name: String,
}

#[derive(Template)]
#[template(path = "StubListHandlerTest.java", escape = "none")]
pub struct StubListHandlerTestTemplateData {
    pub package_name: String,
    pub operation: String,
    pub pojo_name: String,
}

/// Template data for the handler wrapper entrypoint
///
/// Binds every operation to its handler, typed on the root class.
#[derive(Template)]
#[template(path = "HandlerWrapper.java", escape = "none")]
pub struct HandlerWrapperTemplateData {
    pub package_name: String,
    pub pojo_name: String,
    pub operations: Vec<HandlerBinding>,
}

#[derive(Template)]
#[template(path = "BaseConfiguration.java", escape = "none")]
pub struct BaseConfigurationTemplateData {
    pub package_name: String,
}

#[derive(Template)]
#[template(path = "BaseHandler.java", escape = "none")]
pub struct BaseHandlerTemplateData {
    pub package_name: String,
    pub pojo_name: String,
}

/// Template data for one resolved class
///
/// Identifier constants and accessors are only emitted for the root class.
#[derive(Template)]
#[template(path = "POJO.java", escape = "none")]
pub struct PojoTemplateData {
    pub type_name: String,
    pub package_name: String,
    pub pojo_name: String,
    pub is_root: bool,
    pub properties: Vec<ResolvedProperty>,
    pub identifier_keys: Vec<IdentifierKey>,
    pub primary: Vec<IdentifierKey>,
    pub additional: Vec<IdentifierGroup>,
}

impl PojoTemplateData {
    /// Bindings for `class`; `identifiers` only apply when it is the root
    pub fn new(
        type_name: &str,
        class: &ResolvedClass,
        primary: &[IdentifierKey],
        additional: &[IdentifierGroup],
        identifier_keys: Vec<IdentifierKey>,
    ) -> Self {
        let is_root = class.is_root();
        Self {
            type_name: type_name.to_string(),
            package_name: class.namespace.dotted(),
            pojo_name: class.name.clone(),
            is_root,
            properties: class.properties.clone(),
            identifier_keys: if is_root { identifier_keys } else { Vec::new() },
            primary: if is_root { primary.to_vec() } else { Vec::new() },
            additional: if is_root { additional.to_vec() } else { Vec::new() },
        }
    }
}

/// Starter resource schema for a new project
#[derive(Template)]
#[template(path = "resource-schema.json", escape = "none")]
pub struct ExampleSchemaTemplateData {
    pub type_name: String,
}

/// Render `template`, tagging failures with the template's file name
///
/// # Errors
///
/// Returns [`Error::Template`] if rendering fails.
pub fn render<T: Template>(name: &'static str, template: &T) -> Result<String> {
    template.render().map_err(|e| Error::template(name, e))
}

/// Render the stub handler for `op`, picking the template by return shape
pub fn render_stub_handler(package_name: &str, op: Operation, pojo_name: &str) -> Result<String> {
    let (package_name, operation, pojo_name) = (
        package_name.to_string(),
        op.name().to_string(),
        pojo_name.to_string(),
    );
    match op.shape() {
        ReturnShape::Single => render(
            "StubHandler.java",
            &StubHandlerTemplateData {
                package_name,
                operation,
                pojo_name,
            },
        ),
        ReturnShape::Collection => render(
            "StubListHandler.java",
            &StubListHandlerTemplateData {
                package_name,
                operation,
                pojo_name,
            },
        ),
    }
}

/// Render the stub test for `op`, picking the template by return shape
pub fn render_stub_test(package_name: &str, op: Operation, pojo_name: &str) -> Result<String> {
    let (package_name, operation, pojo_name) = (
        package_name.to_string(),
        op.name().to_string(),
        pojo_name.to_string(),
    );
    match op.shape() {
        ReturnShape::Single => render(
            "StubHandlerTest.java",
            &StubHandlerTestTemplateData {
                package_name,
                operation,
                pojo_name,
            },
        ),
        ReturnShape::Collection => render(
            "StubListHandlerTest.java",
            &StubListHandlerTestTemplateData {
                package_name,
                operation,
                pojo_name,
            },
        ),
    }
}
