use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::{
    code_uri, entrypoint, main_source_dir, test_source_dir, BUILD_DESCRIPTOR, EXECUTABLE,
    GENERATED_ROOT, RUNTIME,
};
use crate::error::{Error, Result};
use crate::generator::operations::Operation;
use crate::generator::resolver::ROOT_CLASS_NAME;
use crate::generator::templates::{
    render, render_stub_handler, render_stub_test, CallbackContextTemplateData,
    DeploymentTemplateData, ExampleSchemaTemplateData, GitignoreTemplate, LombokConfigTemplate,
    PomTemplateData, ReadmeTemplateData, StubConfigurationTemplateData,
};
use crate::project::Project;

/// Write the project scaffold
///
/// Declares the runtime and entrypoint on `project`, writes every scaffold
/// file with [`Project::safe_write`] and finally persists the settings. The
/// first write that finds a user file in the way aborts the phase; files
/// written before it are left in place.
///
/// # Errors
///
/// Returns [`Error::FileExists`] when a scaffold file already exists, and
/// I/O or template errors otherwise.
pub fn init(project: &mut Project) -> Result<()> {
    let namespace = project.namespace()?;
    let package_name = namespace.dotted();
    let handler = entrypoint(&namespace);
    info!(
        type_name = %project.type_name(),
        package = %package_name,
        root = %project.root().display(),
        "Initializing project"
    );

    project.set_runtime(RUNTIME);
    project.set_entrypoint(handler.clone());

    let root = project.root().to_path_buf();
    project.safe_write(&root.join(".gitignore"), &render("java.gitignore", &GitignoreTemplate)?)?;

    let main_dir = main_source_dir(&root, &namespace);
    let test_dir = test_source_dir(&root, &namespace);
    create_dir(&main_dir)?;
    create_dir(&test_dir)?;

    let pom = PomTemplateData {
        group_id: package_name.clone(),
        artifact_id: format!("{}-handler", project.hyphenated_name()),
        executable: EXECUTABLE.to_string(),
        generated_sources: GENERATED_ROOT.join("/"),
        schema_file_name: project.schema_filename(),
    };
    project.safe_write(&root.join(BUILD_DESCRIPTOR), &render("pom.xml", &pom)?)?;
    project.safe_write(
        &root.join("lombok.config"),
        &render("lombok.config", &LombokConfigTemplate)?,
    )?;

    let deployment = DeploymentTemplateData {
        resource_type: project.type_name().to_string(),
        handler,
        runtime: RUNTIME.to_string(),
        code_uri: code_uri(&project.hyphenated_name()),
    };
    project.safe_write(&root.join("template.yml"), &render("template.yml", &deployment)?)?;

    for op in Operation::ALL {
        debug!(operation = %op, shape = ?op.shape(), "Writing stub handler");
        let handler_path = main_dir.join(format!("{}.java", op.handler_class()));
        project.safe_write(
            &handler_path,
            &render_stub_handler(&package_name, op, ROOT_CLASS_NAME)?,
        )?;
        let test_path = test_dir.join(format!("{}.java", op.test_class()));
        project.safe_write(&test_path, &render_stub_test(&package_name, op, ROOT_CLASS_NAME)?)?;
    }

    let callback_context = CallbackContextTemplateData {
        package_name: package_name.clone(),
    };
    project.safe_write(
        &main_dir.join("CallbackContext.java"),
        &render("CallbackContext.java", &callback_context)?,
    )?;

    let configuration = StubConfigurationTemplateData {
        package_name,
        schema_file_name: project.schema_filename(),
    };
    project.safe_write(
        &main_dir.join("Configuration.java"),
        &render("StubConfiguration.java", &configuration)?,
    )?;

    let readme = ReadmeTemplateData {
        type_name: project.type_name().to_string(),
        schema_path: project.schema_filename(),
        executable: EXECUTABLE.to_string(),
    };
    project.safe_write(&root.join("README.md"), &render("README.md", &readme)?)?;

    let schema = ExampleSchemaTemplateData {
        type_name: project.type_name().to_string(),
    };
    if project.write_example_schema_if_missing(&render("resource-schema.json", &schema)?)? {
        info!(path = %project.schema_path().display(), "Wrote example resource schema");
    }

    project.save()?;
    info!(
        entrypoint = project.entrypoint().unwrap_or_default(),
        runtime = project.runtime().unwrap_or_default(),
        "Project initialized"
    );
    Ok(())
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    debug!(path = %dir.display(), "Created directory");
    Ok(())
}
