use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::generated_root;
use crate::error::{Error, Result};
use crate::generator::flatten::flatten;
use crate::generator::operations::Operation;
use crate::generator::resolver::{resolve, ResourceIdentifiers, ROOT_CLASS_NAME};
use crate::generator::templates::{
    render, BaseConfigurationTemplateData, BaseHandlerTemplateData, HandlerBinding,
    HandlerWrapperTemplateData, PojoTemplateData,
};
use crate::project::Project;

/// Regenerate every derived source file from the resource schema
///
/// The generated root is deleted and rebuilt on every call, so a class
/// removed from the schema leaves no file behind and two runs over the same
/// schema produce identical trees. All writes are overwrites.
///
/// Returns the written paths in write order.
///
/// # Errors
///
/// Schema and resolution errors abort before anything is deleted. I/O errors
/// after that point leave the generated root partially written.
pub fn generate(project: &Project) -> Result<Vec<PathBuf>> {
    let namespace = project.namespace()?;
    let schema = project.load_schema()?;
    let graph = flatten(&schema)?;
    let classes = resolve(&graph, ROOT_CLASS_NAME, &namespace)?;
    let identifiers = ResourceIdentifiers::from_schema(&schema)?.bind(&classes);
    info!(
        type_name = %project.type_name(),
        package = %namespace,
        classes = classes.len(),
        "Generating sources"
    );

    let root = generated_root(project.root());
    match fs::remove_dir_all(&root) {
        Ok(()) => debug!(path = %root.display(), "Removed previous generated sources"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(&root, e)),
    }
    let package_dir = root.join(namespace.to_path());
    fs::create_dir_all(&package_dir).map_err(|e| Error::io(&package_dir, e))?;

    let package_name = namespace.dotted();
    let mut written = Vec::with_capacity(classes.len() + 3);

    let wrapper = HandlerWrapperTemplateData {
        package_name: package_name.clone(),
        pojo_name: ROOT_CLASS_NAME.to_string(),
        operations: Operation::ALL.into_iter().map(HandlerBinding::from).collect(),
    };
    emit(
        project,
        &package_dir,
        "HandlerWrapper.java",
        &render("HandlerWrapper.java", &wrapper)?,
        &mut written,
    )?;

    let base_configuration = BaseConfigurationTemplateData {
        package_name: package_name.clone(),
    };
    emit(
        project,
        &package_dir,
        "BaseConfiguration.java",
        &render("BaseConfiguration.java", &base_configuration)?,
        &mut written,
    )?;

    let base_handler = BaseHandlerTemplateData {
        package_name,
        pojo_name: ROOT_CLASS_NAME.to_string(),
    };
    emit(
        project,
        &package_dir,
        "BaseHandler.java",
        &render("BaseHandler.java", &base_handler)?,
        &mut written,
    )?;

    let identifier_keys = identifiers.all_keys();
    for class in classes.values() {
        let pojo = PojoTemplateData::new(
            project.type_name(),
            class,
            &identifiers.primary,
            &identifiers.additional,
            identifier_keys.clone(),
        );
        emit(
            project,
            &package_dir,
            &format!("{}.java", class.name),
            &render("POJO.java", &pojo)?,
            &mut written,
        )?;
    }

    info!(files = written.len(), path = %root.display(), "Generation complete");
    Ok(written)
}

fn emit(
    project: &Project,
    dir: &Path,
    file_name: &str,
    contents: &str,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = dir.join(file_name);
    project.overwrite(&path, contents)?;
    written.push(path);
    Ok(())
}
