#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cfn_java_codegen::generator;
use cfn_java_codegen::project::Project;
use serde_json::Value;
use walkdir::WalkDir;

pub const TYPE_NAME: &str = "Vendor::Service::Resource";
pub const HYPHENATED: &str = "vendor-service-resource";
pub const PACKAGE_PATH: &str = "com/vendor/service/resource";

/// A freshly initialized project in `dir`
pub fn init_project(dir: &Path) -> Project {
    let mut project = Project::new(dir, TYPE_NAME).unwrap();
    generator::init(&mut project).unwrap();
    project
}

/// Replace the project's resource schema
pub fn write_schema(project: &Project, schema: &Value) {
    fs::write(
        project.schema_path(),
        serde_json::to_string_pretty(schema).unwrap(),
    )
    .unwrap();
}

/// Every file under `dir`, keyed by its `/`-separated path relative to `dir`
pub fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(dir)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

pub fn generated_package_dir(root: &Path) -> PathBuf {
    generator::lifecycle::generated_root(root).join(PACKAGE_PATH)
}
