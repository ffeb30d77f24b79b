use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{BUILD_DESCRIPTOR, GENERATED_ROOT};
use crate::error::{Error, Result};
use crate::packager::{assemble, find_artifact};
use crate::project::Project;

/// Zip the build artifact with the build descriptor and source trees
///
/// Entries are written in this order: the artifact, `pom.xml`, everything
/// under `src/`, everything under `target/generated-sources/`. The generated
/// sources are included even though a build can recreate them.
///
/// # Errors
///
/// Fails without creating `archive_path` when the artifact is missing or
/// ambiguous, or when `archive_path` would land on a packaged file or inside a
/// packaged tree. Any I/O failure while writing aborts packaging.
pub fn package(project: &Project, archive_path: &Path) -> Result<()> {
    let root = project.root();
    let artifact = find_artifact(root, &project.hyphenated_name())?;
    info!(
        artifact = %artifact.display(),
        archive = %archive_path.display(),
        "Packaging project"
    );

    let paths = vec![
        artifact,
        root.join(BUILD_DESCRIPTOR),
        root.join("src"),
        root.join(GENERATED_ROOT[0]).join(GENERATED_ROOT[1]),
    ];
    check_archive_location(archive_path, &paths)?;
    let file = File::create(archive_path).map_err(|e| Error::io(archive_path, e))?;
    let file = assemble(file, root, &paths)?;
    file.sync_all().map_err(|e| Error::io(archive_path, e))?;

    info!(archive = %archive_path.display(), "Package complete");
    Ok(())
}

/// Reject an archive path that is one of `paths` or under one of them
///
/// Paths that do not exist yet cannot be compared and are left for the
/// writers to report.
fn check_archive_location(archive_path: &Path, paths: &[PathBuf]) -> Result<()> {
    let parent = match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let (Ok(dir), Some(file_name)) = (parent.canonicalize(), archive_path.file_name()) else {
        return Ok(());
    };
    let archive = dir.join(file_name);
    for path in paths {
        let Ok(path) = path.canonicalize() else {
            continue;
        };
        if archive == path || (path.is_dir() && archive.starts_with(&path)) {
            return Err(Error::ArchiveInsideSources(archive_path.to_path_buf()));
        }
    }
    Ok(())
}
