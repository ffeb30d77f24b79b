//! Build artifact discovery and archive assembly
//!
//! [`find_artifact`] locates the one jar the build produced; [`assemble`]
//! writes files and directory trees into a zip keyed by their path relative
//! to the project root. Nothing is skipped: any unreadable file or walk
//! error aborts the archive.

use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use globset::Glob;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Build output directory, relative to the project root
pub const BUILD_DIR: &str = "target";

/// File name pattern of the build artifact for a hyphenated project name
pub fn artifact_pattern(hyphenated_name: &str) -> String {
    format!("{hyphenated_name}-*-SNAPSHOT.jar")
}

/// Find the single build artifact directly inside `<root>/target`
///
/// # Errors
///
/// Returns [`Error::ArtifactNotFound`] when nothing matches (including when
/// the build directory does not exist) and [`Error::AmbiguousArtifact`] when
/// more than one file matches.
pub fn find_artifact(root: &Path, hyphenated_name: &str) -> Result<PathBuf> {
    let dir = root.join(BUILD_DIR);
    let pattern = artifact_pattern(hyphenated_name);
    let matcher = Glob::new(&pattern)
        .map_err(|e| Error::InvalidTypeName {
            value: hyphenated_name.to_string(),
            reason: e.to_string(),
        })?
        .compile_matcher();

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::ArtifactNotFound { dir, pattern });
        }
        Err(e) => return Err(Error::io(&dir, e)),
    };

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&dir, e))?;
        let path = entry.path();
        if path.is_file() && matcher.is_match(entry.file_name()) {
            matches.push(path);
        }
    }
    matches.sort();
    debug!(dir = %dir.display(), pattern = %pattern, matches = matches.len(), "Searched for build artifact");

    match matches.len() {
        0 => Err(Error::ArtifactNotFound { dir, pattern }),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::AmbiguousArtifact(matches)),
    }
}

/// Write `paths` into a new zip archive on `writer`
///
/// Each path must be under `root`. Directories are walked recursively in
/// file-name order; files are stored deflated under their root-relative,
/// `/`-separated name. Returns the writer once the archive is finished.
///
/// # Errors
///
/// Any missing path, unreadable file or walk failure aborts assembly.
pub fn assemble<W: Write + Seek>(writer: W, root: &Path, paths: &[PathBuf]) -> Result<W> {
    let mut archive = Archive::new(writer, root);
    for path in paths {
        if path.is_dir() {
            archive.add_tree(path)?;
        } else {
            archive.add_file(path)?;
        }
    }
    archive.finish()
}

struct Archive<'a, W: Write + Seek> {
    zip: ZipWriter<W>,
    root: &'a Path,
    options: FileOptions,
    entries: usize,
}

impl<'a, W: Write + Seek> Archive<'a, W> {
    fn new(writer: W, root: &'a Path) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            root,
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        }
    }

    fn add_tree(&mut self, dir: &Path) -> Result<()> {
        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|source| Error::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_dir() {
                self.add_file(entry.path())?;
            }
        }
        Ok(())
    }

    fn add_file(&mut self, path: &Path) -> Result<()> {
        let name = entry_name(self.root, path)?;
        let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
        self.zip
            .start_file(name.clone(), self.options)
            .map_err(|source| Error::Archive {
                entry: name.clone(),
                source,
            })?;
        io::copy(&mut file, &mut self.zip).map_err(|e| Error::io(path, e))?;
        self.entries += 1;
        debug!(entry = %name, "Added archive entry");
        Ok(())
    }

    fn finish(mut self) -> Result<W> {
        let writer = self.zip.finish().map_err(|source| Error::Archive {
            entry: "<central directory>".to_string(),
            source,
        })?;
        debug!(entries = self.entries, "Finished archive");
        Ok(writer)
    }
}

/// Root-relative archive entry name with `/` separators
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        Error::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path is outside the project root"),
        )
    })?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}
