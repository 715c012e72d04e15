//! Packaging generated components: zip archive, single-file export and
//! on-disk persistence.

use std::io::{Cursor, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::artifact::{GeneratedArtifact, ARTIFACT_EXTENSION};
use crate::error::{BuildError, Result};

/// Root folder (and archive stem) used when no project name is given.
pub const FALLBACK_PROJECT_NAME: &str = "figma-components";

pub const SINGLE_FILE_CONTENT_TYPE: &str = "text/plain";

/// One exported file, ready to be written or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Folder name inside the archive: the project name, or the fallback when blank.
pub fn project_folder(project_name: &str) -> &str {
    let trimmed = project_name.trim();
    if trimmed.is_empty() {
        FALLBACK_PROJECT_NAME
    } else {
        trimmed
    }
}

pub fn archive_file_name(project_name: &str) -> String {
    format!("{}.zip", project_folder(project_name))
}

/// Zip every artifact under `<project>/`.
pub fn to_archive(project_name: &str, artifacts: &[GeneratedArtifact]) -> Result<Vec<u8>> {
    let folder = project_folder(project_name);
    let mut archive = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut archive));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.add_directory(format!("{folder}/"), options)?;
        for artifact in artifacts {
            zip.start_file(format!("{folder}/{}", artifact.name), options)?;
            zip.write_all(artifact.code.as_bytes())?;
        }
        zip.finish()?;
    }
    debug!(folder, files = artifacts.len(), bytes = archive.len(), "archive built");
    Ok(archive)
}

/// The artifact's code as-is, typed as plain text.
pub fn to_single_file(artifact: &GeneratedArtifact) -> ExportedFile {
    ExportedFile {
        file_name: artifact.name.clone(),
        content_type: SINGLE_FILE_CONTENT_TYPE,
        bytes: artifact.code.as_bytes().to_vec(),
    }
}

/// Write `<root>/<project>/<component>.tsx`, creating directories as needed.
pub fn save_artifact(
    root: &Path,
    project_name: &str,
    component_name: &str,
    code: &str,
) -> Result<PathBuf> {
    let project = plain_name(project_name, "project name")?;
    let component = plain_name(component_name, "component name")?;

    let dir = root.join(project);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{component}.{ARTIFACT_EXTENSION}"));
    std::fs::write(&path, code)?;
    debug!(path = %path.display(), "component saved");
    Ok(path)
}

/// Reject names that would escape their directory.
fn plain_name<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !value.contains(['/', '\\']) => Ok(value),
        _ => Err(BuildError::Config(format!("Invalid {what} '{value}'"))),
    }
}
