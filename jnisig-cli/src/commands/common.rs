use std::path::{Path, PathBuf};

use anyhow::Context;
use jnisig::{
    types::{ArchiveSource, JNI_ARCHIVE_NAME},
    ProgramDatabase, TypeArchive, TypeManager,
};

/// Open the JNI type archive: the bundled one, or `path` if given.
pub fn load_archive<'a>(
    manager: &'a mut TypeManager,
    path: Option<&Path>,
) -> anyhow::Result<&'a TypeArchive> {
    let source = path.map_or(ArchiveSource::Bundled, |p| {
        ArchiveSource::File(PathBuf::from(p))
    });
    manager
        .get_or_open(JNI_ARCHIVE_NAME, &source)
        .with_context(|| format!("failed to load type archive: {source:?}"))
}

/// Load a program snapshot.
pub fn load_program(path: &Path) -> anyhow::Result<ProgramDatabase> {
    ProgramDatabase::from_path(path)
        .with_context(|| format!("failed to load program snapshot: {}", path.display()))
}
