use std::path::PathBuf;

use crate::{
    types::{bundled, TypeArchive},
    Error, Result,
};

/// Where to load a type archive from when it is not already open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    /// The `jni_all` archive embedded in this crate
    Bundled,
    /// An archive file on disk
    File(PathBuf),
}

/// Registry of the type archives open in a session.
///
/// Archives are looked up by name first, so opening the same archive twice yields the
/// already-open instance. Opening a different archive under a name that is already in
/// use fails with [`Error::DuplicateArchiveId`].
#[derive(Debug, Default)]
pub struct TypeManager {
    archives: Vec<TypeArchive>,
}

impl TypeManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        TypeManager::default()
    }

    /// Names of all open archives, in the order they were opened.
    pub fn names(&self) -> Vec<&str> {
        self.archives.iter().map(TypeArchive::name).collect()
    }

    /// Find an open archive by name.
    pub fn find(&self, name: &str) -> Option<&TypeArchive> {
        self.archives.iter().find(|archive| archive.name() == name)
    }

    /// Register an already loaded archive.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateArchiveId`] if an archive with the same name but a
    /// different id is open.
    pub fn add(&mut self, archive: TypeArchive) -> Result<&TypeArchive> {
        let index = match self.position(archive.name()) {
            Some(index) => {
                let open = &self.archives[index];
                if open.id() != archive.id() {
                    return Err(Error::DuplicateArchiveId {
                        name: archive.name().to_string(),
                        open: open.id(),
                        requested: archive.id(),
                    });
                }
                index
            }
            None => {
                log::debug!("Opened type archive '{}' ({})", archive.name(), archive.id());
                self.archives.push(archive);
                self.archives.len() - 1
            }
        };

        Ok(&self.archives[index])
    }

    /// Load an archive from `source` and register it.
    ///
    /// # Errors
    /// Returns the loading errors of [`TypeArchive`] and the errors of [`TypeManager::add`].
    pub fn open(&mut self, source: &ArchiveSource) -> Result<&TypeArchive> {
        let archive = Self::load(source)?;
        self.add(archive)
    }

    /// Return the open archive called `name`, opening it from `source` if needed.
    ///
    /// # Errors
    /// Fails as [`TypeManager::open`] does. Also returns [`Error::Malformed`] if the
    /// archive loaded from `source` is not called `name`.
    pub fn get_or_open(&mut self, name: &str, source: &ArchiveSource) -> Result<&TypeArchive> {
        if let Some(index) = self.position(name) {
            return Ok(&self.archives[index]);
        }

        let archive = Self::load(source)?;
        if archive.name() != name {
            return Err(malformed_error!(
                "Expected type archive '{}', {:?} provides '{}'",
                name,
                source,
                archive.name()
            ));
        }
        self.add(archive)
    }

    fn load(source: &ArchiveSource) -> Result<TypeArchive> {
        match source {
            ArchiveSource::Bundled => bundled::jni_all(),
            ArchiveSource::File(path) => TypeArchive::from_path(path),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.archives.iter().position(|archive| archive.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JNI_ARCHIVE_NAME;

    fn other_jni_all() -> TypeArchive {
        TypeArchive::new(
            JNI_ARCHIVE_NAME,
            uguid::guid!("AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA"),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn get_or_open_reuses_open_archive() {
        let mut manager = TypeManager::new();
        let first = manager
            .get_or_open(JNI_ARCHIVE_NAME, &ArchiveSource::Bundled)
            .unwrap()
            .id();
        let second = manager
            .get_or_open(
                JNI_ARCHIVE_NAME,
                &ArchiveSource::File("/nonexistent/jni_all.json".into()),
            )
            .unwrap()
            .id();

        assert_eq!(first, second);
        assert_eq!(manager.names(), vec![JNI_ARCHIVE_NAME]);
    }

    #[test]
    fn open_same_archive_twice() {
        let mut manager = TypeManager::new();
        manager.open(&ArchiveSource::Bundled).unwrap();
        manager.open(&ArchiveSource::Bundled).unwrap();
        assert_eq!(manager.names().len(), 1);
    }

    #[test]
    fn conflicting_identity() {
        let mut manager = TypeManager::new();
        manager.add(other_jni_all()).unwrap();

        let result = manager.open(&ArchiveSource::Bundled);
        assert!(matches!(result, Err(Error::DuplicateArchiveId { .. })));
    }

    #[test]
    fn get_or_open_prefers_open_archive_even_with_other_identity() {
        let mut manager = TypeManager::new();
        manager.add(other_jni_all()).unwrap();

        let archive = manager
            .get_or_open(JNI_ARCHIVE_NAME, &ArchiveSource::Bundled)
            .unwrap();
        assert!(archive.is_empty());
    }

    #[test]
    fn missing_resource() {
        let mut manager = TypeManager::new();
        let result = manager.get_or_open(
            JNI_ARCHIVE_NAME,
            &ArchiveSource::File("/nonexistent/jni_all.json".into()),
        );
        assert!(matches!(result, Err(Error::ResourceNotFound(_))));
        assert!(manager.find(JNI_ARCHIVE_NAME).is_none());
    }

    #[test]
    fn wrong_name_from_source() {
        let mut manager = TypeManager::new();
        let result = manager.get_or_open("other", &ArchiveSource::Bundled);
        assert!(matches!(result, Err(Error::Malformed { .. })));
        assert!(manager.names().is_empty());
        assert!(manager.find(JNI_ARCHIVE_NAME).is_none());
    }
}
