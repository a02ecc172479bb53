use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use uguid::Guid;

use crate::{
    types::{type_path, DataType, JNI_CATEGORY},
    Error, Result,
};

/// On-disk layout of a type archive.
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveFile {
    name: String,
    id: String,
    types: Vec<DataType>,
}

/// A named collection of data types with a stable identity.
///
/// The identity (`id`) distinguishes two different archives that happen to share a
/// name; [`crate::types::TypeManager`] refuses to open both at once.
#[derive(Debug, Clone)]
pub struct TypeArchive {
    name: String,
    id: Guid,
    types: BTreeMap<String, DataType>,
}

impl TypeArchive {
    /// Create an archive from its parts.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if two types share the same path.
    pub fn new<S: Into<String>>(name: S, id: Guid, types: Vec<DataType>) -> Result<Self> {
        let name = name.into();
        let mut map = BTreeMap::new();
        for data_type in types {
            let path = data_type.path();
            if map.insert(path.clone(), data_type).is_some() {
                return Err(malformed_error!(
                    "Archive '{}' defines '{}' more than once",
                    name,
                    path
                ));
            }
        }

        Ok(TypeArchive {
            name,
            id,
            types: map,
        })
    }

    /// Load an archive from a JSON file.
    ///
    /// # Errors
    /// Returns [`Error::ResourceNotFound`] if the file does not exist, and the
    /// errors of [`TypeArchive::from_str`] otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ResourceNotFound(path.display().to_string()));
        }

        let data = fs::read_to_string(path)?;
        Self::from_str(&data)
    }

    /// Parse an archive from a JSON string.
    ///
    /// # Errors
    /// Returns [`Error::Json`] for malformed documents and [`Error::Malformed`] for an
    /// invalid id or duplicate type paths.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(data: &str) -> Result<Self> {
        let file: ArchiveFile = serde_json::from_str(data)?;
        let id = Guid::from_str(&file.id)
            .map_err(|_| malformed_error!("Archive '{}' has invalid id '{}'", file.name, file.id))?;

        Self::new(file.name, id, file.types)
    }

    /// Archive name, e.g. `jni_all`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Archive identity.
    pub fn id(&self) -> Guid {
        self.id
    }

    /// Number of types in the archive.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the archive holds no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all types, ordered by path.
    pub fn iter(&self) -> impl Iterator<Item = &DataType> {
        self.types.values()
    }

    /// Look up a type by full path, e.g. `/jni_all.h/jobject`.
    pub fn get_data_type(&self, path: &str) -> Option<&DataType> {
        self.types.get(path)
    }

    /// Resolve a type by its key within the [`JNI_CATEGORY`] category.
    ///
    /// `jobject` resolves `/jni_all.h/jobject`. Types in other categories are only
    /// reachable through [`TypeArchive::get_data_type`].
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] with the full path if the key is unknown.
    pub fn resolve(&self, key: &str) -> Result<DataType> {
        let path = type_path(JNI_CATEGORY, key);
        self.get_data_type(&path)
            .cloned()
            .ok_or(Error::TypeNotFound(path))
    }
}
