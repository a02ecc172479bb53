//! Data types and type archives.
//!
//! Parameter types are never constructed ad hoc. They are looked up by key in a
//! [`TypeArchive`], the same way a disassembler resolves types from a loaded data type
//! archive. The JNI archive shipped with this crate lives in [`bundled`].
//!
//! # Key Components
//!
//! - [`DataType`] - A named type inside a category, e.g. `/jni_all.h/jobject`
//! - [`TypeKind`] - Coarse classification of a type
//! - [`TypeArchive`] - A named, identified collection of data types
//! - [`TypeManager`] - Registry of the archives open in a session
//!
//! # Examples
//!
//! ```rust
//! use jnisig::types::{ArchiveSource, TypeManager, JNI_ARCHIVE_NAME};
//!
//! let mut manager = TypeManager::new();
//! let archive = manager.get_or_open(JNI_ARCHIVE_NAME, &ArchiveSource::Bundled)?;
//! let env = archive.resolve("JNIEnv *")?;
//! assert_eq!(env.path(), "/jni_all.h/JNIEnv *");
//! # Ok::<(), jnisig::Error>(())
//! ```

mod archive;
pub mod bundled;
mod manager;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use archive::TypeArchive;
pub use manager::{ArchiveSource, TypeManager};

/// Name of the JNI type archive.
pub const JNI_ARCHIVE_NAME: &str = "jni_all";

/// Category holding every type of the JNI archive.
pub const JNI_CATEGORY: &str = "jni_all.h";

/// Coarse classification of a [`DataType`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeKind {
    /// Integer, floating point or boolean scalar
    Primitive,
    /// Pointer to another type
    Pointer,
    /// Alias of another type
    Typedef,
    /// Structure
    Struct,
    /// The `void` type
    Void,
}

/// A data type resolved from a type archive.
///
/// Types are identified by their path, `/<category>/<name>`. Two types with the same
/// path are the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    /// Display name, also the lookup key within the category (e.g. `JNIEnv *`)
    pub name: String,
    /// Category the type belongs to, without slashes (e.g. `jni_all.h`)
    pub category: String,
    /// Classification
    pub kind: TypeKind,
    /// Size in bytes. `None` for pointer-sized and incomplete types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl DataType {
    /// Create a new data type.
    pub fn new<N: Into<String>, C: Into<String>>(
        name: N,
        category: C,
        kind: TypeKind,
        size: Option<u32>,
    ) -> Self {
        DataType {
            name: name.into(),
            category: category.into(),
            kind,
            size,
        }
    }

    /// Full path of the type, `/<category>/<name>`.
    pub fn path(&self) -> String {
        type_path(&self.category, &self.name)
    }
}

/// Build the archive path of `name` inside `category`.
pub fn type_path(category: &str, name: &str) -> String {
    format!("/{}/{}", category, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn data_type_path() {
        let dt = DataType::new("JNIEnv *", JNI_CATEGORY, TypeKind::Pointer, None);
        assert_eq!(dt.path(), "/jni_all.h/JNIEnv *");
    }

    #[test]
    fn type_kind_strings() {
        assert_eq!(TypeKind::Pointer.to_string(), "pointer");
        assert_eq!(TypeKind::from_str("typedef").unwrap(), TypeKind::Typedef);
        assert!(TypeKind::from_str("union").is_err());
    }
}
