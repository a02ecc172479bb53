//! Native method descriptions.
//!
//! A method catalog is the JSON document that drives a signature run. It lists every
//! native method of interest together with the Java-level types of its declared
//! arguments:
//!
//! ```json
//! {
//!   "methods": [
//!     { "methodName": "com.example.Foo.bar", "argumentTypes": ["jint", "jstring"] }
//!   ]
//! }
//! ```
//!
//! The implicit `JNIEnv *` and `jobject` arguments are not listed; they are added by
//! [`crate::SignatureApplier`] when the signature is applied.
//!
//! # Examples
//!
//! ```rust
//! use jnisig::MethodCatalog;
//!
//! let catalog = MethodCatalog::from_str(
//!     r#"{ "methods": [ { "methodName": "a.b.C.method", "argumentTypes": [] } ] }"#,
//! )?;
//! assert_eq!(catalog.methods()[0].symbol_name(), "Java_a_b_C_method");
//! # Ok::<(), jnisig::Error>(())
//! ```

use std::{fs, io::Read, path::Path};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Prefix of every statically registered JNI native method symbol.
pub const JNI_SYMBOL_PREFIX: &str = "Java_";

/// One native method: its fully qualified dotted name and its declared argument types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Dotted method name, e.g. `com.example.Foo.bar`
    pub method_name: String,
    /// Type names of the declared arguments, in order. Each must be a key of the type archive.
    pub argument_types: Vec<String>,
}

impl MethodDescriptor {
    /// Create a descriptor from a dotted method name and its argument type names.
    pub fn new<S: Into<String>>(method_name: S, argument_types: Vec<String>) -> Self {
        MethodDescriptor {
            method_name: method_name.into(),
            argument_types,
        }
    }

    /// The native symbol name this method is expected to be exported under.
    ///
    /// See [`derive_symbol_name`].
    pub fn symbol_name(&self) -> String {
        derive_symbol_name(&self.method_name)
    }
}

/// Map a dotted Java method name to its short-form JNI symbol name.
///
/// Every `.` becomes `_` and the result is prefixed with `Java_`. Underscores already
/// present in class or method names are not escaped, and no overload suffix is
/// produced, so overloaded natives will not match.
///
/// ```rust
/// use jnisig::derive_symbol_name;
///
/// assert_eq!(derive_symbol_name("com.example.Foo.bar"), "Java_com_example_Foo_bar");
/// ```
pub fn derive_symbol_name(method_name: &str) -> String {
    let parts: Vec<&str> = method_name.split('.').collect();
    format!("{}{}", JNI_SYMBOL_PREFIX, parts.join("_"))
}

/// The decoded contents of a method description file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCatalog {
    methods: Vec<MethodDescriptor>,
}

impl MethodCatalog {
    /// Build a catalog from already decoded descriptors.
    pub fn new(methods: Vec<MethodDescriptor>) -> Self {
        MethodCatalog { methods }
    }

    /// Load a catalog from a JSON file on disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can not be read and
    /// [`crate::Error::Json`] if it is not a valid method catalog.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_str(&data)
    }

    /// Parse a catalog from a JSON string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] if the document is malformed.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Parse a catalog from any reader.
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] if the document is malformed or the reader fails.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// All descriptors, in file order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if the catalog describes no methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Iterate over descriptors in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, MethodDescriptor> {
        self.methods.iter()
    }
}

impl<'a> IntoIterator for &'a MethodCatalog {
    type Item = &'a MethodDescriptor;
    type IntoIter = std::slice::Iter<'a, MethodDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.methods.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn derive_symbol_name_joins_and_prefixes() {
        assert_eq!(derive_symbol_name("a.b.C.method"), "Java_a_b_C_method");
        assert_eq!(
            derive_symbol_name("com.example.Foo.bar"),
            "Java_com_example_Foo_bar"
        );
    }

    #[test]
    fn derive_symbol_name_keeps_underscores_unescaped() {
        assert_eq!(
            derive_symbol_name("com.my_app.Native_Lib.do_work"),
            "Java_com_my_app_Native_Lib_do_work"
        );
    }

    #[test]
    fn derive_symbol_name_edge_cases() {
        assert_eq!(derive_symbol_name(""), "Java_");
        assert_eq!(derive_symbol_name("noDots"), "Java_noDots");
        assert_eq!(derive_symbol_name("a..b"), "Java_a__b");
        assert_eq!(derive_symbol_name(".lead"), "Java__lead");
    }

    #[test]
    fn parse_catalog_keeps_file_order() {
        let catalog = MethodCatalog::from_str(
            r#"{
                "methods": [
                    { "methodName": "com.x.Y.foo", "argumentTypes": ["jint", "jstring"] },
                    { "methodName": "com.x.Y.bar", "argumentTypes": [] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.methods()[0].method_name, "com.x.Y.foo");
        assert_eq!(
            catalog.methods()[0].argument_types,
            vec!["jint".to_string(), "jstring".to_string()]
        );
        assert_eq!(catalog.methods()[1].symbol_name(), "Java_com_x_Y_bar");
    }

    #[test]
    fn parse_empty_catalog() {
        let catalog = MethodCatalog::from_str(r#"{ "methods": [] }"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn parse_malformed_catalog() {
        let result = MethodCatalog::from_str(r#"{ "methods": [ { "methodName": 5 } ] }"#);
        assert!(matches!(result, Err(Error::Json(_))));

        let result = MethodCatalog::from_str(r#"{ "methods": [ "#);
        assert!(matches!(result, Err(Error::Json(_))));

        let result = MethodCatalog::from_str(r#"{ "methods": [ { "methodName": "a.b" } ] }"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn missing_file() {
        let result = MethodCatalog::from_path("/nonexistent/methods.json");
        assert!(matches!(result, Err(Error::FileError(_))));
    }
}
