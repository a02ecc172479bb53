//! Type archives embedded in the crate.
//!
//! `jni_all` carries the types declared by `jni.h`: the primitive `j*` typedefs, the
//! reference types (`jobject`, `jclass`, `jstring`, arrays, ...), `JNIEnv` and `JavaVM`
//! together with their pointer forms, and the method and field ID handles. Everything
//! lives in the `jni_all.h` category.

use crate::{types::TypeArchive, Result};

/// Raw JSON of the `jni_all` archive.
pub const JNI_ALL: &str = include_str!("../../resources/jni_all.json");

/// Parse the embedded `jni_all` archive.
///
/// # Errors
/// Only fails if the embedded resource is corrupt.
pub fn jni_all() -> Result<TypeArchive> {
    TypeArchive::from_str(JNI_ALL)
}
