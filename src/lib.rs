// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # jnisig
//!
//! Apply JNI native method signatures to the functions of a disassembled Android
//! native library.
//!
//! Statically registered native methods are exported under names such as
//! `Java_com_example_Foo_bar`, and a disassembler only sees them as functions with
//! untyped register arguments. Given a list of the Java-side methods and their argument
//! types, `jnisig` finds the matching functions and rewrites their parameter lists to
//! `(JNIEnv *env, jobject thiz, a0, a1, ...)` with proper JNI types. `JNI_OnLoad` gets
//! its `JavaVM *vm` parameter as well.
//!
//! ## Architecture
//!
//! - [`catalog`] - Method description file ([`MethodCatalog`]) and symbol name derivation
//! - [`types`] - Data types, type archives and the bundled `jni_all` archive
//! - [`program`] - The [`program::Program`] host trait and the in-memory [`ProgramDatabase`]
//! - [`applier`] - The [`SignatureApplier`] itself
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jnisig::prelude::*;
//!
//! let mut types = TypeManager::new();
//! let archive = types.get_or_open(JNI_ARCHIVE_NAME, &ArchiveSource::Bundled)?;
//!
//! let catalog = MethodCatalog::from_path("methods.json")?;
//! let mut program = ProgramDatabase::from_path("libnative.json")?;
//!
//! let report = SignatureApplier::new(archive).run(&mut program, &catalog)?;
//! println!("{} signatures applied", report.applied.len());
//!
//! program.save("libnative.json")?;
//! # Ok::<(), jnisig::Error>(())
//! ```
//!
//! ## Method catalog format
//!
//! ```json
//! { "methods": [ { "methodName": "com.example.Foo.bar", "argumentTypes": ["jint"] } ] }
//! ```
//!
//! Only short-form symbol names are derived: embedded underscores are not escaped and
//! overloaded natives (with a `__<signature>` suffix) are not matched. Descriptors that
//! match no function are skipped.

#[macro_use]
pub(crate) mod error;

pub mod applier;
pub mod catalog;
pub mod prelude;
pub mod program;
pub mod types;

/// `jnisig` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `jnisig` Error type
///
/// Covers I/O and parse failures, type resolution failures and program model
/// update failures.
pub use error::Error;

pub use applier::{ApplyReport, FunctionIndex, SignatureApplier};
pub use catalog::{derive_symbol_name, MethodCatalog, MethodDescriptor};
pub use program::ProgramDatabase;
pub use types::{TypeArchive, TypeManager};
