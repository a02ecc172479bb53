//! # jnisig Prelude
//!
//! Convenient access to the types needed for a signature run.
//!
//! ```rust
//! use jnisig::prelude::*;
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all jnisig operations
pub use crate::Error;

/// The result type used throughout jnisig
pub use crate::Result;

// ================================================================================================
// Inputs
// ================================================================================================

/// Method description file and its entries
pub use crate::catalog::{derive_symbol_name, MethodCatalog, MethodDescriptor};

/// Type archives
pub use crate::types::{ArchiveSource, DataType, TypeArchive, TypeManager, JNI_ARCHIVE_NAME};

// ================================================================================================
// Program Model
// ================================================================================================

/// Host trait and parameter model
pub use crate::program::{FunctionId, Parameter, Program, SourceType, StorageMode};

/// In-memory program
pub use crate::program::{FunctionRecord, ProgramDatabase};

// ================================================================================================
// Signature Application
// ================================================================================================

/// The applier and its results
pub use crate::applier::{ApplyReport, FunctionIndex, SignatureApplier, JNI_ENTRY_POINT};
