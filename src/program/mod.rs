//! Program model consumed by the signature applier.
//!
//! Disassemblers own their function database. This module describes the small slice of
//! it that [`crate::SignatureApplier`] needs as the [`Program`] trait: forward traversal
//! of functions, reading names and parameters, and two kinds of parameter update.
//! Any host can be wired in by implementing the trait.
//!
//! [`ProgramDatabase`] is the implementation shipped with the crate. It keeps functions
//! in memory, enforces the same naming and precedence rules a disassembler would, and
//! round-trips through a JSON snapshot so that exported function lists can be updated
//! offline.
//!
//! # Examples
//!
//! ```rust
//! use jnisig::program::{FunctionRecord, Program, ProgramDatabase};
//!
//! let mut program = ProgramDatabase::new("libnative.so");
//! program.add(FunctionRecord::new(0x1000, "JNI_OnLoad"))?;
//! program.add(FunctionRecord::new(0x1100, "Java_com_x_Y_foo"))?;
//!
//! let names: Vec<&str> = program
//!     .functions()
//!     .map(|f| program.function_name(f))
//!     .collect::<jnisig::Result<_>>()?;
//! assert_eq!(names, ["JNI_OnLoad", "Java_com_x_Y_foo"]);
//! # Ok::<(), jnisig::Error>(())
//! ```

mod database;

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{types::DataType, Result};

pub use database::{FunctionRecord, ProgramDatabase};

/// Opaque handle of a function in a [`Program`].
///
/// The value is the function's entry address. Handles are only meaningful for the
/// program that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub u64);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Origin of a name or type, in increasing order of precedence.
///
/// An update from a lower source never overwrites information from a higher one.
/// Signatures applied by this crate are [`SourceType::UserDefined`], so later analysis
/// passes leave them alone.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceType {
    /// Placeholder assigned when nothing else is known
    #[default]
    Default,
    /// Inferred by automatic analysis
    Analysis,
    /// Imported from debug information or an external file
    Imported,
    /// Set explicitly by a user or a user script
    UserDefined,
}

/// How parameter storage (registers, stack slots) is assigned.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StorageMode {
    /// Storage follows from the calling convention and parameter types
    #[default]
    Dynamic,
    /// Storage was pinned explicitly
    Custom,
}

/// A formal parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub data_type: DataType,
    /// Origin of name and type
    #[serde(default)]
    pub source: SourceType,
}

impl Parameter {
    /// Create a new parameter.
    pub fn new<S: Into<String>>(name: S, data_type: DataType, source: SourceType) -> Self {
        Parameter {
            name: name.into(),
            data_type,
            source,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.data_type.name)
    }
}

/// The host capabilities needed to apply JNI signatures.
///
/// Functions are traversed forward from [`Program::first_function`] through
/// [`Program::function_after`], in program order.
pub trait Program {
    /// The first function in program order.
    fn first_function(&self) -> Option<FunctionId>;

    /// The function following `function` in program order.
    fn function_after(&self, function: FunctionId) -> Option<FunctionId>;

    /// Name of `function`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FunctionNotFound`] for unknown handles.
    fn function_name(&self, function: FunctionId) -> Result<&str>;

    /// Formal parameters of `function`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FunctionNotFound`] for unknown handles.
    fn parameters(&self, function: FunctionId) -> Result<&[Parameter]>;

    /// Replace the whole parameter list of `function`.
    ///
    /// # Errors
    /// Fails if the handle is unknown, if a name collides with another symbol in the
    /// function's scope, or if `source` is of lower precedence than the current
    /// signature.
    fn replace_parameters(
        &mut self,
        function: FunctionId,
        parameters: Vec<Parameter>,
        storage: StorageMode,
        source: SourceType,
    ) -> Result<()>;

    /// Rename and retype the existing parameter at `index`.
    ///
    /// # Errors
    /// Fails if the handle is unknown, if there is no parameter at `index`, if `name`
    /// collides with another symbol in scope, or on a precedence conflict.
    fn update_parameter(
        &mut self,
        function: FunctionId,
        index: usize,
        name: &str,
        data_type: DataType,
        source: SourceType,
    ) -> Result<()>;

    /// Iterate over all functions in program order.
    fn functions(&self) -> Functions<'_, Self>
    where
        Self: Sized,
    {
        Functions {
            program: self,
            next: self.first_function(),
        }
    }
}

/// Iterator over the functions of a [`Program`], see [`Program::functions`].
pub struct Functions<'a, P: Program> {
    program: &'a P,
    next: Option<FunctionId>,
}

impl<P: Program> Iterator for Functions<'_, P> {
    type Item = FunctionId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.program.function_after(current);
        Some(current)
    }
}
