use thiserror::Error;

use crate::program::{FunctionId, SourceType};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which covers every failure this library can report.
///
/// Errors fall into three groups, matching the phases of a signature run:
///
/// ## Resource and input errors
/// Raised before the program is modified.
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Json`] - Malformed method catalog, type archive or program snapshot
/// - [`Error::Malformed`] - Well-formed JSON with invalid content
/// - [`Error::ResourceNotFound`] - Type archive file does not exist
/// - [`Error::DuplicateArchiveId`] - An archive of the same name but another identity is open
///
/// ## Type resolution errors
/// - [`Error::TypeNotFound`] - A type key is absent from the archive
///
/// ## Program model errors
/// Raised by [`crate::program::Program`] implementations while updating functions.
/// - [`Error::FunctionNotFound`] - Stale or foreign function handle
/// - [`Error::MissingParameter`] - Parameter index out of range
/// - [`Error::DuplicateName`] - Name collides with another symbol in scope
/// - [`Error::SourcePrecedence`] - Update would overwrite a higher-priority signature
///
/// None of these are recovered from. Functions updated before the error keep
/// their new signatures.
///
/// # Examples
///
/// ```rust,no_run
/// use jnisig::{Error, MethodCatalog};
///
/// match MethodCatalog::from_path("methods.json") {
///     Ok(catalog) => println!("{} methods", catalog.len()),
///     Err(Error::FileError(io_err)) => eprintln!("I/O error: {}", io_err),
///     Err(Error::Json(json_err)) => eprintln!("Bad method file: {}", json_err),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// JSON decoding or encoding failed.
    ///
    /// Covers the method catalog, type archives and program snapshots. The
    /// wrapped error carries the line and column of the problem.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input decoded but its content is invalid.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A type archive resource could not be located.
    #[error("Type archive resource not found: {0}")]
    ResourceNotFound(String),

    /// An archive with the same name but a different identity is already open.
    #[error("Archive '{name}' is already open with id {open}, refusing to open id {requested}")]
    DuplicateArchiveId {
        /// Archive name shared by both archives
        name: String,
        /// Identity of the archive that is already open
        open: uguid::Guid,
        /// Identity of the archive that was requested
        requested: uguid::Guid,
    },

    /// Failed to resolve a type path in the type archive.
    #[error("Failed to find data type - {0}")]
    TypeNotFound(String),

    /// The function handle does not belong to the program.
    #[error("Function not found - {0}")]
    FunctionNotFound(FunctionId),

    /// The function has no parameter at the requested index.
    #[error("Function '{function}' has no parameter {index}")]
    MissingParameter {
        /// Name of the function
        function: String,
        /// Requested parameter index
        index: usize,
    },

    /// The name is already used by another symbol in the function's scope.
    #[error("Duplicate name '{name}' in function '{function}'")]
    DuplicateName {
        /// Name of the function
        function: String,
        /// The colliding name
        name: String,
    },

    /// The update would replace a signature set by a higher-priority source.
    #[error("Function '{function}' signature is {current}, can not overwrite with {requested}")]
    SourcePrecedence {
        /// Name of the function
        function: String,
        /// Source of the current signature
        current: SourceType,
        /// Source of the rejected update
        requested: SourceType,
    },
}
