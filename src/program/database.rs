use std::{
    collections::BTreeMap,
    fs,
    io::{BufWriter, Write},
    ops::Bound,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    program::{FunctionId, Parameter, Program, SourceType, StorageMode},
    types::DataType,
    Error, Result,
};

/// A function as stored in a [`ProgramDatabase`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    /// Entry address
    pub entry: u64,
    /// Symbol name
    pub name: String,
    /// Formal parameters
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Names of local variables. Parameters may not reuse them.
    #[serde(default)]
    pub locals: Vec<String>,
    /// Parameter storage assignment
    #[serde(default)]
    pub storage: StorageMode,
    /// Origin of the current parameter list
    #[serde(default)]
    pub signature_source: SourceType,
}

impl FunctionRecord {
    /// A function without parameters or locals.
    pub fn new<S: Into<String>>(entry: u64, name: S) -> Self {
        FunctionRecord {
            entry,
            name: name.into(),
            parameters: Vec::new(),
            locals: Vec::new(),
            storage: StorageMode::Dynamic,
            signature_source: SourceType::Default,
        }
    }

    /// Set the parameter list and the source it came from.
    pub fn with_parameters(mut self, parameters: Vec<Parameter>, source: SourceType) -> Self {
        self.parameters = parameters;
        self.signature_source = source;
        self
    }

    /// Set the local variable names.
    pub fn with_locals(mut self, locals: Vec<String>) -> Self {
        self.locals = locals;
        self
    }

    fn check_name(&self, name: &str, skip: Option<usize>) -> Result<()> {
        let param_clash = self
            .parameters
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != skip && p.name == name);

        if param_clash || self.locals.iter().any(|local| local == name) {
            return Err(Error::DuplicateName {
                function: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// On-disk layout of a program snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct ProgramSnapshot {
    name: String,
    functions: Vec<FunctionRecord>,
}

/// In-memory [`Program`] with JSON snapshot persistence.
///
/// Functions are kept ordered by entry address, which is also the traversal order.
#[derive(Debug, Clone, Default)]
pub struct ProgramDatabase {
    name: String,
    functions: BTreeMap<u64, FunctionRecord>,
}

impl ProgramDatabase {
    /// Create an empty program.
    pub fn new<S: Into<String>>(name: S) -> Self {
        ProgramDatabase {
            name: name.into(),
            functions: BTreeMap::new(),
        }
    }

    /// Load a program snapshot from a JSON file.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the file can not be read, and the errors of
    /// [`ProgramDatabase::from_str`] otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_str(&data)
    }

    /// Parse a program snapshot from a JSON string.
    ///
    /// # Errors
    /// Returns [`Error::Json`] for malformed documents and [`Error::Malformed`] when two
    /// functions share an entry address.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(data: &str) -> Result<Self> {
        let snapshot: ProgramSnapshot = serde_json::from_str(data)?;

        let mut program = ProgramDatabase::new(snapshot.name);
        for record in snapshot.functions {
            program.add(record)?;
        }
        Ok(program)
    }

    /// Write the program as a JSON snapshot to `path`.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] or [`Error::Json`] if writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the program as pretty-printed JSON to `writer`.
    ///
    /// # Errors
    /// Returns [`Error::Json`] if serialization or the writer fails.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot = ProgramSnapshot {
            name: self.name.clone(),
            functions: self.functions.values().cloned().collect(),
        };
        serde_json::to_writer_pretty(writer, &snapshot)?;
        Ok(())
    }

    /// Program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if the program has no functions.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Insert a function.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if a function already starts at the same address.
    pub fn add(&mut self, record: FunctionRecord) -> Result<FunctionId> {
        let entry = record.entry;
        if self.functions.contains_key(&entry) {
            return Err(malformed_error!(
                "Duplicate function entry 0x{:x} ({})",
                entry,
                record.name
            ));
        }

        self.functions.insert(entry, record);
        Ok(FunctionId(entry))
    }

    /// The stored record of `function`.
    ///
    /// # Errors
    /// Returns [`Error::FunctionNotFound`] for unknown handles.
    pub fn function(&self, function: FunctionId) -> Result<&FunctionRecord> {
        self.functions
            .get(&function.0)
            .ok_or(Error::FunctionNotFound(function))
    }

    /// The first function called `name`, in program order.
    pub fn find(&self, name: &str) -> Option<FunctionId> {
        self.functions
            .values()
            .find(|record| record.name == name)
            .map(|record| FunctionId(record.entry))
    }

    fn function_mut(&mut self, function: FunctionId) -> Result<&mut FunctionRecord> {
        self.functions
            .get_mut(&function.0)
            .ok_or(Error::FunctionNotFound(function))
    }
}

impl Program for ProgramDatabase {
    fn first_function(&self) -> Option<FunctionId> {
        self.functions.keys().next().map(|entry| FunctionId(*entry))
    }

    fn function_after(&self, function: FunctionId) -> Option<FunctionId> {
        self.functions
            .range((Bound::Excluded(function.0), Bound::Unbounded))
            .next()
            .map(|(entry, _)| FunctionId(*entry))
    }

    fn function_name(&self, function: FunctionId) -> Result<&str> {
        Ok(self.function(function)?.name.as_str())
    }

    fn parameters(&self, function: FunctionId) -> Result<&[Parameter]> {
        Ok(self.function(function)?.parameters.as_slice())
    }

    fn replace_parameters(
        &mut self,
        function: FunctionId,
        parameters: Vec<Parameter>,
        storage: StorageMode,
        source: SourceType,
    ) -> Result<()> {
        let record = self.function_mut(function)?;
        if source < record.signature_source {
            return Err(Error::SourcePrecedence {
                function: record.name.clone(),
                current: record.signature_source,
                requested: source,
            });
        }

        for (i, parameter) in parameters.iter().enumerate() {
            let clash = parameters[..i].iter().any(|p| p.name == parameter.name)
                || record.locals.iter().any(|local| *local == parameter.name);
            if clash {
                return Err(Error::DuplicateName {
                    function: record.name.clone(),
                    name: parameter.name.clone(),
                });
            }
        }

        record.parameters = parameters;
        record.storage = storage;
        record.signature_source = source;
        Ok(())
    }

    fn update_parameter(
        &mut self,
        function: FunctionId,
        index: usize,
        name: &str,
        data_type: DataType,
        source: SourceType,
    ) -> Result<()> {
        let record = self.function_mut(function)?;
        let current = match record.parameters.get(index) {
            Some(parameter) => parameter.source,
            None => {
                return Err(Error::MissingParameter {
                    function: record.name.clone(),
                    index,
                })
            }
        };

        if source < current {
            return Err(Error::SourcePrecedence {
                function: record.name.clone(),
                current,
                requested: source,
            });
        }
        record.check_name(name, Some(index))?;

        let parameter = &mut record.parameters[index];
        parameter.name = name.to_string();
        parameter.data_type = data_type;
        parameter.source = source;
        Ok(())
    }
}
