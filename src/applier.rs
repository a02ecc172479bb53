//! Applying JNI signatures to native functions.
//!
//! [`SignatureApplier`] drives a run in two phases. First every function of the
//! program is visited once: `Java_*` functions are indexed by name and `JNI_OnLoad`
//! receives its `JavaVM *vm` parameter on the spot. Then every descriptor of the
//! [`MethodCatalog`] is mapped to its symbol name and, if a function of that name was
//! indexed, the function's parameter list is replaced by
//!
//! ```text
//! (JNIEnv *env, jobject thiz, <argumentTypes[0]> a0, <argumentTypes[1]> a1, ...)
//! ```
//!
//! Descriptors without a matching function are skipped. The first error ends the
//! run; functions updated before it keep their new signatures.
//!
//! # Examples
//!
//! ```rust
//! use jnisig::prelude::*;
//!
//! let mut program = ProgramDatabase::new("libnative.so");
//! program.add(FunctionRecord::new(0x1000, "Java_com_x_Y_foo"))?;
//!
//! let catalog = MethodCatalog::new(vec![MethodDescriptor::new(
//!     "com.x.Y.foo",
//!     vec!["jint".to_string()],
//! )]);
//!
//! let mut types = TypeManager::new();
//! let archive = types.get_or_open(JNI_ARCHIVE_NAME, &ArchiveSource::Bundled)?;
//!
//! let report = SignatureApplier::new(archive).run(&mut program, &catalog)?;
//! assert_eq!(report.applied, ["Java_com_x_Y_foo"]);
//! # Ok::<(), jnisig::Error>(())
//! ```

use std::collections::{hash_map, HashMap};

use serde::Serialize;

use crate::{
    catalog::{MethodCatalog, MethodDescriptor, JNI_SYMBOL_PREFIX},
    program::{FunctionId, Parameter, Program, SourceType, StorageMode},
    types::TypeArchive,
    Result,
};

/// Name of the library entry point called by the VM on `System.loadLibrary`.
pub const JNI_ENTRY_POINT: &str = "JNI_OnLoad";

/// Name and type key of the first implicit parameter of every native method.
pub const ENV_PARAMETER: (&str, &str) = ("env", "JNIEnv *");

/// Name and type key of the second implicit parameter of every native method.
pub const THIS_PARAMETER: (&str, &str) = ("thiz", "jobject");

/// Name and type key given to the first parameter of the entry point.
pub const VM_PARAMETER: (&str, &str) = ("vm", "JavaVM *");

/// `Java_*` functions of a program, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionIndex {
    functions: HashMap<String, FunctionId>,
}

impl FunctionIndex {
    /// Add a function. A later function with the same name replaces the earlier one,
    /// whose handle is returned.
    pub fn insert(&mut self, name: String, function: FunctionId) -> Option<FunctionId> {
        self.functions.insert(name, function)
    }

    /// Handle of the function called `name`.
    pub fn get(&self, name: &str) -> Option<FunctionId> {
        self.functions.get(name).copied()
    }

    /// Returns true if a function called `name` is indexed.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Number of indexed functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if no function is indexed.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterate over `(name, handle)` pairs in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, FunctionId> {
        self.functions.iter()
    }
}

/// Outcome of [`SignatureApplier::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Number of distinct `Java_*` function names found
    pub jni_functions: usize,
    /// Number of `JNI_OnLoad` functions whose first parameter was fixed
    pub entry_points: usize,
    /// Symbol names whose signature was applied, in catalog order
    pub applied: Vec<String>,
    /// Symbol names with no matching function, in catalog order
    pub skipped: Vec<String>,
}

/// Applies JNI signatures using the types of one archive.
pub struct SignatureApplier<'a> {
    types: &'a TypeArchive,
}

impl<'a> SignatureApplier<'a> {
    /// Create an applier resolving types from `types`, normally the `jni_all` archive.
    pub fn new(types: &'a TypeArchive) -> Self {
        SignatureApplier { types }
    }

    /// Apply every descriptor of `catalog` to `program`.
    ///
    /// # Errors
    /// Returns the first error of [`SignatureApplier::index_functions`] or
    /// [`SignatureApplier::apply_signature`]. Nothing is rolled back.
    pub fn run<P: Program>(&self, program: &mut P, catalog: &MethodCatalog) -> Result<ApplyReport> {
        log::info!("Enumerating JNI functions...");
        let (index, entry_points) = self.index_program(program)?;
        log::info!("Total JNI functions found: {}", index.len());

        log::info!("Applying function signatures...");
        let mut report = ApplyReport {
            jni_functions: index.len(),
            entry_points,
            ..ApplyReport::default()
        };

        for method in catalog {
            let symbol = method.symbol_name();
            match index.get(&symbol) {
                Some(function) => {
                    self.apply_signature(program, function, method)?;
                    report.applied.push(symbol);
                }
                None => {
                    log::debug!("No function for {}, skipping", method.method_name);
                    report.skipped.push(symbol);
                }
            }
        }

        log::info!(
            "Applied {} of {} signatures",
            report.applied.len(),
            catalog.len()
        );
        Ok(report)
    }

    /// Index the `Java_*` functions of `program` and fix every `JNI_OnLoad` on the way.
    ///
    /// Each function is visited exactly once, in program order. The entry point is not
    /// part of the index.
    ///
    /// # Errors
    /// Returns the errors of the program model and of [`SignatureApplier::fix_entry_point`].
    pub fn index_functions<P: Program>(&self, program: &mut P) -> Result<FunctionIndex> {
        Ok(self.index_program(program)?.0)
    }

    fn index_program<P: Program>(&self, program: &mut P) -> Result<(FunctionIndex, usize)> {
        let mut index = FunctionIndex::default();
        let mut entry_points = 0;

        let mut current = program.first_function();
        while let Some(function) = current {
            let name = program.function_name(function)?;
            if name.starts_with(JNI_SYMBOL_PREFIX) {
                let name = name.to_string();
                log::debug!("{} at {}", name, function);
                if let Some(previous) = index.insert(name.clone(), function) {
                    log::warn!(
                        "{} defined at {} and {}, using the latter",
                        name,
                        previous,
                        function
                    );
                }
            } else if name == JNI_ENTRY_POINT {
                self.fix_entry_point(program, function)?;
                entry_points += 1;
            }

            current = program.function_after(function);
        }

        Ok((index, entry_points))
    }

    /// Replace the parameters of `function` with the JNI signature of `method`.
    ///
    /// The new list is `env: JNIEnv *`, `thiz: jobject`, followed by `a<i>` typed by
    /// `argument_types[i]`. All types are resolved before the function is touched.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] for unknown type names and the errors of
    /// [`Program::replace_parameters`].
    pub fn apply_signature<P: Program>(
        &self,
        program: &mut P,
        function: FunctionId,
        method: &MethodDescriptor,
    ) -> Result<()> {
        let mut parameters = Vec::with_capacity(method.argument_types.len() + 2);
        for (name, key) in [ENV_PARAMETER, THIS_PARAMETER] {
            parameters.push(self.parameter(name.to_string(), key)?);
        }
        for (i, key) in method.argument_types.iter().enumerate() {
            parameters.push(self.parameter(format!("a{}", i), key)?);
        }

        program.replace_parameters(
            function,
            parameters,
            StorageMode::Dynamic,
            SourceType::UserDefined,
        )?;
        log::debug!("Modified {}", program.function_name(function)?);
        Ok(())
    }

    /// Rename the first parameter of `function` to `vm` and retype it as `JavaVM *`.
    ///
    /// The parameter count is unchanged.
    ///
    /// # Errors
    /// Returns [`crate::Error::MissingParameter`] if `function` has no parameters,
    /// [`crate::Error::TypeNotFound`] if the archive lacks `JavaVM *`, and the errors of
    /// [`Program::update_parameter`].
    pub fn fix_entry_point<P: Program>(&self, program: &mut P, function: FunctionId) -> Result<()> {
        let (name, key) = VM_PARAMETER;
        let data_type = self.types.resolve(key)?;
        program.update_parameter(function, 0, name, data_type, SourceType::UserDefined)?;
        log::info!("Modified {}", program.function_name(function)?);
        Ok(())
    }

    fn parameter(&self, name: String, key: &str) -> Result<Parameter> {
        Ok(Parameter::new(
            name,
            self.types.resolve(key)?,
            SourceType::UserDefined,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        program::{FunctionRecord, ProgramDatabase},
        types::{bundled, DataType, TypeKind},
        Error,
    };

    fn undefined(name: &str) -> Parameter {
        Parameter::new(
            name,
            DataType::new("undefined8", "builtin", TypeKind::Primitive, Some(8)),
            SourceType::Default,
        )
    }

    fn sample() -> ProgramDatabase {
        let mut program = ProgramDatabase::new("libsample.so");
        let analysed = vec![undefined("param_1"), undefined("param_2")];
        for (entry, name) in [
            (0x1000, "Java_com_x_Y_foo"),
            (0x1100, "Java_com_x_Y_bar"),
            (0x1200, JNI_ENTRY_POINT),
            (0x1300, "unrelated"),
        ] {
            program
                .add(
                    FunctionRecord::new(entry, name)
                        .with_parameters(analysed.clone(), SourceType::Analysis),
                )
                .unwrap();
        }
        program
    }

    fn descriptor(name: &str, types: &[&str]) -> MethodDescriptor {
        MethodDescriptor::new(name, types.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn index_contains_only_java_functions() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = sample();

        let index = applier.index_functions(&mut program).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("Java_com_x_Y_foo"), Some(FunctionId(0x1000)));
        assert!(index.contains("Java_com_x_Y_bar"));
        assert!(!index.contains(JNI_ENTRY_POINT));
        assert!(!index.contains("unrelated"));
    }

    #[test]
    fn index_fixes_entry_point() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = sample();

        applier.index_functions(&mut program).unwrap();

        let params = program.parameters(FunctionId(0x1200)).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "vm");
        assert_eq!(params[0].data_type.name, "JavaVM *");
        assert_eq!(params[0].source, SourceType::UserDefined);
        assert_eq!(params[1], undefined("param_2"));
    }

    #[test]
    fn index_last_duplicate_wins() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = ProgramDatabase::new("dup");
        program.add(FunctionRecord::new(0x10, "Java_a_B_c")).unwrap();
        program.add(FunctionRecord::new(0x20, "Java_a_B_c")).unwrap();

        let index = applier.index_functions(&mut program).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("Java_a_B_c"), Some(FunctionId(0x20)));
    }

    #[test]
    fn entry_point_without_parameters_fails() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = ProgramDatabase::new("bare");
        program.add(FunctionRecord::new(0x10, JNI_ENTRY_POINT)).unwrap();

        let result = applier.index_functions(&mut program);
        assert!(matches!(result, Err(Error::MissingParameter { index: 0, .. })));
    }

    #[test]
    fn apply_signature_layout() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = sample();
        let foo = FunctionId(0x1000);

        applier
            .apply_signature(
                &mut program,
                foo,
                &descriptor("com.x.Y.foo", &["jint", "jstring", "jlongArray"]),
            )
            .unwrap();

        let params = program.parameters(foo).unwrap();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        let types: Vec<&str> = params.iter().map(|p| p.data_type.name.as_str()).collect();
        assert_eq!(names, ["env", "thiz", "a0", "a1", "a2"]);
        assert_eq!(types, ["JNIEnv *", "jobject", "jint", "jstring", "jlongArray"]);
        assert!(params.iter().all(|p| p.source == SourceType::UserDefined));

        let record = program.function(foo).unwrap();
        assert_eq!(record.storage, StorageMode::Dynamic);
        assert_eq!(record.signature_source, SourceType::UserDefined);
    }

    #[test]
    fn apply_signature_without_arguments() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = sample();

        applier
            .apply_signature(&mut program, FunctionId(0x1100), &descriptor("com.x.Y.bar", &[]))
            .unwrap();
        assert_eq!(program.parameters(FunctionId(0x1100)).unwrap().len(), 2);
    }

    #[test]
    fn apply_signature_unknown_type_leaves_function_untouched() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = sample();
        let before = program.function(FunctionId(0x1000)).unwrap().clone();

        let result = applier.apply_signature(
            &mut program,
            FunctionId(0x1000),
            &descriptor("com.x.Y.foo", &["jint", "Ljava/lang/String;"]),
        );

        match result {
            Err(Error::TypeNotFound(path)) => assert_eq!(path, "/jni_all.h/Ljava/lang/String;"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(program.function(FunctionId(0x1000)).unwrap(), &before);
    }

    #[test]
    fn run_skips_unmatched_descriptors() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = sample();
        let catalog = MethodCatalog::new(vec![
            descriptor("com.x.Y.missing", &["jint"]),
            descriptor("com.x.Y.bar", &["jboolean"]),
        ]);

        let report = applier.run(&mut program, &catalog).unwrap();
        assert_eq!(report.jni_functions, 2);
        assert_eq!(report.entry_points, 1);
        assert_eq!(report.applied, ["Java_com_x_Y_bar"]);
        assert_eq!(report.skipped, ["Java_com_x_Y_missing"]);
    }

    #[test]
    fn run_stops_at_first_error_and_keeps_earlier_updates() {
        let archive = bundled::jni_all().unwrap();
        let applier = SignatureApplier::new(&archive);
        let mut program = sample();
        let catalog = MethodCatalog::new(vec![
            descriptor("com.x.Y.foo", &["jint"]),
            descriptor("com.x.Y.bar", &["jnope"]),
        ]);

        let result = applier.run(&mut program, &catalog);
        assert!(matches!(result, Err(Error::TypeNotFound(_))));
        assert_eq!(program.parameters(FunctionId(0x1000)).unwrap().len(), 3);
        assert_eq!(
            program.parameters(FunctionId(0x1100)).unwrap()[0].name,
            "param_1"
        );
    }
}
