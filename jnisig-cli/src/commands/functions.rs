use std::path::Path;

use comfy_table::CellAlignment;
use jnisig::{applier::JNI_ENTRY_POINT, catalog::JNI_SYMBOL_PREFIX, program::Program};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_program,
    output::{print_output, print_table},
};

#[derive(Debug, Serialize)]
struct FunctionEntry {
    entry: String,
    name: String,
    source: String,
    parameters: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FunctionsOutput {
    program: String,
    total: usize,
    functions: Vec<FunctionEntry>,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let program = load_program(path)?;

    let mut functions = Vec::new();
    for function in program.functions() {
        let record = program.function(function)?;
        if !record.name.starts_with(JNI_SYMBOL_PREFIX) && record.name != JNI_ENTRY_POINT {
            continue;
        }
        functions.push(FunctionEntry {
            entry: function.to_string(),
            name: record.name.clone(),
            source: record.signature_source.to_string(),
            parameters: record.parameters.iter().map(ToString::to_string).collect(),
        });
    }

    let output = FunctionsOutput {
        program: program.name().to_string(),
        total: program.len(),
        functions,
    };

    print_output(&output, opts, |out| {
        println!(
            "{}: {} JNI functions of {}",
            out.program,
            out.functions.len(),
            out.total
        );
        if out.functions.is_empty() {
            return;
        }

        print_table(
            &[
                ("Entry", CellAlignment::Right),
                ("Name", CellAlignment::Left),
                ("Source", CellAlignment::Left),
                ("Parameters", CellAlignment::Left),
            ],
            out.functions.iter().map(|f| {
                vec![
                    f.entry.clone(),
                    f.name.clone(),
                    f.source.clone(),
                    f.parameters.join(", "),
                ]
            }),
        );
    })
}
