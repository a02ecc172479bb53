use std::path::Path;

use anyhow::Context;
use jnisig::{ApplyReport, MethodCatalog, SignatureApplier, TypeManager};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{load_archive, load_program},
    output::print_output,
};

pub struct ApplyOptions<'a> {
    pub program: &'a Path,
    pub methods: &'a Path,
    pub archive: Option<&'a Path>,
    pub output: Option<&'a Path>,
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct ApplyOutput {
    program: String,
    methods: usize,
    #[serde(flatten)]
    report: ApplyReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<String>,
}

pub fn run(options: &ApplyOptions<'_>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let mut manager = TypeManager::new();
    let archive = load_archive(&mut manager, options.archive)?;

    let catalog = MethodCatalog::from_path(options.methods).with_context(|| {
        format!(
            "failed to load method catalog: {}",
            options.methods.display()
        )
    })?;
    if let Some(first) = catalog.methods().first() {
        log::debug!("First method: {} {:?}", first.method_name, first.argument_types);
    }

    let mut program = load_program(options.program)?;
    let result = SignatureApplier::new(archive).run(&mut program, &catalog);

    // Functions updated before a failure keep their signatures, so the snapshot is
    // written either way.
    let written = if options.dry_run {
        None
    } else {
        let target = options.output.unwrap_or(options.program);
        program
            .save(target)
            .with_context(|| format!("failed to write program snapshot: {}", target.display()))?;
        Some(target.display().to_string())
    };

    let report = result.with_context(|| match &written {
        Some(path) => format!(
            "signature run on {} failed, partial result written to {path}",
            program.name()
        ),
        None => format!("signature run on {} failed", program.name()),
    })?;

    let output = ApplyOutput {
        program: program.name().to_string(),
        methods: catalog.len(),
        report,
        written,
    };

    print_output(&output, opts, |out| {
        println!("Program:        {}", out.program);
        println!("JNI functions:  {}", out.report.jni_functions);
        println!("JNI_OnLoad:     {}", out.report.entry_points);
        println!(
            "Applied:        {} of {}",
            out.report.applied.len(),
            out.methods
        );
        for name in &out.report.applied {
            println!("  {name}");
        }
        if !out.report.skipped.is_empty() {
            println!("Skipped:        {}", out.report.skipped.len());
            for name in &out.report.skipped {
                println!("  {name}");
            }
        }
        match &out.written {
            Some(path) => println!("Written to {path}"),
            None => println!("Dry run, nothing written"),
        }
    })
}
