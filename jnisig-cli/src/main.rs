mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // jnisig info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("jnisig", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Apply {
            program,
            methods,
            archive,
            output,
            dry_run,
        } => commands::apply::run(
            &commands::apply::ApplyOptions {
                program,
                methods,
                archive: archive.as_deref(),
                output: output.as_deref(),
                dry_run: *dry_run,
            },
            &cli.global,
        ),
        Command::Functions { program } => commands::functions::run(program, &cli.global),
        Command::Types { archive } => commands::types::run(archive.as_deref(), &cli.global),
    }
}
