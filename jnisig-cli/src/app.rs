use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// jnisig - apply JNI native method signatures to disassembled functions
#[derive(Debug, Parser)]
#[command(name = "jnisig", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply method signatures to the Java_* functions of a program snapshot.
    Apply {
        /// Program snapshot (JSON) to update.
        #[arg(short, long, value_name = "FILE")]
        program: PathBuf,

        /// Method description file: {"methods": [{"methodName", "argumentTypes"}]}.
        #[arg(short, long, value_name = "FILE")]
        methods: PathBuf,

        /// Type archive to use instead of the bundled jni_all archive.
        #[arg(short, long, value_name = "FILE")]
        archive: Option<PathBuf>,

        /// Write the updated snapshot here instead of overwriting the input.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report what would change without writing the snapshot.
        #[arg(long)]
        dry_run: bool,
    },

    /// List the JNI functions of a program snapshot and their parameters.
    Functions {
        /// Program snapshot (JSON).
        #[arg(value_name = "FILE")]
        program: PathBuf,
    },

    /// List the types of a type archive.
    Types {
        /// Type archive to list instead of the bundled jni_all archive.
        #[arg(short, long, value_name = "FILE")]
        archive: Option<PathBuf>,
    },
}
