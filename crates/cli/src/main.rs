//! CLI entry point (§6): reads two Spanner DDL files, computes the ordered
//! migration from the first to the second, and writes the resulting
//! statements to a file or stdout.

mod error_presentation;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use spandiff_core::DiffPolicy;
use spandiff_parser::SpannerDdlParser;

use error_presentation::{render_runtime_error, CliError, CliResult};

/// Computes an ordered Cloud Spanner DDL migration between two schema files.
#[derive(Debug, Parser)]
#[command(name = "spandiff", version, about)]
struct Cli {
    /// Path to the DDL file describing the current (original) schema.
    #[arg(long = "original-ddl-file")]
    original_ddl_file: PathBuf,

    /// Path to the DDL file describing the desired (new) schema.
    #[arg(long = "new-ddl-file")]
    new_ddl_file: PathBuf,

    /// Where to write the migration DDL. Defaults to stdout.
    #[arg(long = "output-ddl-file")]
    output_ddl_file: Option<PathBuf>,

    /// Permit DROP TABLE/COLUMN/INDEX/CHANGE STREAM statements for removed objects.
    #[arg(long = "allow-drop-statements", default_value_t = false)]
    allow_drop_statements: bool,

    /// Permit dropping and recreating a modified index.
    #[arg(long = "allow-recreate-indexes", default_value_t = false)]
    allow_recreate_indexes: bool,

    /// Permit dropping and recreating a modified constraint.
    #[arg(long = "allow-recreate-constraints", default_value_t = false)]
    allow_recreate_constraints: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", render_runtime_error(error));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let original_ddl = read_file(&cli.original_ddl_file)?;
    let new_ddl = read_file(&cli.new_ddl_file)?;

    let policy = DiffPolicy::new(
        cli.allow_recreate_indexes,
        cli.allow_recreate_constraints,
        cli.allow_drop_statements,
    );

    let statements = spandiff_core::generate_migration(
        &original_ddl,
        &new_ddl,
        &SpannerDdlParser,
        &policy,
    )?;

    let mut output = String::new();
    for statement in &statements {
        output.push_str(statement);
        output.push_str(";\n\n");
    }

    match &cli.output_ddl_file {
        Some(path) => fs::write(path, output).map_err(|source| CliError::WriteFile {
            path: path.clone(),
            source,
        })?,
        None => print!("{output}"),
    }

    Ok(())
}

fn read_file(path: &PathBuf) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.clone(),
        source,
    })
}
