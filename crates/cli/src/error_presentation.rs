use std::{io, path::PathBuf};

use anyhow::Context;
use miette::Report;

const ORCHESTRATOR_CONTEXT: &str = "while computing the migration";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    ReadFile { path: PathBuf, source: io::Error },
    WriteFile { path: PathBuf, source: io::Error },
    Core(spandiff_core::Error),
}

impl From<spandiff_core::Error> for CliError {
    fn from(value: spandiff_core::Error) -> Self {
        Self::Core(value)
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::ReadFile { path, source } => {
            let context = format!("while reading `{}`", path.display());
            format!("[io] {}", report_with_context(source, context))
        }
        CliError::WriteFile { path, source } => {
            let context = format!("while writing `{}`", path.display());
            format!("[io] {}", report_with_context(source, context))
        }
        CliError::Core(source) => {
            let category = core_category(&source);
            let report = report_with_context(source, ORCHESTRATOR_CONTEXT);
            format!("[{category}] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let context = context.into();
    let anyhow_error = std::result::Result::<(), E>::Err(source)
        .context(context)
        .expect_err("context wrapping must produce an error");
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &spandiff_core::Error) -> &'static str {
    match error {
        spandiff_core::Error::Parse(_) => "parse",
        spandiff_core::Error::Extract(_) => "extract",
        spandiff_core::Error::Plan(_) => "plan",
    }
}
