use std::fs;

use anyhow::Context;
use clap::Parser;

use crate::{
    cli::Cli,
    fetch::FetchConfig,
    render::{Mode, Render},
    report::Reporter,
};

mod cli;
mod document;
mod fetch;
mod filter;
mod record;
mod render;
mod report;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let report = Reporter::new(args.quiet);

    let mode = Mode::from_name(&args.mode).unwrap_or_else(|| {
        report.warn(&format!(
            "unknown mode `{}`, writing a LaTeX table (modes: bibtex, latex-table)",
            args.mode
        ));
        Mode::LatexTable
    });
    let config = FetchConfig {
        timeout_global: std::time::Duration::from_secs(args.timeout),
        max_redirects: args.max_redirects,
        ..FetchConfig::default()
    };

    let address = fetch::resolve(&args.address);
    let spinner = report.spinner(format!("Fetching {address} ..."));
    let fetched = fetch::fetch(&address, &config);
    spinner.finish_and_clear();
    let xml = fetched?;

    report.step("Parsing XML ...");
    let root = document::parse(&xml)
        .with_context(|| format!("malformed document from {address}"))?;
    if let Some(name) = record::person(&root) {
        report.step(&format!("Publications of {name}"));
    }

    let filter = args.filter();
    report.step(if filter.is_empty() {
        "Extracting publications ..."
    } else {
        "Extracting and filtering publications ..."
    });
    let records = record::extract(&root)?;
    let total = records.len();
    let records = filter.apply(records)?;

    report.step("Converting publications to the desired output format ...");
    let text = mode.renderer().render(&records)?;

    match &args.output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{text}"),
    }
    report.summary(records.len(), total);
    Ok(())
}
