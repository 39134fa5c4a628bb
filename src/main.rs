use std::path::{Path, PathBuf};

use clap::Parser;
use docxide_normalize::{Error, ExclusionRule, NormalizeConfig, Report};

/// Normalize paragraph style indents and spacing from font size and leading.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// DOCX file to normalize
    input: PathBuf,

    /// Output path (default: <input>.normalized.docx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report what would change without writing a file
    #[arg(long)]
    dry_run: bool,

    /// Write the per-style outcome report as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Skip spacing for styles with exactly this name (case-insensitive)
    #[arg(long = "exclude-name", value_name = "NAME")]
    exclude_names: Vec<String>,

    /// Skip spacing for styles whose name contains this text (case-insensitive)
    #[arg(long = "exclude-containing", value_name = "TEXT")]
    exclude_containing: Vec<String>,

    /// Leave indents alone
    #[arg(long)]
    no_indents: bool,

    /// Leave space before/after alone
    #[arg(long)]
    no_spacing: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let mut config = NormalizeConfig {
        indents: !cli.no_indents,
        spacing: !cli.no_spacing,
        ..NormalizeConfig::default()
    };
    for name in &cli.exclude_names {
        config.spacing_exclusions.push(ExclusionRule::equals(name));
    }
    for text in &cli.exclude_containing {
        config.spacing_exclusions.push(ExclusionRule::contains(text));
    }

    let output = (!cli.dry_run).then(|| {
        cli.output
            .clone()
            .unwrap_or_else(|| default_output(&cli.input))
    });

    let report = docxide_normalize::normalize_docx(&cli.input, output.as_deref(), &config)?;
    summarize(&report);

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
        log::info!("Report written to {}", path.display());
    }
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into());
    input.with_file_name(format!("{stem}.normalized.docx"))
}

fn summarize(report: &Report) {
    let updates = report.updates();
    println!(
        "{} styles, {} updated, {} errors",
        report.indent.styles.len().max(report.spacing.styles.len()),
        updates.len(),
        report.errored(),
    );
    for (name, update) in &updates {
        println!("  {name}: {update}");
    }
}
