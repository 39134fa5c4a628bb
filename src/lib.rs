mod docx;
mod error;
pub mod model;
pub mod normalize;

pub use error::Error;
pub use model::{Attribute, AttributeFault, StyleName, StyleRecord, StyleUpdate};
pub use normalize::{
    ExclusionRule, Exclusions, NormalizeConfig, Outcome, Pass, PassReport, Report, StyleOutcome,
    normalize,
};

use std::path::Path;
use std::time::Instant;

/// Snapshot the paragraph styles of a `styles.xml` part.
pub fn read_catalog(styles_xml: &str) -> Result<Vec<StyleRecord>, Error> {
    let xml = roxmltree::Document::parse(styles_xml)?;
    Ok(docx::parse_catalog(&xml))
}

/// Normalize one `styles.xml` part, returning the patched text and the report.
pub fn normalize_styles_xml(
    styles_xml: &str,
    config: &NormalizeConfig,
) -> Result<(String, Report), Error> {
    let records = read_catalog(styles_xml)?;
    let report = normalize(&records, config);
    log_report(&report);

    let updates = report.indexed_updates();
    if updates.is_empty() {
        return Ok((styles_xml.to_string(), report));
    }
    let patched = docx::apply_updates(styles_xml, &updates)?;
    log::info!(
        "Applied updates to {} of {} styles",
        patched.applied,
        updates.len()
    );
    if !patched.unapplied.is_empty() {
        log::warn!("Styles left unchanged: {}", patched.unapplied.join(", "));
    }
    Ok((patched.xml, report))
}

/// Normalize the style catalog of the DOCX at `input`.
///
/// With `output` the normalized package is written there (which may be
/// `input` itself); without it the run only reports what would change.
pub fn normalize_docx(
    input: &Path,
    output: Option<&Path>,
    config: &NormalizeConfig,
) -> Result<Report, Error> {
    let t0 = Instant::now();

    let mut zip = docx::open(input)?;
    let styles_xml = docx::read_styles(&mut zip)?;
    let t_read = t0.elapsed();

    let (patched, report) = normalize_styles_xml(&styles_xml, config)?;
    let t_normalize = t0.elapsed();

    if let Some(output) = output {
        docx::write_package(&mut zip, &patched, output)?;
        log::info!("Wrote {}", output.display());
    }
    let t_total = t0.elapsed();

    log::info!(
        "Timing: read={:.1}ms, normalize={:.1}ms, write={:.1}ms, total={:.1}ms ({} styles)",
        t_read.as_secs_f64() * 1000.0,
        (t_normalize - t_read).as_secs_f64() * 1000.0,
        (t_total - t_normalize).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        report.indent.styles.len().max(report.spacing.styles.len()),
    );

    Ok(report)
}

fn log_report(report: &Report) {
    for pass in [&report.indent, &report.spacing] {
        for style in &pass.styles {
            match &style.outcome {
                Outcome::Errored { fault } => {
                    log::warn!("[{}] error: {}, {}", pass.pass, style.name, fault)
                }
                Outcome::Unchanged => log::debug!("[{}] unchanged: {}", pass.pass, style.name),
                Outcome::Excluded => log::debug!("[{}] excluded: {}", pass.pass, style.name),
                Outcome::NotApplicable => {
                    log::debug!("[{}] no rule applies: {}", pass.pass, style.name)
                }
                _ => {}
            }
        }
        for line in pass.diagnostics() {
            if !line.starts_with("error:") {
                log::info!("[{}] {line}", pass.pass);
            }
        }
    }
}
