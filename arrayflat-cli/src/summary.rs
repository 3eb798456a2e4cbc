use std::{fs, path::Path};

use arrayflat::RunReport;

/// Print one line per written document, then the completion message.
pub fn print_summary(report: &RunReport, dry_run: bool) {
    println!(
        "Name map: {} arrays, {} identifiers",
        report.arrays, report.identifiers
    );
    let verb = if dry_run { "Would write" } else { "Wrote" };
    for doc in &report.documents {
        println!(
            "📄 {} {} [{}]: {} appended, {} skipped, {} replaced, {} removed",
            verb,
            doc.path.display(),
            doc.language,
            doc.outcome.appended,
            doc.outcome.skipped,
            doc.outcome.replaced,
            doc.outcome.removed
        );
    }
    if report.documents.is_empty() {
        println!("ℹ️  No documents matched; nothing to write");
    }
    println!("✅ {} done", report.mode);
}

/// Write the report as pretty JSON, creating the parent directory if needed.
pub fn write_report_json(report: &RunReport, path: &Path) -> Result<(), String> {
    let json = report
        .to_json()
        .map_err(|e| format!("Cannot serialize report: {}", e))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Cannot create report directory: {}", e))?;
        }
    }
    fs::write(path, json).map_err(|e| format!("Cannot write report {}: {}", path.display(), e))
}
