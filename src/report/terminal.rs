use colored::*;

use crate::models::ValidationStatus;
use crate::validator::{Gate, ValidationReport};

/// Print the per-status counts to stdout.
pub fn render_summary(report: &ValidationReport, quiet: bool) {
    let total = report.total();
    let allowed = report.count(ValidationStatus::Allowed);
    let banned = report.count(ValidationStatus::Banned);
    let unknown = report.count(ValidationStatus::Unknown);
    let validated = report.count(ValidationStatus::ManuallyValidated);

    if quiet {
        println!(
            "Total: {}  Allowed: {}  Banned: {}  Unknown: {}  Validated: {}",
            total,
            allowed.to_string().green(),
            banned.to_string().red(),
            unknown.to_string().yellow(),
            validated.to_string().cyan(),
        );
    } else {
        println!();
        println!(" {}", "SUMMARY".bold());
        println!(" Total dependencies    : {}", total);
        println!(" {}  Allowed           : {:>4}", "✓".green(), allowed);
        println!(" {}  Banned            : {:>4}", "✗".red(), banned);
        println!(" {}  Unknown           : {:>4}", "?".yellow(), unknown);
        println!(" {}  Manually validated: {:>4}", "◆".cyan(), validated);
        println!();
    }
}

pub fn render_coverage(report: &ValidationReport, coverage_target: u8) {
    println!(
        "Target license coverage ({}%) and actual coverage: {}%",
        coverage_target,
        report.coverage()
    );
}

/// One-line verdict printed to stderr.
pub fn render_gate(gate: Gate, report: &ValidationReport, coverage_target: Option<u8>) {
    match gate {
        Gate::Passed => eprintln!("{} license check passed", "[OK]".green().bold()),
        Gate::PolicyViolation => eprintln!(
            "{} {} banned license(s) found",
            "[ERROR]".red().bold(),
            report.count(ValidationStatus::Banned)
        ),
        Gate::CoverageShortfall => eprintln!(
            "{} license coverage {}% is below the {}% target",
            "[ERROR]".red().bold(),
            report.coverage(),
            coverage_target.unwrap_or_default()
        ),
    }
}
