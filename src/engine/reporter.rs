use std::fs;
use std::path::Path;

use console::style;

use super::report::{ScanReport, ScanScope};
use crate::types::{Result, RuleResult, Severity};

pub struct Reporter;

impl Reporter {
    pub fn to_json(report: &ScanReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    pub fn generate_json<P: AsRef<Path>>(report: &ScanReport, output_path: P) -> Result<()> {
        fs::write(output_path, Self::to_json(report)?)?;
        Ok(())
    }

    pub fn print_summary(report: &ScanReport) {
        Self::print_filtered(report, Severity::Suggestion);
    }

    /// Summary with only results at `min_severity` or more severe
    pub fn print_filtered(report: &ScanReport, min_severity: Severity) {
        let title = match &report.scope {
            ScanScope::Page => "Page Scan".to_string(),
            ScanScope::Element { element_id } => format!("Element Scan: {}", element_id),
        };
        println!("{}", style(title).bold());
        println!("══════════════════════════════════════");
        println!("Preset: {} ({})", report.preset, report.mode);
        println!("Classes: {}", report.classes.len());

        if !report.role_histogram.is_empty() {
            println!();
            println!("Roles:");
            for (role, count) in &report.role_histogram {
                println!("  {:<16} {}", role.as_str(), count);
            }
        }
        if !report.roles.is_empty() {
            println!();
            println!("Roles:");
            for (id, role) in &report.roles {
                println!("  {:<16} {}", id, role);
            }
        }
        println!();

        let filtered: Vec<&RuleResult> = report.at_least(min_severity).collect();
        if filtered.is_empty() {
            println!("No issues at severity {} or higher.", min_severity);
        } else {
            println!("Issues ({}):", filtered.len());
            println!();
            for result in filtered {
                Self::print_result(result);
            }
        }

        println!("══════════════════════════════════════");
        if report.has_errors() {
            println!(
                "Result: {} ({} errors, {} warnings)",
                style("FAILED").red().bold(),
                report.error_count(),
                report.warning_count()
            );
        } else if report.warning_count() > 0 {
            println!(
                "Result: {} with warnings ({})",
                style("PASSED").yellow(),
                report.warning_count()
            );
        } else {
            println!("Result: {} ✓", style("PASSED").green());
        }
    }

    fn print_result(result: &RuleResult) {
        let icon = match result.severity {
            Severity::Error => style("✗").red(),
            Severity::Warning => style("⚠").yellow(),
            Severity::Suggestion => style("ℹ").blue(),
        };

        let location = match (&result.element_id, result.class_name.is_empty()) {
            (Some(id), false) => format!("{} .{}", id, result.class_name),
            (Some(id), true) => id.clone(),
            (None, false) => format!(".{}", result.class_name),
            (None, true) => "page".to_string(),
        };

        println!(
            "{} [{}] {} {}",
            icon,
            result.severity.as_str().to_uppercase(),
            style(&result.rule_id).dim(),
            result.message
        );
        println!("  at {}", location);
        if let Some(ref fix) = result.fix {
            println!("  → {}", fix.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::OpinionMode;
    use tempfile::TempDir;

    #[test]
    fn test_generate_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let report = ScanReport::new(ScanScope::Page, "lumos", OpinionMode::Strict);

        Reporter::generate_json(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["preset"], "lumos");
        assert_eq!(value["mode"], "strict");
        assert_eq!(value["scope"]["kind"], "page");
    }
}
