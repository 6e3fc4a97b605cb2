//! Console output for a validation run

use colored::Colorize;

use crate::manifest::{MANIFEST_FILE, RunReport};

pub fn print_empty_warning() {
    println!(
        "{}",
        format!("⚠️  WARNING: No resources found in {MANIFEST_FILE}").yellow()
    );
}

pub fn print_header(resource_count: usize) {
    println!("📋 Validating {resource_count} resources from {MANIFEST_FILE}...\n");
}

pub fn print_report(report: &RunReport) {
    for file in &report.files {
        if file.result.valid {
            println!("{} {}", "✅".green(), file.resource);
        } else {
            println!("{} {}", "❌".red(), file.resource.bold());
            for error in &file.result.errors {
                println!("   - {error}");
            }
        }
    }

    println!();

    if report.all_valid() {
        println!("{}", "✅ All resources are valid Flux v2 resources!".green());
    } else {
        println!(
            "{}",
            "❌ Validation failed. Please fix the errors above.".red()
        );
    }
}
