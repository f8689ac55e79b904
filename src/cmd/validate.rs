//! Validate command - report diagram issues without generating anything.

use super::glob_util::expand_file_pattern;
use crate::pipeline;
use crate::render::json::{FileValidationJson, ValidateJsonOutput, ValidateSummary};
use crate::render::{DdlGenerator, SqlDialect};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub fn run(
    file: PathBuf,
    dialect: String,
    strict: bool,
    json: bool,
    fail_fast: bool,
) -> anyhow::Result<()> {
    let dialect: SqlDialect = dialect.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let expanded = expand_file_pattern(&file)?;

    if !json && expanded.pattern_was_glob {
        eprintln!(
            "Validating {} diagrams [dialect: {}]",
            expanded.files.len(),
            dialect
        );
        eprintln!();
    }

    let start_time = Instant::now();
    let mut results = Vec::with_capacity(expanded.files.len());

    for path in &expanded.files {
        let result = validate_file(path, dialect, strict);
        if !json {
            print_file_result(&result, dialect, strict);
        }

        let failed = !result.passed;
        results.push(result);
        if failed && fail_fast {
            if !json {
                eprintln!("Stopping after first failure (--fail-fast)");
            }
            break;
        }
    }

    let summary = ValidateSummary::from_files(&results);

    if json {
        let output = ValidateJsonOutput {
            dialect: dialect.to_string(),
            strict,
            files: results,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        if output.summary.failed > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    if expanded.pattern_was_glob {
        eprintln!("Validation summary:");
        eprintln!("  Files: {}", summary.total_files);
        eprintln!("  Passed: {}", summary.passed);
        eprintln!("  Failed: {}", summary.failed);
        eprintln!(
            "  Total: {} errors, {} warnings",
            summary.errors, summary.warnings
        );
        eprintln!("  Time: {:.3?}", start_time.elapsed());
        eprintln!();
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn validate_file(path: &Path, dialect: SqlDialect, strict: bool) -> FileValidationJson {
    let input = path.display().to_string();

    let mut loaded = match pipeline::load(path) {
        Ok(loaded) => loaded,
        Err(e) => return FileValidationJson::failed(&input, e.to_string()),
    };

    DdlGenerator::new(dialect).validate(&loaded.schema, &mut loaded.diagnostics);
    // Ordering reports reference cycles
    loaded.schema.ordered(&mut loaded.diagnostics);

    FileValidationJson::from_diagnostics(&input, loaded.schema.len(), loaded.diagnostics, strict)
}

fn print_file_result(result: &FileValidationJson, dialect: SqlDialect, strict: bool) {
    eprintln!(
        "Validating diagram: {} [dialect: {}]",
        result.input, dialect
    );

    if let Some(error) = &result.error {
        eprintln!("ERROR {}", error);
        eprintln!("Result: FAILED");
        eprintln!();
        return;
    }

    for diagnostic in &result.diagnostics {
        eprintln!("{}", diagnostic);
    }
    if !result.diagnostics.is_empty() {
        eprintln!();
    }

    eprintln!("  Tables found: {}", result.table_count);
    eprintln!(
        "  Total: {} errors, {} warnings",
        result.errors, result.warnings
    );

    if result.errors > 0 {
        eprintln!("Result: FAILED");
    } else if result.warnings > 0 && strict {
        eprintln!("Result: FAILED (--strict mode, warnings treated as errors)");
    } else if result.warnings > 0 {
        eprintln!("Result: PASSED (with warnings)");
    } else {
        eprintln!("Result: PASSED");
    }
    eprintln!();
}
