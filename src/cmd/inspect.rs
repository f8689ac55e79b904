//! Inspect command - dump the model read from a diagram.

use crate::pipeline;
use crate::render::json::{build_inspect_json, to_json, InspectJsonOutput};
use crate::schema::PK_CONSTRAINT;
use std::path::PathBuf;

pub fn run(file: PathBuf, json: bool) -> anyhow::Result<()> {
    let loaded = pipeline::load(&file)?;
    let input = file.display().to_string();
    let output = build_inspect_json(&input, &loaded.schema, loaded.diagnostics);

    if json {
        println!("{}", to_json(&output));
        return Ok(());
    }

    print_text(&output);
    Ok(())
}

fn print_text(output: &InspectJsonOutput) {
    println!("Diagram: {}", output.input);
    println!();

    for table in &output.tables {
        match &table.plural {
            Some(plural) => println!("{} ({})", table.name, plural),
            None => println!("{}", table.name),
        }
        for field in &table.fields {
            let mut flags = Vec::new();
            if field.constraints.iter().any(|c| c == PK_CONSTRAINT) {
                flags.push("PK".to_string());
            }
            if field.not_null {
                flags.push("NOT NULL".to_string());
            }
            if field.unique {
                flags.push("UNIQUE".to_string());
            }
            if !field.default.is_empty() {
                flags.push(format!("DEFAULT {}", field.default));
            }
            println!(
                "  {:<20} {:<20} {}",
                field.name,
                field.data_type,
                flags.join(", ")
            );
        }
        for fk in &table.foreign_keys {
            println!(
                "  FK {}: {} -> {}.{} ({})",
                fk.name, fk.column, fk.references_table, fk.references_column, fk.kind
            );
        }
        println!();
    }

    println!(
        "{} tables, {} fields, {} foreign keys",
        output.summary.table_count, output.summary.field_count, output.summary.foreign_key_count
    );
    if !output.cyclic_tables.is_empty() {
        println!("Cyclic tables: {}", output.cyclic_tables.join(", "));
    }

    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic);
    }
}
