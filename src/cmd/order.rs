//! Order command - print tables in dependency order.

use crate::pipeline;
use crate::schema::SchemaGraph;
use std::path::PathBuf;

pub fn run(file: PathBuf) -> anyhow::Result<()> {
    let mut loaded = pipeline::load(&file)?;
    let schema = &loaded.schema;

    if schema.is_empty() {
        eprintln!("No tables found in the diagram.");
        loaded.diagnostics.print_summary();
        return Ok(());
    }

    let graph = SchemaGraph::from_schema(schema);
    let topo_result = graph.topo_sort();
    topo_result.report_cycles(schema, &mut loaded.diagnostics);

    for table_id in &topo_result.order {
        if let Some(name) = graph.table_name(*table_id) {
            println!("{}", name);
        }
    }

    if !topo_result.cyclic_tables.is_empty() {
        eprintln!("\nWarning: Circular dependencies detected!");
        eprintln!("The following tables were placed before some of the tables they reference:");
        for table_id in &topo_result.cyclic_tables {
            if let Some(name) = graph.table_name(*table_id) {
                eprintln!("  - {}", name);
            }
        }
        eprintln!();
    }

    loaded.diagnostics.print_summary();
    Ok(())
}
