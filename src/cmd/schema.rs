//! Schema command - print or export JSON schemas of `--json` outputs.

use crate::json_schema;
use std::path::PathBuf;

pub fn run(command: Option<String>, output_dir: Option<PathBuf>, list: bool) -> anyhow::Result<()> {
    if list {
        for name in json_schema::schema_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let schemas = match command {
        Some(name) => {
            let Some(schema) = json_schema::get_schema(&name) else {
                anyhow::bail!(
                    "no JSON schema for '{}'. Available: {}",
                    name,
                    json_schema::schema_names().join(", ")
                );
            };
            vec![(name, schema)]
        }
        None => json_schema::all_schemas()
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect(),
    };

    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            for (name, schema) in &schemas {
                let path = dir.join(format!("{}.schema.json", name));
                std::fs::write(&path, serde_json::to_string_pretty(schema)? + "\n")?;
                eprintln!("Wrote {}", path.display());
            }
        }
        None if schemas.len() == 1 => {
            println!("{}", serde_json::to_string_pretty(&schemas[0].1)?);
        }
        None => {
            let mut all = serde_json::Map::new();
            for (name, schema) in schemas {
                all.insert(name, serde_json::to_value(&schema)?);
            }
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
    }

    Ok(())
}
