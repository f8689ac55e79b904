//! CLI for generating test diagrams.
//!
//! Usage:
//!   gen-fixtures --scale small --seed 42 --format svg > fixtures/small.svg
//!   gen-fixtures --tables 200 --format compressed -o large.drawio

use clap::Parser;
use std::fs;
use test_data_gen::{Format, Generator, Scale};

#[derive(Parser, Debug)]
#[command(name = "gen-fixtures")]
#[command(about = "Generate draw.io ER diagram fixtures for schema2script", long_about = None)]
struct Args {
    /// Scale preset: small, medium, large (ignored if --tables is given)
    #[arg(short, long, default_value = "small")]
    scale: String,

    /// Number of tables
    #[arg(short, long)]
    tables: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Output format: plain, mxfile, compressed, svg
    #[arg(short, long, default_value = "plain")]
    format: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format: Format = args.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let tables = match args.tables {
        Some(n) => n,
        None => {
            let scale: Scale = args.scale.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            scale.tables()
        }
    };

    let diagram = Generator::new(args.seed).generate(tables);
    let content = diagram.render(format);

    match args.output {
        Some(path) => {
            fs::write(&path, content)?;
            eprintln!("Generated {} tables ({}) to {}", tables, format.extension(), path);
        }
        None => println!("{}", content),
    }

    Ok(())
}
