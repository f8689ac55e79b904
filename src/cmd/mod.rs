mod ddl;
mod glob_util;
mod inspect;
mod order;
mod sboot;
mod schema;
mod validate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "schema2script")]
#[command(version)]
#[command(
    about = "Generate SQL DDL scripts and sboot commands from draw.io ER diagrams",
    long_about = "Generate SQL DDL scripts and sboot commands from draw.io ER diagrams.\n\n\
Diagrams can be XML (compressed or not) or SVG with the diagram source embedded. \
Files ending in .gz, .bz2, .xz or .zst are decompressed first."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an SQL DDL script from an ER diagram
    Ddl {
        /// Diagram file (.xml, .drawio or .svg)
        file: PathBuf,

        /// SQL dialect: h2 or oracle [default: h2]
        #[arg(short, long)]
        dialect: Option<String>,

        /// File for the generated DDL script
        /// [default: src/main/resources/database/db_create.sql]
        #[arg(short, long = "file", value_name = "PATH")]
        output: Option<PathBuf>,

        /// Write the script to standard output instead of a file
        #[arg(long)]
        stdout: bool,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate sboot scaffold commands from an ER diagram
    Sboot {
        /// Diagram file (.xml, .drawio or .svg)
        file: PathBuf,

        /// Kind of stack to generate: fullstack, api, backend, conversion, persistence
        /// [default: fullstack]
        #[arg(short, long)]
        env: Option<String>,

        /// File for the generated sboot commands script [default: sboot_generate.sh]
        #[arg(short, long = "file", value_name = "PATH")]
        output: Option<PathBuf>,

        /// Write the commands to standard output instead of a file
        #[arg(long)]
        stdout: bool,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate ER diagrams without generating anything
    Validate {
        /// Diagram file or glob pattern (e.g., *.drawio, diagrams/**/*.svg)
        file: PathBuf,

        /// SQL dialect whose rules are checked: h2 or oracle
        #[arg(short, long, default_value = "h2")]
        dialect: String,

        /// Treat warnings as errors (exit code 1)
        #[arg(long)]
        strict: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Stop on first file that fails (for glob patterns)
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print tables in dependency order (referenced tables first)
    Order {
        /// Diagram file
        file: PathBuf,
    },

    /// Show the tables, fields and foreign keys read from a diagram
    Inspect {
        /// Diagram file
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print JSON schemas of the --json outputs
    Schema {
        /// Command whose schema to print (all when omitted)
        command: Option<String>,

        /// Directory to write <command>.schema.json files into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// List available schema names
        #[arg(long)]
        list: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Ddl {
            file,
            dialect,
            output,
            stdout,
            config,
        } => ddl::run(file, dialect, output, stdout, config),
        Commands::Sboot {
            file,
            env,
            output,
            stdout,
            config,
        } => sboot::run(file, env, output, stdout, config),
        Commands::Validate {
            file,
            dialect,
            strict,
            json,
            fail_fast,
        } => validate::run(file, dialect, strict, json, fail_fast),
        Commands::Order { file } => order::run(file),
        Commands::Inspect { file, json } => inspect::run(file, json),
        Commands::Schema {
            command,
            output_dir,
            list,
        } => schema::run(command, output_dir, list),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "schema2script",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

/// Write a generated script to `path` (creating parent directories) or stdout
fn emit(text: &str, path: &Path, stdout: bool) -> anyhow::Result<()> {
    if stdout {
        println!("{}", text);
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}
