//! Ddl command - write a Create Table script for an ER diagram.

use crate::config::{DdlSettings, YamlConfig};
use crate::pipeline;
use crate::render::{DdlGenerator, SqlDialect};
use std::path::PathBuf;

pub fn run(
    file: PathBuf,
    dialect: Option<String>,
    output: Option<PathBuf>,
    stdout: bool,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = YamlConfig::load_optional(config.as_deref())?;
    let dialect = dialect
        .map(|d| d.parse::<SqlDialect>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;
    let settings = DdlSettings::resolve(dialect, output, &config.ddl);

    eprintln!(
        "Reading diagram: {} [dialect: {}]",
        file.display(),
        settings.dialect
    );

    let mut loaded = pipeline::load(&file)?;
    let generator = DdlGenerator::new(settings.dialect)
        .with_default_string_type(settings.default_string_type.as_str());

    generator.validate(&loaded.schema, &mut loaded.diagnostics);
    let script = generator.generate(&loaded.schema, &mut loaded.diagnostics);

    loaded.diagnostics.print_summary();
    super::emit(&script, &settings.file, stdout)
}
