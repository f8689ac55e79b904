//! Sboot command - write `sboot generate` commands for an ER diagram.

use crate::config::{SbootSettings, YamlConfig};
use crate::pipeline;
use crate::render::{SbootGenerator, StackEnv};
use std::path::PathBuf;

pub fn run(
    file: PathBuf,
    env: Option<String>,
    output: Option<PathBuf>,
    stdout: bool,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = YamlConfig::load_optional(config.as_deref())?;
    let env = env
        .map(|e| e.parse::<StackEnv>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;
    let settings = SbootSettings::resolve(env, output, &config.sboot);

    eprintln!("Reading diagram: {} [env: {}]", file.display(), settings.env);

    let mut loaded = pipeline::load(&file)?;
    let commands = SbootGenerator::new(settings.env).generate(&loaded.schema, &mut loaded.diagnostics);

    loaded.diagnostics.print_summary();
    super::emit(&commands, &settings.file, stdout)
}
