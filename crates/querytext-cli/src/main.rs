use std::{
    fs,
    path::{Path, PathBuf},
};

use build::{build_plan, BuildOptions};
use clap::Parser;
use cli::Args;
use error::{CliError, CliResult};
use logging::setup_logging;
use operators::list_operators;
use querytext_config::config::{config_path, generate_default_config, Config};
use tracing::{debug, warn};
use utils::set_color;

mod build;
mod cli;
mod error;
mod logging;
mod operators;
mod utils;

fn resolve_config_path(args: &Args) -> PathBuf {
    args.config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(config_path)
}

/// Renders the config file as written, or the defaults when it is missing.
///
/// In JSON mode the loaded and resolved configuration is serialized instead.
fn render_config(path: &Path, json: bool) -> CliResult<String> {
    if json {
        let config = Config::load(path)?;
        return Ok(serde_json::to_string_pretty(&config)?);
    }

    match fs::read_to_string(path) {
        Ok(v) => Ok(v),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("Config file {} not found", path.display());
            Ok(toml::to_string_pretty(&Config::default_config())?)
        }
        Err(err) => Err(CliError::IoError {
            action: "reading config".to_string(),
            source: err,
        }),
    }
}

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_color(false);
    }

    let config_path = resolve_config_path(&args);
    debug!("using config file {}", config_path.display());

    match args.command {
        cli::Commands::Build {
            ref plan,
            strict,
            limit,
            format,
        } => {
            let config = Config::load(&config_path)?;
            let options = BuildOptions {
                source: plan.clone(),
                strict,
                limit,
                format,
            };
            build_plan(&config, options, args.json)?;
        }
        cli::Commands::Operators => list_operators(args.json)?,
        cli::Commands::Config => {
            let content = render_config(&config_path, args.json)?;
            println!("{}", content.trim_end());
        }
        cli::Commands::DefConfig => generate_default_config(&config_path)?,
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_render_config_as_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# mine\ndefault_limit = 7\n").unwrap();

        assert_eq!(render_config(&path, false).unwrap(), "# mine\ndefault_limit = 7\n");
    }

    #[test]
    fn test_render_config_missing_file() {
        let dir = tempdir().unwrap();
        let rendered = render_config(&dir.path().join("missing.toml"), false).unwrap();

        let config: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(config, Config::default_config());
    }

    #[test]
    fn test_render_config_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_limit = 7\nplan_format = \"json\"\n").unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&render_config(&path, true).unwrap()).unwrap();
        assert_eq!(value["default_limit"], 7);
        assert_eq!(value["plan_format"], "json");
        assert_eq!(value["strict"], false);
    }
}
