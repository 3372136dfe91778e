use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use querytext_config::config::{Config, PlanFormat};
use querytext_core::Plan;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CliResult, ErrorContext};

/// Reads plans from stdin instead of a file.
pub const STDIN_SOURCE: &str = "-";

pub struct BuildOptions {
    pub source: String,
    pub strict: bool,
    pub limit: Option<u64>,
    pub format: Option<PlanFormat>,
}

#[derive(Debug, Serialize)]
pub struct BuiltQuery {
    pub query: String,
    pub predicate: String,
    pub descriptor: String,
    pub or_connected: bool,
}

/// Picks the plan format: the explicit flag wins, then the file extension,
/// then the configured format.
pub fn resolve_format(source: &str, explicit: Option<PlanFormat>, config: &Config) -> PlanFormat {
    explicit
        .or_else(|| {
            if source == STDIN_SOURCE {
                None
            } else {
                PlanFormat::from_path(Path::new(source))
            }
        })
        .unwrap_or_else(|| config.plan_format())
}

fn read_source(source: &str) -> CliResult<String> {
    if source == STDIN_SOURCE {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .with_context(|| "reading plan from stdin".to_string())?;
        return Ok(content);
    }

    fs::read_to_string(source).with_context(|| format!("reading plan file {source}"))
}

pub fn parse_plan(content: &str, format: PlanFormat) -> CliResult<Plan> {
    let plan = match format {
        PlanFormat::Toml => Plan::from_toml_str(content)?,
        PlanFormat::Json => Plan::from_json_str(content)?,
    };
    Ok(plan)
}

/// Replays `plan` and collects the rendered text.
///
/// `limit` is appended as a final step only when the plan has no limit of
/// its own.
pub fn build_query(mut plan: Plan, strict: bool, limit: Option<u64>) -> CliResult<BuiltQuery> {
    if let Some(count) = limit {
        if plan.ensure_limit(count) {
            debug!("plan has no limit, appending LIMIT({})", count);
        }
    }

    let mut builder = plan.replay(strict)?;
    let query = builder.build();

    Ok(BuiltQuery {
        query,
        predicate: builder.predicate().to_string(),
        descriptor: builder.descriptor().to_string(),
        or_connected: builder.is_or_connected(),
    })
}

/// Writes the built query to `out`: the bare text, or the whole result as
/// JSON.
pub fn write_output<W: Write>(out: &mut W, built: &BuiltQuery, json: bool) -> CliResult<()> {
    let text = if json {
        serde_json::to_string_pretty(built)?
    } else {
        built.query.clone()
    };
    writeln!(out, "{text}").with_context(|| "writing query output".to_string())
}

pub fn build_plan(config: &Config, options: BuildOptions, json: bool) -> CliResult<()> {
    let format = resolve_format(&options.source, options.format, config);
    debug!("reading {} plan from {}", format, options.source);

    let content = read_source(&options.source)?;
    let plan = parse_plan(&content, format)?;

    let strict = options.strict || config.is_strict();
    let built = build_query(plan, strict, options.limit.or(config.default_limit))?;

    if built.or_connected {
        warn!("Plan starts with `or` before any condition; the query may match more than intended");
    }

    write_output(&mut io::stdout().lock(), &built, json)
}
