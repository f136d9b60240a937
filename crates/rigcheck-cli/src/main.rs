use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rigcheck_api::{
    resolve_settings, BrowseRequest, RigcheckApi, SettingsSources, SortSpec, AUTO_FILTER_ENV,
};
use rigcheck_core::{Category, FilterCriteria, Selection, SortDirection};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CLI_CONTRACT_VERSION: &str = "cli.v1";

#[derive(Debug, Parser)]
#[command(name = "rigcheck")]
#[command(about = "Browse a PC part catalog and check build compatibility")]
struct Cli {
    #[arg(long, env = "RIGCHECK_CATALOG")]
    catalog: PathBuf,

    #[arg(long, env = "RIGCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// List every option regardless of the other picks.
    #[arg(long, default_value_t = false)]
    no_auto_filter: bool,

    /// Log filter directive, e.g. `debug` or `rigcheck_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Categories,
    Browse(BrowseArgs),
    Check(SelectArgs),
    Options(OptionsArgs),
}

#[derive(Debug, Args)]
struct BrowseArgs {
    #[arg(long, value_enum)]
    category: CategoryArg,
    /// Keep records whose field matches one of the values: `socket=AM5,LGA1700`.
    #[arg(long = "one-of", value_name = "KEY=V1,V2")]
    one_of: Vec<String>,
    /// Keep records whose numeric field lies in a closed range: `price=100..300`.
    /// Either bound may be left empty.
    #[arg(long, value_name = "KEY=MIN..MAX")]
    range: Vec<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, default_value_t = false)]
    desc: bool,
}

#[derive(Debug, Args)]
struct SelectArgs {
    #[arg(long = "select", value_name = "CATEGORY=NAME")]
    select: Vec<String>,
}

#[derive(Debug, Args)]
struct OptionsArgs {
    #[arg(long, value_enum)]
    category: CategoryArg,
    #[command(flatten)]
    selection: SelectArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    Cpu,
    Motherboard,
    Ram,
    Gpu,
    Storage,
    Psu,
    Case,
    Cooler,
}

fn with_contract_version(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            object.insert(
                "contract_version".to_string(),
                Value::String(CLI_CONTRACT_VERSION.to_string()),
            );
            Value::Object(object)
        }
        other => serde_json::json!({
            "contract_version": CLI_CONTRACT_VERSION,
            "payload": other
        }),
    }
}

fn emit_json<T: Serialize>(payload: &T, what: &str) -> Result<()> {
    let value = serde_json::to_value(payload).with_context(|| format!("failed to serialize {what}"))?;
    println!("{}", serde_json::to_string_pretty(&with_contract_version(value))?);
    Ok(())
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log level `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests also arrive here.
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_level.as_deref())?;

    let auto_filter_env = std::env::var(AUTO_FILTER_ENV).ok();
    let settings = resolve_settings(SettingsSources {
        config_path: cli.config.as_deref(),
        auto_filter_flag: cli.no_auto_filter.then_some(false),
        auto_filter_env: auto_filter_env.as_deref(),
    })?;
    let api = RigcheckApi::from_catalog_path(&cli.catalog, settings)?;
    tracing::debug!(command = ?cli.command, "dispatching");

    match cli.command {
        Command::Categories => run_categories(&api),
        Command::Browse(args) => run_browse(&api, &args),
        Command::Check(args) => run_check(&api, &args),
        Command::Options(args) => run_options(&api, &args),
    }
}

fn run_categories(api: &RigcheckApi) -> Result<()> {
    emit_json(&serde_json::json!({ "categories": api.categories() }), "categories")
}

fn run_browse(api: &RigcheckApi, args: &BrowseArgs) -> Result<()> {
    let mut criteria = FilterCriteria::new();
    for raw in &args.one_of {
        let (key, values) = parse_one_of(raw)?;
        criteria = criteria.one_of(key, values);
    }
    for raw in &args.range {
        let (key, min, max) = parse_range(raw)?;
        criteria = criteria.range(key, min, max);
    }
    if let Some(search) = &args.search {
        criteria = criteria.search(search);
    }

    let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
    let request = BrowseRequest {
        category: args.category.into_category(),
        criteria,
        sort: args.sort.as_ref().map(|key| SortSpec { key: key.clone(), direction }),
    };
    let result = api.browse(&request)?;
    emit_json(&result, "browse result")
}

fn run_check(api: &RigcheckApi, args: &SelectArgs) -> Result<()> {
    let selection = parse_selection(&args.select)?;
    emit_json(&api.check(&selection), "build report")
}

fn run_options(api: &RigcheckApi, args: &OptionsArgs) -> Result<()> {
    let selection = parse_selection(&args.selection.select)?;
    emit_json(&api.options(args.category.into_category(), &selection), "options")
}

fn parse_selection(raw: &[String]) -> Result<Selection> {
    let mut selection = Selection::new();
    for entry in raw {
        let (category, name) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("selection must look like CATEGORY=NAME (received: {entry})"))?;
        let category = Category::parse(category.trim())
            .ok_or_else(|| anyhow!("unknown category `{}` in selection {entry}", category.trim()))?;
        selection.set(category, Some(name));
    }
    Ok(selection)
}

fn parse_one_of(raw: &str) -> Result<(&str, Vec<&str>)> {
    let (key, values) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("--one-of must look like KEY=V1,V2 (received: {raw})"))?;
    let values: Vec<&str> = values.split(',').map(str::trim).filter(|value| !value.is_empty()).collect();
    if values.is_empty() {
        return Err(anyhow!("--one-of {key} needs at least one value"));
    }
    Ok((key.trim(), values))
}

fn parse_range(raw: &str) -> Result<(&str, f64, f64)> {
    let (key, bounds) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("--range must look like KEY=MIN..MAX (received: {raw})"))?;
    let (min, max) = bounds
        .split_once("..")
        .ok_or_else(|| anyhow!("--range {key} must look like MIN..MAX (received: {bounds})"))?;
    let min = parse_bound(min, f64::NEG_INFINITY).with_context(|| format!("invalid --range {raw}"))?;
    let max = parse_bound(max, f64::INFINITY).with_context(|| format!("invalid --range {raw}"))?;
    if min > max {
        return Err(anyhow!("--range {key} has min {min} above max {max}"));
    }
    Ok((key.trim(), min, max))
}

fn parse_bound(raw: &str, open: f64) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(open);
    }
    let value: f64 = raw.parse().with_context(|| format!("`{raw}` is not a number"))?;
    if value.is_nan() {
        return Err(anyhow!("range bounds must be numbers"));
    }
    Ok(value)
}

impl CategoryArg {
    fn into_category(self) -> Category {
        match self {
            Self::Cpu => Category::Cpu,
            Self::Motherboard => Category::Motherboard,
            Self::Ram => Category::Ram,
            Self::Gpu => Category::Gpu,
            Self::Storage => Category::Storage,
            Self::Psu => Category::Psu,
            Self::Case => Category::Case,
            Self::Cooler => Category::Cooler,
        }
    }
}
