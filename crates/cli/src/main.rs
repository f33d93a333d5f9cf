mod schema_file;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use myargs::{ArgKind, HelpSections, Registry};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::schema_file::{load_schema, write_sample_schema};

#[derive(Parser)]
#[command(name = "myargs")]
#[command(version, about = "Declare, parse and inspect command-line arguments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample myargs.json schema
    Init(InitArgs),

    /// Run the bundled sample program against ARGS
    Sample(SampleArgs),

    /// Parse ARGS against a JSON schema and print the resolved values
    Run(RunArgs),

    /// Print the help text a JSON schema produces
    HelpText(HelpTextArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing schema
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct SampleArgs {
    /// Declare `count` as a required keyword
    #[arg(long)]
    require_count: bool,

    /// Arguments handed to the sample parser (after `--`)
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct RunArgs {
    /// Path to the schema (default: ./myargs.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Print values as JSON
    #[arg(long)]
    json: bool,

    /// Report a failed parse as an error instead of exiting from the parser
    #[arg(long)]
    recoverable: bool,

    /// Arguments to parse (after `--`)
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct HelpTextArgs {
    /// Path to the schema (default: ./myargs.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Leave out usage, description and epilog
    #[arg(long)]
    arguments_only: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Sample(args) => sample(args),
        Commands::Run(args) => run(args),
        Commands::HelpText(args) => help_text(args),
    }
}

fn argv(program: &str, args: Vec<String>) -> Vec<String> {
    std::iter::once(program.to_string()).chain(args).collect()
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let dest = write_sample_schema(&dir, args.force)?;
    eprintln!("Created: {}", dest.display());
    eprintln!("\nTry: myargs run --schema {} -- -v --count=3", dest.display());
    Ok(())
}

fn sample(args: SampleArgs) -> Result<()> {
    tracing::debug!("executing sample command");

    let mut parser = Registry::create(
        "my_program",
        "Usage: my_program [options]",
        "This is a sample program.",
        "Epilog message",
    );
    parser.add_flag('v', "verbose", "Enable verbose mode")?;
    parser.add_flag('s', "store", "Save file Name")?;
    parser.add_keyword('c', "count", args.require_count, None, "Number of times")?;

    parser.parse_or_exit(argv("my_program", args.args))?;

    if parser.get_flag_value("help") {
        parser.print_help().context("failed to write help")?;
    }
    if let Some(count) = parser.get_keyword_value("count") {
        println!("Count: {count}");
    }
    if parser.get_flag_value("store") {
        println!("Store: 1");
    }
    if parser.get_flag_value("verbose") {
        println!("Verbose: 1");
    }
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    tracing::debug!("executing run command");

    let mut loaded = load_schema(args.schema.as_deref())?;
    if args.recoverable {
        loaded.schema.config.exit_on_error = false;
    }
    let mut registry = Registry::from_schema(&loaded.schema)
        .with_context(|| format!("invalid schema: {}", loaded.path.display()))?;

    let program = registry.config().program.clone();
    registry
        .parse_or_exit(argv(&program, args.args))
        .context("failed to parse arguments")?;

    let values = resolved_values(&registry);
    if args.json {
        let out = serde_json::to_string_pretty(&values).context("failed to serialize values")?;
        println!("{out}");
    } else {
        for (name, value) in &values {
            println!("{name}: {}", display_value(value));
        }
    }
    Ok(())
}

fn help_text(args: HelpTextArgs) -> Result<()> {
    let loaded = load_schema(args.schema.as_deref())?;
    let registry = Registry::from_schema(&loaded.schema)
        .with_context(|| format!("invalid schema: {}", loaded.path.display()))?;

    let sections = if args.arguments_only {
        HelpSections::arguments_only()
    } else {
        HelpSections::all()
    };
    print!("{}", registry.render_help(sections));
    Ok(())
}

fn resolved_values(registry: &Registry) -> IndexMap<String, Value> {
    let collect = registry.config().collect_multiple;
    registry
        .specs()
        .map(|spec| {
            let name = spec.name();
            let value = match spec.kind() {
                ArgKind::Flag => Value::Bool(registry.get_flag_value(name)),
                ArgKind::Keyword => registry
                    .get_keyword_value(name)
                    .map_or(Value::Null, |v| Value::String(v.to_string())),
                ArgKind::Positional if collect && spec.arity() > 1 => Value::Array(
                    registry
                        .get_argument_values(name)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|v| Value::String(v.to_string()))
                        .collect(),
                ),
                ArgKind::Positional => registry
                    .get_argument_value(name)
                    .map_or(Value::Null, |v| Value::String(v.to_string())),
            };
            (name.to_string(), value)
        })
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "(none)".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
