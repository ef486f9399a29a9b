//! Cubify CLI - plan and generate CUBE queries for ROLLUP-only databases
//!
//! Usage:
//!   cubify masks --dims <n>
//!   cubify groupings [--masks <all|m1,m2,...>] [--dims <n>] [--detailed] [--json]
//!   cubify query --base-query <file|-> -D <dim>... -M <col=FUNC>... [--masks ...]
//!   cubify count --base-query <file|-> -D <dim>... -M <col=FUNC>... [--database <path>]
//!
//! Examples:
//!   cubify groupings --masks 1101,0011,1100,0101
//!   cubify query --base-query sales.sql -D Region -D Product -M Quantity=SUM
//!   cubify count --base-query sales.sql -D Region -D Product -M Quantity=SUM --database sales.db

use clap::{Args, Parser, Subcommand};
use cubify::config::Settings;
use cubify::connection::SqliteConnection;
use cubify::cube::{Cube, Measure, QueryAssembler};
use cubify::grouper::{BaseGrouper, Grouper, MaskSelection};
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "cubify")]
#[command(about = "Cubify - CUBE aggregation on databases that only support ROLLUP")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $CUBIFY_CONFIG, ./cubify.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every mask for a number of dimensions, most detailed first
    Masks {
        /// Number of dimensions
        #[arg(short, long)]
        dims: usize,
    },

    /// Show the groupings that cover a set of masks
    Groupings {
        /// `all` or a comma-separated list of masks
        #[arg(short, long, default_value = "all")]
        masks: MaskSelection,

        /// Number of dimensions (required for `all`)
        #[arg(short, long)]
        dims: Option<usize>,

        /// Show which grouping produces each mask
        #[arg(long)]
        detailed: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the cube query
    Query {
        #[command(flatten)]
        cube: CubeArgs,
    },

    /// Estimate the number of rows a cube returns (SQLite)
    Count {
        #[command(flatten)]
        cube: CubeArgs,

        /// SQLite database file (defaults to [database] path in the config)
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CubeArgs {
    /// File containing the base query, or `-` for stdin
    #[arg(short, long)]
    base_query: PathBuf,

    /// Dimension column, in mask order (repeatable)
    #[arg(short = 'D', long = "dimension", required = true)]
    dimensions: Vec<String>,

    /// Measure as `column=FUNCTION` (repeatable)
    #[arg(short = 'M', long = "measure", required = true)]
    measures: Vec<Measure>,

    /// `all` or a comma-separated list of masks
    #[arg(short, long, default_value = "all")]
    masks: MaskSelection,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings.logging.level);

    let result = match cli.command {
        Commands::Masks { dims } => cmd_masks(dims),
        Commands::Groupings {
            masks,
            dims,
            detailed,
            json,
        } => cmd_groupings(masks, dims, detailed, json),
        Commands::Query { cube } => cmd_query(&settings, cube),
        Commands::Count { cube, database } => cmd_count(&settings, cube, database),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_masks(dims: usize) -> CliResult {
    for mask in MaskSelection::All.resolve(dims)? {
        println!("{}", mask);
    }
    Ok(())
}

fn cmd_groupings(masks: MaskSelection, dims: Option<usize>, detailed: bool, json: bool) -> CliResult {
    let grouper = BaseGrouper::infer(&masks, dims)?;
    let plan = grouper.groupings();

    match (detailed, json) {
        (false, false) => println!("{}", plan),
        (true, false) => println!("{}", plan.detailed()),
        (false, true) => println!("{}", serde_json::to_string_pretty(&plan)?),
        (true, true) => println!("{}", serde_json::to_string_pretty(&plan.detailed())?),
    }
    Ok(())
}

fn cmd_query(settings: &Settings, args: CubeArgs) -> CliResult {
    let base_query = read_base_query(&args.base_query)?;
    let templates = settings.template_provider()?;
    let options = settings.cube_options();

    let plan = BaseGrouper::new(args.dimensions.len(), &args.masks)?.groupings();
    let sql = QueryAssembler::new(templates.as_ref(), &options).assemble(
        &base_query,
        &args.dimensions,
        &args.measures,
        &plan,
    )?;

    println!("{}", sql);
    Ok(())
}

fn cmd_count(settings: &Settings, args: CubeArgs, database: Option<PathBuf>) -> CliResult {
    let path = match database {
        Some(path) => path,
        None => settings
            .database
            .resolved_path()?
            .ok_or("no database given; pass --database or set [database] path")?,
    };

    let base_query = read_base_query(&args.base_query)?;
    let connection = SqliteConnection::open(&path)?;
    let mut cube = Cube::new(
        connection,
        base_query,
        args.masks,
        args.dimensions,
        args.measures,
    )?
    .with_templates(settings.template_provider()?)
    .with_options(settings.cube_options());

    println!("{}", cube.cartesian_count()?);
    Ok(())
}

fn read_base_query(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut query = String::new();
        io::stdin().read_to_string(&mut query)?;
        Ok(query)
    } else {
        fs::read_to_string(path)
    }
}
