//! `wheredb` binary
//!
//! Two subcommands:
//!
//! ```bash
//! # regenerate the database (typically from cron, hourly/daily)
//! wheredb generate > ~/data/where_db.json
//! wheredb generate --out ~/data/where_db.json   # atomic in-place write
//!
//! # query it
//! wheredb query "2020-06-01"
//! wheredb query --db ~/data/where_db.json --output url "last tuesday's date here" "2021-03-04 18:00"
//! wheredb query --around 2h30m --output json "2020-06-01 12:00"
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use chrono::Local;

use wheredb::config::LoggingConfig;
use wheredb::sources::expand_tilde;
use wheredb::{
    compact, dates, filter_by_accuracy, generate_timeline, query, sources, Config, Database,
    DbEntry, HomeIndex, WhereDbError,
};

#[derive(Parser)]
#[command(name = "wheredb", version, about = "Daily location timeline generator and query tool")]
struct Cli {
    /// Config file (defaults to config.toml + config.local.toml + env)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the timeline database from the configured sources
    Generate {
        /// Write the database here (atomically) instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Query the database for one or more dates
    Query {
        /// Database file (defaults to storage.database_location)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Output mode; repeatable
        #[arg(long = "output", value_enum)]
        output: Vec<OutputMode>,

        /// Tolerance window, e.g. "2h30m": return every entry within it
        /// instead of the single nearest one
        #[arg(long)]
        around: Option<String>,

        /// Date expressions to look up
        #[arg(required = true)]
        dates: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputMode {
    /// "lat,lon"
    Plain,
    /// Google search URL for the coordinates
    Url,
    /// OpenStreetMap reverse-geocode URL (no lookup is performed)
    Geolocate,
    /// Structured result on one line
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(&path.to_string_lossy()),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    init_tracing(&config.logging);

    match cli.command {
        Commands::Generate { out } => run_generate(&config, out),
        Commands::Query {
            db,
            output,
            around,
            dates,
        } => run_query(&config, db, &output, around.as_deref(), &dates),
    }
}

fn run_generate(config: &Config, out: Option<PathBuf>) -> anyhow::Result<()> {
    let samples = sources::load_samples(&config.sources.sample_files);
    tracing::info!(samples = samples.len(), "collected raw samples");

    let home_file = config
        .sources
        .home_file
        .as_ref()
        .context("no home history configured -- set 'home_file' in the [sources] config section")?;
    let history = sources::load_home_history(home_file)?;
    let home = HomeIndex::new(&history)?;

    let filtered = filter_by_accuracy(samples, config.timeline.accuracy_filter);
    let points = compact(
        filtered,
        config.timeline.new_point_distance,
        config.timeline.new_point_duration(),
    )?;

    let now = Local::now().naive_local();
    let timeline = generate_timeline(&points, &home, &config.timeline.params(), now);
    let db = Database::from_timeline(&timeline);

    // stdout is the default so the caller controls redirection; the
    // configured database location is only a default for `query`
    match out {
        Some(path) => db.save(&expand_tilde(&path))?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            db.write_json(&mut handle)?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn run_query(
    config: &Config,
    db_path: Option<PathBuf>,
    output: &[OutputMode],
    around: Option<&str>,
    exprs: &[String],
) -> anyhow::Result<()> {
    // empty tokens are a usage error, not a parse diagnostic
    if exprs.iter().any(|d| d.trim().is_empty()) {
        bail!("received empty date expression");
    }

    let Some(db_path) = db_path.or_else(|| config.storage.database_location.clone()) else {
        tracing::warn!("{}", WhereDbError::NoDatabaseConfigured);
        eprintln!("{}", WhereDbError::NoDatabaseConfigured);
        return Ok(());
    };

    let db = Database::load(&expand_tilde(&db_path))?;
    let around_secs = around.map(dates::parse_duration).transpose()?;
    let modes: &[OutputMode] = if output.is_empty() {
        &[OutputMode::Plain]
    } else {
        output
    };

    let now = Local::now().naive_local();
    let mut parse_failures = 0usize;

    for expr in exprs {
        let epoch = match dates::parse_date_expression(expr, now) {
            Ok(epoch) => epoch,
            Err(e) => {
                // keep going; remaining expressions still get answers
                tracing::warn!("{e}");
                eprintln!("{e}");
                parse_failures += 1;
                continue;
            }
        };

        match around_secs {
            Some(delta) => {
                let hits = query::within(&db, epoch, delta);
                if hits.is_empty() {
                    tracing::warn!(expr = %expr, epoch, "no entries within the requested window");
                }
                for entry in &hits {
                    print_entry(entry, epoch, modes)?;
                }
            }
            None => {
                if let Some(entry) = query::nearest(&db, epoch) {
                    print_entry(&entry, epoch, modes)?;
                }
            }
        }
    }

    if parse_failures > 0 {
        bail!("{parse_failures} date expression(s) could not be parsed");
    }
    Ok(())
}

fn print_entry(entry: &DbEntry, query_epoch: i64, modes: &[OutputMode]) -> anyhow::Result<()> {
    let (lat, lon) = (entry.lat(), entry.lon());
    for mode in modes {
        match mode {
            OutputMode::Plain => println!("{lat},{lon}"),
            OutputMode::Url => println!("https://www.google.com/search?q={lat}%2C{lon}"),
            OutputMode::Geolocate => println!(
                "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=15/{lat}/{lon}"
            ),
            OutputMode::Json => {
                let line = serde_json::json!({
                    "query": query_epoch,
                    "lat": lat,
                    "lon": lon,
                    "epoch": entry.epoch(),
                });
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    // env takes precedence over the config file
    let level = std::env::var("WHEREDB_LOG").unwrap_or_else(|_| logging.level.clone());
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let base = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr);

    let result = if logging.format == "json" {
        tracing::subscriber::set_global_default(base.json().finish())
    } else {
        tracing::subscriber::set_global_default(base.compact().finish())
    };
    // a second init (e.g. in tests) is fine to ignore
    let _ = result;
}
