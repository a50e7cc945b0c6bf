use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use otmq::dictionary::DictionaryStore;
use otmq::{output, AppConfig, Error, MatchStrategy, SearchMode, SearchSession, WordField};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "otmq")]
#[command(about = "Search OTM-JSON dictionaries from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search with a field and a match strategy
    Search {
        /// Text to look for; an empty needle matches every entry
        needle: String,

        /// Field to search: headword, translation, translation-tag, tag,
        /// variation-tag or everything
        #[arg(short, long)]
        field: Option<WordField>,

        /// Match strategy: prefix, suffix, substring or regexp
        #[arg(short = 'm', long = "match")]
        strategy: Option<MatchStrategy>,

        #[command(flatten)]
        common: SearchArgs,
    },
    /// Search with a boolean expression script
    Script {
        /// Expression, e.g. "tag == 'verb' and word startswith 'a'"
        expr: String,

        #[command(flatten)]
        common: SearchArgs,
    },
    /// Compile an expression script without running it
    Check {
        expr: String,
    },
    /// Load dictionaries and list them with entry counts
    List {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the config file location and the effective settings
    Config {
        /// Write the effective settings to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// OTM-JSON dictionary files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Exclude a dictionary by file name (repeatable)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Only print the number of results
    #[arg(short, long)]
    count: bool,

    /// Print every section of each entry
    #[arg(short, long)]
    details: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // 1 is reserved for "no results"
    run(cli).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        ExitCode::from(2)
    })
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default config");
        AppConfig::default()
    });
    let color = config.color && !cli.no_color;

    match cli.command {
        Commands::Search {
            needle,
            field,
            strategy,
            common,
        } => {
            let mut session = SearchSession::with_config(&config);
            if let Some(field) = field {
                session.set_field(field);
            }
            if let Some(strategy) = strategy {
                session.set_strategy(strategy);
            }
            session.set_needle(needle);
            run_search(session, &common, color)
        }
        Commands::Script { expr, common } => {
            let mut session = SearchSession::with_config(&config);
            session.set_mode(SearchMode::Expression);
            session.set_script(expr);
            run_search(session, &common, color)
        }
        Commands::Check { expr } => match otmq::compile(&expr) {
            Ok(_) => {
                println!("ok");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                report_query_error(&expr, &e);
                Ok(ExitCode::from(2))
            }
        },
        Commands::List { files } => {
            let store = load_store(&files)?;
            output::print_summaries(&store.summaries(), color)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { init } => {
            let path = otmq::config::get_config_path()?;
            if init {
                config.save()?;
                eprintln!("wrote {}", path.display());
            }
            println!("{}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read every file and load the readable ones. Files that are not UTF-8 or
/// not valid dictionary data are reported and skipped; I/O errors are fatal.
fn load_store(files: &[PathBuf]) -> Result<DictionaryStore> {
    let mut contents = Vec::with_capacity(files.len());
    for path in files {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = display_name(path);
        match String::from_utf8(bytes) {
            Ok(raw) => contents.push((name, raw)),
            Err(e) => {
                tracing::warn!(dictionary = %name, error = %e, "skipping undecodable dictionary");
                eprintln!("warning: skipping '{}': not valid UTF-8 ({})", name, e.utf8_error());
            }
        }
    }

    let mut store = DictionaryStore::new();
    let report = store.load(contents);
    for failure in &report.failures {
        eprintln!("warning: {}", failure);
    }
    Ok(store)
}

/// File name shown next to each result
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_search(mut session: SearchSession, args: &SearchArgs, color: bool) -> Result<ExitCode> {
    let mut store = load_store(&args.files)?;
    for name in &args.exclude {
        if store.set_included_by_name(name, false) == 0 {
            eprintln!("warning: no dictionary named '{}'", name);
        }
    }

    if let Err(e) = session.execute(&store) {
        report_query_error(session.script(), &e);
        return Ok(ExitCode::from(2));
    }

    output::print_failures(session.failures());

    if args.count {
        println!("{}", session.count());
    } else if args.json {
        output::print_json(session.results())?;
    } else {
        output::print_results(session.results(), color, args.details)?;
    }

    // grep convention: 1 when nothing matched, 2 on error
    Ok(if session.count() > 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Print a query error; compile errors get a caret under the offset
fn report_query_error(source: &str, err: &Error) {
    eprintln!("error: {}", err);
    if let Error::Compile(e) = err {
        if !source.is_empty() {
            eprintln!("  {}", source);
            let column = source.get(..e.offset).map_or(0, |s| s.chars().count());
            eprintln!("  {}^", " ".repeat(column));
        }
    }
}
