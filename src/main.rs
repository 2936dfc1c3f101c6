//! civreg - find scanned civil registry documents.
//!
//! # Usage
//!
//! ```bash
//! # Search tagged records (default source: index)
//! civreg search "dela cruz" --type birth
//! civreg search "December 17 2024" --type death --mode date
//!
//! # Walk the raw year folder instead
//! civreg search "98-0112" --type birth --mode reg-no --year 1998 --source filesystem
//!
//! # Tagging workflow
//! civreg browse --type marriage --year 2010
//! civreg tag record.json
//! civreg show --type birth "D:/MCR/LIVE BIRTH/1998/CRUZ.pdf"
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use civreg_lib::commands::{file_commands, record_commands, search_commands};
use civreg_lib::output::{self, TerminalSink};
use civreg_lib::{
    init_tracing, AppConfig, AppState, IndexRow, RecordType, SearchMode, SearchRequest,
    SearchSource,
};

#[derive(Parser)]
#[command(name = "civreg", version, about)]
struct Cli {
    /// Config file (default: $CIVREG_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for documents by name, date or registry number
    Search {
        query: String,
        #[arg(short = 't', long = "type", value_enum, default_value = "birth")]
        record_type: RecordTypeArg,
        #[arg(short, long, value_enum, default_value = "name")]
        mode: ModeArg,
        /// Registration year folder
        #[arg(short, long)]
        year: Option<String>,
        #[arg(short, long, value_enum, default_value = "index")]
        source: SourceArg,
    },
    /// List the PDFs of one year folder
    Browse {
        #[arg(short = 't', long = "type", value_enum)]
        record_type: RecordTypeArg,
        #[arg(short, long)]
        year: String,
    },
    /// Print the full path of a document in a year folder
    Resolve {
        #[arg(short = 't', long = "type", value_enum)]
        record_type: RecordTypeArg,
        #[arg(short, long)]
        year: String,
        file_name: String,
    },
    /// Save a tagged record from a JSON file ("-" for stdin)
    Tag { file: PathBuf },
    /// Show the tagged record for a document
    Show {
        #[arg(short = 't', long = "type", value_enum)]
        record_type: RecordTypeArg,
        path: String,
    },
    /// Remove the tagged record for a document
    Untag {
        #[arg(short = 't', long = "type", value_enum)]
        record_type: RecordTypeArg,
        path: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordTypeArg {
    Birth,
    Death,
    Marriage,
}

impl From<RecordTypeArg> for RecordType {
    fn from(arg: RecordTypeArg) -> Self {
        match arg {
            RecordTypeArg::Birth => RecordType::Birth,
            RecordTypeArg::Death => RecordType::Death,
            RecordTypeArg::Marriage => RecordType::Marriage,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Name,
    Date,
    RegNo,
}

impl From<ModeArg> for SearchMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Name => SearchMode::Name,
            ModeArg::Date => SearchMode::Date,
            ModeArg::RegNo => SearchMode::RegNo,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Index,
    Filesystem,
    Auto,
}

impl From<SourceArg> for SearchSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Index => SearchSource::Index,
            SourceArg::Filesystem => SearchSource::Filesystem,
            SourceArg::Auto => SearchSource::Auto,
        }
    }
}

fn read_record(file: &Path) -> Result<IndexRow> {
    let text = if file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("reading record from stdin")?
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("reading record from {}", file.display()))?
    };
    serde_json::from_str(&text).context("record is not valid JSON")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(if cli.verbose { "info" } else { &config.log_filter });
    let state = Arc::new(AppState::new(config)?);

    match cli.command {
        Command::Search {
            query,
            record_type,
            mode,
            year,
            source,
        } => {
            let request = SearchRequest {
                record_type: record_type.into(),
                mode: mode.into(),
                text: query,
                year,
                source: source.into(),
            };
            let sink = Arc::new(Mutex::new(TerminalSink::stdio(cli.json)));
            let delivered = search_commands::spawn_search(state, request, sink).await?;
            if let Some(Err(_)) = delivered {
                std::process::exit(1);
            }
        }
        Command::Browse { record_type, year } => {
            let hits = file_commands::browse_year_folder(&state, record_type.into(), &year)?;
            if cli.json {
                println!("{}", output::format_json(&hits));
            } else if hits.is_empty() {
                println!("No PDF files found.");
            } else {
                print!("{}", output::format_human(&hits));
            }
        }
        Command::Resolve {
            record_type,
            year,
            file_name,
        } => {
            let path =
                file_commands::resolve_document(&state, record_type.into(), &year, &file_name)?;
            println!("{}", path.display());
        }
        Command::Tag { file } => {
            let row = read_record(&file)?;
            record_commands::save_record(&state, &row)?;
            println!("Tagged {}", row.file_path);
        }
        Command::Show { record_type, path } => {
            match record_commands::load_record(&state, record_type.into(), &path)? {
                Some(row) => print_json(&row)?,
                None => bail!("no tagged record for {path}"),
            }
        }
        Command::Untag { record_type, path } => {
            if !record_commands::delete_record(&state, record_type.into(), &path)? {
                bail!("no tagged record for {path}");
            }
            println!("Untagged {path}");
        }
    }

    Ok(())
}
