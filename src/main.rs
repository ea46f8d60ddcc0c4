use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use kaigiroku::{
    derive_session_info, load_directory, load_pages, parse_document, resolve_document, run_batch,
    save_directory, write_json, AttendeeCategory, Confidence, HumanMinutes, Lexicon, ParserConfig,
    PipelineConfig, SpeakerDirectory,
};

#[derive(Parser)]
#[command(name = "kaigiroku")]
#[command(author, version, about = "Assembly minutes parser: attendees, speeches and speaker resolution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one document and resolve its speakers
    Parse {
        /// Extracted pages (JSON page list or form-feed separated text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the resolved document (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for human-readable minutes (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Speaker directory to resolve against and update (JSON)
        #[arg(long)]
        directory: Option<PathBuf>,

        /// Source URL of the document, used to derive session info
        #[arg(long)]
        url: Option<String>,

        /// Parser config with jurisdiction-specific role titles and surnames
        #[arg(long)]
        config: Option<PathBuf>,

        /// Register unresolved speaker names as provisional speakers
        #[arg(long)]
        learn_unresolved: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse every document in a directory against a shared speaker directory
    Batch {
        /// Directory of page files (.json or .txt)
        #[arg(long)]
        input_dir: PathBuf,

        /// Directory for resolved documents
        #[arg(long)]
        output_dir: PathBuf,

        /// Speaker directory to resolve against and update (JSON)
        #[arg(long)]
        directory: Option<PathBuf>,

        /// Parser config with jurisdiction-specific role titles and surnames
        #[arg(long)]
        config: Option<PathBuf>,

        /// Documents parsed concurrently (defaults to available cores)
        #[arg(long)]
        jobs: Option<usize>,

        /// Register unresolved speaker names as provisional speakers
        #[arg(long)]
        learn_unresolved: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a document without writing anything
    Analyze {
        /// Extracted pages (JSON page list or form-feed separated text)
        #[arg(short, long)]
        input: PathBuf,

        /// Source URL of the document
        #[arg(long)]
        url: Option<String>,

        /// Parser config with jurisdiction-specific role titles and surnames
        #[arg(long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the session info derived from a document URL
    Session {
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            human_readable,
            directory,
            url,
            config,
            learn_unresolved,
            verbose,
        } => {
            setup_logging(verbose);
            let pipeline = PipelineConfig {
                learn_unresolved,
                ..Default::default()
            };
            parse_minutes(
                &input,
                &output,
                human_readable.as_deref(),
                directory.as_deref(),
                url.as_deref(),
                config.as_deref(),
                &pipeline,
            )
        }
        Commands::Batch {
            input_dir,
            output_dir,
            directory,
            config,
            jobs,
            learn_unresolved,
            verbose,
        } => {
            setup_logging(verbose);
            let defaults = PipelineConfig::default();
            let pipeline = PipelineConfig {
                jobs: jobs.unwrap_or(defaults.jobs).max(1),
                learn_unresolved,
            };
            batch_minutes(
                &input_dir,
                &output_dir,
                directory.as_deref(),
                config.as_deref(),
                &pipeline,
            )
            .await
        }
        Commands::Analyze {
            input,
            url,
            config,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_minutes(&input, url.as_deref(), config.as_deref())
        }
        Commands::Session { url } => print_session(&url),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_lexicon(config: Option<&Path>) -> Result<Lexicon> {
    match config {
        Some(path) => {
            info!("Loading parser config from {:?}", path);
            Ok(Lexicon::from_config(&ParserConfig::from_file(path)?))
        }
        None => Ok(Lexicon::default()),
    }
}

fn open_directory(path: Option<&Path>) -> Result<SpeakerDirectory> {
    match path {
        Some(path) => load_directory(path),
        None => Ok(SpeakerDirectory::default()),
    }
}

fn parse_minutes(
    input: &Path,
    output: &Path,
    human_readable: Option<&Path>,
    directory_path: Option<&Path>,
    url: Option<&str>,
    config: Option<&Path>,
    pipeline: &PipelineConfig,
) -> Result<()> {
    let lexicon = load_lexicon(config)?;
    let mut directory = open_directory(directory_path)?;

    info!("Loading pages from {:?}", input);
    let pages = load_pages(input).context("Failed to load input pages")?;

    let parsed = parse_document(&pages, &lexicon);
    if parsed.speeches.is_empty() {
        warn!("No speeches found in {:?}", input);
    }
    let document = resolve_document(parsed, &mut directory, url, pipeline);

    write_json(&document, output)?;
    info!("Output written to {:?}", output);

    if let Some(path) = human_readable {
        HumanMinutes::new(&document).write_file(path)?;
        info!("Human-readable output written to {:?}", path);
    }
    if let Some(path) = directory_path {
        save_directory(&directory, path)?;
        info!("Speaker directory saved to {:?}", path);
    }

    info!(
        "Complete: {}/{} speeches matched ({:.1}%)",
        document.stats.matched,
        document.stats.total(),
        document.stats.match_rate() * 100.0
    );
    Ok(())
}

async fn batch_minutes(
    input_dir: &Path,
    output_dir: &Path,
    directory_path: Option<&Path>,
    config: Option<&Path>,
    pipeline: &PipelineConfig,
) -> Result<()> {
    let lexicon = Arc::new(load_lexicon(config)?);
    let summary = run_batch(input_dir, output_dir, directory_path, lexicon, pipeline).await?;
    if summary.failed > 0 {
        warn!("{} document(s) failed", summary.failed);
    }
    Ok(())
}

fn analyze_minutes(input: &Path, url: Option<&str>, config: Option<&Path>) -> Result<()> {
    info!("Analyzing minutes from {:?}", input);
    let lexicon = load_lexicon(config)?;
    let pages = load_pages(input).context("Failed to load input pages")?;
    let parsed = parse_document(&pages, &lexicon);

    println!("Minutes Analysis");
    println!("================");
    println!("Pages: {}", pages.len());
    println!("Preamble: {}", if parsed.has_preamble { "found" } else { "missing" });
    if let Some(session) = url.and_then(derive_session_info) {
        println!("Session: {} ({:?})", session.session_name, session.session_type);
    }
    println!();

    println!("Attendees");
    println!("---------");
    for category in [
        AttendeeCategory::Councilor,
        AttendeeCategory::Executive,
        AttendeeCategory::Staff,
    ] {
        let count = parsed.attendees.iter().filter(|a| a.category == category).count();
        println!("{:?}: {}", category, count);
    }
    println!();

    println!("Speeches");
    println!("--------");
    println!("Total: {}", parsed.speeches.len());
    for confidence in [Confidence::High, Confidence::Medium, Confidence::Low] {
        let count = parsed
            .speeches
            .iter()
            .filter(|s| s.confidence == confidence)
            .count();
        println!("{} confidence labels: {}", confidence.as_str(), count);
    }
    println!();

    println!("Speaker Statistics");
    println!("------------------");
    let mut per_speaker: BTreeMap<(&str, &str), (usize, usize)> = BTreeMap::new();
    for speech in &parsed.speeches {
        let entry = per_speaker
            .entry((speech.speaker_name.as_str(), speech.speaker_role.as_str()))
            .or_default();
        entry.0 += 1;
        entry.1 += speech.speech_text.chars().count();
    }
    let mut rows: Vec<_> = per_speaker.into_iter().collect();
    rows.sort_by(|a, b| b.1.0.cmp(&a.1.0).then_with(|| a.0.cmp(&b.0)));
    for ((name, role), (speeches, chars)) in rows {
        println!("{} {}: {} speeches, {} chars", name, role, speeches, chars);
    }

    Ok(())
}

fn print_session(url: &str) -> Result<()> {
    match derive_session_info(url) {
        Some(info) => println!("{}", serde_json::to_string_pretty(&info)?),
        None => println!("No session info could be derived from {}", url),
    }
    Ok(())
}
