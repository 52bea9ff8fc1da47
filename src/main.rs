use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use wiktio::extract::run_extraction;
use wiktio::filter::TitleFilter;
use wiktio::models::Termination;
use wiktio::output::{write_wordlist, write_wordlist_to_path};
use wiktio::clean;
use wiktio::parser::NsSpec;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "wiktio")]
#[command(about = "Memory-efficient word extractor for Wiktionary XML dumps")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract matching page titles from an XML dump into a wordlist
    Extract(ExtractArgs),
    /// Remove reflexive verb forms whose non-reflexive base is present
    CleanReflexive(CleanArgs),
    /// Remove non-word entries from a plaintext wordlist
    CleanPlaintext(CleanArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Path to the dump file, e.g. 'ruwiktionary-latest-pages-articles.xml.bz2'
    #[arg(short, long)]
    input: String,

    /// Output wordlist file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Filter by language, e.g. 'ru', 'en'
    #[arg(short, long, default_value = "")]
    language: String,

    /// Filter by part of speech, e.g. 'сущ', 'гл', 'adv' (sic), 'прил'
    #[arg(short, long, default_value = "")]
    partofspeech: String,

    /// Optional additional regex to filter page text by
    #[arg(short, long, default_value = "")]
    regex: String,

    /// Export-schema namespace URI (autodetected from the root element if omitted)
    #[arg(long)]
    export_ns: Option<String>,

    /// Limit number of pages to process (for testing)
    #[arg(long)]
    limit: Option<u64>,
}

#[derive(Args)]
struct CleanArgs {
    /// Input wordlist (one word per line)
    input: String,

    /// Output file (defaults to stdout)
    output: Option<String>,
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let filter = TitleFilter::new(&args.language, &args.partofspeech, &args.regex)?;
    let ns = match args.export_ns {
        Some(uri) => NsSpec::Uri(uri),
        None => NsSpec::Detect,
    };

    let start = Instant::now();
    let extraction = run_extraction(&args.input, ns, &filter, args.limit)?;
    let duration = start.elapsed();

    if let Termination::Aborted { position, reason } = &extraction.termination {
        warn!(position = *position, reason = %reason, "Dump was not fully processed");
        eprintln!(
            "Parse aborted at byte {}: {}. Writing titles collected so far.",
            position, reason
        );
    } else {
        info!("Stream exhausted");
    }
    finish_extract(args.output.as_deref(), extraction, duration)
}

fn finish_extract(
    output: Option<&str>,
    extraction: wiktio::extract::Extraction,
    duration: std::time::Duration,
) -> Result<()> {
    let collected = extraction.titles.len();
    let titles = extraction.titles.drain();
    match output {
        Some(path) => write_wordlist_to_path(titles, path)?,
        None => write_wordlist(titles, &mut io::stdout().lock())?,
    }

    println!();
    println!("=== Summary ===");
    println!("Walk time:        {:.2}s", duration.as_secs_f64());
    println!("Pages scanned:    {}", extraction.pages_seen);
    println!("Pages matched:    {}", extraction.pages_matched);
    println!("Titles collected: {}", collected);
    if let Termination::Aborted { position, .. } = extraction.termination {
        println!("Parse aborted at: byte {} (partial result)", position);
    }

    Ok(())
}

fn run_clean(args: CleanArgs, reflexive: bool) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open wordlist: {}", args.input))?;
    let reader = BufReader::new(file);

    let count = match &args.output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            let mut out = io::BufWriter::new(out);
            if reflexive {
                clean::clean_reflexive(reader, &mut out)?
            } else {
                clean::clean_plaintext(reader, &mut out)?
            }
        }
        None => {
            let mut out = io::stdout().lock();
            if reflexive {
                clean::clean_reflexive(reader, &mut out)?
            } else {
                clean::clean_plaintext(reader, &mut out)?
            }
        }
    };

    info!(words = count, "Wordlist cleaned");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::CleanReflexive(args) => run_clean(args, true),
        Commands::CleanPlaintext(args) => run_clean(args, false),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
