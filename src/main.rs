use bzip2::read::BzDecoder;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ru_paradigm_scanner::pipeline::{
    process_batch_parallel, process_channel_pipeline, run_sequential, ParallelConfig, Stats,
};
use ru_paradigm_scanner::schema::{init_pos_map, pos_map};
use ru_paradigm_scanner::PipelineError;

/// Processing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Sequential processing (baseline)
    Sequential,
    /// Batch-parallel processing with scoped threads
    BatchParallel,
    /// Channel-based pipeline processing
    ChannelPipeline,
}

#[derive(Parser)]
#[command(name = "ru-paradigm-scanner")]
#[command(about = "Extracts Russian inflection paradigms from scraped Wiktionary tables - one record per headword")]
struct Args {
    /// Input JSONL file (.jsonl or .jsonl.bz2)
    input: PathBuf,

    /// Output JSONL file
    output: PathBuf,

    /// Processing strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::ChannelPipeline)]
    strategy: Strategy,

    /// Number of threads (0 = auto-detect)
    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// Batch size for batch-parallel strategy
    #[arg(long, default_value_t = 1000)]
    batch_size: usize,

    /// Channel buffer size for channel-pipeline strategy
    #[arg(long, default_value_t = 10000)]
    channel_buffer: usize,

    /// Limit number of input records to process (for testing)
    #[arg(long)]
    limit: Option<usize>,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Path to POS schema YAML file (default: schema/pos.yaml)
    #[arg(long)]
    schema: Option<PathBuf>,
}

fn open_input(path: &Path) -> std::io::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    Ok(if path.to_string_lossy().ends_with(".bz2") {
        Box::new(BufReader::with_capacity(256 * 1024, BzDecoder::new(file)))
    } else {
        Box::new(BufReader::with_capacity(256 * 1024, file))
    })
}

fn print_stats(stats: &Stats, strategy_name: &str) {
    println!();
    println!("============================================================");
    println!("Strategy: {}", strategy_name);
    println!("Records read: {}", stats.records_read);
    println!("Records written: {}", stats.records_written);
    println!("With forms: {}", stats.with_forms);
    println!("------------------------------------------------------------");
    println!("Paradigms:");
    println!("  verb: {}", stats.verbs);
    println!("  noun: {}", stats.nouns);
    println!("  adj:  {}", stats.adjectives);
    println!("------------------------------------------------------------");
    println!("No paradigm: {}", stats.no_paradigm);
    println!("Pre-reform tables: {}", stats.pre_reform);
    println!("Shape errors: {}", stats.shape_errors);
    println!("Malformed lines: {}", stats.malformed);
    println!("Time: {}m {}s", stats.elapsed.as_secs() / 60, stats.elapsed.as_secs() % 60);
    println!(
        "Rate: {:.0} records/sec",
        stats.records_read as f64 / stats.elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!("============================================================");
}

fn run(args: &Args) -> Result<Stats, PipelineError> {
    let mut config = ParallelConfig::default();
    if args.threads > 0 {
        config.num_threads = args.threads;
        config.num_workers = args.threads.saturating_sub(1).max(1);
    }
    config.batch_size = args.batch_size.max(1);
    config.channel_buffer = args.channel_buffer;

    let reader = open_input(&args.input)?;
    let output = File::create(&args.output)?;

    match args.strategy {
        Strategy::Sequential => {
            let mut writer = BufWriter::with_capacity(256 * 1024, output);
            run_sequential(reader, &mut writer, pos_map(), args.limit, args.quiet)
        }
        Strategy::BatchParallel => {
            let mut writer = BufWriter::with_capacity(256 * 1024, output);
            process_batch_parallel(reader, &mut writer, &config, pos_map(), args.limit)
        }
        Strategy::ChannelPipeline => {
            process_channel_pipeline(reader, output, &config, pos_map(), args.limit)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ru_paradigm_scanner=info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = init_pos_map(args.schema.as_deref()) {
        error!("Error loading POS schema: {}", e);
        return ExitCode::FAILURE;
    }

    if !args.quiet {
        println!("Parsing: {}", args.input.display());
        println!("Output: {}", args.output.display());
        println!("Strategy: {:?}", args.strategy);
        if let Some(limit) = args.limit {
            println!("Limit: {} records", limit);
        }
        println!();
    }

    match run(&args) {
        Ok(stats) => {
            info!(records = stats.records_read, with_forms = stats.with_forms, "finished");
            if !args.quiet {
                print_stats(&stats, &format!("{:?}", args.strategy));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
