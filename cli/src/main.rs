//! docseg CLI - document element segmentation tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docseg::chunk::{self, split_by_kind};
use docseg::{
    load_elements, load_segments, ChunkOptions, ChunkStats, Element, JsonFormat, MetadataOverlap,
    Segment, WindowOptions,
};

#[derive(Parser)]
#[command(name = "docseg")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Group extracted document elements into segments and token windows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group elements into plain-text and table segments
    Chunk(GroupArgs),

    /// Group elements into tagged, page-annotated segments
    #[command(alias = "html")]
    Markup(GroupArgs),

    /// Re-slice a segments file into token windows
    Window {
        /// Segments JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum tokens per window
        #[arg(long, default_value = "1000", env = "DOCSEG_CAPACITY")]
        capacity: usize,

        /// Tokens repeated from the previous window
        #[arg(long, default_value = "100", env = "DOCSEG_OVERLAP")]
        overlap: usize,

        /// Carry metadata of exactly the segments in the overlap
        #[arg(long)]
        token_aligned: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show element and segment statistics
    Info {
        /// Element JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Window capacity used for the window estimate
        #[arg(long, default_value = "1000")]
        capacity: usize,

        /// Window overlap used for the window estimate
        #[arg(long, default_value = "100")]
        overlap: usize,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct GroupArgs {
    /// Element JSON files
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file for one input, or directory for several (stdout / current directory if not specified)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Write only text segments
    #[arg(long)]
    text_only: bool,

    /// Extra metadata field kept on plain text segments (repeatable)
    #[arg(long = "field", value_name = "NAME")]
    fields: Vec<String>,

    /// NFC-normalize element text
    #[arg(long)]
    normalize: bool,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

impl GroupArgs {
    fn chunk_options(&self) -> ChunkOptions {
        self.fields.iter().fold(
            ChunkOptions::new().with_unicode_normalization(self.normalize),
            |options, field| options.with_metadata_field(field.as_str()),
        )
    }

    fn json_format(&self) -> JsonFormat {
        json_format(self.compact)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mode {
    Plain,
    Markup,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chunk(args) => cmd_group(&args, Mode::Plain),
        Commands::Markup(args) => cmd_group(&args, Mode::Markup),
        Commands::Window {
            input,
            output,
            capacity,
            overlap,
            token_aligned,
            compact,
        } => cmd_window(
            &input,
            output.as_deref(),
            capacity,
            overlap,
            token_aligned,
            compact,
        ),
        Commands::Info {
            input,
            capacity,
            overlap,
            json,
        } => cmd_info(&input, capacity, overlap, json),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_group(args: &GroupArgs, mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.chunk_options();

    if let [input] = args.inputs.as_slice() {
        let elements = load_elements(input)?;
        let segments = run_pass(&elements, &options, mode);
        let segments = select(segments, args.text_only);
        let json = chunk::to_json(&segments, args.json_format())?;
        return write_output(args.output.as_deref(), &json);
    }

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(args.inputs.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading elements...");
    let mut documents: Vec<Vec<Element>> = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        documents.push(load_elements(input)?);
        pb.inc(1);
    }

    pb.set_message("Segmenting...");
    let batches = match mode {
        Mode::Plain => chunk::assemble_batch(&documents, &options),
        Mode::Markup => chunk::markup_batch(&documents, &options),
    };

    pb.set_message("Writing segments...");
    let mut written = Vec::with_capacity(batches.len());
    for (input, segments) in args.inputs.iter().zip(batches) {
        let segments = select(segments, args.text_only);
        let path = output_dir.join(output_name(input));
        fs::write(&path, chunk::to_json(&segments, args.json_format())?)?;
        written.push(path);
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }

    Ok(())
}

fn cmd_window(
    input: &Path,
    output: Option<&Path>,
    capacity: usize,
    overlap: usize,
    token_aligned: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let policy = if token_aligned {
        MetadataOverlap::TokenAligned
    } else {
        MetadataOverlap::Records
    };
    let options = WindowOptions::new()
        .with_capacity(capacity)
        .with_overlap(overlap)
        .with_metadata_overlap(policy);

    let segments = load_segments(input)?;
    let (text, tables) = split_by_kind(segments);
    if !tables.is_empty() {
        log::info!("Leaving {} table segments out of windowing", tables.len());
    }

    let windows = chunk::window(&text, &options)?;
    let json = chunk::to_json(&windows, json_format(compact))?;
    write_output(output, &json)
}

fn cmd_info(
    input: &Path,
    capacity: usize,
    overlap: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let elements = load_elements(input)?;
    let segments = chunk::assemble(&elements, &ChunkOptions::default());
    let (text, _) = split_by_kind(segments.clone());

    let options = WindowOptions::new()
        .with_capacity(capacity)
        .with_overlap(overlap);
    let windows = chunk::window(&text, &options)?;

    let mut stats = ChunkStats::new();
    stats.count_elements(&elements);
    stats.count_segments(&segments);
    stats.count_windows(&windows, capacity);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Element Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Elements".bold(), stats.element_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Skipped".bold(), stats.skipped_count);

    println!();
    println!("{}", "Segment Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Text segments".bold(), stats.text_segment_count);
    println!("{}: {}", "Table segments".bold(), stats.table_segment_count);
    println!("{}: {}", "Tokens".bold(), stats.token_count);
    println!(
        "{}: {} ({} over capacity {})",
        "Windows".bold(),
        stats.window_count,
        stats.oversized_window_count,
        capacity
    );

    Ok(())
}

fn run_pass(elements: &[Element], options: &ChunkOptions, mode: Mode) -> Vec<Segment> {
    match mode {
        Mode::Plain => chunk::assemble(elements, options),
        Mode::Markup => chunk::to_markup(elements, options),
    }
}

fn select(segments: Vec<Segment>, text_only: bool) -> Vec<Segment> {
    if text_only {
        split_by_kind(segments).0
    } else {
        segments
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn output_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{}.segments.json", stem)
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = path {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}
