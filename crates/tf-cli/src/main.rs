//! TicketForge — Lottery Ticket Generator
//!
//! Usage:
//!   ticketforge prepare multi <prizes.csv> <tickets.json> <count>  - Winning/losing multi-field tickets
//!   ticketforge prepare single <prizes.csv> <tickets.json>         - One single-field ticket per prize
//!   ticketforge check <tickets.json> [--layout <layout.json>]      - Validate ticket data and text fit
//!   ticketforge tile <images> <plan.json> <columns> <rows> ...     - Plan print pages with cut marks
//!
//! Set `RUST_LOG=debug` to see every generated ticket.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use walkdir::WalkDir;

use tf_core::{EngineConfig, PrizeList, PrizeListReader, TicketSet};
use tf_engine::TicketSetBuilder;
use tf_layout::{ApproximateMeasure, LayoutError, PagePlan, TicketLayout, TilingConfig};

/// Largest batch accepted on the command line
const MAX_TICKET_COUNT: u64 = i32::MAX as u64;

#[derive(Parser)]
#[command(name = "ticketforge", version, about = "Lottery ticket generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare JSON file with ticket definitions
    Prepare {
        #[command(subcommand)]
        strategy: PrepareCommand,
    },
    /// Validate a ticket data file (and optionally a layout against it)
    Check {
        /// JSON file with ticket data, prepared with the `prepare` command
        ticket_data: PathBuf,
        /// JSON file containing the ticket layout
        #[arg(long)]
        layout: Option<PathBuf>,
        /// DPI resolution used to estimate text size against the layout
        #[arg(long, default_value_t = 300)]
        dpi: u32,
    },
    /// Plan how ticket images are merged onto print pages
    Tile {
        /// Folder containing ticket images
        source_folder: PathBuf,
        /// JSON file to write the page plan to
        plan_file: PathBuf,
        /// How many images are merged horizontally
        #[arg(value_parser = clap::value_parser!(u32).range(1..=100))]
        columns: u32,
        /// How many images are merged vertically
        #[arg(value_parser = clap::value_parser!(u32).range(1..=100))]
        rows: u32,
        /// Width of one ticket image in pixels
        #[arg(long)]
        tile_width: u32,
        /// Height of one ticket image in pixels
        #[arg(long)]
        tile_height: u32,
        /// Draw cut marks on the page
        #[arg(long)]
        cut_marks: bool,
        /// Length of the cut marks in mm
        #[arg(long, default_value_t = 5)]
        cut_mark_length: u32,
        /// DPI resolution of the pages
        #[arg(long, default_value_t = 300)]
        dpi: u32,
    },
}

#[derive(Subcommand)]
enum PrepareCommand {
    /// Prepare multi-field tickets
    Multi(MultiArgs),
    /// Prepare single-field tickets
    Single(SingleArgs),
}

#[derive(Args)]
struct PrizeSource {
    /// CSV file containing list of prizes
    input_file: PathBuf,
    /// JSON file to generate
    output_file: PathBuf,
    /// Character sequence used as CSV field separator, e.g. `,` or `TAB`
    #[arg(long, default_value = ",")]
    csv_separator: String,
    /// Character sequence marking CSV comment lines
    #[arg(long, default_value = "#")]
    csv_comment: String,
}

#[derive(Args)]
struct SerialOptions {
    /// Length of randomly generated serial numbers
    #[arg(long, value_parser = clap::value_parser!(u64).range(5..=20))]
    serial_length: Option<u64>,
    /// Characters permitted in randomly generated serial numbers
    #[arg(long)]
    serial_characters: Option<String>,
    /// Prefix for all serial numbers (e.g. batch number)
    #[arg(long)]
    serial_prefix: Option<String>,
    /// JSON engine config; command line options take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible batch (testing only)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct MultiArgs {
    #[command(flatten)]
    source: PrizeSource,
    /// Number of tickets to generate
    #[arg(value_parser = clap::value_parser!(u64).range(1..=MAX_TICKET_COUNT))]
    ticket_count: u64,
    /// Number of fields on each ticket
    #[arg(long, value_parser = clap::value_parser!(u64).range(3..=50))]
    fields: Option<u64>,
    /// Number of fields with same content required to win
    #[arg(long, value_parser = clap::value_parser!(u64).range(2..=50))]
    fields_to_win: Option<u64>,
    #[command(flatten)]
    serial: SerialOptions,
}

#[derive(Args)]
struct SingleArgs {
    #[command(flatten)]
    source: PrizeSource,
    #[command(flatten)]
    serial: SerialOptions,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("TicketForge/{} Lottery Ticket Generator", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Prepare { strategy } => match strategy {
            PrepareCommand::Multi(args) => prepare_multi(args),
            PrepareCommand::Single(args) => prepare_single(args),
        },
        Commands::Check {
            ticket_data,
            layout,
            dpi,
        } => check(&ticket_data, layout.as_deref(), dpi),
        Commands::Tile {
            source_folder,
            plan_file,
            columns,
            rows,
            tile_width,
            tile_height,
            cut_marks,
            cut_mark_length,
            dpi,
        } => {
            let mut config = TilingConfig::new(columns, rows, tile_width, tile_height).with_dpi(dpi);
            if cut_marks {
                config = config.with_cut_marks(cut_mark_length);
            }
            tile(&source_folder, &plan_file, config)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREPARE
// ═══════════════════════════════════════════════════════════════════════════════

fn prepare_multi(args: MultiArgs) -> Result<ExitCode> {
    let mut config = base_config(&args.serial)?;
    if let Some(fields) = args.fields {
        config.field_count = fields as usize;
    }
    if let Some(fields_to_win) = args.fields_to_win {
        config.fields_to_win = fields_to_win as usize;
    }
    config.validate().context("Invalid engine configuration")?;

    let prizes = read_prizes(&args.source)?;
    let tickets = builder(config, args.serial.seed)
        .build_multi(&prizes, args.ticket_count)
        .context("Ticket generation failed")?;

    save(&tickets, &args.source.output_file)
}

fn prepare_single(args: SingleArgs) -> Result<ExitCode> {
    let config = base_config(&args.serial)?;
    config.validate().context("Invalid engine configuration")?;

    let prizes = read_prizes(&args.source)?;
    let tickets = builder(config, args.serial.seed)
        .build_single(&prizes)
        .context("Ticket generation failed")?;

    save(&tickets, &args.source.output_file)
}

/// Defaults, then the config file, then individual options
fn base_config(options: &SerialOptions) -> Result<EngineConfig> {
    let mut config = match &options.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(length) = options.serial_length {
        config.serial_length = length as usize;
    }
    if let Some(characters) = &options.serial_characters {
        config.serial_alphabet = characters.clone();
    }
    if let Some(prefix) = &options.serial_prefix {
        config.serial_prefix = prefix.clone();
    }
    Ok(config)
}

fn builder(config: EngineConfig, seed: Option<u64>) -> TicketSetBuilder {
    match seed {
        Some(seed) => {
            log::warn!("Using fixed seed {}; serial numbers are predictable", seed);
            TicketSetBuilder::seeded(config, seed)
        }
        None => TicketSetBuilder::new(config),
    }
}

fn read_prizes(source: &PrizeSource) -> Result<PrizeList> {
    log::info!("Reading prizes from {}...", source.input_file.display());
    let report = PrizeListReader::new(csv_separator(&source.csv_separator), &source.csv_comment)
        .read_file(&source.input_file)
        .with_context(|| format!("Failed to read {}", source.input_file.display()))?;

    log::info!(
        "Read {} prizes in {} instances",
        report.prizes.len(),
        report.prizes.total_instances()
    );
    if report.prizes.is_empty() {
        bail!("No prizes defined in {}", source.input_file.display());
    }
    Ok(report.prizes)
}

/// `TAB` and `\t` stand for a tab character
fn csv_separator(value: &str) -> String {
    match value {
        "TAB" | "tab" | "\\t" => "\t".to_string(),
        other => other.to_string(),
    }
}

fn save(tickets: &TicketSet, path: &Path) -> Result<ExitCode> {
    log::info!("Saving {} tickets to {}...", tickets.len(), path.display());
    tickets
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("OK");
    Ok(ExitCode::SUCCESS)
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHECK
// ═══════════════════════════════════════════════════════════════════════════════

fn check(ticket_data: &Path, layout: Option<&Path>, dpi: u32) -> Result<ExitCode> {
    log::info!("Reading ticket data from {}...", ticket_data.display());
    let tickets = TicketSet::load(ticket_data)
        .with_context(|| format!("Invalid ticket data in {}", ticket_data.display()))?;
    log::info!(
        "{} tickets ({} winning), strategy {}, {} fields each",
        tickets.len(),
        tickets.winners().count(),
        tickets.strategy,
        tickets.field_count().unwrap_or(0)
    );

    let violations = tickets.verify();
    for violation in &violations {
        log::error!("{}", violation);
    }
    let mut problems = violations.len();

    if let Some(path) = layout {
        log::info!("Reading layout from {}...", path.display());
        let layout = TicketLayout::from_file(path)
            .with_context(|| format!("Invalid layout in {}", path.display()))?;
        layout
            .check_compatible(&tickets)
            .context("Layout does not match ticket data")?;
        problems += check_text_fit(&layout, &tickets, dpi)?;
    }

    if problems == 0 {
        log::info!("OK");
        Ok(ExitCode::SUCCESS)
    } else {
        log::error!("{} problems found", problems);
        Ok(ExitCode::FAILURE)
    }
}

/// Estimate field font sizes for every ticket; returns the number of tickets
/// with a field that fits at no size
fn check_text_fit(layout: &TicketLayout, tickets: &TicketSet, dpi: u32) -> Result<usize> {
    let color = layout.field_style.rgb()?;
    log::info!(
        "Fitting fields at up to {}pt {} in {}, {} DPI...",
        layout.field_style.size,
        color.to_html(),
        layout.field_style.font,
        dpi
    );

    let measurer = ApproximateMeasure::default().with_dpi(dpi);
    let mut unfit = 0;
    for ticket in &tickets.tickets {
        match layout.fit_fields(ticket, &measurer) {
            Ok(fitted) => log::debug!(
                "{}: {:?}",
                layout.output_file_name(&ticket.serial_number),
                fitted.iter().map(|field| field.size).collect::<Vec<_>>()
            ),
            Err(e @ LayoutError::TextDoesNotFit { .. }) => {
                log::error!("{}: {}", ticket.serial_number, e);
                unfit += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(unfit)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TILE
// ═══════════════════════════════════════════════════════════════════════════════

fn tile(source_folder: &Path, plan_file: &Path, config: TilingConfig) -> Result<ExitCode> {
    log::info!("Analyzing images in {}...", source_folder.display());
    let images = list_images(source_folder)?;
    if images.is_empty() {
        bail!("No images found in {}", source_folder.display());
    }

    let plan = PagePlan::new(&images, config).context("Invalid page grid")?;
    log::info!("Saving page plan to {}...", plan_file.display());
    plan.save(plan_file)
        .with_context(|| format!("Failed to write {}", plan_file.display()))?;
    log::info!("OK");
    Ok(ExitCode::SUCCESS)
}

/// File names directly inside `folder`, sorted by name
fn list_images(folder: &Path) -> Result<Vec<String>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", folder.display()))?;
        if entry.file_type().is_file() {
            images.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(images)
}
