use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use nupeer_core::config_file::{self, ConfigFile};
use nupeer_core::{ExtractionResult, PdfBackend};
use nupeer_parsing::text_processing::normalize_text;
use nupeer_parsing::{ParserState, ParsingConfig, ParsingConfigBuilder, TranscriptParser};
use nupeer_pdf_mupdf::MupdfBackend;
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Exit status when the transcript was read but no course was recognized.
const NO_COURSES_EXIT: u8 = 3;

/// NuPeer transcript parser - Extract course records from transcript PDFs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log parser decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a transcript PDF (or extracted .txt) into course records
    Parse {
        /// Path to the transcript PDF or .txt file
        file_path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Path to output file (prints to stdout if not given)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Truncate course titles longer than this
        #[arg(long)]
        max_title_length: Option<usize>,
    },

    /// Print every line of a transcript with its classification
    Classify {
        /// Path to the transcript PDF or .txt file
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Dump the text layer of a transcript PDF
    ExtractText {
        /// Path to the transcript PDF
        file_path: PathBuf,

        /// Path to output file (prints to stdout if not given)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration file settings
    Config {
        /// Write the merged settings to the platform config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
    Summary,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = config_file::load_config();

    match cli.command {
        Command::Parse {
            file_path,
            format,
            output,
            no_color,
            max_title_length,
        } => parse(
            &file_path,
            format,
            output,
            no_color,
            max_title_length,
            &file_config,
        ),
        Command::Classify {
            file_path,
            no_color,
        } => classify(&file_path, no_color, &file_config).map(|_| ExitCode::SUCCESS),
        Command::ExtractText { file_path, output } => {
            extract_text(&file_path, output).map(|_| ExitCode::SUCCESS)
        }
        Command::Config { save } => show_config(file_config, save).map(|_| ExitCode::SUCCESS),
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve parser settings: CLI flags > env vars > config files > defaults.
fn build_parsing_config(
    file_config: &ConfigFile,
    cli_max_title_length: Option<usize>,
) -> anyhow::Result<ParsingConfig> {
    let mut builder = ParsingConfigBuilder::new();

    if let Some(ref parsing) = file_config.parsing {
        if let Some(n) = parsing.max_title_length {
            builder = builder.max_title_length(n);
        }
        if let Some(year) = parsing.min_year {
            builder = builder.min_year(year);
        }
        if let Some(year) = parsing.max_year {
            builder = builder.max_year(year);
        }
        for pattern in parsing.extra_noise_patterns.iter().flatten() {
            builder = builder.add_noise_pattern(pattern.clone());
        }
        for (code, term) in parsing.semester_aliases.iter().flatten() {
            builder = builder.add_semester_alias(code, term);
        }
    }

    let env_max_title_length = match std::env::var("NUPEER_MAX_TITLE_LENGTH") {
        Ok(v) => Some(
            v.parse::<usize>()
                .with_context(|| format!("NUPEER_MAX_TITLE_LENGTH is not a number: {}", v))?,
        ),
        Err(_) => None,
    };
    if let Some(n) = cli_max_title_length.or(env_max_title_length) {
        builder = builder.max_title_length(n);
    }

    builder
        .build()
        .context("invalid regex in [parsing] configuration")
}

fn resolve_format(cli_format: Option<OutputFormat>, file_config: &ConfigFile) -> OutputFormat {
    if let Some(format) = cli_format {
        return format;
    }
    let configured = file_config
        .output
        .as_ref()
        .and_then(|o| o.format.as_deref());
    match configured {
        Some(name) => OutputFormat::from_str(name, true).unwrap_or_else(|_| {
            tracing::warn!(format = name, "unknown output format in config, using table");
            OutputFormat::Table
        }),
        None => OutputFormat::Table,
    }
}

fn open_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    })
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a transcript as text: `.txt` files verbatim, anything else through MuPDF.
fn load_text(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    if is_text_file(path) {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    MupdfBackend::new()
        .extract_text_from_path(path)
        .with_context(|| format!("Failed to extract text from {}", path.display()))
}

fn parse(
    file_path: &Path,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    no_color: bool,
    max_title_length: Option<usize>,
    file_config: &ConfigFile,
) -> anyhow::Result<ExitCode> {
    let parser = TranscriptParser::with_config(build_parsing_config(
        file_config,
        max_title_length,
    )?);
    let format = resolve_format(format, file_config);
    let config_color = file_config
        .output
        .as_ref()
        .and_then(|o| o.color)
        .unwrap_or(true);
    let color = ColorMode(!no_color && output.is_none() && config_color);

    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let result: ExtractionResult = if is_text_file(file_path) {
        parser.parse_text(&load_text(file_path)?)
    } else {
        let pdf = std::fs::read(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        tracing::debug!(bytes = pdf.len(), "read transcript PDF");
        parser
            .process_transcript(&pdf, &MupdfBackend::new())
            .with_context(|| format!("Failed to extract text from {}", file_path.display()))?
    };

    let mut writer = open_writer(output.as_deref())?;

    if result.is_empty() {
        output::print_no_courses(&mut *writer, color)?;
        return Ok(ExitCode::from(NO_COURSES_EXIT));
    }

    match format {
        OutputFormat::Json => output::print_json(&mut *writer, &result.courses)?,
        OutputFormat::Table => {
            output::print_parse_summary(
                &mut *writer,
                &file_name(file_path),
                result.courses.len(),
                &result.stats,
                color,
            )?;
            output::print_table(&mut *writer, &result.courses, color)?;
        }
        OutputFormat::Summary => {
            output::print_parse_summary(
                &mut *writer,
                &file_name(file_path),
                result.courses.len(),
                &result.stats,
                color,
            )?;
            output::print_summary(&mut *writer, &result.courses, color)?;
        }
    }
    writer.flush()?;

    if let Some(path) = output {
        eprintln!("Results saved to: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn classify(file_path: &Path, no_color: bool, file_config: &ConfigFile) -> anyhow::Result<()> {
    let parser = TranscriptParser::with_config(build_parsing_config(file_config, None)?);
    let color = ColorMode(!no_color);
    let text = normalize_text(&load_text(file_path)?);

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    let mut state = ParserState::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let kind = parser.classify_line(line, &state);
        state.apply(&kind);
        output::print_classified_line(&mut writer, i + 1, line.trim(), &kind, color)?;
    }
    Ok(())
}

fn extract_text(file_path: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let text = load_text(file_path)?;
    let mut writer = open_writer(output.as_deref())?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn show_config(file_config: ConfigFile, save: bool) -> anyhow::Result<()> {
    match config_file::config_path() {
        Some(path) => println!("# Platform config: {}", path.display()),
        None => println!("# Platform config: (no config directory on this platform)"),
    }
    println!("# Working-directory override: ./.nupeer.toml");
    println!();
    print!("{}", toml::to_string_pretty(&file_config)?);

    if save {
        let path = config_file::save_config(&file_config).map_err(anyhow::Error::msg)?;
        eprintln!("Saved configuration to {}", path.display());
    }
    Ok(())
}
