//! Cityload CLI - Convert the US cities CSV to JSON
//!
//! ```bash
//! cityload                                  # assets/uscities.csv -> cities.json
//! cityload convert data.csv -o out.json     # explicit paths
//! cityload convert data.csv --header        # first row is a header
//! cityload parse data.csv                   # dump raw rows as JSON
//! cityload check cities.json                # verify a produced document
//! ```

use clap::{Parser, Subcommand};
use cityload::logs::{log_error, log_info, log_success, LOGGER};
use cityload::{convert, parse_file, read_document, ConvertOptions};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_INPUT_PATH: &str = "assets/uscities.csv";
const DEFAULT_OUTPUT_PATH: &str = "cities.json";

#[derive(Parser)]
#[command(name = "cityload")]
#[command(about = "Convert the US cities CSV dataset to a JSON document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file to a JSON document (default)
    Convert(ConvertArgs),

    /// Parse a CSV file and output its raw rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a JSON file is a well-formed city document
    Check {
        /// Input JSON file
        input: PathBuf,
    },
}

#[derive(Parser)]
struct ConvertArgs {
    /// Input CSV file
    #[arg(env = "CITYLOAD_INPUT", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Output JSON file
    #[arg(short, long, env = "CITYLOAD_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// CSV delimiter
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// Treat the first row as a header and look columns up by name
    #[arg(long)]
    header: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);
    LOGGER.set_json(cli.log_json);

    // No subcommand: convert with clap's env/default values
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Convert(ConvertArgs::parse_from(["cityload"])));

    let result = match command {
        Commands::Convert(args) => cmd_convert(args),

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()),

        Commands::Check { input } => cmd_check(&input),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8, Box<dyn std::error::Error>> {
    u8::try_from(delimiter)
        .ok()
        .filter(|b| b.is_ascii())
        .ok_or_else(|| format!("Delimiter must be a single ASCII character, got '{}'", delimiter).into())
}

fn cmd_convert(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = ConvertOptions {
        delimiter: delimiter_byte(args.delimiter)?,
        has_header: args.header,
        pretty: args.pretty,
    };

    let summary = convert(&args.input, &args.output, &options)?;
    log_success(format!(
        "✨ Converted {} cities: {} ({}) -> {} ({} bytes)",
        summary.record_count,
        summary.input.display(),
        summary.encoding,
        summary.output.display(),
        summary.bytes_written
    ));
    Ok(())
}

fn cmd_parse(input: &Path, delimiter: char, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Parsing CSV: {}", input.display()));

    let options = ConvertOptions {
        delimiter: delimiter_byte(delimiter)?,
        ..ConvertOptions::default()
    };
    let parsed = parse_file(input, &options)?;

    log_info(format!("Encoding: {}", parsed.encoding));
    log_success(format!("Parsed {} rows", parsed.rows.len()));

    let rows: Vec<Vec<&str>> = parsed.rows.iter().map(|r| r.iter().collect()).collect();
    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("✔️  Checking: {}", input.display()));

    let records = read_document(input)?;
    log_success(format!("{} city records, all well-formed", records.len()));

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_success(format!("💾 Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
