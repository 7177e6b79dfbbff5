//! tnt2fedex CLI - Convert TNT exports to FedEx address-book CSV
//!
//! # Main Command
//!
//! ```bash
//! tnt2fedex convert export.txt -o FedExAddressBook.csv
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! tnt2fedex parse export.txt       # Dump flattened records as JSON
//! tnt2fedex header                 # Print the output header line
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tnt2fedex::{
    convert_file, convert_file_to_file, decode_input, detect_encoding, header_line, parse_line,
    ConvertOptions, Record,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tnt2fedex")]
#[command(about = "Convert TNT shipment exports to FedEx address-book CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full conversion: TNT export → address-book CSV
    Convert {
        /// Input export file
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat the first input line as a header and skip it
        #[arg(long)]
        skip_header: bool,

        /// Worker threads for the parse stage (default: all cores)
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Parse an export file and dump the flattened records as JSON
    Parse {
        /// Input export file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the output CSV header line
    Header,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            skip_header,
            threads,
        } => cmd_convert(&input, output.as_deref(), skip_header, threads),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Header => cmd_header(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tnt2fedex=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    skip_header: bool,
    threads: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Converting: {}", input.display());

    let options = ConvertOptions {
        skip_header,
        threads,
    };

    let result = match output {
        Some(out_path) => {
            let result = convert_file_to_file(input, out_path, &options)?;
            eprintln!("Wrote {} rows to {}", result.rows, out_path.display());
            result
        }
        None => {
            let result = convert_file(input, &options)?;
            print!("{}", result.csv);
            result
        }
    };

    eprintln!("   Encoding: {}", result.encoding);
    if result.parse_failures > 0 {
        eprintln!(
            "   {} of {} payloads were not valid JSON (rows written with empty cells)",
            result.parse_failures, result.rows
        );
    }

    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing: {}", input.display());

    let bytes = fs::read(input)?;
    let encoding = detect_encoding(&bytes);
    let content = decode_input(&bytes, &encoding)?;
    eprintln!("   Encoding: {}", encoding);

    let records: Vec<Record> = content
        .lines()
        .enumerate()
        .map(|(i, line)| parse_line(i, line))
        .collect();
    eprintln!("Parsed {} records", records.len());

    let json = serde_json::to_string_pretty(&records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_header() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", header_line());
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
