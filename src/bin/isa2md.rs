//! isa2md CLI - Convert a VDA ISA (TISAX) catalogue workbook to Markdown
//!
//! One invocation performs one conversion: the main information security
//! controls are always rendered; the prototype protection and data
//! protection sheets are rendered when the corresponding flag is given.

use std::fs::{self, File};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use isa2md::{ConverterBuilder, Isa2MdError, IsaVersion};

#[derive(Parser)]
#[command(name = "isa2md")]
#[command(about = "VDA ISA (TISAX) catalogue Excel to Markdown converter", long_about = None)]
struct Cli {
    /// Input Excel file
    #[arg(short, long)]
    input: PathBuf,

    /// Output Markdown file
    #[arg(short, long)]
    output: PathBuf,

    /// ISA version identifier (6_DE or 5_1_DE)
    #[arg(short = 'V', long = "version")]
    version: String,

    /// Also render the prototype protection controls
    #[arg(long)]
    prototype: bool,

    /// Also render the data protection controls
    #[arg(long = "data_protection")]
    data_protection: bool,
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(_) => {
            println!(
                "Conversion completed: {} -> {}",
                cli.input.display(),
                cli.output.display()
            );
        }
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<(), Isa2MdError> {
    // The version is resolved before any file I/O: an unsupported
    // identifier must not create or modify the output file.
    let version: IsaVersion = cli.version.parse()?;

    let converter = ConverterBuilder::new()
        .with_version(version)
        .include_prototype(cli.prototype)
        .include_data_protection(cli.data_protection)
        .build()?;

    let input = File::open(&cli.input)?;
    let document = converter.convert_to_string(input)?;

    // The output file is only created once the conversion has succeeded.
    fs::write(&cli.output, document)?;

    Ok(())
}

fn handle_error(error: Isa2MdError) {
    match error {
        Isa2MdError::UnsupportedVersion { .. } => {
            eprintln!("Version Error: {}", error);
            eprintln!("Pass one of the supported identifiers with --version.");
        }
        Isa2MdError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        Isa2MdError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid Excel file or may be corrupted.");
        }
        Isa2MdError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("The workbook does not match the layout expected for this ISA version.");
        }
        Isa2MdError::MissingControlNumber { sheet, row } => {
            eprintln!("Catalogue Error: missing control number");
            eprintln!("  Sheet: {}", sheet);
            eprintln!("  Data row: {}", row);
        }
    }
}
