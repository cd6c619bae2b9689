use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use mica::runtime::{Cpu, Memory};
use mica::{AsmParser, Image};

/// Mica is a complete & convenient toolchain for the MICA-16
/// microcontroller assembly language.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.asm` file to assemble and run
    path: Option<PathBuf>,

    /// Cycle budget for emulation
    #[arg(long, global = true, default_value_t = 1_000_000)]
    cycles: i64,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a `.asm` file and execute it immediately
    Run {
        /// `.asm` file to run
        name: PathBuf,
    },
    /// Assemble a `.asm` file into a binary `.mx` image
    Build {
        /// `.asm` file to assemble
        name: PathBuf,
        /// Destination for the `.mx` image
        dest: Option<PathBuf>,
    },
    /// Assemble a `.asm` file without running or writing an image
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Command::Run { name }) => run(&name, args.cycles),
        Some(Command::Build { name, dest }) => build(&name, dest),
        Some(Command::Check { name }) => check(&name),
        None => match args.path {
            Some(path) => run(&path, args.cycles),
            None => {
                println!("\n~ mica v{VERSION} ~");
                println!("{SHORT_INFO}");
                Ok(())
            }
        },
    }
}

/// Read, parse and link a source file into a binary image.
fn assemble(path: &Path) -> Result<Image> {
    // Available until end of program
    let contents: &'static str =
        Box::leak(Box::new(fs::read_to_string(path).into_diagnostic()?));
    println!(
        "{:>12} target {}",
        "Assembling".green().bold(),
        path.display()
    );
    let asm = AsmParser::new(contents)?.parse()?;
    Image::assemble(&asm)
}

fn run(path: &Path, budget: i64) -> Result<()> {
    let image = assemble(path)?;

    let mut mem = Memory::new();
    let mut cpu = Cpu::new();
    cpu.reset(&mut mem);
    mem.load(image.bytes())?;

    println!(
        "{:>12} image ({} bytes, {budget} cycle budget)",
        "Running".green().bold(),
        image.len()
    );
    cpu.execute(budget, &mut mem)?;
    cpu.core_dump();
    println!("{:>12} target {}", "Completed".green().bold(), path.display());
    Ok(())
}

fn build(path: &Path, dest: Option<PathBuf>) -> Result<()> {
    let image = assemble(path)?;

    let out_file_name = dest.unwrap_or_else(|| {
        format!("{}.mx", path.file_stem().unwrap().to_string_lossy()).into()
    });
    let mut file = File::create(&out_file_name).into_diagnostic()?;
    file.write_all(image.bytes()).into_diagnostic()?;

    println!("{:>12} binary", "Finished".green().bold());
    println!(
        "{:>12} {}",
        "Saved to".green().bold(),
        out_file_name.display()
    );
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let image = assemble(path)?;
    println!(
        "{:>12} with 0 errors ({} bytes)",
        "Finished".green().bold(),
        image.len()
    );
    Ok(())
}

const SHORT_INFO: &str = r"
Welcome to mica, an all-in-one toolchain for working with MICA-16
assembly code. Please use `-h` or `--help` to access the usage
instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
