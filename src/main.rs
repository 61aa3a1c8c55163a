use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use grai::error::GraiError;
use grai::interpreter::Interpreter;
use grai::parser::Parser;
use grai::resolver::Resolver;
use grai::scanner::Scanner;
use grai::token::Token;

/// Exit status when lexical, syntax, or resolve errors were reported.
const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status when evaluation aborted on a runtime error.
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Grai language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to grai.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a script, printing each token
    Tokenize {
        filename: PathBuf,

        /// Emit one JSON object per token instead of the plain listing
        #[arg(long)]
        json: bool,
    },

    /// Runs a script
    Run { filename: PathBuf },
}

/// A script mapped into memory.  Zero-length files cannot be mapped, so they
/// fall back to an empty buffer.
struct MappedSource {
    mmap: Option<Mmap>,
}

impl MappedSource {
    fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

fn map_source(path: &Path) -> Result<MappedSource> {
    let file = File::open(path).with_context(|| format!("Failed to open file {:?}", path))?;

    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file {:?}", path))?
        .len();

    let mmap = if len == 0 {
        None
    } else {
        // Read-only mapping; the script is not expected to change underneath
        // a batch run.
        Some(unsafe { Mmap::map(&file) }.with_context(|| format!("Failed to map {:?}", path))?)
    };

    info!("Mapped {} bytes from {:?}", len, path);

    Ok(MappedSource { mmap })
}

fn init_logger() -> Result<()> {
    let log_file = File::create("grai.log").context("Failed to create grai.log")?;

    // Log records carry the module path and source line in a compact prefix.
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("grai::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));

            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // override with RUST_LOG
        .init();

    info!("Logger initialized, writing to grai.log");

    Ok(())
}

/// Scan the whole script, reporting every lexical error on stderr and
/// keeping the tokens that did scan.  Returns whether any error was seen.
fn scan_all<'src>(bytes: &'src [u8]) -> (Vec<Token<'src>>, bool) {
    let mut tokens: Vec<Token<'src>> = Vec::new();
    let mut had_error = false;

    for item in Scanner::new(bytes) {
        match item {
            Ok(token) => tokens.push(token),

            Err(e) => {
                had_error = true;
                eprintln!("{}", e);
            }
        }
    }

    (tokens, had_error)
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    info!("Running Tokenize subcommand");

    let source = map_source(filename)?;
    let mut had_error = false;

    for item in Scanner::new(source.bytes()) {
        match item {
            Ok(token) => {
                if json {
                    println!("{}", serde_json::to_string(&token)?);
                } else {
                    println!("{}", token);
                }
            }

            Err(e) => {
                had_error = true;
                eprintln!("{}", e);
            }
        }
    }

    if had_error {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC_ERROR);

        std::process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

fn run(filename: &Path) -> Result<()> {
    info!("Running Run subcommand");

    let source = map_source(filename)?;

    // The scanner slices lexemes straight out of this buffer, so validate
    // the encoding once up front.
    std::str::from_utf8(source.bytes())
        .map_err(GraiError::from)
        .with_context(|| format!("{:?} is not valid UTF-8", filename))?;

    let (tokens, lex_error) = scan_all(source.bytes());

    let mut parser = Parser::new(&tokens);
    let (statements, parse_errors) = parser.parse();

    for e in &parse_errors {
        eprintln!("{}", e);
    }

    if lex_error || !parse_errors.is_empty() {
        debug!("Static errors reported, skipping evaluation");

        std::process::exit(EXIT_STATIC_ERROR);
    }

    let mut interpreter = Interpreter::new();

    if let Err(e) = Resolver::new(&mut interpreter).resolve(&statements) {
        eprintln!("{}", e);

        std::process::exit(EXIT_STATIC_ERROR);
    }

    if let Err(e) = interpreter.interpret(&statements) {
        eprintln!("{}", e);

        std::process::exit(EXIT_RUNTIME_ERROR);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match &args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, *json),
        Commands::Run { filename } => run(filename),
    }
}
