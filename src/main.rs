use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::LoxError;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::scanner::Scanner;
use rox::session::{Outcome, Session, EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to a file
    #[arg(long, global = true)]
    log: bool,

    /// Log file written when --log is given
    #[arg(long, global = true, default_value = "app.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: Option<PathBuf> },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: Option<PathBuf> },

    /// Runs input from a file as a Lox program
    Run { filename: Option<PathBuf> },

    /// Starts an interactive prompt
    Repl,
}

/// Reads a whole source file as UTF‑8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let source = String::from_utf8(buf)
        .map_err(LoxError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    Ok(source)
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file = File::create(path).context(format!("Failed to create {:?}", path))?;

    // Records look like `[module:line] - message`; RUST_LOG overrides the level.
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
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
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

fn report_all<'e>(errors: impl IntoIterator<Item = &'e LoxError>) {
    for e in errors {
        eprintln!("{}", e);
    }
}

fn no_input() -> ! {
    info!("No filepath provided");
    println!("No input filepath was provided. Exiting...");
    process::exit(0);
}

fn tokenize(source: &str, json: bool) -> Result<()> {
    let mut tokenized = true;

    if json {
        let (tokens, diagnostics) = Scanner::new(source).scan_tokens();
        report_all(&diagnostics);
        tokenized = !diagnostics.has_errors();

        let rendered = serde_json::to_string_pretty(&tokens).context("Failed to encode tokens")?;
        println!("{}", rendered);
    } else {
        for result in Scanner::new(source) {
            match result {
                Ok(token) => println!("{}", token),
                Err(e) => {
                    tokenized = false;
                    eprintln!("{}", e);
                }
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC_ERROR);
        process::exit(EXIT_STATIC_ERROR);
    }

    info!("Tokenization completed successfully");
    Ok(())
}

/// Scans and parses `source` as one expression, exiting 65 on any error.
fn parse_single_expression(source: &str) -> rox::ast::Expr {
    let (tokens, diagnostics) = Scanner::new(source).scan_tokens();

    if diagnostics.has_errors() {
        report_all(&diagnostics);
        process::exit(EXIT_STATIC_ERROR);
    }

    match Parser::new(tokens).parse_expression() {
        Ok(expr) => expr,
        Err(e) => {
            debug!("Parse debug: {}", e);
            eprintln!("{}", e);
            process::exit(EXIT_STATIC_ERROR);
        }
    }
}

fn run_file(source: &str) {
    let mut session = Session::new();
    let outcome: Outcome = session.run(source);

    report_all(outcome.errors());

    if !outcome.is_success() {
        debug!("Run failed, exiting with code {}", outcome.exit_code());
        process::exit(outcome.exit_code());
    }

    info!("Program executed successfully");
}

fn run_prompt() -> Result<()> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        if line.is_empty() {
            break;
        }

        // Errors are reported and forgotten; the next line starts clean.
        let outcome = session.run(&line);
        report_all(outcome.errors());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger(&args.log_file)?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => {
            let filename = filename.unwrap_or_else(|| no_input());
            tokenize(&read_file(&filename)?, json)?;
        }

        Commands::Parse { filename } => {
            let filename = filename.unwrap_or_else(|| no_input());
            let expr = parse_single_expression(&read_file(&filename)?);
            let ast_str = AstPrinter::print(&expr);

            debug!("AST: {}", ast_str);
            println!("{}", ast_str);
        }

        Commands::Evaluate { filename } => {
            let filename = filename.unwrap_or_else(|| no_input());
            let expr = parse_single_expression(&read_file(&filename)?);
            let mut interpreter = Interpreter::new();

            match interpreter.evaluate(&expr) {
                Ok(value) => {
                    debug!("Evaluated to: {}", value);
                    println!("{}", value);
                }

                Err(e) => {
                    debug!("Evaluation debug: {}", e);
                    eprintln!("{}", e);
                    process::exit(EXIT_RUNTIME_ERROR);
                }
            }
        }

        Commands::Run { filename } => {
            let filename = filename.unwrap_or_else(|| no_input());
            run_file(&read_file(&filename)?);
        }

        Commands::Repl => run_prompt()?,
    }

    Ok(())
}
