use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use fein::ast_printer::AstPrinter;
use fein::parser::Parser;

#[derive(ClapParser, Debug)]
#[command(version, about = "Fein language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses a program from a file and prints its syntax tree
    Parse {
        filename: Option<PathBuf>,

        /// Print the statements as JSON instead of prefix form
        #[arg(long)]
        json: bool,
    },

    /// Runs a Fein program from a file, or starts an interactive prompt
    /// when no file is given
    Run { filename: Option<PathBuf> },
}

/// Reads the contents of a file into a String
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let source = fs::read_to_string(filename)
        .with_context(|| format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = fs::File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with module and source line
    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("fein::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn no_input(command: &str) -> ! {
    info!("No filepath provided for {}", command);
    println!("No input filepath was provided. Exiting...");
    process::exit(0);
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => {
            let Some(filename) = filename else {
                no_input("Tokenize")
            };

            info!("Running Tokenize subcommand");
            let source = read_file(&filename)?;
            let mut tokenized = true;

            for token in fein::scanner::Scanner::new(&source) {
                match token {
                    Ok(token) => {
                        debug!("Scanned token: {}", token);
                        println!("{}", token);
                    }

                    Err(e) => {
                        tokenized = false;
                        debug!("Tokenization debug: {}", e);
                        eprintln!("{}", e);
                    }
                }
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code 65");
                process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { filename, json } => {
            let Some(filename) = filename else {
                no_input("Parse")
            };

            info!("Running Parse subcommand");
            let source = read_file(&filename)?;
            let (tokens, lex_errors) = fein::scan(&source);

            let mut parser = Parser::new(&tokens);
            match fein::check_syntax(parser.parse(), lex_errors) {
                Ok(statements) => {
                    if json {
                        let rendered = serde_json::to_string_pretty(&statements)
                            .context("Failed to serialize syntax tree")?;
                        println!("{}", rendered);
                    } else {
                        for stmt in &statements {
                            println!("{}", AstPrinter::print_stmt(stmt));
                        }
                    }
                }

                Err(e) => {
                    eprintln!("{}", e);
                    debug!("Parse failed, exiting with code {}", e.exit_code());
                    process::exit(e.exit_code());
                }
            }

            info!("Parse subcommand completed");
        }

        Commands::Run { filename } => {
            let Some(filename) = filename else {
                info!("No filepath provided for Run, starting REPL");

                let stdin = io::stdin();
                let mut stdout = io::stdout();
                let mut stderr = io::stderr();

                fein::repl::run_prompt(stdin.lock(), &mut stdout, &mut stderr)
                    .context("REPL input/output failed")?;

                return Ok(());
            };

            info!("Running Run subcommand");
            let source = read_file(&filename)?;
            debug!("Provided input:\n {}", source);

            let stdout = io::stdout();
            let mut out = stdout.lock();

            if let Err(e) = fein::run(&source, &mut out) {
                let code = e.exit_code();
                debug!("Run failed, exiting with code {}: {}", code, e);
                out.flush().ok();
                eprintln!("{}", e);
                process::exit(code);
            }

            info!("Program executed successfully");
        }
    }

    Ok(())
}
