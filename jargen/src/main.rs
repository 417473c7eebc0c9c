use std::fmt::Write;
use std::fs;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jargen::diagnostics::render_lex_error;
use jargen::parser::{self, TokenLines};
use jargen::JargenError;

#[derive(Parser)]
#[command(name = "jargen")]
#[command(about = "Lexical and syntax analyzer for the JARGEN language", version)]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize and validate, then print the tokens line by line
    Tokens {
        #[command(flatten)]
        input: Input,
    },

    /// Run the full front end and print the parse tree
    Parse {
        #[command(flatten)]
        input: Input,

        /// Also print the flattened token stream with indices
        #[arg(long)]
        tokens: bool,
    },

    /// Run the full front end and only report whether the program is accepted
    Check {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Input {
    /// Source file
    path: Option<String>,

    /// Source text given inline instead of a file
    #[arg(short, long)]
    eval: Option<String>,
}

impl Input {
    /// Display name and contents of the source.
    fn read(&self) -> Result<(String, String), JargenError> {
        match (&self.path, &self.eval) {
            (_, Some(source)) => Ok(("<eval>".to_string(), source.clone())),
            (Some(path), None) => Ok((path.clone(), fs::read_to_string(path)?)),
            (None, None) => Ok(("<eval>".to_string(), String::new())),
        }
    }
}

impl Commands {
    fn input(&self) -> &Input {
        match self {
            Commands::Tokens { input }
            | Commands::Parse { input, .. }
            | Commands::Check { input } => input,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (name, source) = match cli.command.input().read() {
        Ok(input) => input,
        Err(e) => {
            eprint!("{}", render_failure("", "", &e));
            return ExitCode::FAILURE;
        }
    };

    match run(&cli.command, &name, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", render_failure(&name, &source, &e));
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands, name: &str, source: &str) -> Result<(), JargenError> {
    match command {
        Commands::Tokens { .. } => {
            let lines = parser::lex(source)?;
            print_token_lines(&lines);
        }
        Commands::Parse { tokens, .. } => {
            let analysis = parser::analyze(source)?;

            if *tokens {
                println!("=== TOKENS ===");
                let stream = parser::flatten(analysis.lines);
                for (index, token) in stream.tokens().iter().enumerate() {
                    println!("{index} {token}");
                }
            }
            println!("Syntax analysis completed successfully!");
            println!("=== PARSE TREE ===");
            print!("{}", analysis.tree);
        }
        Commands::Check { .. } => {
            let analysis = parser::analyze(source)?;
            let statements = analysis
                .tree
                .child(0)
                .map_or(0, |list| list.children().len());
            println!("{name}: ok ({statements} top-level statements)");
        }
    }
    Ok(())
}

/// Text written to stderr when a command fails.
fn render_failure(name: &str, source: &str, error: &JargenError) -> String {
    match error {
        JargenError::Lex(lex) => format!(
            "{}Lexical analysis encountered errors; no parse attempted.\n",
            render_lex_error(name, source, lex)
        ),
        JargenError::Syntax { errors } => {
            let mut out = String::new();
            for error in errors {
                let _ = writeln!(out, "{error}");
            }
            let _ = writeln!(out, "Syntax analysis encountered {} error(s).", errors.len());
            out
        }
        other => format!("Error: {other}\n"),
    }
}

fn print_token_lines(lines: &TokenLines) {
    for line in lines.iter().filter(|line| !line.tokens.is_empty()) {
        let tokens: Vec<String> = line.tokens.iter().map(ToString::to_string).collect();
        println!("{:>3}: {}", line.line, tokens.join(" "));
    }
}

fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "jargen=error",
        1 => "jargen=debug",
        _ => "jargen=trace",
    }
}
