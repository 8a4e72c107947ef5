use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use friston::{
    driver::{self, needs_continuation, Listing},
    interpreter::{Interpreter, StdioContext},
    lexer::formatter::{BasicFormatter, DebugFormatter as DebugTokenFormatter, TokenFormatter},
    parser::formatter::{
        DebugFormatter as DebugProgramFormatter, ProgramFormatter, SExpressionFormatter,
    },
    report::{ErrorReporter, PrettyReporter, StderrReporter},
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

const PROMPT: &str = ">>> ";
const CONTINUATION_PROMPT: &str = "... ";

#[derive(Debug, Parser)]
#[clap(name = "friston", version)]
pub struct CLArgs {
    /// Starts the REPL when omitted.
    #[clap(subcommand)]
    pub routine: Option<FristonCommand>,
}

#[derive(Debug, Subcommand)]
pub enum FristonCommand {
    /// Runs a script file.
    Run {
        path: PathBuf,
        /// Print the source, tokens and syntax tree before running.
        #[clap(short, long)]
        verbose: bool,
        /// Annotate errors with the offending source line.
        #[clap(long)]
        pretty: bool,
    },
    /// Starts an interactive session.
    Repl,
    /// Lists the tokens of a script file.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Prints the syntax tree of a script file.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ProgramFormat,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

fn main() -> ExitCode {
    friston_main().expect("Encountered an error!")
}

fn friston_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    env_logger::init();
    let args = CLArgs::parse();
    match args.routine {
        Some(FristonCommand::Run {
            path,
            verbose,
            pretty,
        }) => run_file(&path, verbose, pretty),
        Some(FristonCommand::Repl) | None => repl(),
        Some(FristonCommand::Tokenize { path, format }) => {
            let src = read_to_string(&path)?;
            let formatter: Box<dyn TokenFormatter> = match format {
                TokenFormat::Debug => Box::new(DebugTokenFormatter),
                TokenFormat::Basic => Box::new(BasicFormatter),
            };
            Ok(tokenize(&src, formatter.as_ref()))
        }
        Some(FristonCommand::Parse { path, format }) => {
            let src = read_to_string(&path)?;
            let formatter: Box<dyn ProgramFormatter> = match format {
                ProgramFormat::Debug => Box::new(DebugProgramFormatter),
                ProgramFormat::SExpr => Box::new(SExpressionFormatter),
            };
            Ok(parse(&src, formatter.as_ref()))
        }
    }
}

fn tokenize(src: &str, formatter: &dyn TokenFormatter) -> ExitCode {
    print_listing(&driver::list_tokens(src, formatter))
}

fn parse(src: &str, formatter: &dyn ProgramFormatter) -> ExitCode {
    print_listing(&driver::list_program(src, formatter))
}

fn print_listing(listing: &Listing) -> ExitCode {
    for line in listing.lines.iter() {
        println!("{line}");
    }
    for error in listing.errors.iter() {
        eprintln!("{error}");
    }
    if listing.had_error() {
        ExitCode::from(65)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_file(path: &Path, verbose: bool, pretty: bool) -> Result<ExitCode> {
    let src = read_to_string(path)?;
    if verbose {
        println!("Running {}", path.display());
        println!("{src}");
        println!("Tokens:");
        tokenize(&src, &BasicFormatter);
        println!("Syntax tree:");
        parse(&src, &SExpressionFormatter);
        println!("Output:");
    }

    let mut reporter: Box<dyn ErrorReporter + '_> = if pretty {
        Box::new(PrettyReporter::new(&src, path))
    } else {
        Box::new(StderrReporter)
    };
    let mut interpreter = Interpreter::new(StdioContext);
    let outcome = driver::run(&src, &mut interpreter, reporter.as_mut());
    Ok(ExitCode::from(outcome.exit_code()))
}

fn repl() -> Result<ExitCode> {
    let mut interpreter = Interpreter::new(StdioContext).with_repl(true);
    let mut reporter = StderrReporter;
    let mut stdin = std::io::stdin().lock();
    eprintln!("Entering REPL:");
    while let Some(entry) = read_entry(&mut stdin)? {
        match entry.trim() {
            "exit" => break,
            "" => continue,
            _ => {
                driver::run(&entry, &mut interpreter, &mut reporter);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Reads one REPL entry. An entry whose first line is left open keeps
/// reading until an empty line. Returns `None` at end of input.
fn read_entry(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut entry = String::new();
    let mut continuing = false;
    loop {
        print!("{}", if continuing { CONTINUATION_PROMPT } else { PROMPT });
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok((!entry.is_empty()).then_some(entry));
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if continuing && line.trim().is_empty() {
            return Ok(Some(entry));
        }
        entry.push_str(line);
        entry.push('\n');
        if !continuing && !needs_continuation(line) {
            return Ok(Some(entry));
        }
        continuing = true;
    }
}
