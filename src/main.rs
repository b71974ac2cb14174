mod ast;
mod callable;
mod config;
mod diagnostics;
mod environment;
mod error;
mod highlighter;
mod interpreter;
mod parser;
mod resolver;
mod scanner;
mod token;
mod value;

use clap::Parser as ClapParser;
use diagnostics::Diagnostics;
use highlighter::LoxHelper;
use interpreter::Interpreter;
use parser::Parser as LoxParser;
use resolver::Resolver;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use scanner::Scanner;
use std::io;
use std::path::PathBuf;
use std::process;

/// A tree-walking interpreter for Lox
#[derive(ClapParser, Debug)]
#[command(name = "lox")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking interpreter for Lox")]
struct CliArgs {
    /// Script file to run (omit to start the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Anything past the script path is rejected; only its presence matters.
    #[arg(trailing_var_arg = true, hide = true)]
    extra: Vec<String>,
}

fn main() {
    let args = CliArgs::parse();

    if !args.extra.is_empty() {
        eprintln!("Usage: lox [script]");
        process::exit(config::EXIT_USAGE_ERROR);
    }

    match args.script {
        Some(path) => run_file(&path),
        None => run_repl(),
    }
}

fn run_file(path: &PathBuf) -> ! {
    let source = std::fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Cannot read file {}: {}", path.display(), err);
        process::exit(config::EXIT_USAGE_ERROR);
    });

    let diagnostics = Diagnostics::new();
    let tokens = Scanner::new(&source, &diagnostics).scan_tokens();
    let statements = LoxParser::new(tokens, &diagnostics).parse();

    if diagnostics.had_error() {
        process::exit(config::EXIT_STATIC_ERROR);
    }

    let locals = Resolver::new(&diagnostics).resolve(&statements);
    if diagnostics.had_error() {
        process::exit(config::EXIT_STATIC_ERROR);
    }

    let mut interpreter = Interpreter::new(Box::new(io::stdout()));
    interpreter.add_resolution(locals);
    interpreter.interpret(&statements, &diagnostics);

    if diagnostics.had_runtime_error() {
        process::exit(config::EXIT_RUNTIME_ERROR);
    }
    process::exit(config::EXIT_SUCCESS);
}

fn run_repl() {
    let rl_config = Config::builder().auto_add_history(true).build();
    let mut rl = Editor::with_config(rl_config)
        .unwrap_or_else(|err| panic!("Failed to initialize REPL: {}", err));
    rl.set_helper(Some(LoxHelper::new()));
    let _ = rl.load_history(config::HISTORY_FILE);

    println!("{}", config::WELCOME_MESSAGE);
    println!("{}", config::WELCOME_SUBTITLE);

    let mut interpreter = Interpreter::new(Box::new(io::stdout()));

    loop {
        match rl.readline("lox> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                // Each line gets its own scan/parse/resolve pass so an
                // error on one line never carries resolution state into
                // the next, while the interpreter's environment and
                // resolution table persist across the whole session.
                let diagnostics = Diagnostics::new();
                let tokens = Scanner::new(&line, &diagnostics).scan_tokens();
                let statements = LoxParser::new(tokens, &diagnostics).parse();
                if diagnostics.had_error() {
                    continue;
                }

                let locals = Resolver::new(&diagnostics).resolve(&statements);
                if diagnostics.had_error() {
                    continue;
                }

                interpreter.add_resolution(locals);
                interpreter.interpret(&statements, &diagnostics);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(config::HISTORY_FILE);
}
