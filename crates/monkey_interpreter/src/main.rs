mod cli;
mod interpreter;

use std::process::ExitCode;

use clap::Parser as _;
use cli::{Cli, Command, InputArgs};
use monkey_session::diagnostics::PrettyDiagnosticEmitter;

use crate::interpreter::Interpreter;

#[derive(thiserror::Error, Debug)]
enum InterpreterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("errors while parsing")]
    HadErrors,
}

type InterpreterResult<T> = Result<T, InterpreterError>;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> InterpreterResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let (mut interpreter, name, source) = load(args)?;

            if let Some(value) = interpreter.run(name, source)? {
                println!("{}", value.inspect());
            }
        }

        Command::Parse(args) => {
            let (mut interpreter, name, source) = load(args)?;

            let program = interpreter.parse(name, source)?;
            println!("{program}");
        }
    }

    Ok(())
}

fn load(
    args: InputArgs,
) -> InterpreterResult<(Interpreter<PrettyDiagnosticEmitter>, String, String)> {
    let (name, source) = if args.source {
        ("<unnamed>".to_owned(), args.input)
    } else {
        let source = std::fs::read_to_string(&args.input)?;
        (args.input, source)
    };

    let interpreter = Interpreter::new(PrettyDiagnosticEmitter::new(args.color.into()));

    Ok((interpreter, name, source))
}
