use clap::{Args, Parser, Subcommand, ValueEnum};
use monkey_session::diagnostics::termcolor::ColorChoice;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a program and print its value.
    Run(InputArgs),

    /// Parse a program and print its syntax tree, fully parenthesised.
    Parse(InputArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// The input file.
    pub input: String,

    /// Whether the given input should be used directly as the source instead
    /// of as the source file path.
    #[arg(long, short, action)]
    pub source: bool,

    /// When to colour diagnostics.
    #[arg(long, value_enum, default_value_t = Color::Auto)]
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Color {
    Auto,
    Always,
    Never,
}

impl From<Color> for ColorChoice {
    fn from(color: Color) -> Self {
        match color {
            Color::Auto => ColorChoice::Auto,
            Color::Always => ColorChoice::Always,
            Color::Never => ColorChoice::Never,
        }
    }
}
