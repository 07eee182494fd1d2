//! Command-line front end: parse a document with one of the bundled grammars
//! and print the resulting value.

use std::fmt::Debug;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser as ClapParser, ValueEnum};
use parcomb::grammars::{json, sexpr};
use parcomb::parser::BoxedParser;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Grammar to parse the input with
    #[arg(short, long, value_enum, default_value_t = Grammar::Json)]
    grammar: Grammar,

    /// Accept a prefix of the input and report what was left unparsed
    #[arg(long)]
    partial: bool,

    /// Input file; reads standard input when omitted
    input: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Grammar {
    Json,
    Sexpr,
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("can't read standard input")?;
            Ok(source)
        }
    }
}

fn report<T: Debug + 'static>(
    parser: &BoxedParser<T>,
    source: &str,
    partial: bool,
) -> anyhow::Result<()> {
    if partial {
        let (value, rest) = parser.parse_partial(source)?;
        println!("{value:#?}");
        if !rest.is_empty() {
            println!("unparsed: {rest:?}");
        }
    } else {
        let value = parser.parse(source)?;
        println!("{value:#?}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let source = read_input(args.input.as_ref())?;
    log::debug!("read {} bytes", source.len());

    match args.grammar {
        Grammar::Json => report(&json::json()?, &source, args.partial),
        Grammar::Sexpr => report(&sexpr::program()?, &source, args.partial),
    }
}
