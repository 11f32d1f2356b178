use std::str::FromStr;

use anyhow::Context;
use clap::{ArgAction, Parser};
use clap_stdin::FileOrStdin;
use tracing_subscriber::EnvFilter;

use quadc::analyzer::{FunctionType, SemanticAnalyzer, SymbolType};

/// Compile a program to three-address code and print one instruction per line.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Source file; `-` reads from stdin
    #[arg(default_value = "-")]
    input: FileOrStdin,

    /// Read the input as a JSON tagged tree instead of source text
    #[arg(long)]
    tree: bool,

    /// Make a function callable, e.g. `pow(float, float) -> float`
    #[arg(short, long = "function", value_name = "SIGNATURE")]
    functions: Vec<FunctionSignature>,

    /// Log more; repeat for more detail. RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Debug, PartialEq)]
struct FunctionSignature {
    name: String,
    ty: FunctionType,
}

impl FromStr for FunctionSignature {
    type Err = String;

    /// name "(" (type ("," type)*)? ")" "->" type
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const USAGE: &str = "expected `name(type, ...) -> type`";

        let (head, ret) = s.split_once("->").ok_or(USAGE)?;
        let (name, params) = head
            .trim()
            .strip_suffix(')')
            .and_then(|h| h.split_once('('))
            .ok_or(USAGE)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(USAGE.to_string());
        }

        let params = params
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<SymbolType>().map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        let return_type = ret
            .trim()
            .parse::<SymbolType>()
            .map_err(|e| e.to_string())?;

        Ok(Self {
            name: name.to_string(),
            ty: FunctionType::new(return_type, params),
        })
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let input = cli.input.contents().context("failed to read input")?;

    let mut analyzer = SemanticAnalyzer::new();
    for FunctionSignature { name, ty } in cli.functions {
        analyzer.register_function(name, ty);
    }

    let program = if cli.tree {
        quadc::parser::parse_tree(&input)?
    } else {
        quadc::parse_source(&input)?
    };
    let code = quadc::lower(&program, analyzer)?;

    for quad in code {
        println!("{}", quad);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_signature() {
        let sig: FunctionSignature = "pow(float, float) -> float".parse().unwrap();
        assert_eq!(sig.name, "pow");
        assert_eq!(
            sig.ty,
            FunctionType::new(SymbolType::Float, vec![SymbolType::Float, SymbolType::Float])
        );

        let sig: FunctionSignature = "tick() -> bool".parse().unwrap();
        assert!(sig.ty.params.is_empty());
    }

    #[test]
    fn reject_bad_signature() {
        assert!("pow(float, float)".parse::<FunctionSignature>().is_err());
        assert!("(int) -> int".parse::<FunctionSignature>().is_err());
        assert!("f(long) -> int".parse::<FunctionSignature>().is_err());
    }

    #[test]
    fn cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
