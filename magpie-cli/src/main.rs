//! Magpie CLI
//!
//! Parse an HTML document and inspect the result: the DOM outline, the
//! reserialized source, and every parse error with its byte offset.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;

use magpie_html::{parse_with_errors, print_tree, serialize};

/// Magpie — a forgiving WHATWG HTML parser
#[derive(Parser, Debug)]
#[command(name = "magpie")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the DOM tree of a file
    magpie ./index.html

    # Parse inline HTML
    magpie --html '<p>One<p>Two'

    # Reserialize the repaired document
    magpie --serialize ./index.html

    # Show the parse errors the document triggered
    magpie --errors ./index.html
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE", required_unless_present = "html")]
    file: Option<PathBuf>,

    /// Parse an inline HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the reserialized document instead of the tree outline
    #[arg(long)]
    serialize: bool,

    /// Print the parse errors after the output
    #[arg(long)]
    errors: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let input = match (&cli.html, &cli.file) {
        (Some(html), _) => html.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => unreachable!("clap enforces one input source"),
    };

    let (tree, errors) = parse_with_errors(&input);

    if cli.serialize {
        println!("{}", serialize(&tree));
    } else {
        print!("{}", print_tree(&tree));
    }

    if cli.errors {
        if errors.is_empty() {
            eprintln!("{}", "no parse errors".green());
        } else {
            eprintln!("{} parse error(s):", errors.len().to_string().yellow());
            for error in &errors {
                eprintln!("  {} {}", "error:".red().bold(), error);
            }
        }
    }

    Ok(())
}
