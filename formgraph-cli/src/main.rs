//! formgraph binary: parse arguments, render the schema, print the report.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "formgraph")]
#[command(about = "Visualize a formgraph schema — stats plus a Mermaid flowchart")]
struct Args {
    /// Path to the JSON schema file
    schema: PathBuf,

    /// Write a self-contained HTML page here instead of printing Mermaid text
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    match formgraph_cli::run(&args.schema, args.output.as_deref()) {
        Ok(report) => print!("{report}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
