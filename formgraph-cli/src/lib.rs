//! Schema visualization: load a JSON schema, report stats, render a diagram.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use formgraph::{export, Schema};

/// Loads and validates the schema file, then renders it. Returns the text to
/// print: the stats summary followed by Mermaid flowchart text, or — when
/// `output` is set — a confirmation after writing the HTML page there.
pub fn run(schema_path: &Path, output: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(schema_path)?;
    let schema = Schema::from_json(&json)?;
    let stats = export::stats(&schema);

    let mut report = String::new();
    writeln!(report, "Schema: {} (initial: {})", schema.id, schema.initial)?;
    writeln!(report, "  Total states:         {}", stats.total_states)?;
    writeln!(report, "  Total transitions:    {}", stats.total_transitions)?;
    writeln!(report, "  Final states:         {}", stats.final_states)?;
    writeln!(
        report,
        "  Avg branching factor: {}",
        stats.average_branching_factor
    )?;
    writeln!(report)?;

    match output {
        Some(path) => {
            fs::write(path, export::to_html(&schema))?;
            writeln!(report, "Wrote {}", path.display())?;
        }
        None => {
            report.push_str(&export::to_mermaid(&schema));
            report.push('\n');
        }
    }

    Ok(report)
}
