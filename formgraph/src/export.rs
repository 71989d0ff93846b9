//! Schema export: flowchart text and summary statistics.
//!
//! Pure functions of the schema, for external tooling (the CLI renders these;
//! the engine never calls them).

use serde::Serialize;

use crate::schema::Schema;

/// Summary statistics over a schema graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchemaStats {
    pub total_states: usize,
    pub total_transitions: usize,
    pub final_states: usize,
    /// Transitions per non-final state, rounded to two decimals.
    pub average_branching_factor: f64,
}

/// Renders the schema as a Mermaid flowchart: an entry arrow into the
/// initial state, rounded nodes for final states, and one labeled edge per
/// transition (event-name underscores become spaces).
pub fn to_mermaid(schema: &Schema) -> String {
    let mut lines = vec!["graph TD".to_string()];
    lines.push(format!("    Start([Start]) --> {}", schema.initial));

    for (name, definition) in &schema.states {
        if definition.is_terminal() {
            lines.push(format!("    {name}([{name}])"));
            continue;
        }
        for (event, transition) in &definition.on {
            let label = event.replace('_', " ");
            lines.push(format!("    {} -->|{}| {}", name, label, transition.target));
        }
    }

    lines.join("\n")
}

/// Counts states, transitions, and final states, and derives the average
/// branching factor over non-final states.
pub fn stats(schema: &Schema) -> SchemaStats {
    let total_states = schema.states.len();
    let mut total_transitions = 0;
    let mut final_states = 0;

    for definition in schema.states.values() {
        if definition.is_terminal() {
            final_states += 1;
        } else {
            total_transitions += definition.on.len();
        }
    }

    let branching_sources = (total_states - final_states).max(1);
    let average_branching_factor = if total_states > 0 {
        let raw = total_transitions as f64 / branching_sources as f64;
        (raw * 100.0).round() / 100.0
    } else {
        0.0
    };

    SchemaStats {
        total_states,
        total_transitions,
        final_states,
        average_branching_factor,
    }
}

/// Wraps the Mermaid flowchart in a self-contained HTML page.
pub fn to_html(schema: &Schema) -> String {
    let mermaid = to_mermaid(schema);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>formgraph: {id}</title>
  <script src="https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js"></script>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; }}
    .schema-info {{ color: #444; margin-bottom: 1.5rem; }}
  </style>
</head>
<body>
  <h1>Schema: {id}</h1>
  <div class="schema-info">
    <p>Initial state: <strong>{initial}</strong></p>
    <p>Total states: <strong>{total}</strong></p>
  </div>
  <pre class="mermaid">
{mermaid}
  </pre>
  <script>
    mermaid.initialize({{ startOnLoad: true, theme: 'default' }});
  </script>
</body>
</html>"#,
        id = schema.id,
        initial = schema.initial,
        total = schema.states.len(),
    )
}
