/* Export an automaton as a Graphviz dot file for visualization. */

use crate::automaton::Automaton;
use color_eyre::eyre::Result;
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;

/// Render the automaton into `{filename}.dot`. States are labelled with
/// their declared labels, the start and accept states are marked, and
/// epsilon edges are labelled 𝛆.
pub fn export_dot(automaton: &Automaton, filename: &str) -> Result<()> {
    let mut graph = DiGraph::new();
    let mut node_map = HashMap::new();

    // Add nodes
    for (state_id, label) in automaton.get_states().iter().enumerate() {
        let mut node_label = format!("State {}", label);

        if state_id == automaton.get_start_state() {
            node_label = format!("Start\n{}", node_label);
        }
        if automaton.get_acceptor_states()[state_id] {
            node_label = format!("Accept\n{}", node_label);
        }

        let node = graph.add_node(node_label);
        node_map.insert(state_id, node);
    }

    // Add edges
    for state_id in 0..automaton.get_num_states() {
        for (symbol, targets) in automaton.get_transitions(state_id) {
            for target in targets {
                graph.add_edge(node_map[&state_id], node_map[target], symbol.to_string());
            }
        }
    }

    let dot = Dot::new(&graph);

    let dot_filename = format!("{}.dot", filename);
    let mut dot_file = File::create(&dot_filename)?;

    dot_file.write_all(dot.to_string().as_bytes())?;

    Ok(())
}
