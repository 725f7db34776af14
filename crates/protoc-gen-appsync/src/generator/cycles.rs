use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use crate::descriptor::{FieldKind, FileDescriptor};

/// Groups of messages that reference each other, directly or transitively.
///
/// Each group is sorted and the groups themselves are ordered by their first member.
pub(crate) fn detect_message_cycles(file: &FileDescriptor) -> Vec<Vec<String>> {
  let mut graph = DiGraphMap::<&str, ()>::new();
  for message in file.messages.values() {
    graph.add_node(message.full_name.as_str());
    for field in &message.fields {
      if let FieldKind::Message(referenced) = &field.kind {
        graph.add_edge(message.full_name.as_str(), referenced.as_str(), ());
      }
    }
  }

  let mut cycles: Vec<Vec<String>> = kosaraju_scc(&graph)
    .into_iter()
    .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
    .map(|scc| {
      let mut members: Vec<String> = scc.into_iter().map(String::from).collect();
      members.sort();
      members
    })
    .collect();
  cycles.sort();
  cycles
}
