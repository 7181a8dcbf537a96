//! Pre-save checks for workflow drafts.
//!
//! [`validate_draft`] is a pure function of the draft: no I/O, no hidden
//! state, and the returned list is sorted so two calls on the same draft
//! produce identical output.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use serde::Serialize;

use crate::records::RecordId;
use crate::workflow::draft::WorkflowDraft;
use crate::workflow::types::NodeKind;

/// Violation categories, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    MissingStart,
    MultipleStarts,
    EndCount,
    DanglingConnection,
    SelfLoop,
    DuplicateConnection,
    StartHasIncoming,
    EndHasOutgoing,
    EmptyLabel,
    Unconnected,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<RecordId>,
}

impl Violation {
    fn new(code: ViolationCode, element: Option<RecordId>, message: String) -> Self {
        Self {
            code,
            message,
            element,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Inspect a draft and list everything that would make it unsavable.
///
/// An empty list means the draft is valid.
pub fn validate_draft(draft: &WorkflowDraft) -> Vec<Violation> {
    let mut violations = Vec::new();
    let nodes = draft.nodes.items();
    let edges = draft.edges.items();

    let starts: Vec<RecordId> = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Start)
        .map(|n| n.id)
        .collect();
    let ends: Vec<RecordId> = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::End)
        .map(|n| n.id)
        .collect();

    match starts.len() {
        0 => violations.push(Violation::new(
            ViolationCode::MissingStart,
            None,
            "Workflow is missing a start node".to_string(),
        )),
        1 => {}
        n => violations.push(Violation::new(
            ViolationCode::MultipleStarts,
            None,
            format!("Workflow has {} start nodes; exactly one is required", n),
        )),
    }

    if ends.len() != 1 {
        violations.push(Violation::new(
            ViolationCode::EndCount,
            None,
            format!(
                "Exactly one end node is required (found {})",
                ends.len()
            ),
        ));
    }

    let node_ids: HashSet<RecordId> = nodes.iter().map(|n| n.id).collect();
    let mut seen_pairs: HashSet<(RecordId, RecordId)> = HashSet::new();
    let mut connected: HashSet<RecordId> = HashSet::new();
    let mut outgoing: BTreeMap<RecordId, BTreeSet<RecordId>> = BTreeMap::new();

    for edge in edges {
        let mut dangling = false;
        for endpoint in [edge.source, edge.target] {
            if !node_ids.contains(&endpoint) {
                dangling = true;
                violations.push(Violation::new(
                    ViolationCode::DanglingConnection,
                    Some(edge.id),
                    format!(
                        "Connection {} references unknown node {}",
                        edge.id, endpoint
                    ),
                ));
            }
        }
        if dangling {
            continue;
        }

        if edge.source == edge.target {
            violations.push(Violation::new(
                ViolationCode::SelfLoop,
                Some(edge.id),
                format!(
                    "Connection {} connects node {} to itself",
                    edge.id, edge.source
                ),
            ));
            continue;
        }

        if !seen_pairs.insert((edge.source, edge.target)) {
            violations.push(Violation::new(
                ViolationCode::DuplicateConnection,
                Some(edge.id),
                format!(
                    "Connection {} duplicates an existing connection from {} to {}",
                    edge.id, edge.source, edge.target
                ),
            ));
            continue;
        }

        connected.insert(edge.source);
        connected.insert(edge.target);
        outgoing.entry(edge.source).or_default().insert(edge.target);
    }

    let has_incoming: HashSet<RecordId> = outgoing.values().flatten().copied().collect();

    for node in nodes {
        if node.kind == NodeKind::Start && has_incoming.contains(&node.id) {
            violations.push(Violation::new(
                ViolationCode::StartHasIncoming,
                Some(node.id),
                format!("Start node '{}' has incoming connections", node.label),
            ));
        }
        if node.kind == NodeKind::End && outgoing.contains_key(&node.id) {
            violations.push(Violation::new(
                ViolationCode::EndHasOutgoing,
                Some(node.id),
                format!("End node '{}' has outgoing connections", node.label),
            ));
        }
        if node.label.trim().is_empty() {
            violations.push(Violation::new(
                ViolationCode::EmptyLabel,
                Some(node.id),
                format!("Node {} has an empty label", node.id),
            ));
        }
    }

    // A lone node in a one-node draft is reported by the start/end checks.
    if nodes.len() > 1 {
        for node in nodes.iter().filter(|n| !connected.contains(&n.id)) {
            violations.push(Violation::new(
                ViolationCode::Unconnected,
                Some(node.id),
                format!(
                    "Node '{}' ({}) is not connected to any other node",
                    node.label, node.id
                ),
            ));
        }
    }

    if let [start] = starts.as_slice() {
        let reachable = reachable_from(*start, &outgoing);
        for node in nodes
            .iter()
            .filter(|n| connected.contains(&n.id) && !reachable.contains(&n.id))
        {
            violations.push(Violation::new(
                ViolationCode::Unreachable,
                Some(node.id),
                format!(
                    "Node '{}' ({}) cannot be reached from the start node",
                    node.label, node.id
                ),
            ));
        }
    }

    violations.sort_by(|a, b| (a.code, a.element).cmp(&(b.code, b.element)));
    violations
}

fn reachable_from(
    start: RecordId,
    outgoing: &BTreeMap<RecordId, BTreeSet<RecordId>>,
) -> HashSet<RecordId> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in outgoing.get(&current).into_iter().flatten() {
            if seen.insert(*next) {
                queue.push_back(*next);
            }
        }
    }
    seen
}
