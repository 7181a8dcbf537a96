use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::records::{DraftError, ListAction, RecordId, Replica};
use crate::workflow::types::{NodeKind, Position, WorkflowEdge, WorkflowNode};

/// A locally edited workflow graph.
///
/// Nodes and connections are held as two replicas. Nothing here talks to the
/// server: the whole draft is serialized by [`WorkflowDraft::to_payload`] on
/// an explicit save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Replica<WorkflowNode>,
    #[serde(default)]
    pub edges: Replica<WorkflowEdge>,
}

/// A local edit to a workflow draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftAction {
    AddNode {
        kind: NodeKind,
        label: String,
        position: Position,
    },
    /// Whole-record replacement of a node (id preserved).
    UpdateNode { id: RecordId, node: WorkflowNode },
    /// Replace a node's config object wholesale.
    SetNodeConfig {
        id: RecordId,
        config: serde_json::Value,
    },
    MoveNode { id: RecordId, position: Position },
    /// Remove a node and every connection touching it.
    DeleteNode { id: RecordId },
    Connect {
        source: RecordId,
        target: RecordId,
        label: Option<String>,
    },
    Disconnect { id: RecordId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftChange {
    NodeAdded {
        id: RecordId,
    },
    NodeUpdated {
        id: RecordId,
    },
    NodeDeleted {
        id: RecordId,
        removed_edges: Vec<RecordId>,
    },
    Connected {
        id: RecordId,
    },
    Disconnected {
        id: RecordId,
    },
}

impl WorkflowDraft {
    /// Seed a draft from server-provided nodes and connections.
    pub fn seed(
        name: impl Into<String>,
        nodes: Vec<WorkflowNode>,
        edges: Vec<WorkflowEdge>,
    ) -> Result<Self, DraftError> {
        Ok(Self {
            name: name.into(),
            nodes: Replica::seed(nodes)?,
            edges: Replica::seed(edges)?,
        })
    }

    pub fn node(&self, id: RecordId) -> Option<&WorkflowNode> {
        self.nodes.get(id)
    }

    /// Connections that start or end at `node`.
    pub fn edges_touching(&self, node: RecordId) -> impl Iterator<Item = &WorkflowEdge> {
        self.edges.items().iter().filter(move |e| e.touches(node))
    }

    /// Apply an action in place. A failed action leaves the draft unchanged.
    pub fn apply(&mut self, action: DraftAction) -> Result<DraftChange, DraftError> {
        match action {
            DraftAction::AddNode {
                kind,
                label,
                position,
            } => {
                let mut node = WorkflowNode::new(kind, label);
                node.position = position;
                let id = self.nodes.push(node);
                Ok(DraftChange::NodeAdded { id })
            }
            DraftAction::UpdateNode { id, node } => {
                self.nodes.apply(ListAction::Edit { id, record: node })?;
                Ok(DraftChange::NodeUpdated { id })
            }
            DraftAction::SetNodeConfig { id, config } => {
                let mut node = self
                    .nodes
                    .get(id)
                    .cloned()
                    .ok_or(DraftError::NotFound { id })?;
                node.config = config;
                self.nodes.apply(ListAction::Edit { id, record: node })?;
                Ok(DraftChange::NodeUpdated { id })
            }
            DraftAction::MoveNode { id, position } => {
                let mut node = self
                    .nodes
                    .get(id)
                    .cloned()
                    .ok_or(DraftError::NotFound { id })?;
                node.position = position;
                self.nodes.apply(ListAction::Edit { id, record: node })?;
                Ok(DraftChange::NodeUpdated { id })
            }
            DraftAction::DeleteNode { id } => {
                self.nodes.apply(ListAction::Delete { id })?;
                let removed_edges = self.edges.remove_where(|e| e.touches(id));
                info!(
                    event = "core.workflow.node_deleted",
                    id = %id,
                    removed_edges = removed_edges.len()
                );
                Ok(DraftChange::NodeDeleted { id, removed_edges })
            }
            DraftAction::Connect {
                source,
                target,
                label,
            } => {
                for endpoint in [source, target] {
                    if !self.nodes.contains(endpoint) {
                        return Err(DraftError::UnknownEndpoint { id: endpoint });
                    }
                }
                if self
                    .edges
                    .items()
                    .iter()
                    .any(|e| e.source == source && e.target == target)
                {
                    return Err(DraftError::DuplicateConnection {
                        source_id: source,
                        target_id: target,
                    });
                }

                let edge = WorkflowEdge {
                    id: RecordId::Local(0),
                    source,
                    target,
                    label,
                };
                let id = self.edges.push(edge);
                debug!(
                    event = "core.workflow.connected",
                    id = %id,
                    source = %source,
                    target = %target
                );
                Ok(DraftChange::Connected { id })
            }
            DraftAction::Disconnect { id } => {
                self.edges.apply(ListAction::Delete { id })?;
                Ok(DraftChange::Disconnected { id })
            }
        }
    }

    /// Pure reducer: `(state, action) -> state`.
    pub fn reduce(&self, action: DraftAction) -> Result<WorkflowDraft, DraftError> {
        let mut next = self.clone();
        next.apply(action)?;
        Ok(next)
    }

    /// Serialize the entire draft for a save request.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "nodes": self.nodes,
            "edges": self.edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;
    use proptest::prelude::*;

    fn node(id: i64, kind: NodeKind, label: &str) -> WorkflowNode {
        let mut n = WorkflowNode::new(kind, label);
        n.id = RecordId::Server(id);
        n
    }

    fn edge(id: i64, source: i64, target: i64) -> WorkflowEdge {
        WorkflowEdge {
            id: RecordId::Server(id),
            source: RecordId::Server(source),
            target: RecordId::Server(target),
            label: None,
        }
    }

    fn linear_draft() -> WorkflowDraft {
        WorkflowDraft::seed(
            "approval",
            vec![
                node(1, NodeKind::Start, "Start"),
                node(2, NodeKind::Task, "Review"),
                node(3, NodeKind::End, "Archive"),
            ],
            vec![edge(10, 1, 2), edge(11, 2, 3)],
        )
        .unwrap()
    }

    #[test]
    fn test_add_node_gets_local_id() {
        let mut draft = linear_draft();
        let change = draft
            .apply(DraftAction::AddNode {
                kind: NodeKind::Approval,
                label: "Sign-off".to_string(),
                position: Position { x: 10.0, y: 20.0 },
            })
            .unwrap();
        assert_eq!(change, DraftChange::NodeAdded { id: RecordId::Local(1) });
        let added = draft.node(RecordId::Local(1)).unwrap();
        assert_eq!(added.label, "Sign-off");
        assert_eq!(added.position.x, 10.0);
    }

    #[test]
    fn test_delete_node_cascades_connections() {
        let mut draft = linear_draft();
        let change = draft
            .apply(DraftAction::DeleteNode {
                id: RecordId::Server(2),
            })
            .unwrap();

        assert_eq!(
            change,
            DraftChange::NodeDeleted {
                id: RecordId::Server(2),
                removed_edges: vec![RecordId::Server(10), RecordId::Server(11)],
            }
        );
        assert!(draft.edges.is_empty());
        assert_eq!(draft.edges_touching(RecordId::Server(2)).count(), 0);
    }

    #[test]
    fn test_connect_rejects_unknown_endpoint() {
        let mut draft = linear_draft();
        let err = draft
            .apply(DraftAction::Connect {
                source: RecordId::Server(1),
                target: RecordId::Local(42),
                label: None,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            DraftError::UnknownEndpoint {
                id: RecordId::Local(42)
            }
        ));
        assert_eq!(draft.edges.len(), 2);
    }

    #[test]
    fn test_connect_rejects_duplicate() {
        let mut draft = linear_draft();
        let err = draft
            .apply(DraftAction::Connect {
                source: RecordId::Server(1),
                target: RecordId::Server(2),
                label: None,
            })
            .unwrap_err();
        assert!(matches!(err, DraftError::DuplicateConnection { .. }));
    }

    #[test]
    fn test_set_config_replaces_whole_object() {
        let mut draft = linear_draft();
        draft
            .apply(DraftAction::SetNodeConfig {
                id: RecordId::Server(2),
                config: serde_json::json!({"assignee": "legal", "days": 3}),
            })
            .unwrap();
        draft
            .apply(DraftAction::SetNodeConfig {
                id: RecordId::Server(2),
                config: serde_json::json!({"assignee": "ops"}),
            })
            .unwrap();
        assert_eq!(
            draft.node(RecordId::Server(2)).unwrap().config,
            serde_json::json!({"assignee": "ops"})
        );
    }

    #[test]
    fn test_disconnect_only_removes_one_edge() {
        let mut draft = linear_draft();
        draft
            .apply(DraftAction::Disconnect {
                id: RecordId::Server(10),
            })
            .unwrap();
        assert_eq!(
            draft.edges.ids().collect::<Vec<_>>(),
            vec![RecordId::Server(11)]
        );
        assert_eq!(draft.nodes.len(), 3);
    }

    #[test]
    fn test_payload_roundtrips_through_serde() {
        let mut draft = linear_draft();
        draft
            .apply(DraftAction::AddNode {
                kind: NodeKind::Task,
                label: "New".to_string(),
                position: Position::default(),
            })
            .unwrap();
        let payload = draft.to_payload();
        assert_eq!(payload["nodes"][3]["id"], "local-1");

        let reloaded: WorkflowDraft = serde_json::from_value(payload).unwrap();
        assert_eq!(reloaded, draft);
    }

    proptest! {
        #[test]
        fn prop_deleted_node_is_never_referenced(
            edges in proptest::collection::vec((1i64..8, 1i64..8), 0..25),
            victim in 1i64..8,
        ) {
            let nodes: Vec<WorkflowNode> =
                (1..8).map(|i| node(i, NodeKind::Task, "n")).collect();
            let mut draft = WorkflowDraft::seed("p", nodes, Vec::new()).unwrap();
            for (s, t) in edges {
                let _ = draft.apply(DraftAction::Connect {
                    source: RecordId::Server(s),
                    target: RecordId::Server(t),
                    label: None,
                });
            }

            draft.apply(DraftAction::DeleteNode { id: RecordId::Server(victim) }).unwrap();

            prop_assert!(draft.node(RecordId::Server(victim)).is_none());
            for e in draft.edges.items() {
                prop_assert!(!e.touches(RecordId::Server(victim)));
                prop_assert!(draft.nodes.contains(e.source));
                prop_assert!(draft.nodes.contains(e.target));
                prop_assert!(draft.edges.contains(e.id()));
            }
        }
    }
}
