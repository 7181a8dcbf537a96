use serde::{Deserialize, Serialize};

use crate::records::{Record, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Task,
    Approval,
    Decision,
    End,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Task => "task",
            NodeKind::Approval => "approval",
            NodeKind::Decision => "decision",
            NodeKind::End => "end",
        }
    }

    /// Parse a kind name as typed on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "start" => Some(NodeKind::Start),
            "task" => Some(NodeKind::Task),
            "approval" => Some(NodeKind::Approval),
            "decision" => Some(NodeKind::Decision),
            "end" => Some(NodeKind::End),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: RecordId,
    pub kind: NodeKind,
    pub label: String,
    #[serde(default)]
    pub position: Position,
    /// Step-specific settings (assignee, deadline, ...). Opaque to the client.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,
}

impl WorkflowNode {
    /// A node not yet placed in a draft; the draft assigns its id.
    pub fn new(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: RecordId::Local(0),
            kind,
            label: label.into(),
            position: Position::default(),
            config: serde_json::Value::Null,
        }
    }
}

impl Record for WorkflowNode {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: RecordId,
    pub source: RecordId,
    pub target: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Record for WorkflowEdge {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl WorkflowEdge {
    /// Whether this connection starts or ends at `node`.
    pub fn touches(&self, node: RecordId) -> bool {
        self.source == node || self.target == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_parse() {
        assert_eq!(NodeKind::parse("Start"), Some(NodeKind::Start));
        assert_eq!(NodeKind::parse(" end "), Some(NodeKind::End));
        assert_eq!(NodeKind::parse("fork"), None);
    }

    #[test]
    fn test_node_deserialize_defaults() {
        let node: WorkflowNode =
            serde_json::from_str(r#"{"id": 3, "kind": "task", "label": "Review"}"#).unwrap();
        assert_eq!(node.position, Position::default());
        assert!(node.config.is_null());
        assert_eq!(node.kind, NodeKind::Task);
    }

    #[test]
    fn test_edge_touches_both_endpoints() {
        let edge = WorkflowEdge {
            id: RecordId::Local(1),
            source: RecordId::Server(1),
            target: RecordId::Server(2),
            label: None,
        };
        assert!(edge.touches(RecordId::Server(1)));
        assert!(edge.touches(RecordId::Server(2)));
        assert!(!edge.touches(RecordId::Local(1)));
        assert!(edge.references().is_empty());
    }
}
