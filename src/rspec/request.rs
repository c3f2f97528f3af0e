use serde::{Deserialize, Serialize};

use super::node::{Node, NodeKind};

// ======================================================
// TOUR
// ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Text,
    Markdown,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Text => "text",
            TextFormat::Markdown => "markdown",
        }
    }
}

/// Display metadata shown to users browsing profiles.
/// Has no effect on what gets provisioned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tour {
    pub description: Option<(TextFormat, String)>,
    pub instructions: Option<(TextFormat, String)>,
}

impl Tour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&mut self, format: TextFormat, text: &str) -> &mut Self {
        self.description = Some((format, text.to_owned()));
        self
    }

    pub fn instructions(&mut self, format: TextFormat, text: &str) -> &mut Self {
        self.instructions = Some((format, text.to_owned()));
        self
    }
}

// ======================================================
// REQUEST
// ======================================================

/// Top-level request container: an optional tour and an ordered node list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    tour: Option<Tour>,
    nodes: Vec<Node>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tour(&mut self, tour: Tour) {
        self.tour = Some(tour);
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.tour.as_ref()
    }

    pub fn raw_pc(&mut self, name: &str) -> &mut Node {
        self.add_node(Node::new(name, NodeKind::RawPc))
    }

    pub fn xen_vm(&mut self, name: &str) -> &mut Node {
        self.add_node(Node::new(name, NodeKind::XenVm))
    }

    pub fn add_node(&mut self, node: Node) -> &mut Node {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
