use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::node::{Blockstore, Node};
use super::request::{Request, Tour};

const URN_PREFIX: &str = "urn:publicid:IDN+";
const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "KIB", "MIB", "GIB", "TIB"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RspecError {
    #[error("request has no nodes")]
    NoNodes,

    #[error("node name must not be empty")]
    EmptyNodeName,

    #[error("node name '{0}' contains whitespace")]
    InvalidNodeName(String),

    #[error("duplicate node name '{0}'")]
    DuplicateNode(String),

    #[error("{field} contains a character not allowed in XML: {value:?}")]
    InvalidText { field: String, value: String },

    #[error("node '{node}': hardware type '{hardware_type}' must be a non-empty single token")]
    InvalidHardwareType { node: String, hardware_type: String },

    #[error("node '{node}': disk image '{image}' is not an image URN")]
    InvalidImageUrn { node: String, image: String },

    #[error("node '{node}': blockstore name must not be empty")]
    EmptyBlockstoreName { node: String },

    #[error("node '{node}': blockstore name '{blockstore}' contains whitespace")]
    InvalidBlockstoreName { node: String, blockstore: String },

    #[error("node '{node}': duplicate blockstore name '{blockstore}'")]
    DuplicateBlockstore { node: String, blockstore: String },

    #[error("node '{node}': blockstore '{blockstore}' mount path '{mount}' is not absolute")]
    RelativeMount {
        node: String,
        blockstore: String,
        mount: String,
    },

    #[error("node '{node}': blockstore '{blockstore}' has no size")]
    MissingSize { node: String, blockstore: String },

    #[error("node '{node}': blockstore '{blockstore}' size '{size}' is not <number><unit>")]
    InvalidSize {
        node: String,
        blockstore: String,
        size: String,
    },
}

// ======================================================
// REQUEST
// ======================================================

impl Request {
    /// Check every field the control plane would reject.
    pub fn validate(&self) -> Result<(), RspecError> {
        if let Some(tour) = self.tour() {
            validate_tour(tour)?;
        }

        if self.nodes().is_empty() {
            return Err(RspecError::NoNodes);
        }

        let mut seen = HashSet::new();

        for node in self.nodes() {
            validate_node(node)?;

            if !seen.insert(node.name.as_str()) {
                return Err(RspecError::DuplicateNode(node.name.clone()));
            }
        }

        debug!(nodes = self.nodes().len(), "request validated");
        Ok(())
    }
}

// ======================================================
// TEXT
// ======================================================

/// XML 1.0 `Char` production. Surrogates cannot occur in a `char`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn check_text(value: &str, field: impl FnOnce() -> String) -> Result<(), RspecError> {
    if value.chars().all(is_xml_char) {
        return Ok(());
    }
    Err(RspecError::InvalidText {
        field: field(),
        value: value.to_owned(),
    })
}

fn validate_tour(tour: &Tour) -> Result<(), RspecError> {
    if let Some((_, text)) = &tour.description {
        check_text(text, || "tour description".to_owned())?;
    }
    if let Some((_, text)) = &tour.instructions {
        check_text(text, || "tour instructions".to_owned())?;
    }
    Ok(())
}

// ======================================================
// NODE
// ======================================================

fn validate_node(node: &Node) -> Result<(), RspecError> {
    check_text(&node.name, || format!("node name '{}'", node.name))?;

    if node.name.is_empty() {
        return Err(RspecError::EmptyNodeName);
    }

    if node.name.chars().any(char::is_whitespace) {
        return Err(RspecError::InvalidNodeName(node.name.clone()));
    }

    if let Some(hw) = &node.hardware_type {
        check_text(hw, || format!("node '{}': hardware type", node.name))?;

        if hw.is_empty() || hw.chars().any(char::is_whitespace) {
            return Err(RspecError::InvalidHardwareType {
                node: node.name.clone(),
                hardware_type: hw.clone(),
            });
        }
    }

    if let Some(image) = &node.disk_image {
        check_text(image, || format!("node '{}': disk image", node.name))?;

        if !is_image_urn(image) {
            return Err(RspecError::InvalidImageUrn {
                node: node.name.clone(),
                image: image.clone(),
            });
        }
    }

    let mut seen = HashSet::new();

    for bs in node.blockstores() {
        validate_blockstore(&node.name, bs)?;

        if !seen.insert(bs.name.as_str()) {
            return Err(RspecError::DuplicateBlockstore {
                node: node.name.clone(),
                blockstore: bs.name.clone(),
            });
        }
    }

    Ok(())
}

/// `urn:publicid:IDN+<authority>+image+<name>`; the authority may carry
/// its own `:`-separated sub-authorities.
pub fn is_image_urn(value: &str) -> bool {
    let Some(rest) = value.strip_prefix(URN_PREFIX) else {
        return false;
    };

    let parts: Vec<&str> = rest.splitn(3, '+').collect();

    match parts.as_slice() {
        [authority, kind, name] => {
            !authority.is_empty() && *kind == "image" && !name.is_empty()
        }
        _ => false,
    }
}

// ======================================================
// BLOCKSTORE
// ======================================================

fn validate_blockstore(node: &str, bs: &Blockstore) -> Result<(), RspecError> {
    check_text(&bs.name, || format!("node '{}': blockstore name '{}'", node, bs.name))?;
    check_text(&bs.mount, || format!("node '{}': blockstore '{}' mount path", node, bs.name))?;
    if let Some(size) = &bs.size {
        check_text(size, || format!("node '{}': blockstore '{}' size", node, bs.name))?;
    }

    if bs.name.is_empty() {
        return Err(RspecError::EmptyBlockstoreName {
            node: node.to_owned(),
        });
    }

    if bs.name.chars().any(char::is_whitespace) {
        return Err(RspecError::InvalidBlockstoreName {
            node: node.to_owned(),
            blockstore: bs.name.clone(),
        });
    }

    if !bs.mount.starts_with('/') {
        return Err(RspecError::RelativeMount {
            node: node.to_owned(),
            blockstore: bs.name.clone(),
            mount: bs.mount.clone(),
        });
    }

    let size = bs.size.as_deref().ok_or_else(|| RspecError::MissingSize {
        node: node.to_owned(),
        blockstore: bs.name.clone(),
    })?;

    if !is_size(size) {
        return Err(RspecError::InvalidSize {
            node: node.to_owned(),
            blockstore: bs.name.clone(),
            size: size.to_owned(),
        });
    }

    Ok(())
}

pub fn is_size(value: &str) -> bool {
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());

    let (digits, unit) = value.split_at(split);

    if digits.is_empty() || digits.trim_start_matches('0').is_empty() {
        return false;
    }

    SIZE_UNITS.contains(&unit.to_ascii_uppercase().as_str())
}
