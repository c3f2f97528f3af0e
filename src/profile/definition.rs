use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tracing::debug;

use super::ProfileError;
use crate::rspec::{Node, NodeKind, Placement, Request, TextFormat, Tour};

// ======================================================
// ROOT STRUCT
// ======================================================

/// Declarative profile file (YAML, or JSON by `.json` extension).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour: Option<TourDefinition>,

    pub nodes: Vec<NodeDefinition>,
}

// ======================================================
// TOUR
// ======================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TourDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub format: TextFormat,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(default)]
    pub instructions_format: TextFormat,
}

// ======================================================
// NODE
// ======================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDefinition {
    pub name: String,

    #[serde(default)]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_image: Option<String>,

    #[serde(default)]
    pub routable_control_ip: bool,

    /// Absent means the kind's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blockstores: Vec<BlockstoreDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockstoreDefinition {
    pub name: String,
    pub mount: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default)]
    pub placement: Placement,

    #[serde(default)]
    pub readonly: bool,
}

// ======================================================
// LOAD / SAVE
// ======================================================

impl ProfileDefinition {
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let raw = fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed: Result<ProfileDefinition, String> = if is_json(path) {
            serde_json::from_str(&raw).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&raw).map_err(|e| e.to_string())
        };

        let definition = parsed.map_err(|message| ProfileError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        debug!(path = %path.display(), nodes = definition.nodes.len(), "profile definition loaded");
        Ok(definition)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        let raw = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| ProfileError::Encode(e.to_string()))?
        } else {
            serde_yaml::to_string(self).map_err(|e| ProfileError::Encode(e.to_string()))?
        };

        fs::write(path, raw).map_err(|source| ProfileError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    // ======================================================
    // CONVERSION
    // ======================================================

    /// Build the request object model. Validation happens at render time.
    pub fn into_request(self) -> Request {
        let mut request = Request::new();

        if let Some(def) = self.tour {
            let mut tour = Tour::new();
            if let Some(text) = &def.description {
                tour.description(def.format, text);
            }
            if let Some(text) = &def.instructions {
                tour.instructions(def.instructions_format, text);
            }
            request.add_tour(tour);
        }

        for def in self.nodes {
            let node = match def.kind {
                NodeKind::RawPc => request.raw_pc(&def.name),
                NodeKind::XenVm => request.xen_vm(&def.name),
            };
            node.hardware_type = def.hardware_type;
            node.disk_image = def.disk_image;
            node.routable_control_ip = def.routable_control_ip;
            if let Some(exclusive) = def.exclusive {
                node.exclusive = exclusive;
            }

            for bs_def in def.blockstores {
                let bs = node.blockstore(&bs_def.name, &bs_def.mount);
                bs.size = bs_def.size;
                bs.placement = bs_def.placement;
                bs.readonly = bs_def.readonly;
            }
        }

        request
    }

    pub fn from_request(request: &Request) -> Self {
        let tour = request.tour().map(|tour| {
            let (format, description) = split_text(&tour.description);
            let (instructions_format, instructions) = split_text(&tour.instructions);
            TourDefinition {
                description,
                format,
                instructions,
                instructions_format,
            }
        });

        let nodes = request
            .nodes()
            .iter()
            .map(|node| NodeDefinition {
                name: node.name.clone(),
                kind: node.kind,
                hardware_type: node.hardware_type.clone(),
                disk_image: node.disk_image.clone(),
                routable_control_ip: node.routable_control_ip,
                exclusive: (node.exclusive != Node::new(&node.name, node.kind).exclusive)
                    .then_some(node.exclusive),
                blockstores: node
                    .blockstores()
                    .iter()
                    .map(|bs| BlockstoreDefinition {
                        name: bs.name.clone(),
                        mount: bs.mount.clone(),
                        size: bs.size.clone(),
                        placement: bs.placement,
                        readonly: bs.readonly,
                    })
                    .collect(),
            })
            .collect();

        ProfileDefinition { tour, nodes }
    }
}

fn split_text(text: &Option<(TextFormat, String)>) -> (TextFormat, Option<String>) {
    match text {
        Some((format, body)) => (*format, Some(body.clone())),
        None => (TextFormat::default(), None),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
