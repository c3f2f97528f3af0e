use serde::{Deserialize, Serialize};

// ======================================================
// NODE KIND
// ======================================================

/// Sliver type requested for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Bare-metal machine.
    #[default]
    RawPc,
    /// Xen virtual machine on a shared host.
    #[serde(rename = "emulab-xen")]
    XenVm,
}

impl NodeKind {
    pub fn sliver_type(&self) -> &'static str {
        match self {
            NodeKind::RawPc => "raw-pc",
            NodeKind::XenVm => "emulab-xen",
        }
    }
}

// ======================================================
// BLOCKSTORE
// ======================================================

/// Where on the host a local blockstore is carved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Any,
    Sysvol,
    Nonsysvol,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Any => "any",
            Placement::Sysvol => "sysvol",
            Placement::Nonsysvol => "nonsysvol",
        }
    }
}

/// Local storage volume owned by a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blockstore {
    pub name: String,
    pub mount: String,
    /// Magnitude with unit suffix, e.g. "20GB".
    pub size: Option<String>,
    pub placement: Placement,
    pub readonly: bool,
}

impl Blockstore {
    pub fn new(name: &str, mount: &str) -> Self {
        Blockstore {
            name: name.to_owned(),
            mount: mount.to_owned(),
            size: None,
            placement: Placement::Any,
            readonly: false,
        }
    }
}

// ======================================================
// NODE
// ======================================================

/// One requested compute resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub hardware_type: Option<String>,
    pub disk_image: Option<String>,
    pub routable_control_ip: bool,
    pub exclusive: bool,
    blockstores: Vec<Blockstore>,
}

impl Node {
    pub fn new(name: &str, kind: NodeKind) -> Self {
        Node {
            name: name.to_owned(),
            kind,
            hardware_type: None,
            disk_image: None,
            routable_control_ip: false,
            // VMs share their host unless asked otherwise
            exclusive: kind == NodeKind::RawPc,
            blockstores: Vec::new(),
        }
    }

    /// Attach a new blockstore and hand it back for further setup.
    pub fn blockstore(&mut self, name: &str, mount: &str) -> &mut Blockstore {
        self.blockstores.push(Blockstore::new(name, mount));
        let last = self.blockstores.len() - 1;
        &mut self.blockstores[last]
    }

    pub fn blockstores(&self) -> &[Blockstore] {
        &self.blockstores
    }
}
