//! GENI v3 request RSpec rendering.
//!
//! Output is deterministic: attribute order is fixed and nothing
//! time- or host-dependent is emitted.

use tracing::debug;

use super::node::{Blockstore, Node};
use super::request::{Request, Tour};
use super::validate::RspecError;

pub const GENI_NS: &str = "http://www.geni.net/resources/rspec/3";
pub const EMULAB_NS: &str = "http://www.protogeni.net/resources/rspec/ext/emulab/1";
pub const TOUR_NS: &str = "http://www.protogeni.net/resources/rspec/ext/apt-tour/1";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str =
    "http://www.geni.net/resources/rspec/3 http://www.geni.net/resources/rspec/3/request.xsd";

const INDENT: &str = "  ";

// ======================================================
// ENTRY POINT
// ======================================================

/// Validate the request and render it as a complete XML document.
pub fn render(request: &Request) -> Result<String, RspecError> {
    request.validate()?;

    let mut w = XmlWriter::new();

    w.declaration();
    w.open(
        "rspec",
        &[
            ("xmlns", GENI_NS),
            ("xmlns:emulab", EMULAB_NS),
            ("xmlns:tour", TOUR_NS),
            ("xmlns:xsi", XSI_NS),
            ("xsi:schemaLocation", SCHEMA_LOCATION),
            ("type", "request"),
        ],
    );

    if let Some(tour) = request.tour() {
        write_tour(&mut w, tour);
    }

    for node in request.nodes() {
        write_node(&mut w, node);
    }

    w.close("rspec");

    let out = w.finish();
    debug!(bytes = out.len(), "rspec rendered");
    Ok(out)
}

// ======================================================
// SECTIONS
// ======================================================

fn write_tour(w: &mut XmlWriter, tour: &Tour) {
    w.open("rspec_tour", &[("xmlns", TOUR_NS)]);

    if let Some((format, text)) = &tour.description {
        w.text_element("description", &[("type", format.as_str())], text);
    }

    if let Some((format, text)) = &tour.instructions {
        w.text_element("instructions", &[("type", format.as_str())], text);
    }

    w.close("rspec_tour");
}

fn write_node(w: &mut XmlWriter, node: &Node) {
    w.open(
        "node",
        &[
            ("client_id", node.name.as_str()),
            ("exclusive", bool_attr(node.exclusive)),
        ],
    );

    match &node.disk_image {
        Some(image) => {
            w.open("sliver_type", &[("name", node.kind.sliver_type())]);
            w.empty("disk_image", &[("name", image.as_str())]);
            w.close("sliver_type");
        }
        None => w.empty("sliver_type", &[("name", node.kind.sliver_type())]),
    }

    if let Some(hw) = &node.hardware_type {
        w.empty("hardware_type", &[("name", hw.as_str())]);
    }

    if node.routable_control_ip {
        w.empty("emulab:routable_control_ip", &[]);
    }

    for bs in node.blockstores() {
        write_blockstore(w, bs);
    }

    w.close("node");
}

fn write_blockstore(w: &mut XmlWriter, bs: &Blockstore) {
    let mut attrs = vec![
        ("name", bs.name.as_str()),
        ("mountpoint", bs.mount.as_str()),
        ("class", "local"),
    ];

    if let Some(size) = &bs.size {
        attrs.push(("size", size.as_str()));
    }

    attrs.push(("placement", bs.placement.as_str()));

    if bs.readonly {
        attrs.push(("readonly", "true"));
    }

    w.empty("emulab:blockstore", &attrs);
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

// ======================================================
// WRITER
// ======================================================

struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> Self {
        XmlWriter { out: String::new(), depth: 0 }
    }

    fn declaration(&mut self) {
        self.out.push_str("<?xml version='1.0' encoding='UTF-8'?>\n");
    }

    fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.start_tag(tag, attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.start_tag(tag, attrs);
        self.out.push_str("/>\n");
    }

    fn text_element(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
        self.start_tag(tag, attrs);
        self.out.push('>');
        self.out.push_str(&escape(text));
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    fn start_tag(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        for (key, value) in attrs {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            self.out.push_str(&escape(value));
            self.out.push('"');
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
