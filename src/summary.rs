use colored::*;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::rspec::{render, Request, RspecError};

// ======================================================
// DATA MODEL
// ======================================================

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RequestSummary {
    pub tour: Option<String>,
    pub nodes: Vec<NodeSummary>,
    /// SHA-256 of the rendered RSpec, lowercase hex.
    pub fingerprint: String,
    pub bytes: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NodeSummary {
    pub name: String,
    pub sliver_type: String,
    pub hardware_type: Option<String>,
    pub disk_image: Option<String>,
    pub routable_control_ip: bool,
    pub exclusive: bool,
    pub blockstores: Vec<BlockstoreSummary>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BlockstoreSummary {
    pub name: String,
    pub mount: String,
    pub size: Option<String>,
    pub placement: String,
    pub readonly: bool,
}

// ======================================================
// FINGERPRINT
// ======================================================

pub fn fingerprint(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ======================================================
// BUILD
// ======================================================

pub fn summarize(request: &Request) -> Result<RequestSummary, RspecError> {
    let document = render(request)?;

    let tour = request
        .tour()
        .and_then(|t| t.description.as_ref())
        .map(|(_, text)| text.trim().to_owned());

    let nodes = request
        .nodes()
        .iter()
        .map(|node| NodeSummary {
            name: node.name.clone(),
            sliver_type: node.kind.sliver_type().to_owned(),
            hardware_type: node.hardware_type.clone(),
            disk_image: node.disk_image.clone(),
            routable_control_ip: node.routable_control_ip,
            exclusive: node.exclusive,
            blockstores: node
                .blockstores()
                .iter()
                .map(|bs| BlockstoreSummary {
                    name: bs.name.clone(),
                    mount: bs.mount.clone(),
                    size: bs.size.clone(),
                    placement: bs.placement.as_str().to_owned(),
                    readonly: bs.readonly,
                })
                .collect(),
        })
        .collect();

    Ok(RequestSummary {
        tour,
        nodes,
        fingerprint: fingerprint(&document),
        bytes: document.len(),
    })
}

// ======================================================
// PRINT
// ======================================================

pub fn print_summary(summary: &RequestSummary) {
    println!();
    println!("{}", "Profile Request".bold());
    println!("{}", "─".repeat(60).dimmed());

    if let Some(tour) = &summary.tour {
        println!("Tour        : {}", tour);
    }
    println!("Nodes       : {}", summary.nodes.len());
    println!("Fingerprint : {}", summary.fingerprint);
    println!("Size        : {} bytes", summary.bytes);
    println!();

    println!(
        "{:<20} {:<12} {:<10} {:<10} {}",
        "Node", "Type", "Hardware", "Public IP", "Image"
    );
    println!("{}", "─".repeat(60).dimmed());

    for node in &summary.nodes {
        let public = if node.routable_control_ip {
            format!("{:<10}", "yes").green()
        } else {
            format!("{:<10}", "no").dimmed()
        };

        println!(
            "{:<20} {:<12} {:<10} {} {}",
            node.name,
            node.sliver_type,
            node.hardware_type.as_deref().unwrap_or("-"),
            public,
            node.disk_image.as_deref().unwrap_or("(default)")
        );

        for bs in &node.blockstores {
            println!(
                "  {} {} at {} ({}, placement {}{})",
                "└".dimmed(),
                bs.name.cyan(),
                bs.mount,
                bs.size.as_deref().unwrap_or("?"),
                bs.placement,
                if bs.readonly { ", read-only" } else { "" }
            );
        }
    }

    println!();
}
