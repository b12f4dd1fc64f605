//! Anchors command implementation.

use std::path::PathBuf;

use canon52_vectors::{load_packs, parse_anchor_document, AnchorSet, PackPaths};

use super::CommandResult;

pub fn run(paths: &PackPaths, check: Option<PathBuf>) -> CommandResult {
    let (canon, adjud) = load_packs(paths)?;
    let anchors = AnchorSet::compute(canon.document(), adjud.document())?;
    print!("{}", anchors.render());

    let Some(doc_path) = check else {
        return Ok(true);
    };

    let text = std::fs::read_to_string(&doc_path)
        .map_err(|e| format!("Failed to read anchor document {}: {}", doc_path.display(), e))?;
    let documented = parse_anchor_document(&text)?;
    let drift = anchors.compare(&documented);
    for entry in &drift {
        println!("{}", entry);
    }
    if drift.is_empty() {
        println!("[ANCHORS] OK {}", doc_path.display());
    } else {
        tracing::warn!(drifted = drift.len(), document = %doc_path.display(), "anchor drift");
    }
    Ok(drift.is_empty())
}
