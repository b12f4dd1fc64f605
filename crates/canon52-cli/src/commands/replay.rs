//! Vector replay commands.

use canon52_vectors::{load_adjudication_pack, load_canon_pack, PackPaths, VectorRunner};

use super::CommandResult;
use crate::output::print_summary;

pub fn run_canon(paths: &PackPaths) -> CommandResult {
    let pack = load_canon_pack(&paths.canon)?;
    let summary = VectorRunner::new().run_canon(pack.vectors());
    print_summary(&summary);
    Ok(summary.is_success())
}

pub fn run_adjudication(paths: &PackPaths) -> CommandResult {
    let pack = load_adjudication_pack(&paths.adjud)?;
    let summary = VectorRunner::new().run_adjudication(pack.vectors())?;
    print_summary(&summary);
    Ok(summary.is_success())
}

/// Canon self-test, then adjudication; stops at the first failing suite.
pub fn run_all(paths: &PackPaths) -> CommandResult {
    // Both packs are read before any vector runs.
    let canon = load_canon_pack(&paths.canon)?;
    let adjud = load_adjudication_pack(&paths.adjud)?;
    let runner = VectorRunner::new();

    let canon_summary = runner.run_canon(canon.vectors());
    print_summary(&canon_summary);
    if !canon_summary.is_success() {
        return Ok(false);
    }

    let adjud_summary = runner.run_adjudication(adjud.vectors())?;
    print_summary(&adjud_summary);
    if !adjud_summary.is_success() {
        return Ok(false);
    }

    println!("[ALL] PASS");
    Ok(true)
}
