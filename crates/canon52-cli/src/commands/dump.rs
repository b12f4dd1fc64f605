//! Dump command implementation.

use canon52_vectors::{load_packs, write_pack, PackPaths};

use super::CommandResult;

pub fn run(paths: &PackPaths) -> CommandResult {
    let (canon, adjud) = load_packs(paths)?;
    write_pack(&paths.canon, canon.document())?;
    write_pack(&paths.adjud, adjud.document())?;
    println!(
        "[DUMP] wrote {} and {}",
        paths.canon.display(),
        paths.adjud.display()
    );
    Ok(true)
}
