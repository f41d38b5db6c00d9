pub mod diff;
pub mod inspect;
pub mod verify;

use anyhow::Context;
use std::path::Path;

/// Reads a JSON state file; a missing file is an error here, unlike in the node.
pub(crate) fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}
