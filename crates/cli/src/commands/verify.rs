use anyhow::Context;
use credbridge_kernel::proof::parse_any;
use credbridge_kernel::types::{Address, Identity};
use credbridge_kernel::verify::verify;
use std::path::Path;

use super::read_file;

pub fn check(identity: &str, file: &Path) -> anyhow::Result<Address> {
    let doc = parse_any(&read_file(file)?).with_context(|| format!("parsing {}", file.display()))?;
    let address = verify(&Identity::from(identity), &doc)?;
    Ok(address)
}

pub fn run(identity: &str, file: &Path) -> anyhow::Result<()> {
    let address = check(identity, file)?;
    println!("VALID: {} controls {}", identity, address);
    Ok(())
}
