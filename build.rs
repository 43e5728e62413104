use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use fs_extra::dir::CopyOptions;

/// Mirror `assets/` next to the build output so that binaries started from
/// the target directory find their models and textures.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.is_dir() {
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let options = CopyOptions {
        overwrite: true,
        ..CopyOptions::new()
    };
    fs_extra::copy_items(&[&assets], &out_dir, &options)
        .with_context(|| format!("could not copy {} to {out_dir}", assets.display()))?;

    Ok(())
}
