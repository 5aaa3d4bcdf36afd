//! Show or initialize the trimview configuration file.

use trimview_common::config::{config_file_path, TrimmerConfig};

pub fn run(config: &TrimmerConfig, init: bool, force: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if init {
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }
        TrimmerConfig::default()
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let source = if path.exists() { "file" } else { "defaults" };
    println!("# {} ({source})", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
