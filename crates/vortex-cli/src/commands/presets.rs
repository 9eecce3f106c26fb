//! Preset listing and inspection

use anyhow::Result;
use vortex_particles::presets;

pub fn list() -> Result<()> {
    for name in presets::NAMES {
        println!("{name}");
    }
    Ok(())
}

pub fn show(name: &str, format: &str) -> Result<()> {
    let config = presets::by_name(name)?;
    let output = match format {
        "toml" => config.to_toml_string()?,
        "json" => serde_json::to_string_pretty(&config)?,
        _ => anyhow::bail!("Unknown format: {}", format),
    };
    println!("{output}");
    Ok(())
}
