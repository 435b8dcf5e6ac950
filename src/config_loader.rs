use crate::config::TopologyConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a topology description from a YAML file
pub fn load_config(config_path: &Path) -> Result<TopologyConfig> {
    info!("Loading topology from: {:?}", config_path);

    // Open the configuration file
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open topology file '{}'", config_path.display()))?;

    // Parse the YAML content
    let config: TopologyConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse topology file '{}'", config_path.display()))?;

    info!(
        "Found {} autonomous systems with {} routers",
        config.autonomous_systems.len(),
        config.router_count()
    );

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// Parse a topology description held in memory
pub fn load_config_str(yaml: &str) -> Result<TopologyConfig> {
    let config: TopologyConfig = serde_yaml::from_str(yaml).wrap_err("Failed to parse topology")?;
    config.validate()?;
    Ok(config)
}
