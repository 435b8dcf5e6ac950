use asconf::config_loader;
use asconf::igp::AreaPolicy;
use asconf::orchestrator::{generate_router_configs, PipelineOptions};
use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

/// Resolve per-router configuration data from a multi-AS topology description
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology YAML file
    #[arg(short, long)]
    file: PathBuf,

    /// Log every allocation and peering decision
    #[arg(short, long)]
    verbose: bool,

    /// Output format for the resolved router records
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Also assign OSPF areas on routers that carry a BGP block
    #[arg(long)]
    include_bgp_routers_in_areas: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging, "debug" when verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Topology file: {:?}", args.file);

    let config = config_loader::load_config(&args.file)?;

    let options = PipelineOptions {
        area_policy: if args.include_bgp_routers_in_areas {
            AreaPolicy::AllRouters
        } else {
            AreaPolicy::SkipBgpRouters
        },
    };

    let routers = generate_router_configs(&config, &options)
        .wrap_err_with(|| format!("Failed to resolve topology '{}'", args.file.display()))?;

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&routers)?,
        OutputFormat::Yaml => serde_yaml::to_string(&routers)?,
    };
    println!("{}", rendered);

    info!("Resolution completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["asconf", "--file", "topology.yaml"]);

        assert_eq!(args.file, PathBuf::from("topology.yaml"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.verbose);
        assert!(!args.include_bgp_routers_in_areas);
    }

    #[test]
    fn test_cli_flags() {
        let args = Args::parse_from([
            "asconf",
            "-f",
            "topology.yaml",
            "-v",
            "--format",
            "yaml",
            "--include-bgp-routers-in-areas",
        ]);

        assert!(args.verbose);
        assert_eq!(args.format, OutputFormat::Yaml);
        assert!(args.include_bgp_routers_in_areas);
    }
}
