use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use retro_input::engine::input::{GameInputPort, InputConfig, InputManager, ReloadPolicy};
use std::path::PathBuf;
use std::sync::PoisonError;

/// Inspect the controller topology and button map of an input resource directory
#[derive(Debug, Parser)]
#[command(name = "retro-input", version, about)]
struct Cli {
    /// Directory holding topology.xml and buttonmap.xml
    #[arg(short, long, value_name = "PATH", default_value = "resources")]
    resources: PathBuf,

    /// Topology document inside the resource directory
    #[arg(long, value_name = "FILE", default_value = "topology.xml")]
    topology: String,

    /// Button map document inside the resource directory
    #[arg(long, value_name = "FILE", default_value = "buttonmap.xml")]
    buttonmap: String,

    /// Keep the previous topology if a reload fails
    #[arg(long)]
    keep_previous: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level)
        .init();

    info!("Loading input resources from {}", cli.resources.display());

    let policy = if cli.keep_previous {
        ReloadPolicy::KeepPrevious
    } else {
        ReloadPolicy::Clear
    };
    let config = InputConfig::new(&cli.resources)
        .with_topology_file(cli.topology)
        .with_buttonmap_file(cli.buttonmap)
        .with_reload_policy(policy);

    let manager = InputManager::from_config(&config);
    manager.load_resources()?;

    println!("Topology:");
    let topology = manager
        .topology()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    match topology.get_ports() {
        Some(ports) => print_ports(ports.as_slice(), 1),
        None => println!("  (no ports)"),
    }

    println!("Button map:");
    let mapper = manager
        .button_mapper()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    for device in mapper.devices() {
        let subclass = device
            .subclass()
            .map(|subclass| format!(", subclass {}", subclass))
            .unwrap_or_default();
        println!(
            "  {} ({}{}): {} features",
            device.controller_id(),
            device.device_type().name(),
            subclass,
            device.features().len()
        );
    }

    Ok(())
}

fn print_ports(ports: &[GameInputPort], depth: usize) {
    let indent = "  ".repeat(depth);

    for port in ports {
        println!("{}port {}", indent, port.port_id().to_string_lossy());

        for device in port.accepted_devices() {
            let model = device
                .model()
                .map(|model| format!(" [{}]", model.to_string_lossy()))
                .unwrap_or_default();
            let exclusive = if device.exclusive() { "" } else { " (shared)" };

            println!(
                "{}  accepts {}{}{}",
                indent,
                device.controller_id().to_string_lossy(),
                model,
                exclusive
            );
            print_ports(device.available_ports(), depth + 2);
        }
    }
}
