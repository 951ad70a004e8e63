mod cli; // Declare the cli module

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{debug, error};
use serde_json::Value;

use webplug_core::config::HostConfig;
use webplug_core::plugin_system::{PluginFactory, PluginRegistry};
use webplug_core::{Error, Result};

use cli::CliHost;

/// Webplug: inspect and drive a plugin host from its configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Host configuration file (.json, .toml, .yaml)
    #[arg(short, long, global = true, default_value = "webplug.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List declared plugin entries in priority order
    List,
    /// List the plugin classes this host can build
    Classes,
    /// Start the host, building every onload plugin
    Start,
    /// Resolve the plugin serving a service
    Resolve {
        /// Service name
        service: String,
    },
    /// Run an action on a service's plugin
    Exec {
        /// Service name
        service: String,
        /// Action name
        action: String,
        /// JSON arguments
        args: Option<String>,
    },
    /// List services whose URL filters admit a URL
    Match {
        /// Page URL
        url: String,
    },
}

/// Factory holding every plugin shipped with the CLI
fn builtin_factory() -> Result<PluginFactory> {
    let mut factory = PluginFactory::new();
    core_logging::register(&mut factory)?;
    core_device::register(&mut factory)?;
    Ok(factory)
}

fn format_filters(filters: Option<&[String]>) -> String {
    match filters {
        None => "*".to_string(),
        Some(filters) => format!("[{}]", filters.join(", ")),
    }
}

fn run(args: CliArgs) -> Result<ExitCode> {
    let factory = builtin_factory()?;

    if let Commands::Classes = args.command {
        for name in factory.class_names() {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = HostConfig::load(&args.config)?;
    let host = CliHost::new(config.preferences.clone());
    let registry = PluginRegistry::from_config(&config, Arc::new(factory));
    debug!("Registered {} plugin entries", registry.len());

    if let Commands::List = args.command {
        for entry in registry.entries() {
            println!(
                "{}\t{}\tpriority={}\tonload={}\tfilters={}",
                entry.service(),
                entry.plugin_class(),
                entry.priority(),
                entry.onload(),
                format_filters(entry.url_filters())
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let report = registry.startup(&host, &host);

    match args.command {
        Commands::Start => {
            for service in &report.loaded {
                println!("Loaded: {}", service);
            }
            for (service, reason) in &report.failed {
                println!("Failed: {}: {}", service, reason);
            }
            println!(
                "Host started: {} loaded, {} failed",
                report.loaded.len(),
                report.failed.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve { service } => match registry.create_or_get(&service, &host, &host) {
            Some(plugin) => {
                println!("{} -> {}", service, plugin.class_name());
                Ok(ExitCode::SUCCESS)
            }
            None => {
                println!("{}: no plugin", service);
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Exec { service, action, args } => {
            let args: Value = match args {
                Some(raw) => serde_json::from_str(&raw)
                    .map_err(|e| Error::Other(format!("Invalid JSON arguments: {}", e)))?,
                None => Value::Null,
            };
            let plugin = registry
                .create_or_get(&service, &host, &host)
                .ok_or_else(|| {
                    Error::Other(format!("No plugin available for service '{}'", service))
                })?;
            let result = plugin
                .execute(&action, &args)
                .map_err(|e| Error::Other(format!("{}.{} failed: {}", service, action, e)))?;
            let rendered = serde_json::to_string_pretty(&result)
                .map_err(|e| Error::Other(format!("Failed to render result: {}", e)))?;
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Match { url } => {
            for service in registry.services_for_url(&url) {
                println!("{}", service);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::List | Commands::Classes => Ok(ExitCode::SUCCESS),
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
