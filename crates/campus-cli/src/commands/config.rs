use crate::ConfigCommands;
use crate::config::CliConfig;
use anyhow::Result;

pub fn handle_config_command(config: &CliConfig, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show_config(config),
    }
}

fn show_config(config: &CliConfig) -> Result<()> {
    println!("Campus Configuration");
    println!("====================");
    match &config.data_file {
        Some(path) => println!("Dataset: {}", path.display()),
        None => println!("Dataset: built-in sample academy"),
    }
    println!();

    println!("Access Settings:");
    println!("  Audit Enabled: {}", config.access.audit_enabled);
    println!("  Audit Max Events: {}", config.access.audit_max_events);
    println!("  Slow Check Threshold: {}ms", config.access.slow_check_threshold_ms);
    println!("  Fallback Role Name: {}", config.access.fallback_role_name);
    println!("  Admin Listing Role: {}", config.access.admin_listing_role_name);

    Ok(())
}
