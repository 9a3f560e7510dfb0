use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;
use shiftsync_core::SyncConfig;
use shiftsync_core::remote::provider::Provider;

pub fn run(explicit: Option<PathBuf>) -> Result<()> {
    let config_path = match explicit {
        Some(path) => path,
        None => SyncConfig::default_path()?,
    };
    let providers_dir = SyncConfig::config_dir()?.join("providers");

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Providers:  {}", providers_dir.display());

    if !config_path.exists() {
        println!("\n{}", "Config file does not exist yet, run `shiftsync` to create it".yellow());
        return Ok(());
    }

    match SyncConfig::load(&config_path) {
        Ok(config) => {
            let provider = Provider::from_name(&config.provider);

            println!("  Workbook:   {}", config.excel_file.display());
            println!();
            println!("{}", "Calendar".bold());
            println!("  Calendar:   {}", config.calendar_id);
            println!("  Time zone:  {}", config.time_zone);
            println!("  Provider:   {} ({})", provider.name(), provider.binary_name());
            if let Some(account) = &config.account {
                println!("  Account:    {account}");
            }
        }
        Err(e) => println!("\n{}", e.to_string().red()),
    }

    Ok(())
}
