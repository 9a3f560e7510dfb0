use anyhow::Result;
use owo_colors::OwoColorize;
use shiftsync_core::SyncConfig;
use shiftsync_core::remote::Remote;
use shiftsync_core::remote::provider::Provider;

use crate::commands::{open_workbook, today};
use crate::render::Render;

pub async fn run(config: &SyncConfig) -> Result<()> {
    let workbook = open_workbook(config)?;
    let remote = Remote::new(Provider::from_name(&config.provider), config.account.clone());

    println!("📅 {}", config.calendar_id.bold());

    let report = shiftsync_core::sync::run(config, &workbook, &remote, today(config), |outcome| {
        println!("{}", outcome.render());
    })
    .await?;

    println!("\n{}", report.render());

    Ok(())
}
