use anyhow::Result;
use eventhub_core::EventHubConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = EventHubConfig::config_path()?;
    let config = EventHubConfig::load()?;
    let options = config.export_options()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Exports:    {}", config.output_path().display());
    println!();
    println!("{}", "Export".bold());
    println!("  PRODID:     -//{}//Calendar//EN", options.product_id);
    println!("  UID:        <id>@{}", options.uid_domain);
    println!("  Duration:   {}", config.default_duration);
    println!("  Time zone:  {}", options.timezone);

    Ok(())
}
