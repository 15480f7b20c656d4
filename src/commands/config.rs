use anyhow::Result;
use feedcal_core::config::FeedConfig;
use owo_colors::OwoColorize;

pub fn run(config: &FeedConfig) -> Result<()> {
    let path = FeedConfig::config_path()?;
    println!("{}", format!("# {}", path.display()).dimmed());
    print!("{}", config.to_toml()?);
    println!("{}", format!("# store: {}", config.data_path().display()).dimmed());

    Ok(())
}
