use anyhow::Result;
use owo_colors::OwoColorize;

use datebook_core::config::DatebookConfig;

pub fn run(
    mut config: DatebookConfig,
    set_server: Option<String>,
    clear_server: bool,
) -> Result<()> {
    let config_path = DatebookConfig::config_path()?;

    if set_server.is_some() || clear_server {
        config.server_url = set_server;
        config.save_to(&config_path)?;
        println!("{} {}", "Saved".green(), config_path.display());
        println!();
    }

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());
    println!();
    println!("{}", "Settings".bold());
    println!(
        "  Server:   {}",
        config
            .server_url
            .as_deref()
            .unwrap_or("none (appointments kept in memory)")
    );
    println!("  Start:    {}", config.bootstrap_month);
    println!("  Timeout:  {}s", config.request_timeout_secs);

    Ok(())
}
