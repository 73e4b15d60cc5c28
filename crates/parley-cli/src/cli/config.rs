//! `parley config` -- print the effective configuration.

use console::style;

use parley_infra::config::render_toml;
use parley_types::config::ChatConfig;

pub fn show_config(config: &ChatConfig, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Effective configuration").bold());
    println!();
    for line in render_toml(config)?.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
