use anyhow::{Context, Result};
use config::{Mode, PluginConfig};

mod config;
mod json_tools;
mod kind;
mod logging;
mod optional_fields;
mod plugin;
mod rules;

fn main() -> Result<()> {
    let config = PluginConfig::new()?;

    logging::init(config.log_level).context("initializing logging")?;

    match config.mode {
        Mode::Metadata => {
            println!("{}", serde_json::to_string(&plugin::metadata()).context("serializing metadata")?);
        }
        Mode::Transform(request) => {
            let response = plugin::run(&request).context("transforming resource")?;
            println!("{}", serde_json::to_string(&response).context("serializing response")?);
        }
    }

    Ok(())
}
