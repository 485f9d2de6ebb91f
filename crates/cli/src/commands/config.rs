use anyhow::{Result, bail};
use clap::Subcommand;
use serde_json::json;

use crate::{
    Context,
    config::Config,
    output::Table,
};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Store the API key in the configuration file
    Init {
        /// API key of the workout service
        #[arg(long)]
        api_key: String,
        /// Base URL of the workout service
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
    /// Show the effective configuration
    Show,
}

impl ConfigCommand {
    pub fn run(self, context: &Context) -> Result<()> {
        match self {
            ConfigCommand::Init { api_key, base_url } => {
                if api_key.trim().is_empty() {
                    bail!("API key must not be empty");
                }

                // Environment overrides must not end up in the file.
                let mut config = Config::load(&context.config_path)?;
                config.api.key = Some(api_key.trim().to_string());
                if let Some(base_url) = base_url {
                    config.api.base_url = base_url;
                }
                config.save(&context.config_path)?;

                println!(
                    "Configuration saved to {}",
                    context.config_path.display()
                );
            }
            ConfigCommand::Show => {
                println!("{}", show(context)?);
            }
        }
        Ok(())
    }
}

fn show(context: &Context) -> serde_json::Result<String> {
    let config = &context.config;
    let path = context.config_path.display().to_string();
    let value = json!({
        "config_file": path,
        "api_key": config.masked_key(),
        "base_url": config.api.base_url,
        "output_format": config.display.output_format.to_string(),
        "color": config.display.color,
    });

    let mut table = Table::new(vec!["Setting", "Value"]);
    table.row(vec![String::from("Config file"), path]);
    table.row(vec![String::from("API key"), config.masked_key()]);
    table.row(vec![String::from("Base URL"), config.api.base_url.clone()]);
    table.row(vec![
        String::from("Output format"),
        config.display.output_format.to_string(),
    ]);
    table.row(vec![
        String::from("Color"),
        config.display.color.to_string(),
    ]);

    context.output.render(&value, "Configuration", &[table])
}
