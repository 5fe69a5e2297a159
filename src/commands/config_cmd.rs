use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("listing_url: {}", config.listing_url.value);
                        println!("  source: {}", config.listing_url.source);
                        println!();

                        println!("detail_url: {}", config.detail_url.value);
                        println!("  source: {}", config.detail_url.source);
                        println!();

                        match &config.bearer {
                            Some(bearer) => {
                                println!("bearer: (set)");
                                println!("  source: {}", bearer.source);
                            }
                            None => println!("bearer: (not set)"),
                        }
                        println!();

                        println!("page_size: {}", config.page_size.value);
                        println!("  source: {}", config.page_size.source);
                        println!();

                        println!("sort_type: {}", config.sort_type.value);
                        println!("  source: {}", config.sort_type.source);
                        println!();

                        println!("output: {}", config.output.value.display());
                        println!("  source: {}", config.output.source);
                    }
                }
                Ok(())
            }
        }
    }
}
