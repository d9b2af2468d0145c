use clap::{Args, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;

use crate::config::{Config, ConfigValue};

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# sheetsync configuration

# OAuth2 access token for the Google Sheets API
# (prefer SHEETSYNC_ACCESS_TOKEN over storing it here)
# access_token: ya29....

# Spreadsheet ID (from the spreadsheet URL)
# spreadsheet: h8fw4kbaeflnafaf

# Worksheet (tab) name
worksheet: Sheet1

# Column matching local records to rows; values must be unique
primary_key: pk

# Reuse the remote feed across records. Faster for bulk pushes, but
# raises the risk of overwriting edits made in the sheet meanwhile.
cache_feed: false
"#;

fn show_value<T: std::fmt::Display>(name: &str, value: &ConfigValue<T>) {
    println!("{}: {}", name, value.value);
    println!("  source: {}", value.source);
    println!();
}

fn show_optional(name: &str, value: &ConfigValue<Option<String>>, secret: bool) {
    let shown = match &value.value {
        Some(_) if secret => "(set)".to_string(),
        Some(v) => v.clone(),
        None => "(not set)".to_string(),
    };
    println!("{}: {}", name, shown);
    println!("  source: {}", value.source);
    println!();
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

                        show_optional("access_token", &config.access_token, true);
                        show_optional("spreadsheet", &config.spreadsheet, false);
                        show_value("worksheet", &config.worksheet);
                        show_value("primary_key", &config.primary_key);
                        show_value("cache_feed", &config.cache_feed);
                        show_optional("source", &config.source, false);
                        show_value("api_base_url", &config.api_base_url);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'sheetsync config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
