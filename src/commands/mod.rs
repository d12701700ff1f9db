pub mod analyze;

use anyhow::{Context, Result};
use std::path::Path;

use ipolens::config::Config;

// Re-export command functions for convenience
pub use analyze::{analyze, AnalyzeParams};

/// Load configuration from a file when given, otherwise from the environment
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::from_env()?,
    };
    Ok(config)
}

pub fn vocabulary(config: &Config) {
    println!("Keyword vocabulary ({} terms)", config.analysis.vocabulary.len());
    println!("================================");
    for (i, term) in config.analysis.vocabulary.terms().iter().enumerate() {
        println!("{:>2}. {term}", i + 1);
    }
}

pub fn show_config(config: &Config) -> Result<()> {
    config.validate()?;
    print!("{}", config.to_toml()?);
    Ok(())
}
