use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use super::{get_config_path, validate_config, Config};
use crate::scoring::{Normalization, WeightConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse a 0-5 emphasis value.
fn parse_weight(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", s.trim()))?;
    if value > WeightConfig::MAX_WEIGHT {
        return Err(format!("{} is above the maximum of {}", value, WeightConfig::MAX_WEIGHT));
    }
    Ok(value)
}

fn parse_normalization(s: &str) -> Result<Normalization, String> {
    match s.trim().to_lowercase().as_str() {
        "sum" => Ok(Normalization::Sum),
        "max" => Ok(Normalization::Max),
        other => Err(format!("'{}' is not one of: sum, max", other)),
    }
}

/// Ask for one weight until a valid answer is given.
fn prompt_weight(label: &str, default: u32) -> Result<u32> {
    loop {
        let input =
            prompt_with_default(&format!("  {} emphasis (0-5)", label), &default.to_string())?;
        match parse_weight(&input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("  {}", e),
        }
    }
}

/// Serialize `config` and write it atomically, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

/// Create a config file.
///
/// With `use_defaults` the built-in defaults are written without asking;
/// otherwise the user is asked for the detail weights and percentage mode.
/// An existing file is only replaced with `force` or after confirmation.
pub fn run_init(path: Option<PathBuf>, use_defaults: bool, force: bool) -> Result<()> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        if use_defaults {
            anyhow::bail!(
                "Config already exists at {}. Pass --force to overwrite.",
                config_path.display()
            );
        }
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut config = Config::default();

    if !use_defaults {
        println!("Detail scoring weights");
        let defaults = WeightConfig::default();
        let weights = WeightConfig {
            motor: prompt_weight("Motor", defaults.motor)?,
            local: prompt_weight("Local win rate", defaults.local)?,
            start: prompt_weight("Start timing", defaults.start)?,
            expo: prompt_weight("Exhibition time", defaults.expo)?,
        };
        config.weights = Some(weights);

        let normalize = loop {
            let input = prompt_with_default("Percentage mode for detail scoring (sum/max)", "sum")?;
            match parse_normalization(&input) {
                Ok(n) => break n,
                Err(e) => println!("  {}", e),
            }
        };
        config.normalize = Some(normalize);
    }

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
    }

    write_config(&config_path, &config)?;
    println!("Config written to {}", config_path.display());
    Ok(())
}
