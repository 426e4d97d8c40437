//! `tsprompt config`: configuration management commands.

use super::CommandResult;
use std::path::{Path, PathBuf};
use tsprompt_config::AppConfig;

fn resolve(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path)
}

pub async fn validate(config_path: Option<&Path>) -> CommandResult {
    let path = resolve(config_path);
    println!("Validating {}", path.display());

    match AppConfig::load_with_env(&path) {
        Ok(config) => {
            println!("   Config parsed successfully");

            let mut warnings = Vec::new();

            if config.api_key.is_none()
                && config.default_provider != "mock"
                && config
                    .providers
                    .get(&config.default_provider)
                    .is_none_or(|p| p.api_key.is_none())
            {
                warnings.push("No API key set (set TSPROMPT_API_KEY or OPENAI_API_KEY)".to_string());
            }

            for strategy in tsprompt_core::PromptType::ALL {
                if let Some(template) = config.templates.path_for(strategy)
                    && !template.exists()
                {
                    warnings.push(format!(
                        "{strategy} template {} does not exist",
                        template.display()
                    ));
                }
            }

            if !config.benchmark.data_dir.exists() {
                warnings.push(format!(
                    "Data directory {} does not exist",
                    config.benchmark.data_dir.display()
                ));
            }

            if warnings.is_empty() {
                println!("   All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   warning: {w}");
                }
            }

            println!();
            println!("   Provider:  {}", config.default_provider);
            println!("   Model:     {}", config.default_model);
            println!(
                "   Benchmark: {} / {} / {}, horizon {}",
                config.benchmark.format,
                config.benchmark.ts_type,
                config.benchmark.strategy,
                config.benchmark.horizon
            );
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show(config_path: Option<&Path>) -> CommandResult {
    let mut config = AppConfig::load_with_env(&resolve(config_path))
        .map_err(|e| format!("Failed to load config: {e}"))?;
    if config.api_key.is_some() {
        config.api_key = Some("[REDACTED]".into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some("[REDACTED]".into());
        }
    }
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub async fn path(config_path: Option<&Path>) -> CommandResult {
    println!("{}", resolve(config_path).display());
    Ok(())
}

pub async fn init(config_path: Option<&Path>, force: bool) -> CommandResult {
    let path = resolve(config_path);
    write_default(&path, force)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn write_default(path: &Path, force: bool) -> CommandResult {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_valid() {
        let path = resolve(None);
        assert!(path.to_str().unwrap().ends_with("config.toml"));
    }

    #[test]
    fn init_writes_a_loadable_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default(&path, false).unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.benchmark.horizon, 24);

        assert!(write_default(&path, false).is_err());
        assert!(write_default(&path, true).is_ok());
    }
}
