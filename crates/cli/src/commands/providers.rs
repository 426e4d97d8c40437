//! `tsprompt providers`: list the configured model backends.
//!
//! With `--check`, every backend is asked whether it is reachable.

use super::{CommandResult, load_config};
use serde::Serialize;
use std::path::Path;
use tracing::warn;
use tsprompt_config::AppConfig;
use tsprompt_providers::ProviderRouter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub model: String,
    pub default: bool,
    /// `None` unless a health check ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn run(config_path: Option<&Path>, check: bool) -> CommandResult {
    let config = load_config(config_path)?;
    let router = ProviderRouter::from_config(&config, &config.benchmark);

    println!("Providers");
    println!("=========");
    for status in describe(&router, &config, check).await {
        let marker = if status.default { "*" } else { " " };
        let health = match (status.reachable, &status.error) {
            (_, Some(err)) => format!("  unreachable: {err}"),
            (Some(true), None) => "  ok".to_string(),
            (Some(false), None) => "  unreachable".to_string(),
            (None, None) => String::new(),
        };
        println!("  {marker} {:<12} {}{health}", status.name, status.model);
    }
    println!();
    println!("  * default provider");
    Ok(())
}

/// One status line per registered provider, in name order.
pub async fn describe(
    router: &ProviderRouter,
    config: &AppConfig,
    check: bool,
) -> Vec<ProviderStatus> {
    let mut statuses = Vec::new();
    for name in router.list() {
        let mut status = ProviderStatus {
            name: name.to_string(),
            model: config.model_for(name).to_string(),
            default: name == router.default_name(),
            reachable: None,
            error: None,
        };
        if check && let Some(provider) = router.get(name) {
            match provider.health_check().await {
                Ok(reachable) => status.reachable = Some(reachable),
                Err(err) => {
                    warn!(provider = name, error = %err, "Health check failed");
                    status.reachable = Some(false);
                    status.error = Some(err.to_string());
                }
            }
        }
        statuses.push(status);
    }
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tsprompt_core::{
        Provider, ProviderError, ProviderRequest, ProviderResponse, TsFormat, TsType,
    };
    use tsprompt_providers::{MOCK_PROVIDER, MockProvider};

    struct Offline;

    #[async_trait::async_trait]
    impl Provider for Offline {
        fn name(&self) -> &str {
            "offline"
        }

        async fn complete(&self, _: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }

        async fn health_check(&self) -> Result<bool, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn lists_configured_providers_without_checking() {
        let config = AppConfig::default();
        let router = ProviderRouter::from_config(&config, &config.benchmark);
        let statuses = describe(&router, &config, false).await;

        let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["mock", "openai"]);
        assert!(statuses[1].default);
        assert_eq!(statuses[1].model, "gpt-4o-mini");
        assert!(statuses.iter().all(|s| s.reachable.is_none()));
    }

    #[tokio::test]
    async fn check_reports_health() {
        let config = AppConfig::default();
        let mut router = ProviderRouter::new(MOCK_PROVIDER);
        router.register(
            MOCK_PROVIDER,
            Arc::new(MockProvider::seeded(4, TsFormat::Array, TsType::Numeric, 1)),
        );
        router.register("offline", Arc::new(Offline));

        let statuses = describe(&router, &config, true).await;
        assert_eq!(statuses[0].name, "mock");
        assert_eq!(statuses[0].reachable, Some(true));
        assert!(statuses[0].default);
        assert_eq!(statuses[1].reachable, Some(false));
        assert!(statuses[1].error.as_deref().unwrap().contains("connection refused"));
    }
}
