//! Provider router: selects the model backend named in config or on the
//! command line.

use crate::mock::MockProvider;
use crate::openai_compat::OpenAiCompatProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tsprompt_config::{AppConfig, BenchmarkConfig};
use tsprompt_core::provider::Provider;

/// Name the offline mock is registered under.
pub const MOCK_PROVIDER: &str = "mock";

/// Routes completion requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    pub fn default_name(&self) -> &str {
        &self.default_provider
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build every configured provider plus the mock.
    ///
    /// The mock replies in `benchmark`'s format, type and horizon, so callers
    /// pass the effective settings of the run rather than the file defaults.
    pub fn from_config(config: &AppConfig, benchmark: &BenchmarkConfig) -> Self {
        let mut router = Self::new(&config.default_provider);

        router.register(
            MOCK_PROVIDER,
            Arc::new(MockProvider::new(
                benchmark.horizon,
                benchmark.format,
                benchmark.ts_type,
            )),
        );

        for (name, provider_config) in &config.providers {
            let api_key = provider_config
                .api_key
                .clone()
                .or_else(|| config.api_key.clone())
                .unwrap_or_default();
            let base_url = provider_config
                .api_url
                .clone()
                .unwrap_or_else(|| default_base_url(name));
            let provider = if name == "azure" {
                OpenAiCompatProvider::azure(base_url, provider_config.api_version.as_deref(), api_key)
            } else {
                openai_compat(name, &base_url, api_key)
            };
            router.register(name.clone(), Arc::new(provider));
        }

        if router.get(&config.default_provider).is_none() {
            let api_key = config.api_key.clone().unwrap_or_default();
            let base_url = default_base_url(&config.default_provider);
            router.register(
                config.default_provider.clone(),
                Arc::new(openai_compat(&config.default_provider, &base_url, api_key)),
            );
        }

        router
    }
}

fn openai_compat(name: &str, base_url: &str, api_key: String) -> OpenAiCompatProvider {
    // Local servers accept any bearer token.
    let api_key = if api_key.is_empty() && is_local(name) {
        name.to_string()
    } else {
        api_key
    };
    OpenAiCompatProvider::new(name, base_url, api_key)
}

fn is_local(provider_name: &str) -> bool {
    matches!(
        provider_name,
        "ollama" | "lmstudio" | "vllm" | "llamacpp" | "llama.cpp"
    )
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "lmstudio" => "http://localhost:1234/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsprompt_config::ProviderConfig;

    #[test]
    fn router_register_and_lookup() {
        let mut router = ProviderRouter::new("openai");
        router.register("openai", Arc::new(OpenAiCompatProvider::openai("sk-test")));

        assert!(router.get("openai").is_some());
        assert!(router.get("nonexistent").is_none());
        assert!(router.default().is_some());
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("deepseek").contains("deepseek.com"));
        assert!(default_base_url("lmstudio").contains("localhost:1234"));
    }

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let router = ProviderRouter::from_config(&config, &config.benchmark);
        assert_eq!(router.default().unwrap().name(), "openai");
        assert_eq!(router.get(MOCK_PROVIDER).unwrap().name(), "mock");
        assert_eq!(router.list(), vec!["mock", "openai"]);
    }

    #[test]
    fn configured_providers_are_registered() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "ollama".into(),
            ProviderConfig {
                api_url: Some("http://gpu-box:11434/v1".into()),
                ..ProviderConfig::default()
            },
        );
        let router = ProviderRouter::from_config(&config, &config.benchmark);
        assert_eq!(router.get("ollama").unwrap().name(), "ollama");
        assert_eq!(router.list(), vec!["mock", "ollama", "openai"]);
    }

    #[test]
    fn azure_section_builds_an_azure_provider() {
        let mut config = AppConfig::default();
        config.default_provider = "azure".into();
        config.providers.insert(
            "azure".into(),
            ProviderConfig {
                api_key: Some("az-key".into()),
                api_url: Some("https://bench.openai.azure.com".into()),
                api_version: Some("2024-06-01".into()),
                ..ProviderConfig::default()
            },
        );
        let router = ProviderRouter::from_config(&config, &config.benchmark);
        assert_eq!(router.default_name(), "azure");
        assert_eq!(router.default().unwrap().name(), "azure");
        assert_eq!(router.list(), vec!["azure", "mock"]);
    }

    #[tokio::test]
    async fn mock_follows_benchmark_settings() {
        let config = AppConfig::default();
        let benchmark = BenchmarkConfig {
            horizon: 5,
            format: tsprompt_core::TsFormat::Csv,
            ..BenchmarkConfig::default()
        };
        let router = ProviderRouter::from_config(&config, &benchmark);
        let reply = router
            .get(MOCK_PROVIDER)
            .unwrap()
            .complete(tsprompt_core::ProviderRequest::new("m", "p"))
            .await
            .unwrap();
        assert!(reply.text.starts_with("Date,Value\n2018-01-01,"));
        assert_eq!(reply.text.lines().count(), 6);
    }
}
