use crate::domain::aggregation::EngineOptions;
use crate::domain::format::Locale;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub engine: EngineSettings,
    pub server: ServerSettings,
    pub sources: SourceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    pub category_cap: usize,
    pub locale: Locale,
}

impl EngineSettings {
    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            category_cap: self.category_cap,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceBackend {
    File,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub backend: SourceBackend,
    pub directory: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub token: String,
    pub url_template: String,
    pub timeout_secs: u64,
}

/// Load settings from defaults, then `config/engine.*` if present, then
/// `DASHBOARD__SECTION__KEY` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/engine").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("engine.category_cap", 15)?
        .set_default("engine.locale", "pt-BR")?
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("sources.backend", "file")?
        .set_default("sources.directory", "data/sources")?
        .set_default("sources.url_template", "${base_url}/sources/${id}")?
        .set_default("sources.timeout_secs", 10)?)
}

/// Replace `${name}` template variables in a URL
pub fn prepare_url(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
