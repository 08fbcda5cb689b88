//! Donation client configuration.
//!
//! Loads, validates, and writes the JSON config that names the backend, the
//! preset tiers, and which commit gateway to use.
use crate::commit::{CommitGateway, HttpGateway, SimulatedGateway};
use crate::wizard::{default_tiers, AmountTier};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const CONFIG_ENV: &str = "DONATE_CONFIG";
pub const API_URL_ENV: &str = "DONATE_API_URL";

const DEFAULT_SIMULATED_DELAY_MS: u64 = 2000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Which commit boundary to hand donations to.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    #[default]
    Simulated,
    Http,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DonateConfig {
    pub schema_version: u32,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_tiers")]
    pub tiers: Vec<AmountTier>,
    #[serde(default)]
    pub gateway: GatewayKind,
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_simulated_delay_ms() -> u64 {
    DEFAULT_SIMULATED_DELAY_MS
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Default for DonateConfig {
    fn default() -> Self {
        default_config()
    }
}

impl DonateConfig {
    /// Build the gateway named by the config, or `kind` when given.
    pub fn build_gateway(&self, kind: Option<GatewayKind>) -> Box<dyn CommitGateway> {
        match kind.unwrap_or(self.gateway) {
            GatewayKind::Simulated => Box::new(SimulatedGateway::new(Duration::from_millis(
                self.simulated_delay_ms,
            ))),
            GatewayKind::Http => Box::new(HttpGateway::new(
                &self.api_base_url,
                Duration::from_secs(self.http_timeout_secs),
            )),
        }
    }

    /// Format an amount with the configured currency symbol.
    pub fn format_amount(&self, amount: u64) -> String {
        format!("{}{}", self.currency, group_thousands(amount))
    }
}

/// Config written by `donate init`.
pub fn default_config() -> DonateConfig {
    DonateConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        api_base_url: default_api_base_url(),
        currency: default_currency(),
        tiers: default_tiers(),
        gateway: GatewayKind::default(),
        simulated_delay_ms: DEFAULT_SIMULATED_DELAY_MS,
        http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
    }
}

/// Render a pretty JSON config stub.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&default_config()).context("serialize config stub")
}

/// Resolve the config path: explicit flag, then `$DONATE_CONFIG`, then the
/// per-user config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let dir = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("no config directory; pass --config or set {CONFIG_ENV}"))?;
    Ok(dir.join("donate").join("config.json"))
}

/// Load config from `path`, falling back to defaults when the file is absent.
///
/// `$DONATE_API_URL` overrides `api_base_url` either way.
pub fn load_config(path: &Path) -> Result<DonateConfig> {
    let mut config = if path.is_file() {
        let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_slice::<DonateConfig>(&bytes)
            .with_context(|| format!("parse config JSON {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "config missing; using defaults");
        default_config()
    };
    if let Some(url) = env::var(API_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
    {
        config.api_base_url = url.trim().to_string();
    }
    validate_config(&config)?;
    Ok(config)
}

/// Persist a config in stable pretty JSON.
pub fn write_config(path: &Path, config: &DonateConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &DonateConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    let url = config.api_base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(anyhow!(
            "api_base_url must start with http:// or https:// (got {url:?})"
        ));
    }
    if config.currency.trim().is_empty() {
        return Err(anyhow!("currency must be non-empty"));
    }
    if config.tiers.is_empty() {
        return Err(anyhow!("tiers must list at least one preset amount"));
    }
    let mut seen = BTreeSet::new();
    for tier in &config.tiers {
        if tier.amount == 0 {
            return Err(anyhow!("tier amounts must be greater than zero"));
        }
        if !seen.insert(tier.amount) {
            return Err(anyhow!("duplicate tier amount {}", tier.amount));
        }
    }
    Ok(())
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        validate_config(&default_config()).expect("default config is valid");
        let stub = config_stub().expect("stub");
        let parsed: DonateConfig = serde_json::from_str(&stub).expect("parse stub");
        assert_eq!(parsed, default_config());
    }

    #[test]
    fn sparse_config_fills_defaults() {
        let parsed: DonateConfig =
            serde_json::from_str(r#"{"schema_version":1,"gateway":"http"}"#).expect("parse");
        assert_eq!(parsed.gateway, GatewayKind::Http);
        assert_eq!(parsed.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(parsed.tiers, default_tiers());
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = default_config();
        config.schema_version = 9;
        assert!(validate_config(&config).is_err());

        let mut config = default_config();
        config.api_base_url = "localhost:5000".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = default_config();
        config.tiers.push(AmountTier::new(500, "again"));
        let err = validate_config(&config).expect_err("duplicate");
        assert!(err.to_string().contains("duplicate tier amount 500"));

        let mut config = default_config();
        config.tiers = vec![AmountTier::new(0, "nothing")];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn write_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");
        let mut config = default_config();
        config.currency = "$".to_string();
        write_config(&path, &config).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded.currency, "$");
    }

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/explicit.json");
        assert_eq!(
            resolve_config_path(Some(path)).expect("resolve"),
            path.to_path_buf()
        );
    }

    #[test]
    fn amounts_group_by_thousands() {
        let config = default_config();
        assert_eq!(config.format_amount(500), "₹500");
        assert_eq!(config.format_amount(10000), "₹10,000");
        assert_eq!(config.format_amount(1234567), "₹1,234,567");
    }
}
