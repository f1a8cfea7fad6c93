//! Persisted connection settings.
//!
//! The settings collaborator owns the validation duty the core pushes out:
//! URLs must be absolute http(s), the user id must parse as an integer, and
//! keys and database must be non-empty. Only a validated `Settings` can
//! produce the `ClientInfo` that configures a client.

use std::fs;
use std::path::Path;

use odx_client::{ClientInfo, ExecutionContext, InstanceInfo, is_absolute_http_url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.odxproxy.io/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Settings {
    pub url: String,
    /// Kept as entered; must parse as an integer to validate.
    pub user_id: String,
    pub db: String,
    pub api_key: String,
    pub proxy_api_key: String,
    pub gateway_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub selected_companies: Vec<i64>,
    #[serde(default = "default_tz")]
    pub tz: String,
}

fn default_tz() -> String {
    "UTC".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: String::new(),
            user_id: String::new(),
            db: String::new(),
            api_key: String::new(),
            proxy_api_key: String::new(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            selected_companies: Vec::new(),
            tz: default_tz(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("user id must be an integer, got {0:?}")]
    InvalidUserId(String),
    #[error("{0} must be an absolute http(s) URL")]
    InvalidUrl(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("failed to read or write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Validate, then persist as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.parsed_user_id()?;
        if !is_absolute_http_url(&self.url) {
            return Err(SettingsError::InvalidUrl("instance url"));
        }
        if !is_absolute_http_url(&self.gateway_url) {
            return Err(SettingsError::InvalidUrl("gateway url"));
        }
        if self.db.is_empty() {
            return Err(SettingsError::Empty("database"));
        }
        if self.api_key.is_empty() {
            return Err(SettingsError::Empty("api key"));
        }
        if self.proxy_api_key.is_empty() {
            return Err(SettingsError::Empty("proxy api key"));
        }
        Ok(())
    }

    /// The validated configuration payload for `ProxyClient::configure`.
    pub fn client_info(&self) -> Result<ClientInfo, SettingsError> {
        self.validate()?;
        Ok(ClientInfo {
            instance: InstanceInfo {
                url: self.url.clone(),
                user_id: self.parsed_user_id()?,
                db: self.db.clone(),
                api_key: self.api_key.clone(),
            },
            proxy_api_key: self.proxy_api_key.clone(),
            gateway_url: self.gateway_url.clone(),
        })
    }

    /// Per-call execution context from the selected companies. The first
    /// selected company is the default; with none selected this degrades to
    /// the builder default (no companies, backend decides visibility).
    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext {
            allowed_company_ids: self.selected_companies.clone(),
            default_company_id: self.selected_companies.first().copied().unwrap_or(0),
            tz: self.tz.clone(),
        }
    }

    fn parsed_user_id(&self) -> Result<i64, SettingsError> {
        self.user_id
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidUserId(self.user_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Settings {
        Settings {
            url: "https://erp.example.com".to_string(),
            user_id: "7".to_string(),
            db: "warehouse".to_string(),
            api_key: "odoo-key".to_string(),
            proxy_api_key: "proxy-key".to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_secs: 60,
            selected_companies: vec![3, 1],
            tz: "Asia/Jakarta".to_string(),
        }
    }

    #[test]
    fn valid_settings_produce_client_info() {
        let info = valid().client_info().unwrap();
        assert_eq!(info.instance.user_id, 7);
        assert_eq!(info.instance.db, "warehouse");
        assert_eq!(info.gateway_url, DEFAULT_GATEWAY_URL);
    }

    #[test]
    fn non_integer_user_id_is_rejected() {
        let mut settings = valid();
        settings.user_id = "seven".to_string();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidUserId(_))
        ));
    }

    #[test]
    fn relative_url_is_rejected() {
        let mut settings = valid();
        settings.url = "erp.example.com".to_string();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidUrl("instance url"))
        ));
    }

    #[test]
    fn empty_keys_are_rejected() {
        let mut settings = valid();
        settings.proxy_api_key = String::new();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Empty("proxy api key"))
        ));
    }

    #[test]
    fn execution_context_uses_first_selected_company() {
        let context = valid().execution_context();
        assert_eq!(context.allowed_company_ids, vec![3, 1]);
        assert_eq!(context.default_company_id, 3);
        assert_eq!(context.tz, "Asia/Jakarta");

        let mut settings = valid();
        settings.selected_companies.clear();
        assert_eq!(settings.execution_context().default_company_id, 0);
    }

    #[test]
    fn save_validates_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut broken = valid();
        broken.db = String::new();
        assert!(broken.save(&path).is_err());
        assert!(!path.exists());

        valid().save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, valid());
    }
}
