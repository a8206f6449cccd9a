//! Notifier configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skillcheck_core::traits::Notifier;

use crate::logging::{LogNotifier, NoopNotifier};
use crate::sms::SmsNotifier;

/// How notifications are delivered.
///
/// Note: Custom Debug impl masks the API key so it never reaches the logs.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotifierConfig {
    Sms {
        api_key: String,
        #[serde(default = "default_username")]
        username: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        sender_id: Option<String>,
    },
    #[default]
    Log,
    #[serde(rename = "none")]
    Disabled,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifierConfig::Sms {
                api_key: _,
                username,
                base_url,
                sender_id,
            } => f
                .debug_struct("Sms")
                .field("api_key", &"***")
                .field("username", username)
                .field("base_url", base_url)
                .field("sender_id", sender_id)
                .finish(),
            NotifierConfig::Log => f.write_str("Log"),
            NotifierConfig::Disabled => f.write_str("Disabled"),
        }
    }
}

fn default_username() -> String {
    "sandbox".to_string()
}

/// Top-level skillcheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillcheckConfig {
    #[serde(default)]
    pub notifier: NotifierConfig,
    /// Directory where submission records are written.
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,
    /// Recruiter phone that receives a copy of every result.
    #[serde(default)]
    pub recruiter_phone: Option<String>,
    /// Company named in invitation messages.
    #[serde(default = "default_company_name")]
    pub company_name: String,
    /// Base URL of the test-taking app; invitations link to `{app_url}/test/{code}`.
    #[serde(default = "default_app_url")]
    pub app_url: String,
}

fn default_records_dir() -> PathBuf {
    PathBuf::from("./skillcheck-results")
}

fn default_company_name() -> String {
    "Skill Check".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for SkillcheckConfig {
    fn default() -> Self {
        Self {
            notifier: NotifierConfig::default(),
            records_dir: default_records_dir(),
            recruiter_phone: None,
            company_name: default_company_name(),
            app_url: default_app_url(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + end]).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_notifier_config(config: &NotifierConfig) -> NotifierConfig {
    match config {
        NotifierConfig::Sms {
            api_key,
            username,
            base_url,
            sender_id,
        } => NotifierConfig::Sms {
            api_key: resolve_env_vars(api_key),
            username: resolve_env_vars(username),
            base_url: base_url.as_deref().map(resolve_env_vars),
            sender_id: sender_id.as_deref().map(resolve_env_vars),
        },
        other => other.clone(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `skillcheck.toml` in the current directory
/// 2. `~/.config/skillcheck/config.toml`
///
/// Environment variable overrides: `SKILLCHECK_SMS_API_KEY`, `SKILLCHECK_SMS_USERNAME`.
pub fn load_config() -> Result<SkillcheckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SkillcheckConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("skillcheck.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SkillcheckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkillcheckConfig::default(),
    };

    apply_env_overrides(
        &mut config,
        std::env::var("SKILLCHECK_SMS_API_KEY").ok(),
        std::env::var("SKILLCHECK_SMS_USERNAME").ok(),
    );

    config.notifier = resolve_notifier_config(&config.notifier);
    if let Some(phone) = &config.recruiter_phone {
        config.recruiter_phone = Some(resolve_env_vars(phone));
    }
    config.company_name = resolve_env_vars(&config.company_name);
    config.app_url = resolve_env_vars(&config.app_url);

    Ok(config)
}

/// An API key from the environment switches the notifier to SMS.
fn apply_env_overrides(
    config: &mut SkillcheckConfig,
    api_key: Option<String>,
    username: Option<String>,
) {
    if let Some(key) = api_key {
        if !matches!(config.notifier, NotifierConfig::Sms { .. }) {
            config.notifier = NotifierConfig::Sms {
                api_key: String::new(),
                username: default_username(),
                base_url: None,
                sender_id: None,
            };
        }
        if let NotifierConfig::Sms { api_key, .. } = &mut config.notifier {
            *api_key = key;
        }
    }

    if let (Some(name), NotifierConfig::Sms { username, .. }) = (username, &mut config.notifier) {
        *username = name;
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skillcheck"))
}

/// Create a notifier instance from its configuration.
pub fn create_notifier(config: &NotifierConfig) -> Result<Box<dyn Notifier>> {
    match config {
        NotifierConfig::Sms {
            api_key,
            username,
            base_url,
            sender_id,
        } => {
            anyhow::ensure!(!api_key.is_empty(), "sms notifier requires an api_key");
            let notifier =
                SmsNotifier::new(api_key, username, sender_id.clone(), base_url.clone())?;
            Ok(Box::new(notifier))
        }
        NotifierConfig::Log => Ok(Box::new(LogNotifier)),
        NotifierConfig::Disabled => Ok(Box::new(NoopNotifier)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_SKILLCHECK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_SKILLCHECK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_SKILLCHECK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_close_${VAR"), "no_close_${VAR");
        std::env::remove_var("_SKILLCHECK_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = SkillcheckConfig::default();
        assert!(matches!(config.notifier, NotifierConfig::Log));
        assert_eq!(config.records_dir, PathBuf::from("./skillcheck-results"));
        assert!(config.recruiter_phone.is_none());
        assert_eq!(config.company_name, "Skill Check");
        assert_eq!(config.app_url, "http://localhost:3000");
    }

    #[test]
    fn parse_sms_config() {
        let toml_str = r#"
records_dir = "./out"
recruiter_phone = "0700000000"
company_name = "Acme Ltd"
app_url = "https://assess.acme.example"

[notifier]
type = "sms"
api_key = "at-key"
sender_id = "SKILLCHK"
"#;
        let config: SkillcheckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.records_dir, PathBuf::from("./out"));
        assert_eq!(config.company_name, "Acme Ltd");
        assert_eq!(config.app_url, "https://assess.acme.example");
        match config.notifier {
            NotifierConfig::Sms {
                username,
                sender_id,
                ..
            } => {
                assert_eq!(username, "sandbox");
                assert_eq!(sender_id.as_deref(), Some("SKILLCHK"));
            }
            other => panic!("expected sms notifier, got {other:?}"),
        }
    }

    #[test]
    fn parse_disabled_notifier() {
        let config: SkillcheckConfig = toml::from_str("[notifier]\ntype = \"none\"\n").unwrap();
        assert!(matches!(config.notifier, NotifierConfig::Disabled));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = NotifierConfig::Sms {
            api_key: "super-secret".into(),
            username: "acme".into(),
            base_url: None,
            sender_id: None,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn env_key_switches_to_sms() {
        let mut config = SkillcheckConfig::default();
        apply_env_overrides(&mut config, Some("env-key".into()), Some("acme".into()));
        match config.notifier {
            NotifierConfig::Sms {
                api_key, username, ..
            } => {
                assert_eq!(api_key, "env-key");
                assert_eq!(username, "acme");
            }
            other => panic!("expected sms notifier, got {other:?}"),
        }
    }

    #[test]
    fn username_override_alone_leaves_log_notifier() {
        let mut config = SkillcheckConfig::default();
        apply_env_overrides(&mut config, None, Some("acme".into()));
        assert!(matches!(config.notifier, NotifierConfig::Log));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "records_dir = \"/tmp/records\"\n[notifier]\ntype = \"log\"\n")
            .unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.records_dir, PathBuf::from("/tmp/records"));
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/skillcheck.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn create_each_notifier() {
        assert_eq!(create_notifier(&NotifierConfig::Log).unwrap().name(), "log");
        assert_eq!(
            create_notifier(&NotifierConfig::Disabled).unwrap().name(),
            "none"
        );
        let sms = NotifierConfig::Sms {
            api_key: "k".into(),
            username: "sandbox".into(),
            base_url: None,
            sender_id: None,
        };
        assert_eq!(create_notifier(&sms).unwrap().name(), "sms");
    }

    #[test]
    fn sms_without_key_is_rejected() {
        let sms = NotifierConfig::Sms {
            api_key: String::new(),
            username: "sandbox".into(),
            base_url: None,
            sender_id: None,
        };
        assert!(create_notifier(&sms).is_err());
    }
}
