//! CLI configuration loader for filemate
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./filemate.json or ./.filemate/config.json
//! 3. Git repository root: <repo_root>/.filemate/config.json
//! 4. User config dir: <config_dir>/filemate/config.json
//! 5. Environment variables only (no files)

use anyhow::{anyhow, Context, Result};
use filemate_core::error::ConfigError;
use filemate_core::{ApiKey, ModelParams, Protocol, ResolvedLlmConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default scoped root, relative to the working directory
pub const DEFAULT_ROOT_DIR: &str = "temp";

const CONFIG_FILE_NAME: &str = "filemate.json";
const CONFIG_DIR_NAME: &str = ".filemate";

/// Raw configuration file format. Every field is optional; missing values
/// fall back to environment variables and protocol defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// `groq` or `openai_compat`
    pub protocol: Option<String>,
    /// API key (can be "env:VAR_NAME" for environment variable)
    pub api_key: Option<String>,
    /// Base URL (optional, uses protocol default if not specified)
    pub base_url: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub params: ModelParams,
    /// Scoped root directory; `~` is expanded
    pub root_dir: Option<String>,
    pub max_steps: Option<usize>,
    pub turn_timeout_secs: Option<u64>,
    /// Replaces the agent's role description; the tool list is kept
    pub system_prompt: Option<String>,
}

/// Everything the commands need, before the credential gate has run
#[derive(Debug, Clone)]
pub struct CliSettings {
    pub protocol: Protocol,
    pub base_url: String,
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub params: ModelParams,
    pub root_dir: PathBuf,
    pub max_steps: Option<usize>,
    pub turn_timeout_secs: Option<u64>,
    pub system_prompt: Option<String>,
}

impl CliSettings {
    pub fn with_api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(ApiKey::is_present)
    }

    /// Build the LLM config; fails when no usable key has been provided
    pub fn resolve_llm(&self) -> Result<ResolvedLlmConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(ApiKey::is_present)
            .ok_or(ConfigError::MissingCredential)?;

        let resolved = ResolvedLlmConfig::new(
            self.protocol.clone(),
            self.base_url.clone(),
            api_key,
            self.model.clone(),
        )
        .with_params(self.params.clone());

        resolved
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(resolved)
    }
}

/// CLI configuration loader
#[derive(Default)]
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    protocol_override: Option<String>,
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
    root_override: Option<PathBuf>,
    max_steps_override: Option<usize>,
    turn_timeout_override: Option<u64>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set protocol override
    pub fn with_protocol_override(mut self, protocol: String) -> Self {
        self.protocol_override = Some(protocol);
        self
    }

    /// Set API key override
    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set model override
    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    /// Set scoped root override
    pub fn with_root_override(mut self, root: PathBuf) -> Self {
        self.root_override = Some(root);
        self
    }

    pub fn with_max_steps_override(mut self, max_steps: usize) -> Self {
        self.max_steps_override = Some(max_steps);
        self
    }

    pub fn with_turn_timeout_override(mut self, secs: u64) -> Self {
        self.turn_timeout_override = Some(secs);
        self
    }

    /// Load configuration and apply flag overrides
    pub async fn load(&self) -> Result<CliSettings> {
        let raw = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?.unwrap_or_default()
        };

        self.resolve(raw, |name| std::env::var(name).ok())
    }

    /// Merge file values, flag overrides and the environment
    pub(crate) fn resolve<F>(&self, raw: RawConfig, env: F) -> Result<CliSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let protocol_name = self
            .protocol_override
            .clone()
            .or(raw.protocol)
            .or_else(|| env("FILEMATE_PROTOCOL"));
        let protocol = match protocol_name {
            Some(name) => Protocol::parse(&name).ok_or_else(|| ConfigError::InvalidValue {
                field: "protocol".to_string(),
                value: name.clone(),
            })?,
            None => Protocol::default(),
        };

        let api_key = resolve_api_key(
            self.api_key_override.as_deref(),
            raw.api_key.as_deref(),
            &protocol,
            &env,
        );

        let base_url = self
            .base_url_override
            .clone()
            .or(raw.base_url)
            .or_else(|| env("FILEMATE_BASE_URL"))
            .unwrap_or_else(|| protocol.default_base_url().to_string());

        let model = self
            .model_override
            .clone()
            .or(raw.model)
            .or_else(|| env("FILEMATE_MODEL"))
            .unwrap_or_else(|| protocol.default_model().to_string());

        let root_dir = match (&self.root_override, raw.root_dir) {
            (Some(root), _) => root.clone(),
            (None, Some(root)) => PathBuf::from(shellexpand::tilde(&root).into_owned()),
            (None, None) => PathBuf::from(DEFAULT_ROOT_DIR),
        };

        Ok(CliSettings {
            protocol,
            base_url,
            api_key,
            model,
            params: raw.params,
            root_dir,
            max_steps: self.max_steps_override.or(raw.max_steps),
            turn_timeout_secs: self.turn_timeout_override.or(raw.turn_timeout_secs),
            system_prompt: raw.system_prompt.filter(|prompt| !prompt.trim().is_empty()),
        })
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<Option<RawConfig>> {
        if let Some(config) = self.try_load_cwd().await? {
            return Ok(Some(config));
        }

        if let Some(config) = self.try_load_git_root().await? {
            return Ok(Some(config));
        }

        if let Some(config) = self.try_load_user_config().await? {
            return Ok(Some(config));
        }

        tracing::debug!("No config file found, using environment variables only");
        Ok(None)
    }

    /// Try loading from current working directory
    async fn try_load_cwd(&self) -> Result<Option<RawConfig>> {
        let cwd = std::env::current_dir()?;

        let config_file = cwd.join(CONFIG_FILE_NAME);
        if config_file.exists() {
            return Ok(Some(self.load_file(&config_file).await?));
        }

        let dir_config = cwd.join(CONFIG_DIR_NAME).join("config.json");
        if dir_config.exists() {
            return Ok(Some(self.load_file(&dir_config).await?));
        }

        Ok(None)
    }

    /// Try loading from git repository root
    async fn try_load_git_root(&self) -> Result<Option<RawConfig>> {
        if let Some(git_root) = self.find_git_root()? {
            let config_path = git_root.join(CONFIG_DIR_NAME).join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Try loading from the platform config directory
    async fn try_load_user_config(&self) -> Result<Option<RawConfig>> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("filemate").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        tracing::debug!("Loading config file: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find git repository root
    fn find_git_root(&self) -> Result<Option<PathBuf>> {
        let mut current = std::env::current_dir()?;

        loop {
            if current.join(".git").exists() {
                return Ok(Some(current));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

/// Key priority: flag, config file (`env:VAR` allowed), provider env var
fn resolve_api_key<F>(
    flag: Option<&str>,
    file: Option<&str>,
    protocol: &Protocol,
    env: &F,
) -> Option<ApiKey>
where
    F: Fn(&str) -> Option<String>,
{
    let from_file = file.and_then(|value| match value.strip_prefix("env:") {
        Some(var_name) => {
            let resolved = env(var_name);
            if resolved.is_none() {
                tracing::warn!("Environment variable not found: {}", var_name);
            }
            resolved
        }
        None => Some(value.to_string()),
    });

    flag.map(str::to_string)
        .or(from_file)
        .or_else(|| env(protocol.api_key_env()))
        .map(ApiKey::new)
        .filter(ApiKey::is_present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = CliConfigLoader::new()
            .resolve(RawConfig::default(), env_of(&[]))
            .unwrap();

        assert_eq!(settings.protocol, Protocol::Groq);
        assert_eq!(settings.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(settings.model, "gemma2-9b-it");
        assert_eq!(settings.root_dir, PathBuf::from("temp"));
        assert!(settings.api_key.is_none());
        assert!(!settings.has_api_key());
        assert!(settings.resolve_llm().is_err());
    }

    #[test]
    fn test_missing_key_is_credential_error() {
        let settings = CliConfigLoader::new()
            .resolve(RawConfig::default(), env_of(&[]))
            .unwrap();
        let err = settings.resolve_llm().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingCredential)
        ));
    }

    #[test]
    fn test_env_key_for_protocol() {
        let settings = CliConfigLoader::new()
            .resolve(RawConfig::default(), env_of(&[("GROQ_API_KEY", "gsk_env")]))
            .unwrap();
        assert_eq!(settings.api_key.as_ref().unwrap().expose(), "gsk_env");

        let resolved = settings.resolve_llm().unwrap();
        assert_eq!(resolved.model, "gemma2-9b-it");
    }

    #[test]
    fn test_key_priority() {
        let raw = RawConfig {
            api_key: Some("env:MY_KEY".to_string()),
            ..Default::default()
        };
        let env = env_of(&[("MY_KEY", "from_file_env"), ("GROQ_API_KEY", "from_env")]);

        let settings = CliConfigLoader::new().resolve(raw.clone(), &env).unwrap();
        assert_eq!(settings.api_key.unwrap().expose(), "from_file_env");

        let settings = CliConfigLoader::new()
            .with_api_key_override("from_flag".to_string())
            .resolve(raw, &env)
            .unwrap();
        assert_eq!(settings.api_key.unwrap().expose(), "from_flag");
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let settings = CliConfigLoader::new()
            .with_api_key_override("   ".to_string())
            .resolve(RawConfig::default(), env_of(&[]))
            .unwrap();
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_file_values_and_overrides() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "protocol": "openai_compat",
                "api_key": "sk-file",
                "model": "gpt-4o",
                "root_dir": "workspace",
                "max_steps": 8,
                "turn_timeout_secs": 60,
                "params": {"temperature": 0.2}
            }"#,
        )
        .unwrap();

        let settings = CliConfigLoader::new()
            .with_model_override("gpt-4o-mini".to_string())
            .with_root_override(PathBuf::from("other"))
            .with_max_steps_override(3)
            .resolve(raw, env_of(&[]))
            .unwrap();

        assert_eq!(settings.protocol, Protocol::OpenAICompat);
        assert_eq!(settings.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.root_dir, PathBuf::from("other"));
        assert_eq!(settings.max_steps, Some(3));
        assert_eq!(settings.turn_timeout_secs, Some(60));
        assert_eq!(settings.params.temperature, Some(0.2));
    }

    #[test]
    fn test_unknown_protocol_rejected() {
        let err = CliConfigLoader::new()
            .with_protocol_override("carrier-pigeon".to_string())
            .resolve(RawConfig::default(), env_of(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("protocol"));
    }

    #[tokio::test]
    async fn test_load_from_config_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"api_key": "gsk_file", "root_dir": "~/files"}"#,
        )
        .unwrap();

        let settings = CliConfigLoader::new()
            .with_config_override(dir.path().to_path_buf())
            .load()
            .await
            .unwrap();

        assert_eq!(settings.api_key.unwrap().expose(), "gsk_file");
        assert!(!settings.root_dir.to_string_lossy().starts_with('~'));
        assert!(settings.root_dir.ends_with("files"));
    }

    #[tokio::test]
    async fn test_missing_override_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = CliConfigLoader::new()
            .with_config_override(dir.path().join("nope.json"))
            .load()
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_system_prompt_from_file() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"system_prompt": "You tidy up folders."}"#).unwrap();
        let settings = CliConfigLoader::new().resolve(raw, env_of(&[])).unwrap();
        assert_eq!(settings.system_prompt.as_deref(), Some("You tidy up folders."));

        let blank: RawConfig = serde_json::from_str(r#"{"system_prompt": "  "}"#).unwrap();
        let settings = CliConfigLoader::new().resolve(blank, env_of(&[])).unwrap();
        assert!(settings.system_prompt.is_none());
    }
}
