//! API key gate run before any interaction

use crate::chat::is_interactive;
use crate::config::CliSettings;
use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Password};
use filemate_core::ApiKey;

/// Shown when no key is available
pub const MISSING_KEY_WARNING: &str = "Please enter your API Key to continue.";

/// Outcome of the credential gate
pub enum Gate {
    Open(CliSettings),
    Closed,
}

/// Make sure a key is present, prompting for one when a person is at the
/// terminal.
///
/// The only local check is presence: the backend decides whether the key is
/// actually valid.
pub fn ensure_api_key(settings: CliSettings) -> Result<Gate> {
    gate(settings, is_interactive())
}

fn gate(settings: CliSettings, interactive: bool) -> Result<Gate> {
    if settings.has_api_key() {
        return Ok(Gate::Open(settings));
    }

    if !interactive {
        tracing::debug!("No API key and no terminal to prompt on");
        return Ok(Gate::Closed);
    }

    let provider = settings.protocol.as_str().to_uppercase();
    let entered = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Enter {} API Key", provider))
        .allow_empty_password(true)
        .interact()?;
    let help = format!("Get a key at {}", settings.protocol.key_help_url());
    println!("{}", help.dimmed());

    let key = ApiKey::new(entered.trim());
    if key.is_present() {
        Ok(Gate::Open(settings.with_api_key(key)))
    } else {
        Ok(Gate::Closed)
    }
}

/// Print the warning for a closed gate
pub fn print_missing_key_warning() {
    eprintln!("{} {}", "⚠️".yellow(), MISSING_KEY_WARNING.yellow());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliConfigLoader, RawConfig};

    fn settings(key: Option<&str>) -> CliSettings {
        let raw = RawConfig {
            api_key: key.map(str::to_string),
            ..Default::default()
        };
        CliConfigLoader::new().resolve(raw, |_| None).unwrap()
    }

    #[test]
    fn test_gate_opens_with_key() {
        let gate = gate(settings(Some("gsk_test")), false).unwrap();
        assert!(matches!(gate, Gate::Open(s) if s.has_api_key()));
    }

    #[test]
    fn test_gate_closes_without_prompt_when_not_interactive() {
        let gate = gate(settings(None), false).unwrap();
        assert!(matches!(gate, Gate::Closed));
    }
}
