//! CLI configuration: thin wrapper around `enerctl_config` shared types.
//!
//! Re-exports the shared types and layers `GlobalOpts` overrides
//! (--api-url, --insecure, --timeout) on top of the resolved profile.

use enerctl_core::{ConsoleConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use enerctl_config::{
    Config, DEFAULT_PROFILE, Profile, config_path, load_config, profile_to_console_config,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// Build a `ConsoleConfig` from the config file, profile, and CLI overrides.
///
/// Flag precedence: `--api-url` > profile `api_url`; `--insecure` forces
/// accept-invalid TLS; `--timeout` > profile > `[defaults]`.
pub fn resolve_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let cfg = load_config()?;
    let (profile_name, mut profile) = match cfg.resolve_profile(global.profile.as_deref()) {
        Ok(found) => found,
        Err(enerctl_config::ConfigError::UnknownProfile { name }) => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(&cfg),
            });
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(profile = %profile_name, "resolved profile");

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let mut console = profile_to_console_config(&profile, cfg.defaults.timeout)?;
    if global.insecure {
        console.tls = TlsVerification::DangerAcceptInvalid;
    }
    if console.timeout.is_zero() {
        return Err(CliError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(console)
}

/// Comma-separated profile names, or "(none)".
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
