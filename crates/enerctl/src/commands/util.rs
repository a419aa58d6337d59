//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use enerctl_core::{
    ConsoleConfig, EntityId, ErrorKind, Outcome, Resource, ResourceController,
};

use crate::error::CliError;

/// Turn a controller outcome into a CLI result. The controller has
/// already put the operator-facing text on its status line; this picks
/// the error class (and so the exit code) from the recorded cause.
pub fn check<T: Resource>(
    ctrl: &ResourceController<T>,
    outcome: Outcome,
    config: &ConsoleConfig,
    identifier: Option<&str>,
) -> Result<(), CliError> {
    let status = ctrl.snapshot().status.clone();
    let text = status
        .as_ref()
        .map_or_else(|| "request failed".to_owned(), |s| s.text.clone());
    let cause = status.and_then(|s| s.cause);

    match outcome {
        Outcome::Done => Ok(()),
        Outcome::Invalid => Err(CliError::Validation {
            field: T::SINGULAR.into(),
            reason: text,
        }),
        Outcome::Busy => Err(CliError::ApiError {
            message: format!("another {} request is still in flight", T::SINGULAR),
        }),
        Outcome::Cancelled => Err(CliError::Cancelled),
        Outcome::Failed => Err(match cause {
            Some(ErrorKind::Connection) => CliError::ConnectionFailed {
                url: config.base_url.to_string(),
                reason: text,
            },
            Some(ErrorKind::Timeout) => CliError::Timeout {
                seconds: config.timeout.as_secs(),
            },
            Some(ErrorKind::NotFound) => not_found::<T>(identifier.unwrap_or("-")),
            _ => CliError::ApiError { message: text },
        }),
    }
}

pub fn not_found<T: Resource>(identifier: &str) -> CliError {
    CliError::NotFound {
        resource_type: T::SINGULAR.into(),
        identifier: identifier.into(),
        list_command: format!("{} list", T::PLURAL),
    }
}

/// Load the collection and look one record up by id.
pub async fn fetch_one<T: Resource>(
    ctrl: &ResourceController<T>,
    config: &ConsoleConfig,
    identifier: &str,
) -> Result<T, CliError> {
    let outcome = ctrl.refresh().await;
    check(ctrl, outcome, config, Some(identifier))?;
    ctrl.find(&EntityId::from(identifier))
        .ok_or_else(|| not_found::<T>(identifier))
}

/// Apply `(field, value)` pairs to the open draft, skipping `None`.
pub fn apply_fields<T: Resource>(
    ctrl: &ResourceController<T>,
    fields: Vec<(T::Field, Option<String>)>,
) -> Result<(), CliError> {
    for (field, value) in fields {
        let Some(value) = value else { continue };
        ctrl.update_draft_field(field, &value)
            .map_err(|e| CliError::Validation {
                field: field.to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

/// Seed the open draft from a JSON record on disk.
pub fn seed_from_file<T: Resource>(
    ctrl: &ResourceController<T>,
    path: &Path,
) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(path)?;
    let record: T = serde_json::from_str(&contents)?;
    for field in T::fields() {
        ctrl.update_draft_field(*field, &record.field_value(*field))
            .map_err(|e| CliError::Validation {
                field: field.to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use enerctl_core::{AccountType, Console, DEFAULT_API_URL, UserField};

    use super::*;

    fn console() -> Console {
        let url = url::Url::parse(DEFAULT_API_URL).unwrap();
        Console::new(ConsoleConfig::new(url)).unwrap()
    }

    #[test]
    fn apply_fields_sets_given_values_only() {
        let console = console();
        let users = console.users();
        users.open_create_editor();
        users.update_draft_field(UserField::Email, "kept@example.com").unwrap();

        apply_fields(
            users,
            vec![
                (UserField::Name, Some("Ana".into())),
                (UserField::Email, None),
                (UserField::AccountType, Some("business".into())),
            ],
        )
        .unwrap();

        let draft = users.snapshot().draft.clone();
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.email, "kept@example.com");
        assert_eq!(draft.account_type, Some(AccountType::Business));
    }

    #[test]
    fn apply_fields_rejects_values_outside_a_choice_set() {
        let console = console();
        let users = console.users();
        users.open_create_editor();

        let err = apply_fields(users, vec![(UserField::AccountType, Some("gold".into()))])
            .unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "account-type"));
    }
}
