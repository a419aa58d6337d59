//! Users tab.

use std::sync::Arc;

use ratatui::layout::Constraint;

use enerctl_core::{AccountType, ResourceState, User};

use super::resource::{ResourceScreen, ScreenResource};
use crate::action::Action;
use crate::screen::ScreenId;

pub type UsersScreen = ResourceScreen<User>;

impl ScreenResource for User {
    const SCREEN: ScreenId = ScreenId::Users;

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Account type"]
    }

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(6),
            Constraint::Min(16),
            Constraint::Min(24),
            Constraint::Length(14),
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.as_ref().map_or_else(|| "—".into(), ToString::to_string),
            self.name.clone(),
            self.email.clone(),
            self.account_type.map_or("—", AccountType::label).to_owned(),
        ]
    }

    fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            self.email.clone()
        } else {
            self.name.clone()
        }
    }

    fn state_from(action: &Action) -> Option<&Arc<ResourceState<Self>>> {
        match action {
            Action::UsersUpdated(state) => Some(state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_uses_labels_and_dashes_for_gaps() {
        let user = User {
            id: None,
            name: "Ana".into(),
            email: "ana@x.io".into(),
            account_type: Some(AccountType::Business),
        };
        assert_eq!(user.row(), vec!["—", "Ana", "ana@x.io", "Business"]);
        assert_eq!(User::default().row()[3], "—");
    }

    #[test]
    fn nameless_users_are_named_by_email() {
        let user = User {
            email: "x@y.z".into(),
            ..User::default()
        };
        assert_eq!(user.display_name(), "x@y.z");
    }
}
