// ── User domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::EntityId;
use super::wire;

/// Account classification. Wire values are the backend's own
/// (`RESIDENCIAL`, `EMPRESARIAL`); the English names parse too.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum AccountType {
    #[serde(rename = "RESIDENCIAL")]
    #[strum(to_string = "RESIDENCIAL", serialize = "residential")]
    Residential,
    #[serde(rename = "EMPRESARIAL")]
    #[strum(to_string = "EMPRESARIAL", serialize = "business")]
    Business,
}

impl AccountType {
    pub const ALL: [Self; 2] = [Self::Residential, Self::Business];

    /// Operator-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Business => "Business",
        }
    }
}

/// A registered account holder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(
        rename = "tipoConta",
        default,
        deserialize_with = "wire::lenient_enum"
    )]
    pub account_type: Option<AccountType>,
}

/// Editable user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum UserField {
    Name,
    Email,
    AccountType,
}

impl UserField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::AccountType];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::AccountType => "Account type",
        }
    }
}
