// ── Resource abstraction ──
//
// Everything the generic controller needs to know about an entity type:
// where its collection lives, how list responses embed it, which fields
// the editor exposes, and which of those must be filled before submit.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CoreError;
use crate::model::{AccountType, Device, DeviceField, EntityId, PowerStatus, User, UserField};

/// An entity type managed through a REST collection.
pub trait Resource:
    Clone + Default + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Editable fields, addressable by kebab-case name.
    type Field: Copy + Eq + Hash + fmt::Display + fmt::Debug + FromStr + Send + Sync + 'static;

    /// Collection path, relative to the backend base URL.
    const COLLECTION: &'static str;
    /// Key under `_embedded` (or at the top level) holding the list.
    const EMBEDDED_KEY: &'static str;
    /// Lowercase singular noun for status messages ("user").
    const SINGULAR: &'static str;
    /// Capitalized singular noun ("User").
    const TITLE: &'static str;
    /// Lowercase plural noun ("users").
    const PLURAL: &'static str;

    /// Every editable field, in form order.
    fn fields() -> &'static [Self::Field];

    /// Fields that must be non-blank before a submit is sent.
    fn required_fields() -> &'static [Self::Field];

    /// Operator-facing label for a field.
    fn field_label(field: Self::Field) -> &'static str;

    /// Accepted values for an enumerated field, in display order. Empty
    /// for free-text fields.
    fn field_choices(_field: Self::Field) -> &'static [&'static str] {
        &[]
    }

    fn id(&self) -> Option<&EntityId>;

    /// Current value of `field` as form text.
    fn field_value(&self, field: Self::Field) -> String;

    /// Overwrite one field from form text. Fails only for enumerated
    /// fields given a value outside their set.
    fn set_field(&mut self, field: Self::Field, value: &str) -> Result<(), CoreError>;

    /// Required fields that are still blank.
    fn missing_fields(&self) -> Vec<Self::Field> {
        Self::required_fields()
            .iter()
            .copied()
            .filter(|f| self.field_value(*f).trim().is_empty())
            .collect()
    }
}

fn invalid_choice(field: impl fmt::Display, value: &str, allowed: &[&str]) -> CoreError {
    CoreError::ValidationFailed {
        message: format!(
            "'{value}' is not a valid {field} (expected one of: {})",
            allowed.join(", ")
        ),
    }
}

// ── User ────────────────────────────────────────────────────────────

impl Resource for User {
    type Field = UserField;

    const COLLECTION: &'static str = "usuarios";
    const EMBEDDED_KEY: &'static str = "usuarioList";
    const SINGULAR: &'static str = "user";
    const TITLE: &'static str = "User";
    const PLURAL: &'static str = "users";

    fn fields() -> &'static [UserField] {
        &UserField::ALL
    }

    fn required_fields() -> &'static [UserField] {
        &UserField::ALL
    }

    fn field_label(field: UserField) -> &'static str {
        field.label()
    }

    fn field_choices(field: UserField) -> &'static [&'static str] {
        match field {
            UserField::AccountType => &["RESIDENCIAL", "EMPRESARIAL"],
            UserField::Name | UserField::Email => &[],
        }
    }

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn field_value(&self, field: UserField) -> String {
        match field {
            UserField::Name => self.name.clone(),
            UserField::Email => self.email.clone(),
            UserField::AccountType => self
                .account_type
                .map(|t| t.to_string())
                .unwrap_or_default(),
        }
    }

    fn set_field(&mut self, field: UserField, value: &str) -> Result<(), CoreError> {
        match field {
            UserField::Name => value.clone_into(&mut self.name),
            UserField::Email => value.clone_into(&mut self.email),
            UserField::AccountType => {
                let value = value.trim();
                self.account_type = if value.is_empty() {
                    None
                } else {
                    Some(value.parse::<AccountType>().map_err(|_| {
                        invalid_choice(field, value, Self::field_choices(field))
                    })?)
                };
            }
        }
        Ok(())
    }
}

// ── Device ──────────────────────────────────────────────────────────

const DEVICE_REQUIRED: [DeviceField; 5] = [
    DeviceField::Name,
    DeviceField::DeviceType,
    DeviceField::Location,
    DeviceField::EnergyConsumptionKwh,
    DeviceField::OwnerUserId,
];

impl Resource for Device {
    type Field = DeviceField;

    const COLLECTION: &'static str = "dispositivos";
    const EMBEDDED_KEY: &'static str = "dispositivoList";
    const SINGULAR: &'static str = "device";
    const TITLE: &'static str = "Device";
    const PLURAL: &'static str = "devices";

    fn fields() -> &'static [DeviceField] {
        &DeviceField::ALL
    }

    fn required_fields() -> &'static [DeviceField] {
        &DEVICE_REQUIRED
    }

    fn field_label(field: DeviceField) -> &'static str {
        field.label()
    }

    fn field_choices(field: DeviceField) -> &'static [&'static str] {
        match field {
            DeviceField::Status => &["LIGADO", "DESLIGADO"],
            _ => &[],
        }
    }

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn field_value(&self, field: DeviceField) -> String {
        match field {
            DeviceField::Name => self.name.clone(),
            DeviceField::DeviceType => self.device_type.clone(),
            DeviceField::Location => self.location.clone(),
            DeviceField::EnergyConsumptionKwh => self.energy_consumption_kwh.clone(),
            DeviceField::Status => self.status.to_string(),
            DeviceField::OwnerUserId => self.owner_user_id.clone(),
        }
    }

    fn set_field(&mut self, field: DeviceField, value: &str) -> Result<(), CoreError> {
        match field {
            DeviceField::Name => value.clone_into(&mut self.name),
            DeviceField::DeviceType => value.clone_into(&mut self.device_type),
            DeviceField::Location => value.clone_into(&mut self.location),
            DeviceField::EnergyConsumptionKwh => {
                value.clone_into(&mut self.energy_consumption_kwh);
            }
            DeviceField::OwnerUserId => value.clone_into(&mut self.owner_user_id),
            DeviceField::Status => {
                let value = value.trim();
                self.status = value
                    .parse::<PowerStatus>()
                    .map_err(|_| invalid_choice(field, value, Self::field_choices(field)))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_user_is_missing_every_field() {
        assert_eq!(User::default().missing_fields(), UserField::ALL.to_vec());
    }

    #[test]
    fn whitespace_counts_as_blank() {
        let mut user = User::default();
        user.set_field(UserField::Name, "   ").unwrap();
        user.set_field(UserField::Email, "a@b.c").unwrap();
        user.set_field(UserField::AccountType, "residential").unwrap();
        assert_eq!(user.missing_fields(), vec![UserField::Name]);
    }

    #[test]
    fn device_status_is_never_required() {
        let mut device = Device::default();
        for (field, value) in [
            (DeviceField::Name, "TV"),
            (DeviceField::DeviceType, "Eletrônico"),
            (DeviceField::Location, "Sala"),
            (DeviceField::EnergyConsumptionKwh, "120"),
            (DeviceField::OwnerUserId, "1"),
        ] {
            device.set_field(field, value).unwrap();
        }
        assert!(device.missing_fields().is_empty());
        assert_eq!(device.status, PowerStatus::Off);
    }

    #[test]
    fn enumerated_fields_reject_unknown_values() {
        let mut device = Device::default();
        let err = device.set_field(DeviceField::Status, "BLINKING").unwrap_err();
        assert!(err.to_string().contains("LIGADO, DESLIGADO"));

        device.set_field(DeviceField::Status, "on").unwrap();
        assert_eq!(device.field_value(DeviceField::Status), "LIGADO");

        let mut user = User::default();
        assert!(user.set_field(UserField::AccountType, "gov").is_err());
        user.set_field(UserField::AccountType, "").unwrap();
        assert_eq!(user.account_type, None);
    }

    #[test]
    fn every_listed_choice_is_accepted() {
        let mut user = User::default();
        for choice in User::field_choices(UserField::AccountType) {
            user.set_field(UserField::AccountType, choice).unwrap();
            assert_eq!(user.field_value(UserField::AccountType), *choice);
        }
        let mut device = Device::default();
        for choice in Device::field_choices(DeviceField::Status) {
            device.set_field(DeviceField::Status, choice).unwrap();
            assert_eq!(device.field_value(DeviceField::Status), *choice);
        }
        assert!(User::field_choices(UserField::Email).is_empty());
    }
}
