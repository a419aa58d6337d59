// ── Device domain types ──

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::EntityId;
use super::wire;

/// Power state reported for a device. New devices start switched off.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PowerStatus {
    #[serde(rename = "LIGADO")]
    #[strum(to_string = "LIGADO", serialize = "on")]
    On,
    #[default]
    #[serde(rename = "DESLIGADO")]
    #[strum(to_string = "DESLIGADO", serialize = "off")]
    Off,
}

impl PowerStatus {
    pub const ALL: [Self; 2] = [Self::On, Self::Off];

    pub fn label(self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// An energy-consuming device owned by a user.
///
/// `energy_consumption_kwh` and `owner_user_id` stay text so a form can
/// hold partial input; they serialize as JSON numbers whenever the text
/// is numeric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "nomeDispositivo", default)]
    pub name: String,
    #[serde(rename = "tipoDispositivo", default)]
    pub device_type: String,
    #[serde(rename = "localizacao", default)]
    pub location: String,
    #[serde(rename = "consumoEnergiaKwh", default, with = "wire::numeric_text")]
    pub energy_consumption_kwh: String,
    #[serde(default, deserialize_with = "status_or_off")]
    pub status: PowerStatus,
    #[serde(rename = "usuarioId", default, with = "wire::numeric_text")]
    pub owner_user_id: String,
}

fn status_or_off<'de, D: Deserializer<'de>>(d: D) -> Result<PowerStatus, D::Error> {
    Ok(wire::lenient_enum(d)?.unwrap_or_default())
}

/// Editable device fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceField {
    Name,
    DeviceType,
    Location,
    #[strum(to_string = "energy-consumption-kwh", serialize = "consumption")]
    EnergyConsumptionKwh,
    Status,
    #[strum(to_string = "owner-user-id", serialize = "user-id")]
    OwnerUserId,
}

impl DeviceField {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::DeviceType,
        Self::Location,
        Self::EnergyConsumptionKwh,
        Self::Status,
        Self::OwnerUserId,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::DeviceType => "Type",
            Self::Location => "Location",
            Self::EnergyConsumptionKwh => "Consumption (kWh)",
            Self::Status => "Status",
            Self::OwnerUserId => "User ID",
        }
    }
}
