//! Device command handlers.

use enerctl_core::{Console, Device, DeviceField};
use tabled::Tabled;

use crate::cli::{DeviceFieldArgs, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;

use super::crud::{self, View};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "kWh")]
    consumption: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "User")]
    user: String,
}

impl DeviceRow {
    fn new(d: &Device) -> Self {
        Self {
            id: d.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            name: d.name.clone(),
            dtype: d.device_type.clone(),
            location: d.location.clone(),
            consumption: d.energy_consumption_kwh.clone(),
            status: d.status.label().into(),
            user: d.owner_user_id.clone(),
        }
    }
}

fn detail(d: &Device) -> String {
    [
        format!(
            "ID:          {}",
            d.id.as_ref().map_or_else(|| "-".into(), ToString::to_string)
        ),
        format!("Name:        {}", d.name),
        format!("Type:        {}", d.device_type),
        format!("Location:    {}", d.location),
        format!("Consumption: {} kWh", d.energy_consumption_kwh),
        format!("Status:      {}", d.status.label()),
        format!("User ID:     {}", d.owner_user_id),
    ]
    .join("\n")
}

const VIEW: View<Device, DeviceRow> = View {
    row: DeviceRow::new,
    detail,
};

fn field_values(fields: DeviceFieldArgs) -> Vec<(DeviceField, Option<String>)> {
    vec![
        (DeviceField::Name, fields.name),
        (DeviceField::DeviceType, fields.device_type),
        (DeviceField::Location, fields.location),
        (DeviceField::EnergyConsumptionKwh, fields.consumption),
        (DeviceField::Status, fields.status),
        (DeviceField::OwnerUserId, fields.user_id),
    ]
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ctrl = console.devices();
    let config = console.config();

    match args.command {
        DevicesCommand::List => crud::list(ctrl, config, &VIEW, global).await,
        DevicesCommand::Get { id } => crud::get(ctrl, config, &VIEW, &id, global).await,
        DevicesCommand::Create { fields, from_file } => {
            crud::create(ctrl, config, field_values(fields), from_file.as_deref(), global).await
        }
        DevicesCommand::Update { id, fields } => {
            crud::update(ctrl, config, &id, field_values(fields), global).await
        }
        DevicesCommand::Delete { id } => crud::delete(ctrl, config, &id, global).await,
    }
}
