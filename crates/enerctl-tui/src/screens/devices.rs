//! Devices tab.

use std::sync::Arc;

use ratatui::layout::Constraint;

use enerctl_core::{Device, ResourceState};

use super::resource::{ResourceScreen, ScreenResource};
use crate::action::Action;
use crate::screen::ScreenId;

pub type DevicesScreen = ResourceScreen<Device>;

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "—".into()
    } else {
        value.to_owned()
    }
}

impl ScreenResource for Device {
    const SCREEN: ScreenId = ScreenId::Devices;

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Type", "Location", "kWh", "Status", "User"]
    }

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(6),
            Constraint::Min(16),
            Constraint::Min(12),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(6),
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.as_ref().map_or_else(|| "—".into(), ToString::to_string),
            self.name.clone(),
            or_dash(&self.device_type),
            or_dash(&self.location),
            or_dash(&self.energy_consumption_kwh),
            self.status.label().to_owned(),
            or_dash(&self.owner_user_id),
        ]
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn state_from(action: &Action) -> Option<&Arc<ResourceState<Self>>> {
        match action {
            Action::DevicesUpdated(state) => Some(state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use enerctl_core::{EntityId, PowerStatus};

    use super::*;

    #[test]
    fn row_shows_status_label_and_owner() {
        let device = Device {
            id: Some(EntityId::Numeric(3)),
            name: "TV".into(),
            device_type: "Eletrônico".into(),
            location: String::new(),
            energy_consumption_kwh: "120.5".into(),
            status: PowerStatus::On,
            owner_user_id: "1".into(),
        };
        assert_eq!(
            device.row(),
            vec!["3", "TV", "Eletrônico", "—", "120.5", "On", "1"]
        );
    }
}
