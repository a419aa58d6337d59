//! Every UI state change flows through an [`Action`].

use std::fmt;
use std::sync::Arc;

use enerctl_core::{Device, EntityId, ResourceState, User};

use crate::screen::ScreenId;

/// A delete waiting for the operator's y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDelete {
    /// Screen that asked, and receives the answer.
    pub screen: ScreenId,
    pub id: EntityId,
    /// Lowercase singular noun ("user").
    pub noun: &'static str,
    /// What the operator sees the record as.
    pub name: String,
}

impl fmt::Display for ConfirmDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Delete {} '{}'?", self.noun, self.name)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Tick,
    Render,
    SwitchScreen(ScreenId),
    ToggleHelp,

    // Controller state, forwarded by the data bridge
    UsersUpdated(Arc<ResourceState<User>>),
    DevicesUpdated(Arc<ResourceState<Device>>),

    // Delete confirmation
    ShowConfirm(ConfirmDelete),
    ConfirmYes,
    ConfirmNo,
    DeleteConfirmed { screen: ScreenId, id: EntityId },

    /// Short-lived toast, for things the status banner does not cover.
    Notify(String),
}
