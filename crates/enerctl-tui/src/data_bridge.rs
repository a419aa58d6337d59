//! Data bridge: forwards controller state into the TUI action loop.
//!
//! Runs as a background task. Each controller publishes its state on a
//! `watch` channel; every change becomes an [`Action`] so screens only
//! ever learn about data through the action queue.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use enerctl_core::Console;

use crate::action::Action;

/// Push the current snapshots, start the first load, then forward every
/// state change until `cancel` fires. Shuts the console down on exit so
/// late responses are dropped.
pub async fn spawn_data_bridge(
    console: Console,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut users = console.users().subscribe();
    let mut devices = console.devices().subscribe();

    let _ = action_tx.send(Action::UsersUpdated(users.borrow_and_update().clone()));
    let _ = action_tx.send(Action::DevicesUpdated(devices.borrow_and_update().clone()));

    // The initial load runs beside the forwarding loop so its loading
    // flag reaches the screens.
    let loader = console.clone();
    tokio::spawn(async move {
        let (users, devices) = loader.activate().await;
        debug!(?users, ?devices, "initial load finished");
    });

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = users.changed() => {
                let state = users.borrow_and_update().clone();
                let _ = action_tx.send(Action::UsersUpdated(state));
            }
            Ok(()) = devices.changed() => {
                let state = devices.borrow_and_update().clone();
                let _ = action_tx.send(Action::DevicesUpdated(state));
            }
            else => break,
        }
    }

    console.shutdown();
    debug!("data bridge shut down");
}
