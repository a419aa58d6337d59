//! Screen implementations. Each screen is a top-level Component.

pub mod devices;
pub mod reports;
pub mod resource;
pub mod users;

use enerctl_core::Console;

use crate::component::Component;
use crate::screen::ScreenId;

/// One component per tab, wired to the console's controllers.
pub fn create_screens(console: &Console) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Users,
            Box::new(users::UsersScreen::new(console.users().clone())),
        ),
        (
            ScreenId::Devices,
            Box::new(devices::DevicesScreen::new(console.devices().clone())),
        ),
        (
            ScreenId::Reports,
            Box::new(reports::ReportsScreen::new(console.report())),
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::component::Component;

    /// Render `component` full-frame and return the buffer as text, one
    /// line per row.
    pub fn render_to_string(component: &dyn Component, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| component.render(frame, frame.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }
}
