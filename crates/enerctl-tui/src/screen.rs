//! Screen identifiers and tab order.

use std::fmt;

/// The top-level screens, in tab-bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Users,
    Devices,
    Reports,
}

impl ScreenId {
    pub const ALL: [ScreenId; 3] = [Self::Users, Self::Devices, Self::Reports];

    /// Number key that jumps to this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Users => 1,
            Self::Devices => 2,
            Self::Reports => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Devices => "Devices",
            Self::Reports => "Reports",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_wraps_both_ways() {
        assert_eq!(ScreenId::Reports.next(), ScreenId::Users);
        assert_eq!(ScreenId::Users.prev(), ScreenId::Reports);
        assert_eq!(ScreenId::Users.next(), ScreenId::Devices);
    }

    #[test]
    fn number_keys_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(4), None);
    }
}
