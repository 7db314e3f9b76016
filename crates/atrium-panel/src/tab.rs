//! Dashboard tabs
//!
//! Each tab names a content mode the panel can display. Exactly one is
//! active at a time; switching tabs is what drives the panel's reload cycle.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabKind {
    /// The friends list view
    Friends,
    /// Users currently online
    CurrentlyOnline,
}

impl TabKind {
    /// Every tab the dashboard offers, in display order.
    pub const ALL: [TabKind; 2] = [TabKind::Friends, TabKind::CurrentlyOnline];

    pub fn as_str(&self) -> &'static str {
        match self {
            TabKind::Friends => "friends",
            TabKind::CurrentlyOnline => "currently_online",
        }
    }
}

impl Default for TabKind {
    fn default() -> Self {
        TabKind::Friends
    }
}

impl std::fmt::Display for TabKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "friends" => Ok(TabKind::Friends),
            "currently_online" => Ok(TabKind::CurrentlyOnline),
            _ => Err(format!("Unknown tab: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_str() {
        for tab in TabKind::ALL {
            assert_eq!(tab.as_str().parse::<TabKind>().unwrap(), tab);
        }
    }

    #[test]
    fn test_unknown_tab_rejected() {
        assert!("news".parse::<TabKind>().is_err());
    }

    #[test]
    fn test_default_is_first_tab() {
        assert_eq!(TabKind::default(), TabKind::ALL[0]);
    }
}
