//! Monitor placement preference for the switcher window.

use crate::config::DisplayBehaviour;

/// Which monitor the switcher window appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPlacement {
    #[default]
    FollowCursor,
    PrimaryScreen,
    /// Zero-based screen index
    Screen(usize),
}

impl DisplayPlacement {
    pub fn behaviour(&self) -> DisplayBehaviour {
        match self {
            Self::FollowCursor => DisplayBehaviour::FollowCursor,
            Self::PrimaryScreen => DisplayBehaviour::PrimaryScreen,
            Self::Screen(_) => DisplayBehaviour::CustomScreen,
        }
    }

    /// Checks the placement against the screens attached right now.
    /// A screen that is gone falls back to following the cursor.
    pub fn resolve(self, screen_count: usize) -> Self {
        match self {
            Self::Screen(index) if index >= screen_count => {
                tracing::debug!(index, screen_count, "saved screen not attached, following cursor");
                Self::FollowCursor
            }
            other => other,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::FollowCursor => "Follow cursor".to_string(),
            Self::PrimaryScreen => "Always on primary screen".to_string(),
            Self::Screen(index) => format!("Always on screen {}", index + 1),
        }
    }
}

/// One entry of the placement dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOption {
    pub label: String,
    pub placement: DisplayPlacement,
}

impl PlacementOption {
    fn new(placement: DisplayPlacement) -> Self {
        Self { label: placement.label(), placement }
    }
}

/// Dropdown entries. Per-screen entries are only offered when more than one
/// screen is attached.
pub fn placement_options(screen_count: usize) -> Vec<PlacementOption> {
    let mut options = vec![
        PlacementOption::new(DisplayPlacement::FollowCursor),
        PlacementOption::new(DisplayPlacement::PrimaryScreen),
    ];
    if screen_count > 1 {
        options.extend((0..screen_count).map(|i| PlacementOption::new(DisplayPlacement::Screen(i))));
    }
    options
}

/// Index of the entry matching a saved placement, or 0 when nothing matches.
pub fn select_placement(options: &[PlacementOption], saved: DisplayPlacement) -> usize {
    options.iter().position(|o| o.placement == saved).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_screen_has_no_screen_entries() {
        let options = placement_options(1);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "Follow cursor");
        assert_eq!(options[1].label, "Always on primary screen");
    }

    #[test]
    fn test_multi_screen_entries_are_one_based() {
        let options = placement_options(3);
        assert_eq!(options.len(), 5);
        assert_eq!(options[2].label, "Always on screen 1");
        assert_eq!(options[4].label, "Always on screen 3");
        assert_eq!(options[4].placement, DisplayPlacement::Screen(2));
    }

    #[test]
    fn test_select_by_mode_and_index() {
        let options = placement_options(2);
        assert_eq!(select_placement(&options, DisplayPlacement::PrimaryScreen), 1);
        assert_eq!(select_placement(&options, DisplayPlacement::Screen(1)), 3);
    }

    #[test]
    fn test_select_missing_screen_falls_back_to_first() {
        let options = placement_options(2);
        assert_eq!(select_placement(&options, DisplayPlacement::Screen(2)), 0);
        assert_eq!(select_placement(&options, DisplayPlacement::Screen(usize::MAX)), 0);

        // A saved second screen on a single-monitor setup
        let options = placement_options(1);
        assert_eq!(select_placement(&options, DisplayPlacement::Screen(1)), 0);
        assert_eq!(options[0].placement, DisplayPlacement::FollowCursor);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(DisplayPlacement::Screen(1).resolve(2), DisplayPlacement::Screen(1));
        assert_eq!(DisplayPlacement::Screen(2).resolve(2), DisplayPlacement::FollowCursor);
        assert_eq!(DisplayPlacement::PrimaryScreen.resolve(0), DisplayPlacement::PrimaryScreen);
    }
}
