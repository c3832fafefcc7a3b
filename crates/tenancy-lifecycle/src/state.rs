//! Lifecycle states and the legal transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a tenant. Exactly these seven values exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenantState {
    /// Record created, nothing provisioned yet.
    New,
    /// Resource deployment requested or in progress.
    Pending,
    /// Resources deployed, tenant usable.
    Active,
    /// Deactivation in progress.
    Disabling,
    /// Deactivated, data retained.
    Disabled,
    /// Teardown in progress.
    Removing,
    /// Deleted by the system. Terminal.
    Removed,
}

/// Directed edges of the lifecycle graph. Everything not listed is rejected.
const LEGAL_TRANSITIONS: &[(TenantState, TenantState)] = &[
    (TenantState::New, TenantState::Pending),
    (TenantState::New, TenantState::Removing),
    (TenantState::Pending, TenantState::Active),
    (TenantState::Active, TenantState::Disabling),
    (TenantState::Disabling, TenantState::Disabled),
    (TenantState::Disabled, TenantState::Pending),
    (TenantState::Disabled, TenantState::Removing),
    (TenantState::Removing, TenantState::Removed),
];

impl TenantState {
    /// All states, in lifecycle order.
    pub const ALL: [TenantState; 7] = [
        TenantState::New,
        TenantState::Pending,
        TenantState::Active,
        TenantState::Disabling,
        TenantState::Disabled,
        TenantState::Removing,
        TenantState::Removed,
    ];

    /// Whether `self -> to` is a legal lifecycle edge.
    pub fn can_transition_to(self, to: TenantState) -> bool {
        LEGAL_TRANSITIONS.iter().any(|&(f, t)| f == self && t == to)
    }

    /// Whether the state counts as occupied for duplicate detection.
    /// A `Removed` tenant is treated as deleted.
    pub fn is_live(self) -> bool {
        !matches!(self, TenantState::Removed)
    }

    /// Terminal states have no outgoing edges.
    pub fn is_terminal(self) -> bool {
        matches!(self, TenantState::Removed)
    }

    /// Canonical state name.
    pub fn name(self) -> &'static str {
        match self {
            TenantState::New => "New",
            TenantState::Pending => "Pending",
            TenantState::Active => "Active",
            TenantState::Disabling => "Disabling",
            TenantState::Disabled => "Disabled",
            TenantState::Removing => "Removing",
            TenantState::Removed => "Removed",
        }
    }
}

impl fmt::Display for TenantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Presentation metadata for one state.
///
/// The `key` is what the web layer feeds its localization resources; the
/// `display`/`description` strings are the untranslated fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateInfo {
    /// Localization resource key.
    pub key: &'static str,
    /// Fallback display name.
    pub display: &'static str,
    /// Fallback description.
    pub description: &'static str,
}

/// Explicit state → presentation metadata table, built at startup.
///
/// Display concerns stay out of [`TenantState`] itself; surrounding layers
/// look the metadata up here instead of introspecting the enum.
#[derive(Debug, Clone)]
pub struct StateCatalog {
    entries: [StateInfo; 7],
}

impl StateCatalog {
    /// Build the catalog.
    pub fn new() -> Self {
        let mut entries = [StateInfo {
            key: "",
            display: "",
            description: "",
        }; 7];

        for state in TenantState::ALL {
            entries[Self::slot(state)] = match state {
                TenantState::New => StateInfo {
                    key: "state_new",
                    display: "New",
                    description: "A new tenant was created",
                },
                TenantState::Pending => StateInfo {
                    key: "state_pending",
                    display: "Pending",
                    description: "Deploying tenant resources",
                },
                TenantState::Active => StateInfo {
                    key: "state_active",
                    display: "Active",
                    description: "Resources deployed, tenant usable",
                },
                TenantState::Disabling => StateInfo {
                    key: "state_disabling",
                    display: "Disabling",
                    description: "Deactivation in progress",
                },
                TenantState::Disabled => StateInfo {
                    key: "state_disabled",
                    display: "Disabled",
                    description: "Deactivated by the owner",
                },
                TenantState::Removing => StateInfo {
                    key: "state_removing",
                    display: "Removing",
                    description: "Scheduled for deletion",
                },
                TenantState::Removed => StateInfo {
                    key: "state_removed",
                    display: "Removed",
                    description: "Deleted by the system",
                },
            };
        }

        Self { entries }
    }

    /// Presentation metadata for a state.
    pub fn info(&self, state: TenantState) -> &StateInfo {
        &self.entries[Self::slot(state)]
    }

    fn slot(state: TenantState) -> usize {
        match state {
            TenantState::New => 0,
            TenantState::Pending => 1,
            TenantState::Active => 2,
            TenantState::Disabling => 3,
            TenantState::Disabled => 4,
            TenantState::Removing => 5,
            TenantState::Removed => 6,
        }
    }
}

impl Default for StateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_table_is_exact() {
        // Only the eight documented edges are legal.
        let mut legal = 0;
        for from in TenantState::ALL {
            for to in TenantState::ALL {
                if from.can_transition_to(to) {
                    legal += 1;
                }
            }
        }
        assert_eq!(legal, 8);

        assert!(TenantState::New.can_transition_to(TenantState::Pending));
        assert!(TenantState::New.can_transition_to(TenantState::Removing));
        assert!(TenantState::Pending.can_transition_to(TenantState::Active));
        assert!(TenantState::Active.can_transition_to(TenantState::Disabling));
        assert!(TenantState::Disabling.can_transition_to(TenantState::Disabled));
        assert!(TenantState::Disabled.can_transition_to(TenantState::Pending));
        assert!(TenantState::Disabled.can_transition_to(TenantState::Removing));
        assert!(TenantState::Removing.can_transition_to(TenantState::Removed));
    }

    #[test]
    fn test_removed_is_absorbing() {
        for to in TenantState::ALL {
            assert!(!TenantState::Removed.can_transition_to(to));
        }
        assert!(TenantState::Removed.is_terminal());
        assert!(!TenantState::Removed.is_live());
    }

    #[test]
    fn test_no_self_loops() {
        for state in TenantState::ALL {
            assert!(!state.can_transition_to(state));
        }
    }

    #[test]
    fn test_catalog_covers_every_state() {
        let catalog = StateCatalog::new();
        for state in TenantState::ALL {
            let info = catalog.info(state);
            assert!(!info.key.is_empty());
            assert_eq!(info.display, state.name());
        }
    }
}
