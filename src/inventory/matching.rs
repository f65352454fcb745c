/*!
 * Item matching for removal.
 *
 * Items written before ids existed can only be told apart by their timestamp.
 * Matching walks an ordered precedence list: the first strategy that applies
 * to the target item decides how candidates are compared. New schema keys can
 * be supported by extending the list without touching call sites.
 */

use super::models::InventoryItem;

/// How a target item is compared against the items of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Compare stable ids. Applies when the target has an id.
    ById,
    /// Compare exact timestamps of id-less items. Applies to any target.
    ByTimestamp,
}

/// Id first, timestamp as the legacy fallback
pub const DEFAULT_PRECEDENCE: &[MatchStrategy] = &[MatchStrategy::ById, MatchStrategy::ByTimestamp];

impl MatchStrategy {
    /// Whether this strategy can identify `target`
    pub fn applies_to(&self, target: &InventoryItem) -> bool {
        match self {
            MatchStrategy::ById => target.stable_id().is_some(),
            MatchStrategy::ByTimestamp => true,
        }
    }

    /// Whether `candidate` is the item `target` refers to
    pub fn matches(&self, target: &InventoryItem, candidate: &InventoryItem) -> bool {
        match self {
            MatchStrategy::ById => match (target.stable_id(), candidate.stable_id()) {
                (Some(wanted), Some(id)) => wanted == id,
                _ => false,
            },
            // Id-bearing candidates are never picked by timestamp alone
            MatchStrategy::ByTimestamp => {
                candidate.is_legacy() && candidate.timestamp == target.timestamp
            }
        }
    }
}

/// First strategy in `precedence` that applies to `target`
pub fn select_strategy(precedence: &[MatchStrategy], target: &InventoryItem) -> Option<MatchStrategy> {
    precedence.iter().copied().find(|s| s.applies_to(target))
}

/// Index of the first item in `items` that `target` refers to.
///
/// When two id-less items share a timestamp the earlier one is returned,
/// which may not be the one the caller had in mind.
pub fn find_match(
    items: &[InventoryItem],
    target: &InventoryItem,
    precedence: &[MatchStrategy],
) -> Option<usize> {
    let strategy = select_strategy(precedence, target)?;
    items.iter().position(|candidate| strategy.matches(target, candidate))
}
