//! Quiz access checks.
//!
//! Quizzes are the paid surface of the platform. Access comes from either
//! the user's premium flag or an active path-bundle purchase covering the
//! quiz's path. Evaluated fresh per request -- entitlement is never cached.

use std::collections::HashSet;

use crate::payments::PurchaseKind;
use crate::types::DbId;

/// A purchase row reduced to the fields access checks need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseSnapshot {
    pub kind: PurchaseKind,
    pub path_id: Option<DbId>,
    pub is_active: bool,
}

/// The path ids covered by the user's active bundle purchases.
pub fn purchased_path_ids(purchases: &[PurchaseSnapshot]) -> HashSet<DbId> {
    purchases
        .iter()
        .filter(|p| p.is_active && p.kind == PurchaseKind::PathBundle)
        .filter_map(|p| p.path_id)
        .collect()
}

/// Whether the user may open quizzes on the given path.
///
/// Premium grants access everywhere. A stored premium-membership purchase
/// row does not grant anything on its own; only the user flag does, which
/// the payment applier sets when the purchase lands.
pub fn has_quiz_access(is_premium: bool, purchases: &[PurchaseSnapshot], path_id: DbId) -> bool {
    if is_premium {
        return true;
    }
    purchases.iter().any(|p| {
        p.is_active && p.kind == PurchaseKind::PathBundle && p.path_id == Some(path_id)
    })
}
