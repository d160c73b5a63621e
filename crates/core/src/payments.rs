//! Checkout event extraction and purchase application planning.
//!
//! The webhook handler verifies a delivery's signature, then uses this
//! module to pull the purchase fields out of a `checkout.session.completed`
//! envelope and decide what the event does to the store. All functions are
//! pure; the handler owns the database effects and the idempotency lookup.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Purchase type string for a single-path quiz bundle.
pub const PURCHASE_PATH_BUNDLE: &str = "PATH_BUNDLE";
/// Purchase type string for the all-access premium membership.
pub const PURCHASE_PREMIUM_MEMBERSHIP: &str = "PREMIUM_MEMBERSHIP";

/// All valid purchase type strings.
pub const VALID_PURCHASE_TYPES: &[&str] = &[PURCHASE_PATH_BUNDLE, PURCHASE_PREMIUM_MEMBERSHIP];

/// The only Stripe event type the applier consumes. Everything else is
/// acknowledged untouched.
pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Price recorded on path-bundle purchase rows, in cents.
pub const PATH_BUNDLE_PRICE_CENTS: i64 = 500;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What kind of access a purchase grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseKind {
    PathBundle,
    PremiumMembership,
}

impl PurchaseKind {
    /// Convert from a database or metadata string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            PURCHASE_PATH_BUNDLE => Ok(Self::PathBundle),
            PURCHASE_PREMIUM_MEMBERSHIP => Ok(Self::PremiumMembership),
            _ => Err(format!(
                "Invalid purchase type '{s}'. Must be one of: {}",
                VALID_PURCHASE_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PathBundle => PURCHASE_PATH_BUNDLE,
            Self::PremiumMembership => PURCHASE_PREMIUM_MEMBERSHIP,
        }
    }
}

// ---------------------------------------------------------------------------
// Event extraction
// ---------------------------------------------------------------------------

/// A `checkout.session.completed` event reduced to the fields the applier
/// uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutEvent {
    /// Idempotency key: the payment intent id, or the session id when the
    /// intent is absent.
    pub payment_id: String,
    pub user_id: DbId,
    pub kind: PurchaseKind,
    pub path_id: Option<DbId>,
}

/// Read the `type` field of a Stripe event envelope.
pub fn event_type(event: &Value) -> Option<&str> {
    event.get("type").and_then(|v| v.as_str())
}

/// Extract the checkout fields from a `checkout.session.completed` envelope.
///
/// Metadata must carry a positive integer `userId` and a known
/// `purchaseType`; `pathId` is optional and treated as absent when it does
/// not parse. Errors here mean the event is malformed for this platform --
/// the caller logs and discards it without failing the delivery.
pub fn parse_checkout_event(event: &Value) -> Result<CheckoutEvent, String> {
    let object = event
        .get("data")
        .and_then(|d| d.get("object"))
        .and_then(|o| o.as_object())
        .ok_or_else(|| "event is missing data.object".to_string())?;

    let payment_id = object
        .get("payment_intent")
        .and_then(|v| v.as_str())
        .or_else(|| object.get("id").and_then(|v| v.as_str()))
        .ok_or_else(|| "event has no payment identifier".to_string())?
        .to_string();

    let empty = serde_json::Map::new();
    let metadata = object
        .get("metadata")
        .and_then(|m| m.as_object())
        .unwrap_or(&empty);

    let user_id = metadata
        .get("userId")
        .and_then(value_as_id)
        .ok_or_else(|| "metadata userId is missing or not a positive integer".to_string())?;

    let kind = metadata
        .get("purchaseType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "metadata purchaseType is missing".to_string())
        .and_then(|s| PurchaseKind::from_str_value(s))?;

    let path_id = metadata.get("pathId").and_then(value_as_id);

    Ok(CheckoutEvent {
        payment_id,
        user_id,
        kind,
        path_id,
    })
}

/// Parse a metadata value as a positive database id. Stripe metadata values
/// are strings, but numbers are accepted too.
fn value_as_id(value: &Value) -> Option<DbId> {
    let id = match value {
        Value::String(s) => s.trim().parse::<DbId>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

// ---------------------------------------------------------------------------
// Application planning
// ---------------------------------------------------------------------------

/// The store effect of one verified, non-duplicate checkout event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseApplication {
    /// Insert an active path-bundle purchase row.
    PathBundle {
        user_id: DbId,
        path_id: DbId,
        amount_cents: i64,
    },
    /// Flag the user premium and stamp the purchase time.
    PremiumMembership { user_id: DbId },
}

/// Decide the store effect for a parsed checkout event.
///
/// A path-bundle event without a path id is malformed: the caller logs and
/// discards it (the delivery is still acknowledged).
pub fn plan_application(event: &CheckoutEvent) -> Result<PurchaseApplication, String> {
    match (event.kind, event.path_id) {
        (PurchaseKind::PathBundle, Some(path_id)) => Ok(PurchaseApplication::PathBundle {
            user_id: event.user_id,
            path_id,
            amount_cents: PATH_BUNDLE_PRICE_CENTS,
        }),
        (PurchaseKind::PathBundle, None) => {
            Err("PATH_BUNDLE purchase is missing pathId metadata".to_string())
        }
        (PurchaseKind::PremiumMembership, _) => Ok(PurchaseApplication::PremiumMembership {
            user_id: event.user_id,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
