use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub oauth_id: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub subscription: SubscriptionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Seller,
    Restaurant,
    Freelancer,
    ContentWriter,
    Admin,
}

impl Role {
    /// Listing-bearing roles; adopting one consumes the single trial grant.
    pub fn is_business(self) -> bool {
        matches!(self, Role::Seller | Role::Restaurant | Role::Freelancer)
    }
}

/// Subscription sub-record embedded in the account document.
///
/// `subscription_active` on a Listing is derived from this; only
/// `is_visible_at` decides visibility, for the gate and the sweep alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SubscriptionState {
    pub is_subscribed: bool,
    pub has_used_trial: bool,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub subscription_ref: Option<Uuid>,
}

impl SubscriptionState {
    /// A currently valid paid subscription is sufficient on its own; so is a
    /// running trial. Cancellation is "do not renew", not "revoke now": it
    /// clears `is_subscribed` and stamps `cancelled_at`, but the paid window
    /// keeps granting visibility until `expires_at` passes.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        let paid_window = self.expires_at.is_some_and(|t| t > now);
        let paid = paid_window && (self.is_subscribed || self.cancelled_at.is_some());
        let trial = self.trial_ends_at.is_some_and(|t| t > now);
        paid || trial
    }

    pub fn is_trial_active_at(&self, now: DateTime<Utc>) -> bool {
        self.trial_ends_at.is_some_and(|t| t > now)
    }

    pub fn is_paid_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_subscribed && self.expires_at.is_some_and(|t| t > now)
    }
}

impl Account {
    pub fn new(email: String, oauth_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            oauth_id,
            role: Role::Customer,
            is_active: true,
            subscription: SubscriptionState::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
