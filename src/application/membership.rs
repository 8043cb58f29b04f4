use crate::domain::{
    plan_amount, Account, Listing, ListingKind, ListingProfile, PlanType, Role, SubscriptionRecord,
};
use crate::infrastructure::{
    AccountRepository, ListingRepository, RazorpayClient, RazorpayError, RepositoryError,
    SubscriptionLogRepository,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum MembershipError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Razorpay error: {0}")]
    Razorpay(#[from] RazorpayError),
    #[error("Role not assignable: {0}")]
    RoleNotAssignable(Role),
    #[error("No subscription plan for role {0}")]
    NoPlanForRole(Role),
    #[error("Account role {role} cannot own a {kind} listing")]
    RoleMismatch { role: Role, kind: ListingKind },
    #[error("Owner already has a {0} listing")]
    ListingExists(ListingKind),
    #[error("Invalid payment signature")]
    InvalidSignature,
    #[error("Payment {0} already processed")]
    DuplicatePayment(String),
    #[error("Payment amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: i64, actual: i64 },
    #[error("No active subscription to cancel")]
    NotSubscribed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialStatus {
    pub trial_started: bool,
    pub trial_active: bool,
    pub trial_days_remaining: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderHandle {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionSummary {
    pub is_subscribed: bool,
    pub trial_active: bool,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// The subscription state machine: role adoption with the one-time trial,
/// payment verification, revoke-at-expiry cancellation, listing creation.
pub struct MembershipService<A, L, S>
where
    A: AccountRepository,
    L: ListingRepository,
    S: SubscriptionLogRepository,
{
    account_repo: Arc<A>,
    listing_repo: Arc<L>,
    subscription_repo: Arc<S>,
    razorpay: Arc<RazorpayClient>,
    trial_period: Duration,
}

impl<A, L, S> MembershipService<A, L, S>
where
    A: AccountRepository,
    L: ListingRepository,
    S: SubscriptionLogRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        listing_repo: Arc<L>,
        subscription_repo: Arc<S>,
        razorpay: Arc<RazorpayClient>,
        trial_period: Duration,
    ) -> Self {
        Self {
            account_repo,
            listing_repo,
            subscription_repo,
            razorpay,
            trial_period,
        }
    }

    /// Switches the account's role. First adoption of a business role starts
    /// the trial; the grant is guarded by `has_used_trial` both here and in
    /// the conditional update, so toggling roles can never re-arm it.
    pub async fn adopt_role(
        &self,
        account: &Account,
        role: Role,
    ) -> Result<(Account, TrialStatus), MembershipError> {
        if role == Role::Admin {
            return Err(MembershipError::RoleNotAssignable(role));
        }

        self.account_repo.update_role(account.id, role).await?;

        let mut trial_started = false;
        if role.is_business() && !account.subscription.has_used_trial {
            let trial_ends_at = Utc::now() + self.trial_period;
            trial_started = self.account_repo.begin_trial(account.id, trial_ends_at).await?;
            if trial_started {
                info!(account_id = %account.id, %role, %trial_ends_at, "Trial started");
            }
        }

        let updated = self.account_repo.get_by_id(account.id).await?;
        let status = trial_status(&updated, trial_started);
        Ok((updated, status))
    }

    /// Creates the listing for the account's current business role. One
    /// listing per (owner, kind); the new listing inherits the owner's live
    /// visibility so a freshly granted trial shows up immediately.
    pub async fn create_listing(
        &self,
        account: &Account,
        kind: ListingKind,
        profile: ListingProfile,
    ) -> Result<Listing, MembershipError> {
        if ListingKind::for_role(account.role) != Some(kind) {
            return Err(MembershipError::RoleMismatch {
                role: account.role,
                kind,
            });
        }

        if self
            .listing_repo
            .get_by_owner_and_kind(account.id, kind)
            .await?
            .is_some()
        {
            return Err(MembershipError::ListingExists(kind));
        }

        let visible = account.subscription.is_visible_at(Utc::now());
        let listing = Listing::new(account.id, kind, profile, visible);
        self.listing_repo.create(&listing).await?;

        info!(listing_id = %listing.id, %kind, visible, "Listing created");
        Ok(listing)
    }

    pub async fn create_order(
        &self,
        account: &Account,
        plan: PlanType,
    ) -> Result<OrderHandle, MembershipError> {
        let amount =
            plan_amount(account.role, plan).ok_or(MembershipError::NoPlanForRole(account.role))?;

        let receipt = format!("sub_{}", Uuid::new_v4().simple());
        let notes = HashMap::from([
            ("account_id".to_string(), account.id.to_string()),
            ("plan".to_string(), plan.to_string()),
            ("role".to_string(), account.role.to_string()),
        ]);

        let order = self
            .razorpay
            .create_order(amount, "INR", &receipt, &notes)
            .await?;

        Ok(OrderHandle {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key_id: self.razorpay.key_id().to_string(),
        })
    }

    /// Verifies the checkout signature and activates the subscription.
    ///
    /// Order of checks matters: signature first (an invalid or replayed
    /// signature must not mutate anything), then replay, then the amount
    /// against the pricing table. Only after all three does state change.
    pub async fn verify_payment(
        &self,
        account: &Account,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<SubscriptionRecord, MembershipError> {
        if !self
            .razorpay
            .verify_payment_signature(order_id, payment_id, signature)
        {
            warn!(account_id = %account.id, order_id, "Payment signature verification failed");
            return Err(MembershipError::InvalidSignature);
        }

        if self
            .subscription_repo
            .exists_by_payment_id(payment_id)
            .await?
        {
            warn!(account_id = %account.id, payment_id, "Replayed payment verification rejected");
            return Err(MembershipError::DuplicatePayment(payment_id.to_string()));
        }

        let order = self.razorpay.fetch_order(order_id).await?;

        let plan = order
            .notes
            .get("plan")
            .and_then(|p| PlanType::from_str(p).ok())
            .unwrap_or(PlanType::Yearly);
        let role = order
            .notes
            .get("role")
            .and_then(|r| Role::from_str(r).ok())
            .unwrap_or(account.role);

        let expected = plan_amount(role, plan).ok_or(MembershipError::NoPlanForRole(role))?;
        if order.amount != expected {
            error!(
                account_id = %account.id,
                order_id,
                expected,
                actual = order.amount,
                "Order amount does not match plan pricing"
            );
            return Err(MembershipError::AmountMismatch {
                expected,
                actual: order.amount,
            });
        }

        let record = SubscriptionRecord::new(
            account.id,
            plan,
            role,
            order.amount,
            Utc::now(),
            order_id.to_string(),
            payment_id.to_string(),
        );

        self.subscription_repo
            .create(&record)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    MembershipError::DuplicatePayment(payment_id.to_string())
                }
                other => MembershipError::Repository(other),
            })?;

        self.account_repo
            .activate_subscription(account.id, record.id, record.ends_at)
            .await?;

        let shown = self
            .listing_repo
            .set_visibility_for_owner(account.id, true)
            .await?;

        info!(
            account_id = %account.id,
            subscription_id = %record.id,
            %plan,
            ends_at = %record.ends_at,
            listings_shown = shown,
            "Subscription activated"
        );

        Ok(record)
    }

    /// "Do not renew", not "revoke now": `expires_at` stays untouched, so the
    /// paid window keeps granting visibility until it lapses on its own.
    pub async fn cancel(&self, account: &Account) -> Result<(), MembershipError> {
        if !account.subscription.is_subscribed {
            return Err(MembershipError::NotSubscribed);
        }

        self.account_repo
            .cancel_subscription(account.id, Utc::now())
            .await?;

        info!(account_id = %account.id, "Subscription cancelled, access runs until expiry");
        Ok(())
    }

    pub fn summarize(&self, account: &Account) -> SubscriptionSummary {
        let now = Utc::now();
        let sub = &account.subscription;
        SubscriptionSummary {
            is_subscribed: sub.is_paid_active_at(now),
            trial_active: sub.is_trial_active_at(now),
            trial_ends_at: sub.trial_ends_at,
            expires_at: sub.expires_at,
            cancelled_at: sub.cancelled_at,
        }
    }
}

fn trial_status(account: &Account, trial_started: bool) -> TrialStatus {
    let now = Utc::now();
    let trial_active = account.subscription.is_trial_active_at(now);
    let trial_days_remaining = account
        .subscription
        .trial_ends_at
        .map(|ends| (ends - now).num_days().max(0))
        .unwrap_or(0);

    TrialStatus {
        trial_started,
        trial_active,
        trial_days_remaining,
    }
}
