use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::domain::Role;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Monthly,
    Yearly,
}

impl PlanType {
    pub fn duration(self) -> Duration {
        match self {
            PlanType::Monthly => Duration::days(30),
            PlanType::Yearly => Duration::days(365),
        }
    }
}

/// Plan price in paise for a business role, None for roles with no plan.
pub fn plan_amount(role: Role, plan: PlanType) -> Option<i64> {
    let (monthly, yearly) = match role {
        Role::Freelancer => (10_000, 100_000),
        Role::Seller | Role::Restaurant => (20_000, 200_000),
        _ => return None,
    };
    Some(match plan {
        PlanType::Monthly => monthly,
        PlanType::Yearly => yearly,
    })
}

/// One verified payment. Rows are append-only: cancellation is recorded on the
/// account, never by rewriting the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    pub plan: PlanType,
    pub role: Role,
    pub amount: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionRecord {
    pub fn new(
        account_id: Uuid,
        plan: PlanType,
        role: Role,
        amount: i64,
        starts_at: DateTime<Utc>,
        razorpay_order_id: String,
        razorpay_payment_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            plan,
            role,
            amount,
            starts_at,
            ends_at: starts_at + plan.duration(),
            razorpay_order_id,
            razorpay_payment_id,
            created_at: starts_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_table_matches_published_plans() {
        assert_eq!(plan_amount(Role::Freelancer, PlanType::Monthly), Some(10_000));
        assert_eq!(plan_amount(Role::Freelancer, PlanType::Yearly), Some(100_000));
        assert_eq!(plan_amount(Role::Seller, PlanType::Monthly), Some(20_000));
        assert_eq!(plan_amount(Role::Restaurant, PlanType::Yearly), Some(200_000));
        assert_eq!(plan_amount(Role::Customer, PlanType::Monthly), None);
        assert_eq!(plan_amount(Role::Admin, PlanType::Yearly), None);
    }

    #[test]
    fn record_end_date_follows_plan_duration() {
        let start = Utc::now();
        let rec = SubscriptionRecord::new(
            Uuid::new_v4(),
            PlanType::Yearly,
            Role::Seller,
            200_000,
            start,
            "order_1".to_string(),
            "pay_1".to_string(),
        );
        assert_eq!(rec.ends_at, start + Duration::days(365));
        assert_eq!(rec.starts_at, start);
    }
}
