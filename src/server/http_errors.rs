use crate::application::{DiscoveryError, MembershipError};
use crate::infrastructure::{RazorpayError, RepositoryError};
use axum::http::StatusCode;

pub(super) fn map_membership_error(err: &MembershipError) -> (StatusCode, serde_json::Value) {
    match err {
        MembershipError::Repository(RepositoryError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            serde_json::json!({ "error": "Account not found" }),
        ),
        MembershipError::RoleNotAssignable(role) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": format!("Role {} cannot be assigned", role) }),
        ),
        MembershipError::NoPlanForRole(role) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": format!("No subscription plan for role {}", role) }),
        ),
        MembershipError::RoleMismatch { role, kind } => (
            StatusCode::FORBIDDEN,
            serde_json::json!({
                "error": format!("Account role {} cannot own a {} listing", role, kind)
            }),
        ),
        MembershipError::ListingExists(kind) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": format!("Account already has a {} listing", kind) }),
        ),
        MembershipError::InvalidSignature => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "success": false, "error": "Invalid signature" }),
        ),
        MembershipError::DuplicatePayment(_) => (
            StatusCode::CONFLICT,
            serde_json::json!({ "success": false, "error": "Payment already processed" }),
        ),
        MembershipError::AmountMismatch { .. } => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "success": false, "error": "Order amount does not match plan" }),
        ),
        MembershipError::NotSubscribed => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "success": false, "error": "No active subscription found" }),
        ),
        MembershipError::Razorpay(RazorpayError::NotFound(_)) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "success": false, "error": "Unknown payment order" }),
        ),
        // Payment-provider failures surface to the caller; guessing at
        // payment state is never an option.
        MembershipError::Razorpay(_) => (
            StatusCode::BAD_GATEWAY,
            serde_json::json!({ "success": false, "error": "Payment provider unavailable" }),
        ),
        MembershipError::Repository(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": "Internal error" }),
        ),
    }
}

pub(super) fn map_listing_fetch_error(err: &DiscoveryError) -> (StatusCode, serde_json::Value) {
    match err {
        DiscoveryError::Repository(RepositoryError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            serde_json::json!({ "error": "Listing not found" }),
        ),
        DiscoveryError::Repository(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": "Failed to fetch listing" }),
        ),
    }
}

pub(super) fn map_listing_write_error(err: &RepositoryError) -> (StatusCode, serde_json::Value) {
    match err {
        RepositoryError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            serde_json::json!({ "error": "Listing not found" }),
        ),
        RepositoryError::Conflict(msg) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": msg }),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": "Failed to update listing" }),
        ),
    }
}
