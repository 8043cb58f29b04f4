use super::http_errors::{map_listing_fetch_error, map_listing_write_error, map_membership_error};
use super::state::AppState;
use crate::application::{ListingFetch, SearchPage};
use crate::domain::{
    Account, Listing, ListingKind, ListingProfile, PlanType, Role, SearchFilters, SearchSort,
};
use crate::infrastructure::repository::{AccountRepository, ListingRepository};
use axum::{
    extract::{Path, Query, State},
    http::{header, header::HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;
use validator::Validate;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/search", get(search_listings))
        .route("/listing/:id", get(get_listing))
        .route("/role", put(update_role))
        .route("/me/listings", get(my_listings))
        .route("/listings", post(create_listing))
        .route("/listings/:id", put(update_listing).delete(delete_listing))
        .route("/subscription/create-order", post(create_order))
        .route("/subscription/verify-payment", post(verify_payment))
        .route("/subscription/cancel", post(cancel_subscription))
        .route("/subscription/status", get(subscription_status))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Bearer-token claims. Tokens are minted by the identity provider; this
/// service only validates them against the shared secret.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    exp: usize,
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Account, (StatusCode, Json<serde_json::Value>)> {
    let token = extract_bearer_token(headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Missing or invalid authorization token"})),
        )
    })?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Invalid token"})),
        )
    })?;

    state.account_repo.get_by_id(data.claims.sub).await.map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Unknown account"})),
        )
    })
}

fn parse_listing_kind(kind: &str) -> Option<ListingKind> {
    ListingKind::from_str(kind).ok()
}

fn parse_role(role: &str) -> Option<Role> {
    // Admin is intentionally absent: it is never assignable over the API.
    match Role::from_str(role).ok()? {
        Role::Admin => None,
        role => Some(role),
    }
}

fn parse_plan(plan: &str) -> Option<PlanType> {
    PlanType::from_str(plan).ok()
}

fn parse_sort(sort: Option<&str>) -> Option<SearchSort> {
    match sort {
        None => Some(SearchSort::Nearest),
        Some("rating") => Some(SearchSort::Rating),
        Some(_) => None,
    }
}

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        search_listings,
        get_listing,
        update_role,
        my_listings,
        create_listing,
        update_listing,
        delete_listing,
        create_order,
        verify_payment,
        cancel_subscription,
        subscription_status,
    ),
    components(
        schemas(
            HealthResponse,
            RoleRequest,
            CreateListingRequest,
            UpdateListingRequest,
            CreateOrderRequest,
            VerifyPaymentRequest,
            ListingResponse,
            AccountResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Discovery", description = "Public search and listing fetch"),
        (name = "Listings", description = "Owner-side listing management"),
        (name = "Membership", description = "Role and subscription lifecycle"),
    ),
    info(
        title = "Localmart API",
        version = "0.1.0",
        description = "Hyperlocal marketplace discovery and subscription backend",
        license(name = "MIT")
    )
)]
struct ApiDoc;

/// Health check response
#[derive(Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Verifies database connectivity and returns service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!(HealthResponse {
                status: "healthy".to_string(),
                error: None,
            })),
        ),
        Err(e) => {
            error!(error = %e, "Health check failed: DB connectivity issue");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!(HealthResponse {
                    status: "unhealthy".to_string(),
                    error: Some("Database connectivity failed".to_string()),
                })),
            )
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
struct SearchParams {
    /// Listing variant: store, restaurant or freelancer
    kind: String,
    lat: Option<f64>,
    lng: Option<f64>,
    city: Option<String>,
    state: Option<String>,
    category: Option<String>,
    /// Case-insensitive substring match on the listing name
    search: Option<String>,
    /// Explicit alternative ordering ("rating"); forfeits nearest-first
    sort: Option<String>,
    #[serde(default = "default_page")]
    #[param(default = 1)]
    page: usize,
    #[serde(default = "default_limit")]
    #[param(default = 20, maximum = 100)]
    limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

const MAX_PAGE_LIMIT: usize = 100;

/// Search listings near a point
///
/// With coordinates, expands the search radius until enough results are found;
/// without them, runs a plain filter query. Only active listings of visible
/// (subscribed or in-trial) owners are returned.
#[utoipa::path(
    get,
    path = "/search",
    tag = "Discovery",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching listings and the radius used", body = Object),
        (status = 400, description = "Invalid kind or sort", body = Object)
    )
)]
async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let kind = match parse_listing_kind(&params.kind) {
        Some(k) => k,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Invalid listing kind",
                    "allowed": ["store", "restaurant", "freelancer"]
                })),
            );
        }
    };

    let sort = match parse_sort(params.sort.as_deref()) {
        Some(s) => s,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Invalid sort",
                    "allowed": ["rating"]
                })),
            );
        }
    };

    let raw_origin = match (params.lng, params.lat) {
        (Some(lng), Some(lat)) => Some((lng, lat)),
        (None, None) => None,
        // Half-supplied coordinates count as malformed; the service degrades
        // to the filter path and logs it.
        _ => Some((f64::NAN, f64::NAN)),
    };

    let filters = SearchFilters {
        city: params.city,
        state: params.state,
        category: params.category,
        text: params.search,
    };

    let page = SearchPage {
        page: params.page.max(1),
        limit: params.limit.clamp(1, MAX_PAGE_LIMIT),
    };

    match state
        .discovery
        .search(kind, raw_origin, &filters, sort, page)
        .await
    {
        Ok(outcome) => {
            let results: Vec<ListingResponse> =
                outcome.results.into_iter().map(Into::into).collect();
            let mut body = serde_json::json!({ "results": results });
            if let Some(radius) = outcome.radius_used {
                body["radius_used"] = serde_json::json!(radius);
            }
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            error!(error = %e, "Search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Search failed"})),
            )
        }
    }
}

/// Fetch a single listing
///
/// Re-derives the owner's visibility from live subscription state. Expired
/// listings return only id and name with an `expired` marker; a missing or
/// owner-deleted listing is a plain 404.
#[utoipa::path(
    get,
    path = "/listing/{id}",
    tag = "Discovery",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing, or minimal projection when expired", body = Object),
        (status = 404, description = "Listing not found", body = Object)
    )
)]
async fn get_listing(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.discovery.fetch_listing(id).await {
        Ok(ListingFetch::Full(listing)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "listing": ListingResponse::from(*listing),
                "expired": false
            })),
        ),
        Ok(ListingFetch::Expired { id, name }) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "partial": { "id": id, "name": name },
                "expired": true,
                "message": "This listing is temporarily unavailable due to an expired subscription"
            })),
        ),
        Err(e) => {
            let (status, body) = map_listing_fetch_error(&e);
            (status, Json(body))
        }
    }
}

#[derive(Deserialize, ToSchema)]
struct RoleRequest {
    #[schema(example = "seller")]
    role: String,
}

/// Change the account role
///
/// First adoption of a business role starts the one-time trial.
#[utoipa::path(
    put,
    path = "/role",
    tag = "Membership",
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role updated; trial status included", body = Object),
        (status = 400, description = "Invalid role", body = Object),
        (status = 401, description = "Missing or invalid authorization token", body = Object)
    )
)]
async fn update_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RoleRequest>,
) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let role = match parse_role(&req.role) {
        Some(r) => r,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Invalid role",
                    "allowed": ["customer", "seller", "restaurant", "freelancer", "content_writer"]
                })),
            );
        }
    };

    match state.membership.adopt_role(&account, role).await {
        Ok((user, trial)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": format!("Role updated to {}", role),
                "trial_started": trial.trial_started,
                "trial_active": trial.trial_active,
                "trial_days_remaining": trial.trial_days_remaining,
                "user": AccountResponse::from(user),
            })),
        ),
        Err(e) => {
            let (status, body) = map_membership_error(&e);
            (status, Json(body))
        }
    }
}

/// The owner's listings across all kinds, visible or not.
#[utoipa::path(
    get,
    path = "/me/listings",
    tag = "Listings",
    responses(
        (status = 200, description = "Owned listings", body = [ListingResponse]),
        (status = 401, description = "Missing or invalid authorization token", body = Object)
    )
)]
async fn my_listings(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    match state.listing_repo.list_by_owner(account.id).await {
        Ok(listings) => {
            let listings: Vec<ListingResponse> = listings.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(serde_json::json!({ "listings": listings })))
        }
        Err(e) => {
            error!(error = %e, "Failed to list owned listings");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to fetch listings"})),
            )
        }
    }
}

#[derive(Deserialize, ToSchema)]
struct CreateListingRequest {
    #[schema(example = "store")]
    kind: String,
    name: String,
    description: Option<String>,
    category: String,
    address: Option<String>,
    city: String,
    state: String,
    pincode: Option<String>,
    phone: Option<String>,
    whatsapp: Option<String>,
    lng: f64,
    lat: f64,
}

#[derive(Deserialize, ToSchema)]
struct UpdateListingRequest {
    name: String,
    description: Option<String>,
    category: String,
    address: Option<String>,
    city: String,
    state: String,
    pincode: Option<String>,
    phone: Option<String>,
    whatsapp: Option<String>,
    lng: f64,
    lat: f64,
}

impl UpdateListingRequest {
    fn into_profile(self) -> ListingProfile {
        ListingProfile {
            name: self.name,
            description: self.description,
            category: self.category,
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            phone: self.phone,
            whatsapp: self.whatsapp,
            lng: self.lng,
            lat: self.lat,
        }
    }
}

/// Create the listing for the account's business role
#[utoipa::path(
    post,
    path = "/listings",
    tag = "Listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Invalid profile or duplicate listing", body = Object),
        (status = 403, description = "Role cannot own this listing kind", body = Object),
        (status = 401, description = "Missing or invalid authorization token", body = Object)
    )
)]
async fn create_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateListingRequest>,
) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let kind = match parse_listing_kind(&req.kind) {
        Some(k) => k,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Invalid listing kind",
                    "allowed": ["store", "restaurant", "freelancer"]
                })),
            );
        }
    };

    let profile = ListingProfile {
        name: req.name,
        description: req.description,
        category: req.category,
        address: req.address,
        city: req.city,
        state: req.state,
        pincode: req.pincode,
        phone: req.phone,
        whatsapp: req.whatsapp,
        lng: req.lng,
        lat: req.lat,
    };

    if let Err(errors) = profile.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Invalid listing profile", "details": errors})),
        );
    }

    match state.membership.create_listing(&account, kind, profile).await {
        Ok(listing) => (
            StatusCode::CREATED,
            Json(serde_json::json!(ListingResponse::from(listing))),
        ),
        Err(e) => {
            let (status, body) = map_membership_error(&e);
            (status, Json(body))
        }
    }
}

/// Update the owner's listing profile
///
/// Visibility is not an editable field on any owner path.
#[utoipa::path(
    put,
    path = "/listings/{id}",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = Object),
        (status = 400, description = "Invalid profile", body = Object),
        (status = 404, description = "Listing not found or not owned", body = Object),
        (status = 401, description = "Missing or invalid authorization token", body = Object)
    )
)]
async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateListingRequest>,
) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let profile = req.into_profile();
    if let Err(errors) = profile.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Invalid listing profile", "details": errors})),
        );
    }

    match state
        .listing_repo
        .update_profile(id, account.id, &profile)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "Listing updated successfully"})),
        ),
        Err(e) => {
            let (status, body) = map_listing_write_error(&e);
            (status, Json(body))
        }
    }
}

/// Soft-delete the owner's listing
#[utoipa::path(
    delete,
    path = "/listings/{id}",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing deactivated", body = Object),
        (status = 404, description = "Listing not found or not owned", body = Object),
        (status = 401, description = "Missing or invalid authorization token", body = Object)
    )
)]
async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    match state.listing_repo.set_active(id, account.id, false).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "Listing deactivated"})),
        ),
        Err(e) => {
            let (status, body) = map_listing_write_error(&e);
            (status, Json(body))
        }
    }
}

#[derive(Deserialize, ToSchema)]
struct CreateOrderRequest {
    #[schema(example = "yearly")]
    plan: Option<String>,
}

/// Create a payment order for the account's role plan
#[utoipa::path(
    post,
    path = "/subscription/create-order",
    tag = "Membership",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order handle for checkout", body = Object),
        (status = 400, description = "No plan for role or invalid plan", body = Object),
        (status = 401, description = "Missing or invalid authorization token", body = Object),
        (status = 502, description = "Payment provider unavailable", body = Object)
    )
)]
async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let plan = match req.plan.as_deref() {
        None => PlanType::Yearly,
        Some(raw) => match parse_plan(raw) {
            Some(p) => p,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": "Invalid plan",
                        "allowed": ["monthly", "yearly"]
                    })),
                );
            }
        },
    };

    match state.membership.create_order(&account, plan).await {
        Ok(order) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "order_id": order.order_id,
                "amount": order.amount,
                "currency": order.currency,
                "key": order.key_id,
            })),
        ),
        Err(e) => {
            let (status, body) = map_membership_error(&e);
            (status, Json(body))
        }
    }
}

#[derive(Deserialize, ToSchema)]
struct VerifyPaymentRequest {
    order_id: String,
    payment_id: String,
    signature: String,
}

/// Verify a checkout payment and activate the subscription
///
/// The provider signature is checked before any state changes; replayed or
/// tampered payments are rejected without mutation.
#[utoipa::path(
    post,
    path = "/subscription/verify-payment",
    tag = "Membership",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Subscription activated", body = Object),
        (status = 400, description = "Invalid signature or amount", body = Object),
        (status = 409, description = "Payment already processed", body = Object),
        (status = 401, description = "Missing or invalid authorization token", body = Object),
        (status = 502, description = "Payment provider unavailable", body = Object)
    )
)]
async fn verify_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<VerifyPaymentRequest>,
) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    match state
        .membership
        .verify_payment(&account, &req.order_id, &req.payment_id, &req.signature)
        .await
    {
        Ok(_record) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Subscription activated successfully"
            })),
        ),
        Err(e) => {
            let (status, body) = map_membership_error(&e);
            (status, Json(body))
        }
    }
}

/// Cancel the subscription; access continues until natural expiry
#[utoipa::path(
    post,
    path = "/subscription/cancel",
    tag = "Membership",
    responses(
        (status = 200, description = "Subscription cancelled", body = Object),
        (status = 400, description = "No active subscription", body = Object),
        (status = 401, description = "Missing or invalid authorization token", body = Object)
    )
)]
async fn cancel_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    match state.membership.cancel(&account).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Subscription cancelled successfully"
            })),
        ),
        Err(e) => {
            let (status, body) = map_membership_error(&e);
            (status, Json(body))
        }
    }
}

/// Live subscription and trial status
#[utoipa::path(
    get,
    path = "/subscription/status",
    tag = "Membership",
    responses(
        (status = 200, description = "Current subscription summary", body = Object),
        (status = 401, description = "Missing or invalid authorization token", body = Object)
    )
)]
async fn subscription_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let account = match authenticate(&state, &headers).await {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let summary = state.membership.summarize(&account);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "success": true, "subscription": summary })),
    )
}

#[derive(Serialize, ToSchema)]
struct ListingResponse {
    id: Uuid,
    owner_id: Uuid,
    kind: String,
    name: String,
    description: Option<String>,
    category: String,
    address: Option<String>,
    city: String,
    state: String,
    pincode: Option<String>,
    phone: Option<String>,
    whatsapp: Option<String>,
    lng: f64,
    lat: f64,
    rating: f64,
    total_reviews: i32,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            owner_id: listing.owner_id,
            kind: listing.kind.to_string(),
            name: listing.name,
            description: listing.description,
            category: listing.category,
            address: listing.address,
            city: listing.city,
            state: listing.state,
            pincode: listing.pincode,
            phone: listing.phone,
            whatsapp: listing.whatsapp,
            lng: listing.location.lng,
            lat: listing.location.lat,
            rating: listing.rating,
            total_reviews: listing.total_reviews,
            created_at: listing.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct AccountResponse {
    id: Uuid,
    email: String,
    role: String,
    is_subscribed: bool,
    has_used_trial: bool,
    #[schema(format = "date-time")]
    trial_ends_at: Option<chrono::DateTime<chrono::Utc>>,
    #[schema(format = "date-time")]
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role.to_string(),
            is_subscribed: account.subscription.is_subscribed,
            has_used_trial: account.subscription.has_used_trial,
            trial_ends_at: account.subscription.trial_ends_at,
            expires_at: account.subscription.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extract_bearer_token_happy_path() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn extract_bearer_token_rejects_missing_or_empty() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        let mut headers2 = HeaderMap::new();
        headers2.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers2), None);
    }

    #[test]
    fn extract_bearer_token_rejects_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn parse_invalid_inputs_return_none() {
        assert!(parse_listing_kind("hotel").is_none());
        assert!(parse_role("landlord").is_none());
        assert!(parse_role("admin").is_none());
        assert!(parse_plan("weekly").is_none());
        assert!(parse_sort(Some("distance")).is_none());
    }

    #[test]
    fn parse_valid_inputs() {
        assert_eq!(parse_listing_kind("restaurant"), Some(ListingKind::Restaurant));
        assert_eq!(parse_role("content_writer"), Some(Role::ContentWriter));
        assert_eq!(parse_plan("monthly"), Some(PlanType::Monthly));
        assert_eq!(parse_sort(None), Some(SearchSort::Nearest));
        assert_eq!(parse_sort(Some("rating")), Some(SearchSort::Rating));
    }
}
