use crate::domain::{
    Account, GeoPoint, Listing, ListingKind, ListingProfile, PlanType, Role, SearchFilters,
    SearchSort, SubscriptionRecord, SubscriptionState,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: &Account) -> Result<(), RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Account, RepositoryError>;
    async fn get_by_email(&self, email: &str) -> Result<Account, RepositoryError>;
    async fn update_role(&self, id: Uuid, role: Role) -> Result<(), RepositoryError>;
    /// Consumes the one-time trial grant. Guarded by `has_used_trial` in the
    /// same statement, so a concurrent double-adopt cannot grant twice.
    /// Returns false when the guard lost.
    async fn begin_trial(
        &self,
        id: Uuid,
        trial_ends_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
    async fn activate_subscription(
        &self,
        id: Uuid,
        subscription_ref: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    async fn cancel_subscription(
        &self,
        id: Uuid,
        cancelled_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    /// Owners failing the visibility predicate at `now` that still have at
    /// least one listing marked subscription_active. SQL mirror of
    /// `SubscriptionState::is_visible_at`.
    async fn list_lapsed_owner_ids(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, RepositoryError>;
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, listing: &Listing) -> Result<(), RepositoryError>;
    /// Active listings only; an owner-deleted listing reads as not found.
    async fn get_by_id(&self, id: Uuid) -> Result<Listing, RepositoryError>;
    async fn get_by_owner_and_kind(
        &self,
        owner_id: Uuid,
        kind: ListingKind,
    ) -> Result<Option<Listing>, RepositoryError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, RepositoryError>;
    async fn update_profile(
        &self,
        id: Uuid,
        owner_id: Uuid,
        profile: &ListingProfile,
    ) -> Result<(), RepositoryError>;
    async fn set_active(
        &self,
        id: Uuid,
        owner_id: Uuid,
        active: bool,
    ) -> Result<(), RepositoryError>;
    /// One radius step: active + visible listings of `kind` within
    /// `radius_km` of `origin`, filters applied, up to `cap` rows.
    async fn search_within_radius(
        &self,
        kind: ListingKind,
        origin: GeoPoint,
        radius_km: f64,
        filters: &SearchFilters,
        sort: SearchSort,
        cap: i64,
    ) -> Result<Vec<Listing>, RepositoryError>;
    /// The no-origin path: equality/substring filters only.
    async fn search_filtered(
        &self,
        kind: ListingKind,
        filters: &SearchFilters,
        sort: SearchSort,
        cap: i64,
    ) -> Result<Vec<Listing>, RepositoryError>;
    /// Flips the derived flag on every listing the owner has, all kinds.
    async fn set_visibility_for_owner(
        &self,
        owner_id: Uuid,
        visible: bool,
    ) -> Result<u64, RepositoryError>;
    /// Sweep path: one bulk hide per kind. The `subscription_active`
    /// condition makes a repeat run write nothing.
    async fn hide_for_owners(
        &self,
        kind: ListingKind,
        owner_ids: &[Uuid],
    ) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait SubscriptionLogRepository: Send + Sync {
    async fn create(&self, record: &SubscriptionRecord) -> Result<(), RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<SubscriptionRecord, RepositoryError>;
    async fn exists_by_payment_id(&self, payment_id: &str) -> Result<bool, RepositoryError>;
    async fn list_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<SubscriptionRecord>, RepositoryError>;
}

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "id, email, oauth_id, role, is_active, is_subscribed, \
     has_used_trial, trial_ends_at, expires_at, cancelled_at, subscription_ref, \
     created_at, updated_at";

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: &Account) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, oauth_id, role, is_active, is_subscribed,
                                  has_used_trial, trial_ends_at, expires_at, cancelled_at,
                                  subscription_ref, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.oauth_id)
        .bind(account.role.to_string())
        .bind(account.is_active)
        .bind(account.subscription.is_subscribed)
        .bind(account.subscription.has_used_trial)
        .bind(account.subscription.trial_ends_at)
        .bind(account.subscription.expires_at)
        .bind(account.subscription.cancelled_at)
        .bind(account.subscription.subscription_ref)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Account, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(format!("Account {}", id)),
            _ => RepositoryError::DatabaseError(e),
        })?;

        row_to_account(&row)
    }

    async fn get_by_email(&self, email: &str) -> Result<Account, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(format!("Account {}", email)),
            _ => RepositoryError::DatabaseError(e),
        })?;

        row_to_account(&row)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET role = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(role.to_string())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Account {}", id)));
        }

        Ok(())
    }

    async fn begin_trial(
        &self,
        id: Uuid,
        trial_ends_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET has_used_trial = TRUE, trial_ends_at = $1, updated_at = $2
            WHERE id = $3 AND NOT has_used_trial
            "#,
        )
        .bind(trial_ends_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn activate_subscription(
        &self,
        id: Uuid,
        subscription_ref: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_subscribed = TRUE, subscription_ref = $1, expires_at = $2,
                cancelled_at = NULL, updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(subscription_ref)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Account {}", id)));
        }

        Ok(())
    }

    async fn cancel_subscription(
        &self,
        id: Uuid,
        cancelled_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_subscribed = FALSE, cancelled_at = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(cancelled_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Account {}", id)));
        }

        Ok(())
    }

    async fn list_lapsed_owner_ids(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT a.id
            FROM accounts a
            WHERE NOT (
                (a.expires_at IS NOT NULL AND a.expires_at > $1
                     AND (a.is_subscribed OR a.cancelled_at IS NOT NULL))
                OR (a.trial_ends_at IS NOT NULL AND a.trial_ends_at > $1)
            )
            AND EXISTS (
                SELECT 1 FROM listings l
                WHERE l.owner_id = a.id AND l.subscription_active
            )
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get("id").map_err(RepositoryError::DatabaseError))
            .collect()
    }
}

fn row_to_account(row: &sqlx::postgres::PgRow) -> Result<Account, RepositoryError> {
    let role_str: String = row.try_get("role")?;
    let role = Role::from_str(&role_str)
        .map_err(|_| RepositoryError::InvalidData(format!("Unknown role: {}", role_str)))?;

    Ok(Account {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        oauth_id: row.try_get("oauth_id")?,
        role,
        is_active: row.try_get("is_active")?,
        subscription: SubscriptionState {
            is_subscribed: row.try_get("is_subscribed")?,
            has_used_trial: row.try_get("has_used_trial")?,
            trial_ends_at: row.try_get("trial_ends_at")?,
            expires_at: row.try_get("expires_at")?,
            cancelled_at: row.try_get("cancelled_at")?,
            subscription_ref: row.try_get("subscription_ref")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LISTING_COLUMNS: &str = "id, owner_id, kind, name, description, category, address, \
     city, state, pincode, phone, whatsapp, \
     ST_X(location::geometry) AS lng, ST_Y(location::geometry) AS lat, \
     rating, total_reviews, is_active, subscription_active, created_at, updated_at";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &SearchFilters) {
    if let Some(city) = &filters.city {
        qb.push(" AND city = ");
        qb.push_bind(city.clone());
    }
    if let Some(state) = &filters.state {
        qb.push(" AND state = ");
        qb.push_bind(state.clone());
    }
    if let Some(category) = &filters.category {
        qb.push(" AND category = ");
        qb.push_bind(category.clone());
    }
    if let Some(text) = &filters.text {
        qb.push(" AND name ILIKE ");
        qb.push_bind(format!("%{}%", text));
    }
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn create(&self, listing: &Listing) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO listings (id, owner_id, kind, name, description, category, address,
                                  city, state, pincode, phone, whatsapp, location,
                                  rating, total_reviews, is_active, subscription_active,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    ST_SetSRID(ST_MakePoint($13, $14), 4326)::geography,
                    $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(listing.id)
        .bind(listing.owner_id)
        .bind(listing.kind.to_string())
        .bind(&listing.name)
        .bind(&listing.description)
        .bind(&listing.category)
        .bind(&listing.address)
        .bind(&listing.city)
        .bind(&listing.state)
        .bind(&listing.pincode)
        .bind(&listing.phone)
        .bind(&listing.whatsapp)
        .bind(listing.location.lng)
        .bind(listing.location.lat)
        .bind(listing.rating)
        .bind(listing.total_reviews)
        .bind(listing.is_active)
        .bind(listing.subscription_active)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict(
                format!("Owner {} already has a {} listing", listing.owner_id, listing.kind),
            ),
            _ => RepositoryError::DatabaseError(e),
        })?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Listing, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(format!("Listing {}", id)),
            _ => RepositoryError::DatabaseError(e),
        })?;

        row_to_listing(&row)
    }

    async fn get_by_owner_and_kind(
        &self,
        owner_id: Uuid,
        kind: ListingKind,
    ) -> Result<Option<Listing>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE owner_id = $1 AND kind = $2"
        ))
        .bind(owner_id)
        .bind(kind.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_listing).transpose()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_listing).collect()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        owner_id: Uuid,
        profile: &ListingProfile,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET name = $1, description = $2, category = $3, address = $4,
                city = $5, state = $6, pincode = $7, phone = $8, whatsapp = $9,
                location = ST_SetSRID(ST_MakePoint($10, $11), 4326)::geography,
                updated_at = $12
            WHERE id = $13 AND owner_id = $14
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(&profile.category)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.pincode)
        .bind(&profile.phone)
        .bind(&profile.whatsapp)
        .bind(profile.lng)
        .bind(profile.lat)
        .bind(Utc::now())
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Listing {}", id)));
        }

        Ok(())
    }

    async fn set_active(
        &self,
        id: Uuid,
        owner_id: Uuid,
        active: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET is_active = $1, updated_at = $2
            WHERE id = $3 AND owner_id = $4
            "#,
        )
        .bind(active)
        .bind(Utc::now())
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Listing {}", id)));
        }

        Ok(())
    }

    async fn search_within_radius(
        &self,
        kind: ListingKind,
        origin: GeoPoint,
        radius_km: f64,
        filters: &SearchFilters,
        sort: SearchSort,
        cap: i64,
    ) -> Result<Vec<Listing>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {LISTING_COLUMNS} FROM listings \
             WHERE is_active AND subscription_active AND kind = "
        ));
        qb.push_bind(kind.to_string());

        qb.push(" AND ST_DWithin(location, ST_SetSRID(ST_MakePoint(");
        qb.push_bind(origin.lng);
        qb.push(", ");
        qb.push_bind(origin.lat);
        qb.push("), 4326)::geography, ");
        qb.push_bind(radius_km * 1000.0);
        qb.push(")");

        push_filters(&mut qb, filters);

        match sort {
            SearchSort::Nearest => {
                qb.push(" ORDER BY location <-> ST_SetSRID(ST_MakePoint(");
                qb.push_bind(origin.lng);
                qb.push(", ");
                qb.push_bind(origin.lat);
                qb.push("), 4326)::geography");
            }
            SearchSort::Rating => {
                qb.push(" ORDER BY rating DESC, total_reviews DESC");
            }
        }

        qb.push(" LIMIT ");
        qb.push_bind(cap);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_listing).collect()
    }

    async fn search_filtered(
        &self,
        kind: ListingKind,
        filters: &SearchFilters,
        sort: SearchSort,
        cap: i64,
    ) -> Result<Vec<Listing>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {LISTING_COLUMNS} FROM listings \
             WHERE is_active AND subscription_active AND kind = "
        ));
        qb.push_bind(kind.to_string());

        push_filters(&mut qb, filters);

        match sort {
            // No origin to measure from; recency is the default ordering.
            SearchSort::Nearest => qb.push(" ORDER BY created_at DESC"),
            SearchSort::Rating => qb.push(" ORDER BY rating DESC, total_reviews DESC"),
        };

        qb.push(" LIMIT ");
        qb.push_bind(cap);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_listing).collect()
    }

    async fn set_visibility_for_owner(
        &self,
        owner_id: Uuid,
        visible: bool,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET subscription_active = $1, updated_at = $2
            WHERE owner_id = $3 AND subscription_active <> $1
            "#,
        )
        .bind(visible)
        .bind(Utc::now())
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn hide_for_owners(
        &self,
        kind: ListingKind,
        owner_ids: &[Uuid],
    ) -> Result<u64, RepositoryError> {
        if owner_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE listings
            SET subscription_active = FALSE, updated_at = $1
            WHERE kind = $2 AND owner_id = ANY($3) AND subscription_active
            "#,
        )
        .bind(Utc::now())
        .bind(kind.to_string())
        .bind(owner_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn row_to_listing(row: &sqlx::postgres::PgRow) -> Result<Listing, RepositoryError> {
    let kind_str: String = row.try_get("kind")?;
    let kind = ListingKind::from_str(&kind_str)
        .map_err(|_| RepositoryError::InvalidData(format!("Unknown listing kind: {}", kind_str)))?;

    let lng: f64 = row.try_get("lng")?;
    let lat: f64 = row.try_get("lat")?;
    let location = GeoPoint::new(lng, lat).ok_or_else(|| {
        RepositoryError::InvalidData(format!("Out-of-range coordinates ({}, {})", lng, lat))
    })?;

    Ok(Listing {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        kind,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        pincode: row.try_get("pincode")?,
        phone: row.try_get("phone")?,
        whatsapp: row.try_get("whatsapp")?,
        location,
        rating: row.try_get("rating")?,
        total_reviews: row.try_get("total_reviews")?,
        is_active: row.try_get("is_active")?,
        subscription_active: row.try_get("subscription_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct PostgresSubscriptionLogRepository {
    pool: PgPool,
}

impl PostgresSubscriptionLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SUBSCRIPTION_COLUMNS: &str = "id, account_id, plan, role, amount, starts_at, ends_at, \
     razorpay_order_id, razorpay_payment_id, created_at";

#[async_trait]
impl SubscriptionLogRepository for PostgresSubscriptionLogRepository {
    async fn create(&self, record: &SubscriptionRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, account_id, plan, role, amount, starts_at, ends_at,
                                       razorpay_order_id, razorpay_payment_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id)
        .bind(record.account_id)
        .bind(record.plan.to_string())
        .bind(record.role.to_string())
        .bind(record.amount)
        .bind(record.starts_at)
        .bind(record.ends_at)
        .bind(&record.razorpay_order_id)
        .bind(&record.razorpay_payment_id)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict(
                format!("Payment {} already recorded", record.razorpay_payment_id),
            ),
            _ => RepositoryError::DatabaseError(e),
        })?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<SubscriptionRecord, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(format!("Subscription {}", id)),
            _ => RepositoryError::DatabaseError(e),
        })?;

        row_to_subscription(&row)
    }

    async fn exists_by_payment_id(&self, payment_id: &str) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE razorpay_payment_id = $1",
        )
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn list_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<SubscriptionRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE account_id = $1 ORDER BY created_at DESC"
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_subscription).collect()
    }
}

fn row_to_subscription(row: &sqlx::postgres::PgRow) -> Result<SubscriptionRecord, RepositoryError> {
    let plan_str: String = row.try_get("plan")?;
    let plan = PlanType::from_str(&plan_str)
        .map_err(|_| RepositoryError::InvalidData(format!("Unknown plan: {}", plan_str)))?;

    let role_str: String = row.try_get("role")?;
    let role = Role::from_str(&role_str)
        .map_err(|_| RepositoryError::InvalidData(format!("Unknown role: {}", role_str)))?;

    Ok(SubscriptionRecord {
        id: row.try_get("id")?,
        account_id: row.try_get("account_id")?,
        plan,
        role,
        amount: row.try_get("amount")?,
        starts_at: row.try_get("starts_at")?,
        ends_at: row.try_get("ends_at")?,
        razorpay_order_id: row.try_get("razorpay_order_id")?,
        razorpay_payment_id: row.try_get("razorpay_payment_id")?,
        created_at: row.try_get("created_at")?,
    })
}
