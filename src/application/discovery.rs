use crate::domain::{GeoPoint, Listing, ListingKind, SearchFilters, SearchSort};
use crate::infrastructure::{AccountRepository, ListingRepository, RepositoryError};
use chrono::Utc;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The radius at which the ladder stopped. Serialized as the km number, or
/// the string "unbounded" when a geo attempt degraded to the filter-only
/// path; absent entirely when the caller never supplied an origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusUsed {
    Km(f64),
    Unbounded,
}

impl Serialize for RadiusUsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RadiusUsed::Km(km) => serializer.serialize_f64(*km),
            RadiusUsed::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchPage {
    pub page: usize,
    pub limit: usize,
}

impl Default for SearchPage {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<Listing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_used: Option<RadiusUsed>,
}

/// Direct-fetch result: the gate hides everything but id + name for a
/// delisted owner, which is still distinct from "does not exist".
#[derive(Debug)]
pub enum ListingFetch {
    Full(Box<Listing>),
    Expired { id: Uuid, name: String },
}

#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    /// Non-decreasing, validated at config load.
    pub radius_ladder_km: Vec<f64>,
    pub min_results: usize,
    pub scan_cap: i64,
    pub step_timeout: Duration,
}

#[derive(Error, Debug)]
enum StepFailure {
    #[error("geo step failed: {0}")]
    Repository(#[from] RepositoryError),
    #[error("geo step at {0} km timed out before any step completed")]
    Timeout(f64),
}

pub struct DiscoveryService<A, L>
where
    A: AccountRepository,
    L: ListingRepository,
{
    account_repo: Arc<A>,
    listing_repo: Arc<L>,
    settings: DiscoverySettings,
}

impl<A, L> DiscoveryService<A, L>
where
    A: AccountRepository,
    L: ListingRepository,
{
    pub fn new(account_repo: Arc<A>, listing_repo: Arc<L>, settings: DiscoverySettings) -> Self {
        Self {
            account_repo,
            listing_repo,
            settings,
        }
    }

    /// Distance-expanding search. With an origin, walks the radius ladder and
    /// returns exactly one step's result set (a fresh superset query per
    /// step, never a union across steps). Without one, runs the plain filter
    /// query. Geo failures and malformed coordinates degrade to the filter
    /// path instead of failing the request.
    pub async fn search(
        &self,
        kind: ListingKind,
        raw_origin: Option<(f64, f64)>,
        filters: &SearchFilters,
        sort: SearchSort,
        page: SearchPage,
    ) -> Result<SearchOutcome, DiscoveryError> {
        let mut degraded = false;
        let origin = match raw_origin {
            Some((lng, lat)) => {
                let point = GeoPoint::new(lng, lat);
                if point.is_none() {
                    warn!(lng, lat, "Malformed coordinates, using filter-only search");
                    degraded = true;
                }
                point
            }
            None => None,
        };

        let (results, radius_used) = match origin {
            Some(origin) => match self.expand_search(kind, origin, filters, sort).await {
                Ok((items, radius_km)) => (items, Some(RadiusUsed::Km(radius_km))),
                Err(failure) => {
                    warn!(error = %failure, "Geo search degraded to filter-only path");
                    let items = self
                        .listing_repo
                        .search_filtered(kind, filters, sort, self.settings.scan_cap)
                        .await?;
                    (items, Some(RadiusUsed::Unbounded))
                }
            },
            None => {
                let items = self
                    .listing_repo
                    .search_filtered(kind, filters, sort, self.settings.scan_cap)
                    .await?;
                let radius = degraded.then_some(RadiusUsed::Unbounded);
                (items, radius)
            }
        };

        Ok(SearchOutcome {
            results: paginate(results, page),
            radius_used,
        })
    }

    /// Walks the ladder until one step yields at least `min_results`, or the
    /// ladder runs out (the largest step's results are used regardless of
    /// count). Counting happens after all filters and the visibility
    /// predicate are applied, never against the raw geo result.
    async fn expand_search(
        &self,
        kind: ListingKind,
        origin: GeoPoint,
        filters: &SearchFilters,
        sort: SearchSort,
    ) -> Result<(Vec<Listing>, f64), StepFailure> {
        let mut best: Option<(Vec<Listing>, f64)> = None;

        for &radius_km in &self.settings.radius_ladder_km {
            let step = timeout(
                self.settings.step_timeout,
                self.listing_repo.search_within_radius(
                    kind,
                    origin,
                    radius_km,
                    filters,
                    sort,
                    self.settings.scan_cap,
                ),
            )
            .await;

            match step {
                Ok(Ok(items)) => {
                    let enough = items.len() >= self.settings.min_results;
                    best = Some((items, radius_km));
                    if enough {
                        break;
                    }
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_elapsed) => {
                    // Abandon the remaining steps; a completed smaller step is
                    // still a usable answer.
                    return match best {
                        Some((items, completed_km)) => {
                            warn!(
                                radius_km,
                                completed_km, "Geo step timed out, returning previous step"
                            );
                            Ok((items, completed_km))
                        }
                        None => Err(StepFailure::Timeout(radius_km)),
                    };
                }
            }
        }

        best.ok_or_else(|| {
            StepFailure::Repository(RepositoryError::InvalidData(
                "empty radius ladder".to_string(),
            ))
        })
    }

    /// Visibility gate for direct fetches. Search already filters on the
    /// persisted flag; this path re-derives visibility from the owner's live
    /// subscription state because the sweep may lag behind an expiry.
    pub async fn fetch_listing(&self, id: Uuid) -> Result<ListingFetch, DiscoveryError> {
        let listing = self.listing_repo.get_by_id(id).await?;
        let owner = self.account_repo.get_by_id(listing.owner_id).await?;

        if owner.subscription.is_visible_at(Utc::now()) {
            Ok(ListingFetch::Full(Box::new(listing)))
        } else {
            info!(listing_id = %listing.id, "Hiding expired listing on direct fetch");
            Ok(ListingFetch::Expired {
                id: listing.id,
                name: listing.name,
            })
        }
    }
}

/// Skip/limit over the single chosen step's result set. Page stability across
/// calls is not guaranteed when the chosen step changes between them; that is
/// the documented tradeoff, not something to paper over here.
fn paginate(items: Vec<Listing>, page: SearchPage) -> Vec<Listing> {
    let limit = page.limit.max(1);
    let skip = page.page.saturating_sub(1).saturating_mul(limit);
    items.into_iter().skip(skip).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingProfile;

    fn listing(n: u32) -> Listing {
        Listing::new(
            Uuid::new_v4(),
            ListingKind::Store,
            ListingProfile {
                name: format!("Store {}", n),
                description: None,
                category: "Grocery & Food".to_string(),
                address: None,
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pincode: None,
                phone: None,
                whatsapp: None,
                lng: 73.85,
                lat: 18.52,
            },
            true,
        )
    }

    #[test]
    fn paginate_applies_skip_and_limit() {
        let items: Vec<Listing> = (0..7).map(listing).collect();

        let page1 = paginate(items.clone(), SearchPage { page: 1, limit: 3 });
        assert_eq!(page1.len(), 3);
        assert_eq!(page1[0].name, "Store 0");

        let page3 = paginate(items.clone(), SearchPage { page: 3, limit: 3 });
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].name, "Store 6");

        let past_end = paginate(items, SearchPage { page: 5, limit: 3 });
        assert!(past_end.is_empty());
    }

    #[test]
    fn paginate_treats_zero_limit_as_one() {
        let items: Vec<Listing> = (0..3).map(listing).collect();
        let page = paginate(items, SearchPage { page: 2, limit: 0 });
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Store 1");
    }

    #[test]
    fn radius_used_serializes_as_number_or_marker() {
        assert_eq!(serde_json::to_string(&RadiusUsed::Km(5.0)).unwrap(), "5.0");
        assert_eq!(
            serde_json::to_string(&RadiusUsed::Unbounded).unwrap(),
            "\"unbounded\""
        );
    }
}
