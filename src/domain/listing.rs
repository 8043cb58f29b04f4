use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::domain::Role;

/// The three structurally parallel business listing variants. Everything that
/// operates on listings is parametrized over this instead of being copied per
/// variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Store,
    Restaurant,
    Freelancer,
}

impl ListingKind {
    pub const ALL: [ListingKind; 3] = [
        ListingKind::Store,
        ListingKind::Restaurant,
        ListingKind::Freelancer,
    ];

    /// The business role entitled to own a listing of this kind.
    pub fn owning_role(self) -> Role {
        match self {
            ListingKind::Store => Role::Seller,
            ListingKind::Restaurant => Role::Restaurant,
            ListingKind::Freelancer => Role::Freelancer,
        }
    }

    pub fn for_role(role: Role) -> Option<ListingKind> {
        match role {
            Role::Seller => Some(ListingKind::Store),
            Role::Restaurant => Some(ListingKind::Restaurant),
            Role::Freelancer => Some(ListingKind::Freelancer),
            _ => None,
        }
    }
}

/// Longitude/latitude pair, WGS84. Constructed only through `new` so malformed
/// coordinates are caught before they reach the geo index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Option<GeoPoint> {
        let in_range =
            (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat) && lng.is_finite() && lat.is_finite();
        in_range.then_some(GeoPoint { lng, lat })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: ListingKind,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub location: GeoPoint,
    /// Maintained by the review subsystem; read-only here.
    pub rating: f64,
    pub total_reviews: i32,
    /// Owner-controlled soft delete.
    pub is_active: bool,
    /// Derived visibility flag. Only the state machine and the expiry sweep
    /// write it; owner edits cannot touch it.
    pub subscription_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equality/substring filters shared by every search path. All optional;
/// empty filters are valid and match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub city: Option<String>,
    pub state: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive substring match on the listing name.
    pub text: Option<String>,
}

/// Result ordering. Nearest-first is the default inside a radius step;
/// rating order forfeits the nearest-first guarantee and is therefore an
/// explicit caller choice, never combined with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    #[default]
    Nearest,
    Rating,
}

/// Owner-editable profile fields. Visibility and rating are deliberately not
/// part of this struct, so no update path can smuggle them in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingProfile {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub category: String,
    pub address: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub city: String,
    #[validate(length(min = 1, max = 80))]
    pub state: String,
    pub pincode: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
}

impl Listing {
    pub fn new(owner_id: Uuid, kind: ListingKind, profile: ListingProfile, visible: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            kind,
            name: profile.name,
            description: profile.description,
            category: profile.category,
            address: profile.address,
            city: profile.city,
            state: profile.state,
            pincode: profile.pincode,
            phone: profile.phone,
            whatsapp: profile.whatsapp,
            location: GeoPoint {
                lng: profile.lng,
                lat: profile.lat,
            },
            rating: 0.0,
            total_reviews: 0,
            is_active: true,
            subscription_active: visible,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(77.59, 12.97).is_some());
        assert!(GeoPoint::new(-180.0, 90.0).is_some());
        assert!(GeoPoint::new(181.0, 10.0).is_none());
        assert!(GeoPoint::new(10.0, -91.0).is_none());
        assert!(GeoPoint::new(f64::NAN, 10.0).is_none());
    }

    #[test]
    fn kind_role_mapping_is_symmetric() {
        for kind in ListingKind::ALL {
            assert_eq!(ListingKind::for_role(kind.owning_role()), Some(kind));
        }
        assert_eq!(ListingKind::for_role(Role::Customer), None);
        assert_eq!(ListingKind::for_role(Role::ContentWriter), None);
    }

    #[test]
    fn kind_string_mapping() {
        use std::str::FromStr;
        assert_eq!(ListingKind::Store.to_string(), "store");
        assert_eq!(ListingKind::from_str("freelancer").unwrap(), ListingKind::Freelancer);
        assert!(ListingKind::from_str("hotel").is_err());
    }
}
