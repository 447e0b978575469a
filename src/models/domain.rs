use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Affinity tag classifying both a rider's momentary preference state and a
/// business's category. The universe is fixed at these six labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AffinityTag {
    LowCalories,
    EnergyProviders,
    WillingTour,
    StressRelease,
    HappyChoice,
    Others,
}

impl AffinityTag {
    /// Wire representation, as it appears in profiles and catalog records.
    pub fn as_str(&self) -> &'static str {
        match self {
            AffinityTag::LowCalories => "lowCalories",
            AffinityTag::EnergyProviders => "energyProviders",
            AffinityTag::WillingTour => "willingTour",
            AffinityTag::StressRelease => "stressRelease",
            AffinityTag::HappyChoice => "happyChoice",
            AffinityTag::Others => "others",
        }
    }
}

impl Default for AffinityTag {
    fn default() -> Self {
        AffinityTag::Others
    }
}

impl fmt::Display for AffinityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Momentary physiological/behavioral signal readings for a rider.
/// Most-recent value wins on every update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalReadings {
    pub mood: i64,
    pub blood_sugar: i64,
    pub stress: i64,
    pub active: i64,
}

/// Live per-rider profile, keyed by rider id.
///
/// Created from the bootstrap catalog at startup and mutated in place by
/// `RIDER_STATUS` (signals + tags) and `RIDER_INTEREST` (interest) events.
/// Never deleted during normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderProfile {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub device: String,
    #[serde(default)]
    pub interest: String,
    pub travel_count: i64,
    pub age: i64,
    #[serde(flatten)]
    pub signals: SignalReadings,
    /// Recomputed whenever signals update; never empty.
    #[serde(default)]
    pub tags: BTreeSet<AffinityTag>,
}

impl RiderProfile {
    pub fn has_tag(&self, tag: AffinityTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Static catalog entry for a local business, keyed by store id.
/// Immutable after bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    #[serde(rename = "storeId")]
    pub store_id: String,
    pub name: String,
    /// Single category string for this business.
    pub categories: String,
    pub review_count: i64,
    pub rating: f64,
    /// Price tier symbol: "", "$", "$$", "$$$" or "$$$$".
    #[serde(default)]
    pub price: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Computed once at load time from `categories`; never recomputed.
    #[serde(default)]
    pub tag: AffinityTag,
}

/// Ephemeral context carried by a single ride request. Not persisted.
#[derive(Debug, Clone, Copy)]
pub struct RideRequestContext {
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Outbound advertisement placement, emitted for a matched ride request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdPlacement {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "storeId")]
    pub store_id: String,
    pub name: String,
}
