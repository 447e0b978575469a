use std::sync::Arc;

use tracing::debug;

use crate::core::{matcher::select_best, tags::derive_tags};
use crate::models::{
    AdPlacement, BusinessProfile, InboundEvent, RideRequestContext, RideRequestEvent,
    RiderInterestEvent, RiderProfile, RiderStatusEvent,
};
use crate::services::store::{KeyedStore, MemoryStore};

/// An interest observation must outlast this many milliseconds before it
/// replaces the rider's modeled interest. Anything at or below the
/// threshold is treated as a fleeting glance and ignored.
pub const INTEREST_MIN_DURATION_MS: i64 = 5 * 60 * 1000;

/// Shared immutable business catalog, loaded once at bootstrap.
pub type Catalog = MemoryStore<String, BusinessProfile>;

/// Routes inbound events onto profile mutations or match selection.
///
/// One router exists per partition and owns that partition's rider store;
/// the catalog is shared and read-only. Routing itself is stateless per
/// event. Events for riders this partition has never seen are silent
/// no-ops, an expected steady-state condition.
pub struct Router<S = MemoryStore<i64, RiderProfile>>
where
    S: KeyedStore<i64, RiderProfile>,
{
    riders: S,
    catalog: Arc<Catalog>,
    interest_min_duration_ms: i64,
}

impl<S> Router<S>
where
    S: KeyedStore<i64, RiderProfile>,
{
    pub fn new(riders: S, catalog: Arc<Catalog>) -> Self {
        Self {
            riders,
            catalog,
            interest_min_duration_ms: INTEREST_MIN_DURATION_MS,
        }
    }

    /// Override the anti-flicker interest threshold (milliseconds).
    pub fn with_interest_threshold(mut self, threshold_ms: i64) -> Self {
        self.interest_min_duration_ms = threshold_ms;
        self
    }

    /// Process one event, returning a placement for matched ride requests.
    pub fn handle(&mut self, event: InboundEvent) -> Option<AdPlacement> {
        match event {
            InboundEvent::RiderStatus(e) => {
                self.handle_rider_status(e);
                None
            }
            InboundEvent::RiderInterest(e) => {
                self.handle_rider_interest(e);
                None
            }
            InboundEvent::RideRequest(e) => self.handle_ride_request(e),
        }
    }

    fn handle_rider_status(&mut self, event: RiderStatusEvent) {
        let Some(profile) = self.riders.get(&event.user_id) else {
            debug!(user_id = event.user_id, "status for unknown rider, dropped");
            return;
        };

        let mut profile = profile.clone();
        profile.signals = event.signals;
        profile.tags = derive_tags(&event.signals);
        self.riders.put(event.user_id, profile);
    }

    fn handle_rider_interest(&mut self, event: RiderInterestEvent) {
        let Some(profile) = self.riders.get(&event.user_id) else {
            debug!(user_id = event.user_id, "interest for unknown rider, dropped");
            return;
        };

        if event.duration <= self.interest_min_duration_ms {
            debug!(
                user_id = event.user_id,
                duration = event.duration,
                "interest below duration threshold, ignored"
            );
            return;
        }

        let mut profile = profile.clone();
        profile.interest = event.interest;
        self.riders.put(event.user_id, profile);
    }

    fn handle_ride_request(&mut self, event: RideRequestEvent) -> Option<AdPlacement> {
        let rider = self.riders.get(&event.client_id)?;

        let request = RideRequestContext {
            user_id: event.client_id,
            latitude: event.latitude,
            longitude: event.longitude,
        };

        let best = select_best(rider, self.catalog.values(), &request)?;

        debug!(
            user_id = event.client_id,
            store_id = %best.store_id,
            "matched ride request"
        );

        Some(AdPlacement {
            user_id: event.client_id,
            store_id: best.store_id.clone(),
            name: best.name.clone(),
        })
    }

    /// Read access for tests and diagnostics.
    pub fn rider(&self, user_id: i64) -> Option<&RiderProfile> {
        self.riders.get(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::models::{AffinityTag, SignalReadings};

    fn rider(user_id: i64) -> RiderProfile {
        RiderProfile {
            user_id,
            device: "iPhone 7".to_string(),
            interest: String::new(),
            travel_count: 10,
            age: 25,
            signals: SignalReadings {
                mood: 5,
                blood_sugar: 3,
                stress: 2,
                active: 2,
            },
            tags: BTreeSet::from([AffinityTag::EnergyProviders]),
        }
    }

    fn bakery(store_id: &str) -> BusinessProfile {
        BusinessProfile {
            store_id: store_id.to_string(),
            name: "Cloud Bakery".to_string(),
            categories: "bakeries".to_string(),
            review_count: 100,
            rating: 4.5,
            price: "$".to_string(),
            latitude: 40.7128,
            longitude: -74.0060,
            tag: AffinityTag::EnergyProviders,
        }
    }

    fn router_with(riders: Vec<RiderProfile>, catalog: Vec<BusinessProfile>) -> Router {
        let riders: MemoryStore<i64, RiderProfile> =
            riders.into_iter().map(|r| (r.user_id, r)).collect();
        let catalog: Catalog = catalog
            .into_iter()
            .map(|b| (b.store_id.clone(), b))
            .collect();
        Router::new(riders, Arc::new(catalog))
    }

    fn status(user_id: i64, mood: i64, blood_sugar: i64, stress: i64, active: i64) -> InboundEvent {
        InboundEvent::RiderStatus(RiderStatusEvent {
            user_id,
            signals: SignalReadings {
                mood,
                blood_sugar,
                stress,
                active,
            },
        })
    }

    #[test]
    fn test_rider_status_overwrites_signals_and_tags() {
        let mut router = router_with(vec![rider(1)], vec![]);

        let out = router.handle(status(1, 8, 5, 1, 3));
        assert!(out.is_none());

        let profile = router.rider(1).unwrap();
        assert_eq!(profile.signals.mood, 8);
        assert!(profile.has_tag(AffinityTag::LowCalories));
        assert!(profile.has_tag(AffinityTag::HappyChoice));
        assert!(profile.has_tag(AffinityTag::WillingTour));
        assert!(!profile.has_tag(AffinityTag::EnergyProviders));
    }

    #[test]
    fn test_rider_status_for_unknown_rider_is_noop() {
        let mut router = router_with(vec![rider(1)], vec![]);
        router.handle(status(42, 8, 5, 1, 3));
        assert!(router.rider(42).is_none());
        assert_eq!(router.rider(1).unwrap().signals.mood, 5);
    }

    #[test]
    fn test_rider_interest_respects_duration_threshold() {
        let mut router = router_with(vec![rider(1)], vec![]);

        router.handle(InboundEvent::RiderInterest(RiderInterestEvent {
            user_id: 1,
            interest: "sushi".to_string(),
            duration: INTEREST_MIN_DURATION_MS,
        }));
        assert_eq!(router.rider(1).unwrap().interest, "");

        router.handle(InboundEvent::RiderInterest(RiderInterestEvent {
            user_id: 1,
            interest: "sushi".to_string(),
            duration: INTEREST_MIN_DURATION_MS + 1,
        }));
        assert_eq!(router.rider(1).unwrap().interest, "sushi");
    }

    #[test]
    fn test_ride_request_emits_placement() {
        let mut router = router_with(vec![rider(1)], vec![bakery("store-1")]);

        let placement = router
            .handle(InboundEvent::RideRequest(RideRequestEvent {
                client_id: 1,
                latitude: 40.7128,
                longitude: -74.0060,
            }))
            .unwrap();

        assert_eq!(
            placement,
            AdPlacement {
                user_id: 1,
                store_id: "store-1".to_string(),
                name: "Cloud Bakery".to_string(),
            }
        );
    }

    #[test]
    fn test_ride_request_for_unknown_rider_emits_nothing() {
        let mut router = router_with(vec![rider(1)], vec![bakery("store-1")]);

        let placement = router.handle(InboundEvent::RideRequest(RideRequestEvent {
            client_id: 99,
            latitude: 40.7128,
            longitude: -74.0060,
        }));
        assert!(placement.is_none());
    }

    #[test]
    fn test_score_tie_resolves_to_lowest_store_id() {
        let mut router = router_with(vec![rider(1)], vec![bakery("b"), bakery("a")]);

        let placement = router
            .handle(InboundEvent::RideRequest(RideRequestEvent {
                client_id: 1,
                latitude: 40.7128,
                longitude: -74.0060,
            }))
            .unwrap();
        assert_eq!(placement.store_id, "a");
    }
}
