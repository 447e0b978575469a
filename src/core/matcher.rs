use crate::core::scoring::score_candidate;
use crate::models::{BusinessProfile, RideRequestContext, RiderProfile};

/// Select the best-matching business for a ride request.
///
/// Candidates whose tag is not in the rider's current tag set are skipped
/// before scoring. The remaining candidates race on a strict greater-than
/// arg-max, so on equal scores the earliest candidate in scan order wins;
/// callers iterate the catalog in ascending store id, which makes ties
/// deterministically resolve to the lowest id. The running maximum starts
/// just above zero, so a candidate scoring 0 never produces a placement.
///
/// Selection is linear in the catalog and runs synchronously on the
/// partition's processing thread.
pub fn select_best<'a, I>(
    rider: &RiderProfile,
    candidates: I,
    request: &RideRequestContext,
) -> Option<&'a BusinessProfile>
where
    I: IntoIterator<Item = &'a BusinessProfile>,
{
    let mut best: Option<&BusinessProfile> = None;
    let mut max_score = f64::MIN_POSITIVE;

    for business in candidates {
        if !rider.has_tag(business.tag) {
            continue;
        }

        let score = score_candidate(rider, business, request);
        if score > max_score {
            max_score = score;
            best = Some(business);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::models::{AffinityTag, SignalReadings};

    fn rider_with_tags(tags: &[AffinityTag]) -> RiderProfile {
        RiderProfile {
            user_id: 1,
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
            tags: tags.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    fn business(
        store_id: &str,
        tag: AffinityTag,
        review_count: i64,
        rating: f64,
    ) -> BusinessProfile {
        BusinessProfile {
            store_id: store_id.to_string(),
            name: format!("Store {}", store_id),
            categories: "bakeries".to_string(),
            review_count,
            rating,
            price: "$$".to_string(),
            latitude: 40.7128,
            longitude: -74.0060,
            tag,
        }
    }

    fn request() -> RideRequestContext {
        RideRequestContext {
            user_id: 1,
            latitude: 40.7128,
            longitude: -74.0060,
        }
    }

    #[test]
    fn test_selects_highest_scoring_candidate() {
        let rider = rider_with_tags(&[AffinityTag::EnergyProviders]);
        let catalog = vec![
            business("a", AffinityTag::EnergyProviders, 50, 4.0),
            business("b", AffinityTag::EnergyProviders, 200, 4.5),
            business("c", AffinityTag::EnergyProviders, 10, 3.0),
        ];

        let best = select_best(&rider, &catalog, &request()).unwrap();
        assert_eq!(best.store_id, "b");
    }

    #[test]
    fn test_tag_mismatch_is_a_pre_filter() {
        // The stress-release store scores far higher but is never scored.
        let rider = rider_with_tags(&[AffinityTag::EnergyProviders]);
        let catalog = vec![
            business("a", AffinityTag::StressRelease, 1000, 5.0),
            business("b", AffinityTag::EnergyProviders, 10, 3.0),
        ];

        let best = select_best(&rider, &catalog, &request()).unwrap();
        assert_eq!(best.store_id, "b");
    }

    #[test]
    fn test_no_candidate_passes_filter() {
        let rider = rider_with_tags(&[AffinityTag::Others]);
        let catalog = vec![
            business("a", AffinityTag::EnergyProviders, 50, 4.0),
            business("b", AffinityTag::HappyChoice, 200, 4.5),
        ];

        assert!(select_best(&rider, &catalog, &request()).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let rider = rider_with_tags(&[AffinityTag::EnergyProviders]);
        assert!(select_best(&rider, std::iter::empty(), &request()).is_none());
    }

    #[test]
    fn test_tie_keeps_earliest_in_scan_order() {
        let rider = rider_with_tags(&[AffinityTag::EnergyProviders]);
        let catalog = vec![
            business("a", AffinityTag::EnergyProviders, 100, 4.0),
            business("b", AffinityTag::EnergyProviders, 100, 4.0),
        ];

        let best = select_best(&rider, &catalog, &request()).unwrap();
        assert_eq!(best.store_id, "a");
    }

    #[test]
    fn test_zero_score_never_wins() {
        let rider = rider_with_tags(&[AffinityTag::EnergyProviders]);
        let catalog = vec![business("a", AffinityTag::EnergyProviders, 0, 4.0)];

        assert!(select_best(&rider, &catalog, &request()).is_none());
    }
}
