use crate::core::distance::great_circle_miles;
use crate::models::{BusinessProfile, RideRequestContext, RiderProfile};

/// Compute the match score for a (rider, business, request) triple.
///
/// Scoring steps:
/// 1. base = review_count * rating
/// 2. +10 when the business category equals the rider's sustained interest
/// 3. scaled by 1 - 0.1 * |price tier - device tier|
/// 4. scaled by 0.1 when the rider's travel history and age put the
///    business out of acceptable range (see `distance_age_penalty`)
pub fn score_candidate(
    rider: &RiderProfile,
    business: &BusinessProfile,
    request: &RideRequestContext,
) -> f64 {
    let mut score = business.review_count as f64 * business.rating;

    if business.categories == rider.interest {
        score += 10.0;
    }

    let tier_spread = (price_ordinal(&business.price) - device_ordinal(&rider.device)).abs();
    score *= 1.0 - 0.1 * tier_spread as f64;

    let distance = great_circle_miles(
        business.latitude,
        business.longitude,
        request.latitude,
        request.longitude,
    );

    distance_age_penalty(score, distance, rider.travel_count, rider.age)
}

/// Price tier symbol mapped onto a 0-3 ordinal.
#[inline]
pub fn price_ordinal(price: &str) -> i64 {
    match price {
        "$$$$" | "$$$" => 3,
        "$$" => 2,
        "$" => 1,
        _ => 0,
    }
}

/// Client hardware tier mapped onto a 0-3 ordinal. Unknown devices are 0.
#[inline]
pub fn device_ordinal(device: &str) -> i64 {
    match device {
        "iPhone XS" => 3,
        "iPhone 7" => 2,
        "iPhone 5" => 1,
        _ => 0,
    }
}

/// Distance tolerance by travel history and age.
///
/// Frequent travelers (more than 50 trips) and riders aged exactly 20
/// tolerate up to 10 miles; everyone else over 20 tolerates 5. Beyond the
/// tolerance the score drops to a tenth. The exact-equality age check is a
/// shipped product rule, kept as is.
#[inline]
fn distance_age_penalty(score: f64, distance: f64, travel_count: i64, age: i64) -> f64 {
    if (travel_count > 50 || age == 20) && distance > 10.0 {
        score * 0.1
    } else if (travel_count <= 50 && age > 20) && distance > 5.0 {
        score * 0.1
    } else {
        score
    }
}
