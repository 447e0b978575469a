/// Statute miles per arc minute of a great circle.
const MILES_PER_ARC_MINUTE: f64 = 1.1515;

/// Calculate the great-circle distance between two points in statute miles,
/// using the spherical law of cosines.
///
/// Bit-identical coordinates return exactly 0 without touching the
/// trigonometric path, which would otherwise hit the `acos` domain edge at 1.
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in statute miles
#[inline]
pub fn great_circle_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let theta = lon1 - lon2;
    let cos_angle = lat1.to_radians().sin() * lat2.to_radians().sin()
        + lat1.to_radians().cos() * lat2.to_radians().cos() * theta.to_radians().cos();

    cos_angle.acos().to_degrees() * 60.0 * MILES_PER_ARC_MINUTE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_coordinates_are_exactly_zero() {
        assert_eq!(great_circle_miles(40.7128, -74.0060, 40.7128, -74.0060), 0.0);
        assert_eq!(great_circle_miles(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(great_circle_miles(-33.86, 151.21, -33.86, 151.21), 0.0);
    }

    #[test]
    fn test_manhattan_to_brooklyn() {
        // Midtown Manhattan to downtown Brooklyn is roughly 5-7 miles.
        let distance = great_circle_miles(40.7580, -73.9855, 40.6782, -73.9442);
        assert!(distance > 4.0 && distance < 8.0, "got {}", distance);
    }

    #[test]
    fn test_new_york_to_los_angeles() {
        // Roughly 2,450 statute miles.
        let distance = great_circle_miles(40.7128, -74.0060, 34.0522, -118.2437);
        assert!((distance - 2445.0).abs() < 50.0, "got {}", distance);
    }

    #[test]
    fn test_symmetry() {
        let ab = great_circle_miles(40.7128, -74.0060, 40.6782, -73.9442);
        let ba = great_circle_miles(40.6782, -73.9442, 40.7128, -74.0060);
        assert!((ab - ba).abs() < 1e-9);
    }
}
