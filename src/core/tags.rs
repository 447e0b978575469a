use std::collections::BTreeSet;

use crate::models::{AffinityTag, SignalReadings};

/// Ordered classification rules for business categories.
///
/// Evaluated top to bottom, first match wins, so the table order is the
/// priority order. Categories absent from every set fall through to
/// `others`.
const CLASSIFIER_RULES: &[(AffinityTag, &[&str])] = &[
    (
        AffinityTag::HappyChoice,
        &[
            "italian",
            "thai",
            "cuban",
            "japanese",
            "mideastern",
            "cajun",
            "tapas",
            "breakfast_brunch",
            "korean",
            "mediterranean",
            "vietnamese",
            "indpak",
            "southern",
            "latin",
            "greek",
            "mexican",
            "asianfusion",
            "spanish",
            "chinese",
        ],
    ),
    (
        AffinityTag::StressRelease,
        &["coffee", "bars", "wine_bars", "cocktailbars", "lounges"],
    ),
    (
        AffinityTag::WillingTour,
        &["parks", "museums", "newamerican", "landmarks"],
    ),
    (
        AffinityTag::EnergyProviders,
        &[
            "bakeries",
            "ramen",
            "donuts",
            "burgers",
            "bagels",
            "pizza",
            "sandwiches",
            "icecream",
            "desserts",
            "bbq",
            "dimsum",
            "steak",
        ],
    ),
    (
        AffinityTag::LowCalories,
        &["seafood", "vegetarian", "vegan", "sushi"],
    ),
];

/// Map a business category string to exactly one affinity tag.
///
/// Pure and deterministic; every input maps to exactly one of the six tags.
pub fn classify(category: &str) -> AffinityTag {
    CLASSIFIER_RULES
        .iter()
        .find(|(_, members)| members.contains(&category))
        .map(|(tag, _)| *tag)
        .unwrap_or(AffinityTag::Others)
}

// Rider signal predicates. Unlike category classification these are
// additive: each one that holds contributes its tag independently.

#[inline]
pub fn craves_low_calories(s: &SignalReadings) -> bool {
    s.blood_sugar > 4 && s.mood > 6 && s.active == 3
}

#[inline]
pub fn needs_energy(s: &SignalReadings) -> bool {
    s.blood_sugar < 2 || s.mood < 4
}

#[inline]
pub fn open_to_touring(s: &SignalReadings) -> bool {
    s.active == 3
}

#[inline]
pub fn needs_stress_release(s: &SignalReadings) -> bool {
    s.stress > 5 || s.active == 1 || s.mood < 4
}

#[inline]
pub fn in_high_spirits(s: &SignalReadings) -> bool {
    s.mood > 6
}

const TAGGER_RULES: &[(fn(&SignalReadings) -> bool, AffinityTag)] = &[
    (craves_low_calories, AffinityTag::LowCalories),
    (needs_energy, AffinityTag::EnergyProviders),
    (open_to_touring, AffinityTag::WillingTour),
    (needs_stress_release, AffinityTag::StressRelease),
    (in_high_spirits, AffinityTag::HappyChoice),
];

/// Derive a rider's affinity tags from momentary signal readings.
///
/// The result is the union over all predicates that hold, or `{others}`
/// when none does. Never empty.
pub fn derive_tags(signals: &SignalReadings) -> BTreeSet<AffinityTag> {
    let mut tags: BTreeSet<AffinityTag> = TAGGER_RULES
        .iter()
        .filter(|(applies, _)| applies(signals))
        .map(|(_, tag)| *tag)
        .collect();

    if tags.is_empty() {
        tags.insert(AffinityTag::Others);
    }
    tags
}
