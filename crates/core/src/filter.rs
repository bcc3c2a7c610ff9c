//! Drops place names too generic or malformed to geocode usefully.

use crate::config::ResolverConfig;

/// Whether `place` is specific enough to try geocoding.
///
/// Length is counted in characters, not bytes, so accented names are
/// measured the way a reader would count them.
pub fn is_specific_place(place: &str, config: &ResolverConfig) -> bool {
    if place.is_empty() || config.generic_places.contains(place) {
        return false;
    }
    let len = place.chars().count();
    (config.min_place_len..=config.max_place_len).contains(&len)
}

/// Keep the specific places, preserving order.
pub fn filter_places(places: Vec<String>, config: &ResolverConfig) -> Vec<String> {
    places
        .into_iter()
        .filter(|place| is_specific_place(place, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_denylisted_names() {
        let config = ResolverConfig::default();
        let kept = filter_places(owned(&["Arizona", "Tucson", "U.S.", "Sonora"]), &config);
        assert_eq!(kept, vec!["Tucson"]);
    }

    #[test]
    fn denylist_match_is_case_sensitive() {
        let config = ResolverConfig::default();
        assert!(is_specific_place("mexico", &config));
        assert!(!is_specific_place("Mexico", &config));
    }

    #[test]
    fn enforces_inclusive_length_bounds() {
        let config = ResolverConfig::default();
        assert!(!is_specific_place("", &config));
        assert!(!is_specific_place("A", &config));
        assert!(is_specific_place("Ay", &config));
        assert!(is_specific_place(&"x".repeat(40), &config));
        assert!(!is_specific_place(&"x".repeat(41), &config));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let config = ResolverConfig::default();
        // 40 two-byte characters.
        assert!(is_specific_place(&"é".repeat(40), &config));
        assert!(is_specific_place("Ñu", &config));
    }

    #[test]
    fn uses_injected_denylist() {
        let config = ResolverConfig::default().with_generic_places(["France"]);
        let kept = filter_places(owned(&["Paris", "France", "Mexico"]), &config);
        assert_eq!(kept, vec!["Paris", "Mexico"]);
    }

    #[test]
    fn never_admits_out_of_bounds_or_denylisted() {
        let config = ResolverConfig::default();
        let inputs: Vec<String> = (0..60)
            .map(|n| "a".repeat(n))
            .chain(config.generic_places.iter().cloned())
            .collect();

        for place in filter_places(inputs, &config) {
            let len = place.chars().count();
            assert!((2..=40).contains(&len), "admitted length {len}");
            assert!(!config.generic_places.contains(&place));
        }
    }
}
