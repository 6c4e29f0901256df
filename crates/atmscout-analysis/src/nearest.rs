//! Nearest-competitor search over the full ATM set.

use atmscout_core::AtmLocation;

use crate::geo::distance_km;

/// Minimum great-circle distance from `candidate_coords` to any ATM with
/// usable coordinates, plus that ATM's operator.
///
/// ATMs without both coordinates are skipped. The comparison is a strict
/// `<`, so the first ATM achieving the minimum wins exact ties. Returns
/// `(f64::INFINITY, None)` when the candidate has no coordinates or no ATM
/// does.
///
/// Always computed independently of identity resolution: a candidate judged
/// to already host a machine still gets a nearest-distance measurement for
/// reporting, since the identity match may have fired on a name or address
/// against a far-away or coordinate-less record.
#[must_use]
pub fn find_nearest<'a>(
    candidate_coords: Option<(f64, f64)>,
    atms: &'a [AtmLocation],
) -> (f64, Option<&'a str>) {
    let mut min_distance = f64::INFINITY;
    let mut nearest_operator = None;

    for atm in atms {
        let Some(atm_coords) = atm.coords() else {
            continue;
        };
        let distance = distance_km(candidate_coords, Some(atm_coords));
        if distance < min_distance {
            min_distance = distance;
            nearest_operator = Some(atm.operator.as_str());
        }
    }

    (min_distance, nearest_operator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm_at(lat: f64, lon: f64, operator: &str) -> AtmLocation {
        AtmLocation {
            location_name: String::new(),
            address: String::new(),
            operator: operator.to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
        }
    }

    fn atm_without_coords(operator: &str) -> AtmLocation {
        AtmLocation {
            location_name: String::new(),
            address: String::new(),
            operator: operator.to_string(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn picks_the_closest_atm() {
        let atms = vec![
            atm_at(25.80, -80.20, "FarOp"),
            atm_at(25.7620, -80.1920, "NearOp"),
        ];
        let (d, op) = find_nearest(Some((25.7617, -80.1918)), &atms);
        assert!(d < 0.1, "got {d}");
        assert_eq!(op, Some("NearOp"));
    }

    #[test]
    fn skips_atms_without_coordinates() {
        let atms = vec![
            atm_without_coords("GhostOp"),
            atm_at(25.7700, -80.2000, "RealOp"),
        ];
        let (d, op) = find_nearest(Some((25.7617, -80.1918)), &atms);
        assert!(d.is_finite());
        assert_eq!(op, Some("RealOp"));
    }

    #[test]
    fn no_usable_atms_returns_infinite_and_none() {
        let atms = vec![atm_without_coords("GhostOp")];
        let (d, op) = find_nearest(Some((25.7617, -80.1918)), &atms);
        assert!(d.is_infinite());
        assert_eq!(op, None);
    }

    #[test]
    fn candidate_without_coords_returns_infinite_and_none() {
        let atms = vec![atm_at(25.7700, -80.2000, "RealOp")];
        let (d, op) = find_nearest(None, &atms);
        assert!(d.is_infinite());
        assert_eq!(op, None);
    }

    #[test]
    fn empty_atm_set_returns_infinite_and_none() {
        let (d, op) = find_nearest(Some((25.7617, -80.1918)), &[]);
        assert!(d.is_infinite());
        assert_eq!(op, None);
    }

    #[test]
    fn first_seen_wins_exact_ties() {
        // Two ATMs at the identical point; strict < keeps the first.
        let atms = vec![
            atm_at(25.7700, -80.2000, "FirstOp"),
            atm_at(25.7700, -80.2000, "SecondOp"),
        ];
        let (_, op) = find_nearest(Some((25.7617, -80.1918)), &atms);
        assert_eq!(op, Some("FirstOp"));
    }
}
