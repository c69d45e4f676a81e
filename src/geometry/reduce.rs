use crate::domain::Location;

/// Thin out locations so that no two survivors are closer than `min_distance_m`
///
/// # Algorithm
/// Greedy, in input order: a location is kept only if it is at least
/// `min_distance_m` away from every location kept before it. Which member of
/// a cluster survives therefore depends on input order: the earliest one wins.
///
/// O(n·k) distance computations where k is the number of kept locations.
///
/// A non-positive (or NaN) `min_distance_m` returns the input unchanged.
pub fn reduce_locations(locations: &[Location], min_distance_m: f64) -> Vec<Location> {
    if min_distance_m.is_nan() || min_distance_m <= 0.0 {
        return locations.to_vec();
    }

    let mut kept: Vec<Location> = Vec::new();
    for candidate in locations {
        if kept
            .iter()
            .all(|k| candidate.distance_to(k) >= min_distance_m)
        {
            kept.push(candidate.clone());
        }
    }
    kept
}

/// Sort by `importance`, highest first. Equal importances keep input order.
pub fn sort_by_importance(locations: &[Location]) -> Vec<Location> {
    let mut sorted = locations.to_vec();
    sorted.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    sorted
}

/// Sort by distance to `origin`, nearest first. Ties keep input order.
pub fn sort_by_distance(locations: &[Location], origin: &Location) -> Vec<Location> {
    let mut keyed: Vec<(f64, &Location)> = locations
        .iter()
        .map(|loc| (loc.distance_to(origin), loc))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, loc)| loc.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(place_id: u64, lat: f64, lon: f64, importance: f64) -> Location {
        let mut loc = Location::new(place_id, lat, lon).unwrap();
        loc.importance = importance;
        loc
    }

    fn ids(locations: &[Location]) -> Vec<u64> {
        locations.iter().map(|l| l.place_id).collect()
    }

    #[test]
    fn test_reduce_empty() {
        assert!(reduce_locations(&[], 100.0).is_empty());
    }

    #[test]
    fn test_reduce_keeps_first_of_cluster() {
        // 1, 2 and 3 sit within ~20m of each other; 4 is ~1.1km north
        let locations = vec![
            place(1, 52.5200, 13.4050, 0.1),
            place(2, 52.5201, 13.4051, 0.9),
            place(3, 52.5199, 13.4052, 0.5),
            place(4, 52.5300, 13.4050, 0.2),
        ];

        let reduced = reduce_locations(&locations, 100.0);
        assert_eq!(ids(&reduced), vec![1, 4]);

        // Reversing the input changes the representative
        let reversed: Vec<Location> = locations.iter().rev().cloned().collect();
        let reduced = reduce_locations(&reversed, 100.0);
        assert_eq!(ids(&reduced), vec![4, 3]);
    }

    #[test]
    fn test_reduce_invariants() {
        let locations: Vec<Location> = (0..20)
            .map(|i| place(i, 48.85 + (i as f64) * 0.0007, 2.35, 0.0))
            .collect();
        let min = 150.0;
        let reduced = reduce_locations(&locations, min);

        for (i, a) in reduced.iter().enumerate() {
            for b in &reduced[i + 1..] {
                assert!(a.distance_to(b) >= min);
            }
        }

        for dropped in locations
            .iter()
            .filter(|l| !reduced.iter().any(|r| r.place_id == l.place_id))
        {
            let covered = reduced
                .iter()
                .take_while(|r| r.place_id < dropped.place_id)
                .any(|r| r.distance_to(dropped) < min);
            assert!(covered, "place {} dropped without a neighbour", dropped.place_id);
        }
    }

    #[test]
    fn test_reduce_non_positive_distance_is_identity() {
        let locations = vec![
            place(1, 10.0, 10.0, 0.0),
            place(2, 10.0, 10.0, 0.0),
            place(3, 10.0, 10.0, 0.0),
        ];
        assert_eq!(ids(&reduce_locations(&locations, 0.0)), vec![1, 2, 3]);
        assert_eq!(ids(&reduce_locations(&locations, -5.0)), vec![1, 2, 3]);
        assert_eq!(ids(&reduce_locations(&locations, f64::NAN)), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_by_importance_descending_and_stable() {
        let locations = vec![
            place(1, 0.0, 0.0, 0.3),
            place(2, 0.0, 0.0, 0.7),
            place(3, 0.0, 0.0, 0.3),
            place(4, 0.0, 0.0, 0.9),
            place(5, 0.0, 0.0, 0.3),
        ];
        let sorted = sort_by_importance(&locations);
        assert_eq!(ids(&sorted), vec![4, 2, 1, 3, 5]);
        assert!(sorted.windows(2).all(|w| w[0].importance >= w[1].importance));
    }

    #[test]
    fn test_sort_by_distance_ascending_and_stable() {
        let origin = Location::at(0.0, 0.0).unwrap();
        let locations = vec![
            place(1, 0.0, 2.0, 0.0),
            place(2, 0.0, 1.0, 0.0),
            place(3, 0.0, -2.0, 0.0),
            place(4, 0.0, 0.5, 0.0),
        ];
        let sorted = sort_by_distance(&locations, &origin);
        // 1 and 3 are equidistant from the origin and keep their input order
        assert_eq!(ids(&sorted), vec![4, 2, 1, 3]);
        assert!(
            sorted
                .windows(2)
                .all(|w| w[0].distance_to(&origin) <= w[1].distance_to(&origin))
        );
    }

    #[test]
    fn test_sorts_leave_input_untouched() {
        let locations = vec![place(1, 0.0, 1.0, 0.1), place(2, 0.0, 0.1, 0.9)];
        let _ = sort_by_importance(&locations);
        let _ = sort_by_distance(&locations, &Location::at(0.0, 0.0).unwrap());
        assert_eq!(ids(&locations), vec![1, 2]);
    }
}
