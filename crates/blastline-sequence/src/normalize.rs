//! Endpoint back-filling for blast connections.
//!
//! Every stored connection carries two hidden markers anchoring its drawn
//! path: marker "1" just behind the `from` hole and marker "2" just past the
//! `to` hole, both on the hole-to-hole bearing:
//!
//! ```text
//!   1 ── from ─────────── to ── 2
//!   ↑ 0.5                    0.5 ↑
//! ```

use std::collections::HashMap;

use blastline_model::{BlastConnection, ConnectionPoint, DrillPoint, PatternData};

/// Distance in world units between a hole and its endpoint marker.
pub const ENDPOINT_OFFSET: f64 = 0.5;

/// Synthesize the start and end markers of connection `id` running from
/// `from` to `to`.
pub fn endpoint_markers(
    id: &str,
    from: &DrillPoint,
    to: &DrillPoint,
) -> (ConnectionPoint, ConnectionPoint) {
    let bearing = (to.y - from.y).atan2(to.x - from.x);
    let (dx, dy) = (bearing.cos() * ENDPOINT_OFFSET, bearing.sin() * ENDPOINT_OFFSET);

    let start = ConnectionPoint {
        id: format!("start_{}", id),
        label: "1".to_string(),
        x: from.x - dx,
        y: from.y - dy,
        is_hidden: true,
    };
    let end = ConnectionPoint {
        id: format!("end_{}", id),
        label: "2".to_string(),
        x: to.x + dx,
        y: to.y + dy,
        is_hidden: true,
    };
    (start, end)
}

/// Ensure every connection carries endpoint markers.
///
/// Connections that already have both markers pass through untouched, so
/// the function is idempotent. A connection whose holes cannot be found in
/// `pattern` also passes through untouched; validation reports it later.
pub fn normalize_connections(
    pattern: Option<&PatternData>,
    connections: Vec<BlastConnection>,
) -> Vec<BlastConnection> {
    let holes: HashMap<&str, &DrillPoint> = pattern
        .map(|p| p.drill_points.iter().map(|h| (h.id.as_str(), h)).collect())
        .unwrap_or_default();

    connections
        .into_iter()
        .map(|mut conn| {
            if conn.has_endpoints() {
                return conn;
            }

            let from = holes.get(conn.from_hole_id.as_str());
            let to = holes.get(conn.to_hole_id.as_str());
            let (Some(from), Some(to)) = (from, to) else {
                tracing::debug!(
                    connection = %conn.id,
                    from = %conn.from_hole_id,
                    to = %conn.to_hole_id,
                    "connection references a hole outside the pattern; endpoints left empty"
                );
                return conn;
            };

            let (start, end) = endpoint_markers(&conn.id, from, to);
            conn.start_point.get_or_insert(start);
            conn.end_point.get_or_insert(end);
            conn
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn two_holes() -> PatternData {
        PatternData::new(vec![
            DrillPoint::new("A", 0.0, 0.0),
            DrillPoint::new("B", 4.0, 0.0),
        ])
    }

    #[test]
    fn markers_sit_on_bearing() {
        let pattern = two_holes();
        let conns = normalize_connections(
            Some(&pattern),
            vec![BlastConnection::new("C1", "A", "B", 100)],
        );

        let start = conns[0].start_point.as_ref().unwrap();
        let end = conns[0].end_point.as_ref().unwrap();

        assert!(approx(start.x, -0.5) && approx(start.y, 0.0));
        assert!(approx(end.x, 4.5) && approx(end.y, 0.0));
        assert_eq!(start.label, "1");
        assert_eq!(end.label, "2");
        assert_eq!(start.id, "start_C1");
        assert_eq!(end.id, "end_C1");
        assert!(start.is_hidden && end.is_hidden);
    }

    #[test]
    fn diagonal_bearing() {
        let from = DrillPoint::new("A", 0.0, 0.0);
        let to = DrillPoint::new("B", 3.0, 4.0);
        let (start, end) = endpoint_markers("C", &from, &to);

        assert!(approx(start.x, -0.3) && approx(start.y, -0.4));
        assert!(approx(end.x, 3.3) && approx(end.y, 4.4));
    }

    #[test]
    fn missing_hole_passes_through() {
        let pattern = two_holes();
        let conn = BlastConnection::new("C1", "A", "GONE", 100);
        let out = normalize_connections(Some(&pattern), vec![conn.clone()]);
        assert_eq!(out, vec![conn]);
    }

    #[test]
    fn no_pattern_passes_through() {
        let conn = BlastConnection::new("C1", "A", "B", 100);
        let out = normalize_connections(None, vec![conn.clone()]);
        assert_eq!(out, vec![conn]);
    }

    #[test]
    fn existing_endpoints_are_kept() {
        let pattern = two_holes();
        let mut conn = BlastConnection::new("C1", "A", "B", 100);
        conn.start_point = Some(ConnectionPoint {
            id: "custom".into(),
            label: "1".into(),
            x: 9.0,
            y: 9.0,
            is_hidden: false,
        });

        let out = normalize_connections(Some(&pattern), vec![conn]);
        assert_eq!(out[0].start_point.as_ref().unwrap().id, "custom");
        assert_eq!(out[0].end_point.as_ref().unwrap().id, "end_C1");
    }

    fn arb_case() -> impl Strategy<Value = (PatternData, Vec<BlastConnection>)> {
        let holes = prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 1..8);
        holes.prop_flat_map(|coords| {
            let n = coords.len();
            let pattern = PatternData::new(
                coords
                    .iter()
                    .enumerate()
                    .map(|(i, (x, y))| DrillPoint::new(format!("H{}", i), *x, *y))
                    .collect(),
            );
            // Index n stands for a hole that is not in the pattern.
            let conns = prop::collection::vec((0..=n, 0..=n, 0u32..3000), 0..12).prop_map(
                |raw| {
                    raw.into_iter()
                        .enumerate()
                        .map(|(i, (a, b, d))| {
                            BlastConnection::new(
                                format!("C{}", i),
                                format!("H{}", a),
                                format!("H{}", b),
                                d,
                            )
                        })
                        .collect::<Vec<_>>()
                },
            );
            (Just(pattern), conns)
        })
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent((pattern, conns) in arb_case()) {
            let once = normalize_connections(Some(&pattern), conns);
            let twice = normalize_connections(Some(&pattern), once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn resolvable_connections_gain_endpoints((pattern, conns) in arb_case()) {
            let out = normalize_connections(Some(&pattern), conns);
            for conn in &out {
                let resolvable = pattern.hole(&conn.from_hole_id).is_some()
                    && pattern.hole(&conn.to_hole_id).is_some();
                prop_assert_eq!(conn.has_endpoints(), resolvable);
            }
        }
    }
}
