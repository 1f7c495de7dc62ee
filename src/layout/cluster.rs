//! Connected-component clustering of bounding boxes.

use crate::model::Rect;
use std::collections::VecDeque;

/// Merge rectangles into clusters of transitively adjacent boxes.
///
/// Two boxes are adjacent when their spans overlap on both axes after
/// widening the comparison by `threshold` (see [`Rect::is_near`]). The first
/// box of the worklist seeds an accumulator that absorbs every adjacent box;
/// passes repeat against the grown accumulator until one absorbs nothing, at
/// which point the accumulator is emitted and the next remaining box seeds
/// the next cluster.
///
/// Every input box ends up in exactly one cluster. Clusters are returned in
/// the order they were seeded.
///
/// A finished cluster is never revisited. When a later cluster grows around
/// an earlier one without any of its members being adjacent to it, both are
/// emitted, and clustering the output again merges them. Re-clustering is
/// only a no-op for layouts where no such wrap-around occurs.
pub fn cluster(rects: &[Rect], threshold: f32) -> Vec<Rect> {
    let mut worklist: VecDeque<Rect> = rects.iter().copied().collect();
    let mut clusters = Vec::new();

    while let Some(mut current) = worklist.pop_front() {
        loop {
            let before = worklist.len();
            worklist.retain(|other| {
                if current.is_near(other, threshold) {
                    current = current.union(other);
                    false
                } else {
                    true
                }
            });
            if worklist.len() == before {
                break;
            }
        }
        clusters.push(current);
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
        Rect::new(x0, y0, x1, y1)
    }

    #[test]
    fn test_cluster_empty() {
        assert!(cluster(&[], 50.0).is_empty());
    }

    #[test]
    fn test_cluster_single() {
        let only = r(3.0, 4.0, 5.0, 6.0);
        assert_eq!(cluster(&[only], 50.0), vec![only]);
    }

    #[test]
    fn test_cluster_merges_adjacent_pair() {
        let a = r(100.0, 100.0, 200.0, 200.0);
        let b = r(210.0, 150.0, 300.0, 250.0);
        assert_eq!(cluster(&[a, b], 50.0), vec![r(100.0, 100.0, 300.0, 250.0)]);
    }

    #[test]
    fn test_cluster_keeps_distant_boxes_apart() {
        let a = r(0.0, 0.0, 100.0, 100.0);
        let b = r(400.0, 400.0, 500.0, 500.0);
        assert_eq!(cluster(&[a, b], 50.0), vec![a, b]);
    }

    #[test]
    fn test_cluster_is_transitive() {
        // c only touches a once a has absorbed b
        let a = r(0.0, 0.0, 100.0, 100.0);
        let c = r(260.0, 0.0, 360.0, 100.0);
        let b = r(130.0, 0.0, 230.0, 100.0);
        let merged = cluster(&[a, c, b], 50.0);
        assert_eq!(merged, vec![r(0.0, 0.0, 360.0, 100.0)]);
    }

    #[test]
    fn test_cluster_needs_second_pass() {
        // In the first pass d is scanned before b grows the accumulator
        // towards it, so only a later pass picks it up.
        let a = r(0.0, 0.0, 100.0, 100.0);
        let d = r(0.0, 260.0, 100.0, 360.0);
        let b = r(0.0, 130.0, 100.0, 230.0);
        let merged = cluster(&[a, d, b], 50.0);
        assert_eq!(merged, vec![r(0.0, 0.0, 100.0, 360.0)]);
    }

    #[test]
    fn test_cluster_emission_order() {
        let far = r(600.0, 600.0, 700.0, 700.0);
        let a = r(0.0, 0.0, 100.0, 100.0);
        let b = r(120.0, 0.0, 220.0, 100.0);
        let merged = cluster(&[far, a, b], 50.0);
        assert_eq!(merged, vec![far, r(0.0, 0.0, 220.0, 100.0)]);
    }

    #[test]
    fn test_cluster_is_idempotent() {
        let boxes = [
            r(10.0, 10.0, 60.0, 60.0),
            r(70.0, 20.0, 120.0, 80.0),
            r(400.0, 10.0, 450.0, 60.0),
            r(430.0, 90.0, 480.0, 140.0),
            r(10.0, 500.0, 60.0, 550.0),
        ];
        let once = cluster(&boxes, 50.0);
        let twice = cluster(&once, 50.0);
        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_cluster_wrap_around_is_not_revisited() {
        // `inner` is seeded first and touches neither `b` nor `c`, but the
        // union of `b` and `c` encloses it.
        let inner = r(200.0, 20.0, 210.0, 30.0);
        let b = r(0.0, 0.0, 100.0, 100.0);
        let c = r(150.0, 150.0, 250.0, 250.0);

        let once = cluster(&[inner, b, c], 50.0);
        assert_eq!(once, vec![inner, r(0.0, 0.0, 250.0, 250.0)]);

        let twice = cluster(&once, 50.0);
        assert_eq!(twice, vec![r(0.0, 0.0, 250.0, 250.0)]);
    }

    #[test]
    fn test_cluster_membership_independent_of_order() {
        let a = r(0.0, 0.0, 100.0, 100.0);
        let b = r(130.0, 0.0, 230.0, 100.0);
        let c = r(260.0, 0.0, 360.0, 100.0);
        let far = r(900.0, 900.0, 950.0, 950.0);

        let mut forward = cluster(&[a, b, c, far], 50.0);
        let mut reverse = cluster(&[far, c, b, a], 50.0);
        let key = |r: &Rect| (r.x0 as i64, r.y0 as i64);
        forward.sort_by_key(key);
        reverse.sort_by_key(key);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_cluster_zero_threshold_touching_edges() {
        let a = r(0.0, 0.0, 100.0, 100.0);
        let b = r(100.0, 0.0, 200.0, 100.0);
        assert_eq!(cluster(&[a, b], 0.0).len(), 1);
    }
}
