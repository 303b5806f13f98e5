use super::NeighborSearch;
use crate::Point3;
use kiddo::{ImmutableKdTree, SquaredEuclidean};
use std::num::NonZero;

/// Exact 3D nearest neighbors backed by a k-d tree. Each query returns the `k + 1` nearest
/// indexed points, which covers the query point itself plus its `k` true neighbors when the query
/// is a member of the indexed set.
///
/// The tree is built once from the whole point slice, so any number of exactly coincident points
/// can be indexed.
pub struct KdNeighbors {
    tree: Option<ImmutableKdTree<f64, 3>>,
    count: NonZero<usize>,
}

impl KdNeighbors {
    pub fn new(points: &[Point3], k: usize) -> Self {
        let tree = if points.is_empty() {
            None
        } else {
            let entries = points.iter().map(|p| [p.x, p.y, p.z]).collect::<Vec<_>>();
            Some(ImmutableKdTree::new_from_slice(&entries))
        };

        Self {
            tree,
            count: NonZero::<usize>::MIN.saturating_add(k),
        }
    }
}

impl NeighborSearch for KdNeighbors {
    fn query_neighbors(&self, point: &Point3) -> Vec<usize> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };

        tree.nearest_n::<SquaredEuclidean>(&[point.x, point.y, point.z], self.count)
            .into_iter()
            .map(|n| n.item as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn finds_true_nearest() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(5.0, 5.0, 5.0),
        ];
        let search = KdNeighbors::new(&points, 2);
        let mut found = search.query_neighbors(&points[0]);
        found.sort();
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = (0..500)
            .map(|_| Point3::new(rng.random(), rng.random(), rng.random()))
            .collect::<Vec<_>>();
        let search = KdNeighbors::new(&points, 5);

        for q in points.iter().take(20) {
            let mut expected = (0..points.len()).collect::<Vec<_>>();
            expected.sort_by(|&a, &b| {
                (points[a] - q).norm().total_cmp(&(points[b] - q).norm())
            });
            expected.truncate(6);
            expected.sort();

            let mut found = search.query_neighbors(q);
            found.sort();
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn coincident_points_are_indexed() {
        let mut points = vec![Point3::new(1.0, 1.0, 0.0); 500];
        points.push(Point3::new(3.0, 1.0, 0.0));
        let search = KdNeighbors::new(&points, 12);

        let found = search.query_neighbors(&points[0]);
        assert_eq!(found.len(), 13);
        assert!(found.iter().all(|&i| i < 500));
        assert_eq!(search.query_neighbors(&points[500]).len(), 13);
    }

    #[test]
    fn empty_set_has_no_neighbors() {
        let search = KdNeighbors::new(&[], 4);
        assert!(search.query_neighbors(&Point3::origin()).is_empty());
    }
}
