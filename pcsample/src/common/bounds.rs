//! Axis-aligned extents of point sets, computed with a single linear fold so that inputs of
//! many millions of points never need an intermediate collection of coordinates.

use crate::{Aabb2, Point2, Point3};

/// Compute the XY bounding box of a set of points. The Z coordinate is ignored.
///
/// # Arguments
///
/// * `points`: the points to bound
///
/// returns: Option<Aabb>, `None` if `points` is empty
///
/// # Examples
///
/// ```
/// use pcsample::common::bounds2;
/// use pcsample::Point3;
/// let points = vec![Point3::new(1.0, -2.0, 5.0), Point3::new(-1.0, 3.0, 0.0)];
/// let b = bounds2(&points).unwrap();
/// assert_eq!(b.mins.x, -1.0);
/// assert_eq!(b.maxs.y, 3.0);
/// ```
pub fn bounds2(points: &[Point3]) -> Option<Aabb2> {
    let first = points.first()?;
    let seed = (first.x, first.x, first.y, first.y);
    let (min_x, max_x, min_y, max_y) = points.iter().fold(seed, |(x0, x1, y0, y1), p| {
        (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y))
    });

    Some(Aabb2::new(Point2::new(min_x, min_y), Point2::new(max_x, max_y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bounds_of_empty_is_none() {
        assert!(bounds2(&[]).is_none());
    }

    #[test]
    fn bounds2_ignores_z() {
        let points = vec![
            Point3::new(0.0, 1.0, 100.0),
            Point3::new(4.0, -1.0, -100.0),
            Point3::new(2.0, 3.0, 0.0),
        ];
        let b = bounds2(&points).unwrap();
        assert_relative_eq!(b.mins, Point2::new(0.0, -1.0));
        assert_relative_eq!(b.maxs, Point2::new(4.0, 3.0));
    }

    #[test]
    fn single_point_is_degenerate() {
        let b = bounds2(&[Point3::new(2.0, 2.0, 2.0)]).unwrap();
        assert_eq!(b.mins, b.maxs);
    }

    #[test]
    fn bounds_of_many_points() {
        let n = 2_000_000;
        let points = (0..n)
            .map(|i| Point3::new(i as f64, -(i as f64), 0.0))
            .collect::<Vec<_>>();
        let b = bounds2(&points).unwrap();
        assert_relative_eq!(b.maxs.x, (n - 1) as f64);
        assert_relative_eq!(b.mins.y, -((n - 1) as f64));
    }
}
