use glam::DVec2;

use crate::distance::{Simplex, SimplexCache};
use crate::shape::{Shape, Support};
use crate::types::{Sweep, Transform};

/// Desired final separation between the support hulls.
const TARGET: f64 = 0.01;
/// Acceptance band around the target separation.
const TOLERANCE: f64 = 0.25 * 0.005;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Axis {
    Points,
    FaceA,
    FaceB,
}

/// A separation function: signed distance between the two shapes along a
/// fixed local axis, evaluated at swept transforms.
struct SeparationFn<'a> {
    kind: Axis,
    shape_a: &'a Shape,
    shape_b: &'a Shape,
    axis: DVec2,
    local: DVec2,
}

impl<'a> SeparationFn<'a> {
    /// Build the axis from the closest features recorded in the cache.
    fn new(
        cache: &SimplexCache,
        shape_a: &'a Shape,
        xfa: Transform,
        shape_b: &'a Shape,
        xfb: Transform,
    ) -> Self {
        if cache.count == 1 {
            // One closest vertex on each shape.
            let point_a = xfa.apply(shape_a.vertex(cache.index_a[0]));
            let point_b = xfb.apply(shape_b.vertex(cache.index_b[0]));
            Self {
                kind: Axis::Points,
                shape_a,
                shape_b,
                axis: (point_b - point_a).normalize_or_zero(),
                local: DVec2::ZERO,
            }
        } else if cache.index_a[0] == cache.index_a[1] {
            // A face of B against one vertex of A.
            let b1 = shape_b.vertex(cache.index_b[0]);
            let b2 = shape_b.vertex(cache.index_b[1]);
            let mut axis = -(b2 - b1).normalize_or_zero().perp();
            let local = (b1 + b2) * 0.5;

            // Orient the axis from B's face toward A.
            let point_b = xfb.apply(local);
            let point_a = xfa.apply(shape_a.vertex(cache.index_a[0]));
            let normal = xfb.rotation.rotate(axis);
            if (point_a - point_b).dot(normal) < 0.0 {
                axis = -axis;
            }

            Self {
                kind: Axis::FaceB,
                shape_a,
                shape_b,
                axis,
                local,
            }
        } else {
            // A face of A against one or two vertices of B.
            let a1 = shape_a.vertex(cache.index_a[0]);
            let a2 = shape_a.vertex(cache.index_a[1]);
            let mut axis = -(a2 - a1).normalize_or_zero().perp();
            let local = (a1 + a2) * 0.5;

            // Orient the axis from A's face toward B.
            let point_a = xfa.apply(local);
            let point_b = xfb.apply(shape_b.vertex(cache.index_b[0]));
            let normal = xfa.rotation.rotate(axis);
            if (point_b - point_a).dot(normal) < 0.0 {
                axis = -axis;
            }

            Self {
                kind: Axis::FaceA,
                shape_a,
                shape_b,
                axis,
                local,
            }
        }
    }

    /// Deepest-point separation at the given transforms, with the witness
    /// vertex indices that realize it. For face kinds the index on the face
    /// side is not a vertex; it is reported as 0 and ignored by `evaluate`.
    fn min_separation(&self, xfa: Transform, xfb: Transform) -> (usize, usize, f64) {
        match self.kind {
            Axis::Points => {
                let axis_a = xfa.rotation.inv_rotate(self.axis);
                let axis_b = xfb.rotation.inv_rotate(-self.axis);

                let index_a = self.shape_a.support(axis_a);
                let index_b = self.shape_b.support(axis_b);
                let point_a = xfa.apply(self.shape_a.vertex(index_a));
                let point_b = xfb.apply(self.shape_b.vertex(index_b));

                (index_a, index_b, (point_b - point_a).dot(self.axis))
            }
            Axis::FaceA => {
                let normal = xfa.rotation.rotate(self.axis);
                let axis_b = xfb.rotation.inv_rotate(-normal);

                let index_b = self.shape_b.support(axis_b);
                let point_b = xfb.apply(self.shape_b.vertex(index_b));
                let point_a = xfa.apply(self.local);

                (0, index_b, (point_b - point_a).dot(normal))
            }
            Axis::FaceB => {
                let normal = xfb.rotation.rotate(self.axis);
                let axis_a = xfa.rotation.inv_rotate(-normal);

                let index_a = self.shape_a.support(axis_a);
                let point_a = xfa.apply(self.shape_a.vertex(index_a));
                let point_b = xfb.apply(self.local);

                (index_a, 0, (point_a - point_b).dot(normal))
            }
        }
    }

    /// Separation of fixed witness vertices at the given transforms.
    fn evaluate(&self, index_a: usize, xfa: Transform, index_b: usize, xfb: Transform) -> f64 {
        match self.kind {
            Axis::Points => {
                let a = xfa.apply(self.shape_a.vertex(index_a));
                let b = xfb.apply(self.shape_b.vertex(index_b));
                (b - a).dot(self.axis)
            }
            Axis::FaceA => {
                let normal = xfa.rotation.rotate(self.axis);
                let a = xfa.apply(self.local);
                let b = xfb.apply(self.shape_b.vertex(index_b));
                (b - a).dot(normal)
            }
            Axis::FaceB => {
                let normal = xfb.rotation.rotate(self.axis);
                let a = xfa.apply(self.shape_a.vertex(index_a));
                let b = xfb.apply(self.local);
                (a - b).dot(normal)
            }
        }
    }
}

/// Earliest time in [0, 1] at which the swept shapes come within a small
/// tolerance of touching.
///
/// Returns 0 when the shapes already overlap at the start of the interval
/// and 1 when they stay separated throughout. Continuous collision is
/// resolved by conservative advancement: repeatedly compute the closest
/// features, build a separating axis from them, and root-find the time at
/// which separation along that axis drops to the target.
///
/// The caller owns the simplex; reusing it across queries warm-starts the
/// distance computations.
pub fn time_of_impact(
    simplex: &mut Simplex,
    a: &Shape,
    sweep_a: Sweep,
    b: &Shape,
    sweep_b: Sweep,
) -> f64 {
    let mut cache = SimplexCache::default();
    let mut t1 = 0.0;

    // Each pass finds the closest features at t1 and advances t1 along a
    // separating axis built from them. Terminates when an axis repeats.
    'outer: for _ in 0..100 {
        let xfa = sweep_a.transform_at(t1);
        let xfb = sweep_b.transform_at(t1);
        simplex.read_cache(&cache, a, xfa, b, xfb);
        simplex.gjk(a, xfa, b, xfb);
        simplex.write_cache(&mut cache);
        let dist = simplex.closest_point().length();

        // Overlapping at t1: continuous collision gives up.
        if dist <= 0.0 {
            return 0.0;
        }

        if dist < TARGET + TOLERANCE {
            break;
        }

        let fcn = SeparationFn::new(&cache, a, xfa, b, xfb);

        // Successively resolve the deepest point along the axis. Bounded by
        // the number of vertices.
        let mut t2 = 1.0;
        for _ in 0..20 {
            // Deepest witnesses at t2.
            let xfa = sweep_a.transform_at(t2);
            let xfb = sweep_b.transform_at(t2);
            let (index_a, index_b, mut s2) = fcn.min_separation(xfa, xfb);

            // Separated over the whole of [t1, 1]?
            if s2 > TARGET + TOLERANCE {
                return 1.0;
            }

            // Separation at t2 already within tolerance: advance to t2.
            if s2 > TARGET - TOLERANCE {
                t1 = t2;
                break;
            }

            // Separation of the same witnesses at t1.
            let xfa = sweep_a.transform_at(t1);
            let xfb = sweep_b.transform_at(t1);
            let mut s1 = fcn.evaluate(index_a, xfa, index_b, xfb);

            // The witnesses overlap at t1; a previous pass may have run the
            // root finder out of iterations.
            if s1 < TARGET - TOLERANCE {
                break 'outer;
            }

            // Touching at t1. t1 holds the time of impact (possibly 0).
            if s1 <= TARGET + TOLERANCE {
                break 'outer;
            }

            // Root of separation(t) - TARGET on [t1, t2], alternating
            // bisection (guaranteed progress) and the secant rule
            // (convergence).
            let (mut a1, mut a2) = (t1, t2);
            for iter in 0..50 {
                let t = if iter & 1 != 0 {
                    a1 + (TARGET - s1) * (a2 - a1) / (s2 - s1)
                } else {
                    0.5 * (a1 + a2)
                };

                let xfa = sweep_a.transform_at(t);
                let xfb = sweep_b.transform_at(t);
                let s = fcn.evaluate(index_a, xfa, index_b, xfb);

                if (s - TARGET).abs() < TOLERANCE {
                    // t becomes the upper bound for the next deepest-point
                    // pass.
                    t2 = t;
                    break;
                }

                // Keep the root bracketed.
                if s > TARGET {
                    a1 = t;
                    s1 = s;
                } else {
                    a2 = t;
                    s2 = s;
                }
            }
        }
    }

    t1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Polygon;
    use approx::assert_relative_eq;
    use glam::DVec2;

    fn square() -> Shape {
        Polygon::rect(0.0, 0.0, 1.0, 1.0).into()
    }

    fn stationary(x: f64, y: f64) -> Sweep {
        Sweep {
            p0: DVec2::new(x, y),
            p1: DVec2::new(x, y),
            r0: 0.0,
            r1: 0.0,
        }
    }

    #[test]
    fn test_head_on_squares() {
        // B closes from x = 3 to x = 0; faces meet when the centers are one
        // unit apart, two thirds of the way through the interval.
        let a = square();
        let b = square();
        let mut simplex = Simplex::default();
        let sweep_b = Sweep {
            p0: DVec2::new(3.0, 0.0),
            p1: DVec2::ZERO,
            r0: 0.0,
            r1: 0.0,
        };
        let t = time_of_impact(&mut simplex, &a, stationary(0.0, 0.0), &b, sweep_b);
        assert!((0.0..=1.0).contains(&t));
        assert_relative_eq!(t, 2.0 / 3.0, epsilon = 5e-3);
    }

    #[test]
    fn test_separated_and_stationary() {
        let a = square();
        let b = square();
        let mut simplex = Simplex::default();
        let t = time_of_impact(&mut simplex, &a, stationary(0.0, 0.0), &b, stationary(5.0, 0.0));
        assert_relative_eq!(t, 1.0);
    }

    #[test]
    fn test_no_relative_motion() {
        // Both bodies translate identically; the gap never changes.
        let a = square();
        let b = square();
        let mut simplex = Simplex::default();
        let sweep_a = Sweep {
            p0: DVec2::ZERO,
            p1: DVec2::new(2.0, 1.0),
            r0: 0.0,
            r1: 0.0,
        };
        let sweep_b = Sweep {
            p0: DVec2::new(3.0, 0.0),
            p1: DVec2::new(5.0, 1.0),
            r0: 0.0,
            r1: 0.0,
        };
        let t = time_of_impact(&mut simplex, &a, sweep_a, &b, sweep_b);
        assert_relative_eq!(t, 1.0);
    }

    #[test]
    fn test_initial_overlap_returns_zero() {
        let a = square();
        let b = square();
        let mut simplex = Simplex::default();
        let t = time_of_impact(&mut simplex, &a, stationary(0.0, 0.0), &b, stationary(0.2, 0.0));
        assert_relative_eq!(t, 0.0);
    }

    #[test]
    fn test_miss_passes_clear() {
        // B crosses above A with a two-unit vertical gap.
        let a = square();
        let b = square();
        let mut simplex = Simplex::default();
        let sweep_b = Sweep {
            p0: DVec2::new(-3.0, 3.0),
            p1: DVec2::new(3.0, 3.0),
            r0: 0.0,
            r1: 0.0,
        };
        let t = time_of_impact(&mut simplex, &a, stationary(0.0, 0.0), &b, sweep_b);
        assert_relative_eq!(t, 1.0);
    }

    #[test]
    fn test_spinning_square_hits_early() {
        // B spins up to 45 degrees while approaching, so a corner leads and
        // contact lands before the face-on time of 2/3.
        let a = square();
        let b = square();
        let mut simplex = Simplex::default();
        let sweep_b = Sweep {
            p0: DVec2::new(3.0, 0.0),
            p1: DVec2::ZERO,
            r0: 0.0,
            r1: std::f64::consts::FRAC_PI_4,
        };
        let t = time_of_impact(&mut simplex, &a, stationary(0.0, 0.0), &b, sweep_b);
        assert!((0.0..=1.0).contains(&t));
        assert_relative_eq!(t, 0.605, epsilon = 2e-2);
    }

    #[test]
    fn test_simplex_reuse_across_queries() {
        let a = square();
        let b = square();
        let sweep_b = Sweep {
            p0: DVec2::new(3.0, 0.0),
            p1: DVec2::ZERO,
            r0: 0.0,
            r1: 0.0,
        };
        let mut simplex = Simplex::default();
        let t0 = time_of_impact(&mut simplex, &a, stationary(0.0, 0.0), &b, sweep_b);
        let t1 = time_of_impact(&mut simplex, &a, stationary(0.0, 0.0), &b, sweep_b);
        assert_relative_eq!(t0, t1, epsilon = 1e-12);
    }
}
