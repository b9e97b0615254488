use glam::DVec2;

use crate::shape::{Shape, Support};
use crate::types::Transform;

/// Warm-start data carried between distance queries.
///
/// Records the vertex identities of the last simplex so the next query can
/// rebuild it at the new transforms instead of starting cold. Caller-owned
/// and cheap to copy.
#[derive(Copy, Clone, Debug, Default)]
pub struct SimplexCache {
    pub(crate) metric: f64,
    pub(crate) count: u8,
    pub(crate) index_a: [usize; 3],
    pub(crate) index_b: [usize; 3],
}

/// One vertex of the simplex in the Minkowski difference B - A.
#[derive(Copy, Clone, Debug, Default)]
struct SimplexVertex {
    /// Support point on A, world space.
    a: DVec2,
    /// Support point on B, world space.
    b: DVec2,
    /// Minkowski point `b - a`.
    p: DVec2,
    /// Barycentric weight for the closest point.
    u: f64,
    /// Index of the generating vertex on A.
    index_a: usize,
    /// Index of the generating vertex on B.
    index_b: usize,
}

/// A 1-3 vertex simplex inside the Minkowski difference of two shapes.
///
/// Evolved by [`Simplex::gjk`] toward the feature closest to the origin;
/// the origin-to-simplex distance is then the distance between the shapes'
/// support hulls.
#[derive(Copy, Clone, Debug, Default)]
pub struct Simplex {
    count: u8,
    v: [SimplexVertex; 3],
}

impl Simplex {
    /// Rebuild the simplex from a cache written by a previous query.
    ///
    /// Vertex positions are recomputed from the shapes at the given
    /// transforms. If the rebuilt simplex no longer resembles the cached
    /// metric, the cache is stale and the simplex is emptied so the next
    /// [`Simplex::gjk`] starts cold.
    pub fn read_cache<A, B>(
        &mut self,
        cache: &SimplexCache,
        a: &A,
        xfa: Transform,
        b: &B,
        xfb: Transform,
    ) where
        A: Support + ?Sized,
        B: Support + ?Sized,
    {
        self.count = cache.count;
        for i in 0..self.count as usize {
            let v = &mut self.v[i];
            v.index_a = cache.index_a[i];
            v.index_b = cache.index_b[i];
            v.a = xfa.apply(a.vertex(v.index_a));
            v.b = xfb.apply(b.vertex(v.index_b));
            v.p = v.b - v.a;
        }

        if self.count > 1 {
            let m_old = cache.metric;
            let m_new = self.metric();
            if m_new < 0.5 * m_old || 2.0 * m_old < m_new || m_new < 1e-4 {
                self.count = 0;
            }
        }
    }

    /// Store the simplex's vertex identities for the next query.
    pub fn write_cache(&self, cache: &mut SimplexCache) {
        cache.metric = self.metric();
        cache.count = self.count;
        for i in 0..self.count as usize {
            cache.index_a[i] = self.v[i].index_a;
            cache.index_b[i] = self.v[i].index_b;
        }
    }

    /// The point on the simplex closest to the origin.
    pub fn closest_point(&self) -> DVec2 {
        match self.count {
            1 => self.v[0].p,
            2 => self.v[0].p * self.v[0].u + self.v[1].p * self.v[1].u,
            3 => DVec2::ZERO,
            _ => unreachable!("bad simplex count"),
        }
    }

    /// The world-space points on A and B realizing the closest distance.
    /// With three vertices the shapes overlap and both points coincide.
    pub fn witness_points(&self) -> (DVec2, DVec2) {
        match self.count {
            1 => (self.v[0].a, self.v[0].b),
            2 => (
                self.v[0].a * self.v[0].u + self.v[1].a * self.v[1].u,
                self.v[0].b * self.v[0].u + self.v[1].b * self.v[1].u,
            ),
            3 => {
                let p = self.v[0].a * self.v[0].u
                    + self.v[1].a * self.v[1].u
                    + self.v[2].a * self.v[2].u;
                (p, p)
            }
            _ => unreachable!("bad simplex count"),
        }
    }

    /// A length/area metric identifying the simplex, used to detect stale
    /// caches.
    pub fn metric(&self) -> f64 {
        match self.count {
            1 => 0.0,
            2 => (self.v[0].p - self.v[1].p).length(),
            3 => (self.v[1].p - self.v[0].p).perp_dot(self.v[2].p - self.v[0].p),
            _ => unreachable!("bad simplex count"),
        }
    }

    /// Direction from the reduced simplex toward the origin.
    fn search_direction(&self) -> DVec2 {
        match self.count {
            1 => -self.v[0].p,
            2 => {
                let ab = self.v[1].p - self.v[0].p;
                let ao = -self.v[0].p;
                if ab.perp_dot(ao) > 0.0 {
                    // Origin is left of ab.
                    ab.perp()
                } else {
                    // Origin is right of ab.
                    -ab.perp()
                }
            }
            _ => unreachable!("bad simplex count"),
        }
    }

    /// Reduce the simplex to the feature whose Voronoi region contains the
    /// origin.
    fn evolve(&mut self) {
        match self.count {
            1 => {}
            2 => self.evolve_line(),
            3 => self.evolve_triangle(),
            _ => unreachable!("bad simplex count"),
        }
    }

    fn evolve_line(&mut self) {
        let a = self.v[0];
        let b = self.v[1];

        // Unnormalized barycentric coordinates of the origin on ab.
        let n = b.p - a.p;
        let u = b.p.dot(n);
        let v = (-a.p).dot(n);

        // Region A
        if v <= 0.0 {
            self.count = 1;
            self.v[0] = a;
            return;
        }

        // Region B
        if u <= 0.0 {
            self.count = 1;
            self.v[0] = b;
            return;
        }

        // Region AB
        let l = n.length_squared();
        self.v[0].u = u / l;
        self.v[1].u = v / l;
    }

    fn evolve_triangle(&mut self) {
        let a = self.v[0];
        let b = self.v[1];
        let c = self.v[2];

        // Unnormalized barycentric coordinates of the origin on each edge.
        let ab = b.p - a.p;
        let bc = c.p - b.p;
        let ca = a.p - c.p;
        let (u_ab, v_ab) = (b.p.dot(ab), (-a.p).dot(ab));
        let (u_bc, v_bc) = (c.p.dot(bc), (-b.p).dot(bc));
        let (u_ca, v_ca) = (a.p.dot(ca), (-c.p).dot(ca));

        // Region A
        if v_ab <= 0.0 && u_ca <= 0.0 {
            self.count = 1;
            self.v[0] = a;
            return;
        }
        // Region B
        if u_ab <= 0.0 && v_bc <= 0.0 {
            self.count = 1;
            self.v[0] = b;
            return;
        }
        // Region C
        if u_bc <= 0.0 && v_ca <= 0.0 {
            self.count = 1;
            self.v[0] = c;
            return;
        }

        // Signed triangle area and triangle barycentric coordinates.
        let area = ab.perp_dot(c.p - a.p);
        let u_abc = b.p.perp_dot(c.p) * area;
        let v_abc = c.p.perp_dot(a.p) * area;
        let w_abc = a.p.perp_dot(b.p) * area;

        // Region AB
        if u_ab > 0.0 && v_ab > 0.0 && w_abc <= 0.0 {
            let l = ab.length_squared();
            self.count = 2;
            self.v[0] = SimplexVertex { u: u_ab / l, ..a };
            self.v[1] = SimplexVertex { u: v_ab / l, ..b };
            return;
        }
        // Region BC
        if u_bc > 0.0 && v_bc > 0.0 && u_abc <= 0.0 {
            let l = bc.length_squared();
            self.count = 2;
            self.v[0] = SimplexVertex { u: u_bc / l, ..b };
            self.v[1] = SimplexVertex { u: v_bc / l, ..c };
            return;
        }
        // Region CA
        if u_ca > 0.0 && v_ca > 0.0 && v_abc <= 0.0 {
            let l = ca.length_squared();
            self.count = 2;
            self.v[0] = SimplexVertex { u: u_ca / l, ..c };
            self.v[1] = SimplexVertex { u: v_ca / l, ..a };
            return;
        }

        // Region ABC: the origin is inside the triangle. The area is
        // guaranteed non-zero here.
        let d = u_abc + v_abc + w_abc;
        self.v[0].u = u_abc / d;
        self.v[1].u = v_abc / d;
        self.v[2].u = w_abc / d;
    }

    /// Run the Gilbert-Johnson-Keerthi distance algorithm.
    ///
    /// Evolves the simplex until it holds the feature of the Minkowski
    /// difference closest to the origin, or encloses the origin (overlap).
    /// Terminates when a support vertex pair repeats, meaning no further
    /// progress can be made.
    pub fn gjk<A, B>(&mut self, a: &A, xfa: Transform, b: &B, xfb: Transform)
    where
        A: Support + ?Sized,
        B: Support + ?Sized,
    {
        // Starting cold: seed with an arbitrary vertex pair.
        if self.count == 0 {
            let wa = xfa.apply(a.vertex(0));
            let wb = xfb.apply(b.vertex(0));
            self.count = 1;
            self.v[0] = SimplexVertex {
                a: wa,
                b: wb,
                p: wb - wa,
                u: 1.0,
                index_a: 0,
                index_b: 0,
            };
        }

        let mut old_index_a = [0usize; 3];
        let mut old_index_b = [0usize; 3];

        'main: loop {
            // Remember the current vertex identities to detect duplicates.
            let old_count = self.count as usize;
            for i in 0..old_count {
                old_index_a[i] = self.v[i].index_a;
                old_index_b[i] = self.v[i].index_b;
            }

            self.evolve();

            // Three vertices enclose the origin: the shapes overlap.
            if self.count == 3 {
                break;
            }

            let dir = self.search_direction();
            if dir.length_squared() == 0.0 {
                break;
            }

            // New support vertex in the search direction.
            let index_a = a.support(xfa.rotation.inv_rotate(-dir));
            let index_b = b.support(xfb.rotation.inv_rotate(dir));
            let wa = xfa.apply(a.vertex(index_a));
            let wb = xfb.apply(b.vertex(index_b));

            // A repeated support pair means no progress: converged.
            for i in 0..old_count {
                if index_a == old_index_a[i] && index_b == old_index_b[i] {
                    break 'main;
                }
            }

            self.v[self.count as usize] = SimplexVertex {
                a: wa,
                b: wb,
                p: wb - wa,
                u: 1.0,
                index_a,
                index_b,
            };
            self.count += 1;
        }
    }
}

/// Shortest distance between two positioned shapes; zero when they overlap
/// or touch.
pub fn distance(a: &Shape, xfa: Transform, b: &Shape, xfb: Transform) -> f64 {
    let mut simplex = Simplex::default();
    simplex.gjk(a, xfa, b, xfb);
    // GJK measures between support hulls; circle radii shrink that gap.
    (simplex.closest_point().length() - a.radius() - b.radius()).max(0.0)
}
