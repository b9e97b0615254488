use glam::DVec2;

/// Support queries used by the distance engine.
///
/// `support` returns the index of the vertex furthest along `dir` (given in
/// the shape's local space); `vertex` returns the local point at that index.
pub trait Support {
    fn support(&self, dir: DVec2) -> usize;
    fn vertex(&self, index: usize) -> DVec2;
}

/// A circle with a local-space center.
#[derive(Clone, Debug)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Support for Circle {
    fn support(&self, _dir: DVec2) -> usize {
        0
    }

    fn vertex(&self, _index: usize) -> DVec2 {
        self.center
    }
}

/// A convex polygon with clockwise vertices and precomputed outward edge
/// normals. `normals[i]` belongs to the edge from `points[i]` to
/// `points[(i + 1) % len]`.
///
/// Convexity and winding are not checked; violating either yields
/// geometrically meaningless results.
#[derive(Clone, Debug)]
pub struct Polygon {
    pub points: Vec<DVec2>,
    pub normals: Vec<DVec2>,
}

impl Polygon {
    /// Build a polygon from vertices given in clockwise order.
    pub fn new(points: Vec<DVec2>) -> Self {
        debug_assert!(points.len() >= 3, "polygon needs at least three vertices");
        let normals = points
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let q = points[(i + 1) % points.len()];
                // Clockwise winding makes the clockwise perpendicular point outward.
                (-(q - p).perp()).normalize_or_zero()
            })
            .collect();
        Self { points, normals }
    }

    /// Axis-aligned rectangle from a center and half extents, vertices in
    /// clockwise order starting at (-x, -y).
    pub fn rectangle(center: DVec2, half_extents: DVec2) -> Self {
        let h = half_extents;
        Self::new(vec![
            center + DVec2::new(-h.x, -h.y),
            center + DVec2::new(h.x, -h.y),
            center + DVec2::new(h.x, h.y),
            center + DVec2::new(-h.x, h.y),
        ])
    }

    /// Shorthand for `rectangle` taking a center point and full extents.
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::rectangle(DVec2::new(x, y), DVec2::new(w / 2.0, h / 2.0))
    }
}

impl Support for Polygon {
    fn support(&self, dir: DVec2) -> usize {
        let mut index = 0;
        let mut best = dir.dot(self.points[0]);
        for (i, &p) in self.points.iter().enumerate().skip(1) {
            let d = dir.dot(p);
            if d > best {
                index = i;
                best = d;
            }
        }
        index
    }

    fn vertex(&self, index: usize) -> DVec2 {
        self.points[index]
    }
}

/// A convex shape: circle or polygon.
#[derive(Clone, Debug)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

impl Shape {
    pub fn circle(center: DVec2, radius: f64) -> Self {
        Shape::Circle(Circle { center, radius })
    }

    /// Radius of the rounded part of the shape; zero for polygons.
    pub fn radius(&self) -> f64 {
        match self {
            Shape::Circle(c) => c.radius,
            Shape::Polygon(_) => 0.0,
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Shape::Polygon(p)
    }
}

impl Support for Shape {
    fn support(&self, dir: DVec2) -> usize {
        match self {
            Shape::Circle(c) => c.support(dir),
            Shape::Polygon(p) => p.support(dir),
        }
    }

    fn vertex(&self, index: usize) -> DVec2 {
        match self {
            Shape::Circle(c) => c.vertex(index),
            Shape::Polygon(p) => p.vertex(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_normals_axis_aligned() {
        let p = Polygon::rect(0.0, 0.0, 2.0, 2.0);
        let expected = [
            DVec2::new(0.0, -1.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(-1.0, 0.0),
        ];
        for (n, e) in p.normals.iter().zip(expected) {
            assert_relative_eq!(n.x, e.x, epsilon = 1e-12);
            assert_relative_eq!(n.y, e.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_polygon_normals_unit_and_outward() {
        let p = Polygon::new(vec![
            DVec2::new(-1.0, -1.0),
            DVec2::new(1.5, -0.5),
            DVec2::new(2.0, 1.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(-1.5, 0.5),
        ]);
        let centroid = p.points.iter().sum::<DVec2>() / p.points.len() as f64;
        for i in 0..p.points.len() {
            let n = p.normals[i];
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-9);
            // The normal points away from the centroid at the edge midpoint.
            let mid = (p.points[i] + p.points[(i + 1) % p.points.len()]) * 0.5;
            assert!(n.dot(mid - centroid) > 0.0);
        }
    }

    #[test]
    fn test_polygon_support_picks_furthest_vertex() {
        let p = Polygon::rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(p.support(DVec2::new(1.0, 1.0)), 2);
        assert_eq!(p.support(DVec2::new(-1.0, -1.0)), 0);
        // Ties keep the first vertex encountered.
        assert_eq!(p.support(DVec2::new(1.0, 0.0)), 1);
        assert_eq!(p.vertex(2), DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_circle_support_is_center() {
        let c = Circle {
            center: DVec2::new(3.0, -2.0),
            radius: 1.5,
        };
        assert_eq!(c.support(DVec2::new(0.0, 1.0)), 0);
        assert_eq!(c.vertex(0), c.center);
        assert_eq!(c.vertex(7), c.center);
    }

    #[test]
    fn test_shape_radius() {
        assert_relative_eq!(Shape::circle(DVec2::ZERO, 2.0).radius(), 2.0);
        assert_relative_eq!(Shape::from(Polygon::rect(0.0, 0.0, 1.0, 1.0)).radius(), 0.0);
    }
}
