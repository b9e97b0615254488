use glam::DVec2;

use crate::shape::{Circle, Polygon, Shape};
use crate::types::{Collision, Transform};

/// Contact between two positioned shapes, or `None` when they are disjoint.
///
/// The normal is a unit vector pointing from `a` toward `b`; the depth is
/// the non-negative penetration along it.
pub fn collide(a: &Shape, xfa: Transform, b: &Shape, xfb: Transform) -> Option<Collision> {
    match (a, b) {
        (Shape::Circle(a), Shape::Circle(b)) => collide_circles(a, xfa, b, xfb),
        (Shape::Circle(a), Shape::Polygon(b)) => collide_circle_polygon(a, xfa, b, xfb),
        (Shape::Polygon(a), Shape::Circle(b)) => collide_polygon_circle(a, xfa, b, xfb),
        (Shape::Polygon(a), Shape::Polygon(b)) => collide_polygons(a, xfa, b, xfb),
    }
}

pub fn collide_circles(
    a: &Circle,
    xfa: Transform,
    b: &Circle,
    xfb: Transform,
) -> Option<Collision> {
    let center_a = xfa.apply(a.center);
    let center_b = xfb.apply(b.center);
    let n = center_b - center_a;
    let r = a.radius + b.radius;

    let d2 = n.length_squared();
    if d2 > r * r {
        return None;
    }

    let d = d2.sqrt();
    let normal = if d > 0.0 {
        n / d
    } else {
        // Coincident centers: any direction works.
        DVec2::X
    };

    Some(Collision {
        normal,
        depth: r - d,
    })
}

pub fn collide_polygon_circle(
    a: &Polygon,
    xfa: Transform,
    b: &Circle,
    xfb: Transform,
) -> Option<Collision> {
    // Circle center in the polygon's frame.
    let center = xfa.apply_inv(xfb.apply(b.center));

    // Find the face the center penetrates least deeply.
    let mut normal_index = 0;
    let mut separation = f64::NEG_INFINITY;
    for i in 0..a.points.len() {
        let s = a.normals[i].dot(center - a.points[i]);
        if s > b.radius {
            return None;
        }
        if s > separation {
            separation = s;
            normal_index = i;
        }
    }

    let i = normal_index;
    let j = (i + 1) % a.points.len();
    let v1 = a.points[i];
    let v2 = a.points[j];

    // Center exactly on the deepest face.
    if separation == 0.0 {
        return Some(Collision {
            normal: -xfa.rotation.rotate(a.normals[normal_index]),
            depth: b.radius,
        });
    }

    // Voronoi region of the face: vertex v1, vertex v2, or the face itself.
    let u1 = (center - v1).dot(v2 - v1);
    let u2 = (center - v2).dot(v1 - v2);
    if u1 <= 0.0 {
        if center.distance_squared(v1) > b.radius * b.radius {
            return None;
        }
        Some(Collision {
            normal: xfa.rotation.rotate(v1 - center).normalize_or_zero(),
            depth: b.radius - separation,
        })
    } else if u2 <= 0.0 {
        if center.distance_squared(v2) > b.radius * b.radius {
            return None;
        }
        Some(Collision {
            normal: xfa.rotation.rotate(center - v2).normalize_or_zero(),
            depth: b.radius - separation,
        })
    } else {
        let n = a.normals[normal_index];
        let face = (v1 + v2) * 0.5;
        if (center - face).dot(n) > b.radius {
            return None;
        }
        Some(Collision {
            normal: xfa.rotation.rotate(n),
            depth: b.radius - separation,
        })
    }
}

pub fn collide_circle_polygon(
    a: &Circle,
    xfa: Transform,
    b: &Polygon,
    xfb: Transform,
) -> Option<Collision> {
    collide_polygon_circle(b, xfb, a, xfa).map(|c| Collision {
        normal: -c.normal,
        depth: c.depth,
    })
}

/// Maximum separation of `b` from `a` over `a`'s face normals, and the face
/// that realizes it.
fn find_max_separation(a: &Polygon, xfa: Transform, b: &Polygon, xfb: Transform) -> (usize, f64) {
    let mut best_index = 0;
    let mut max_separation = f64::NEG_INFINITY;

    for i in 0..a.points.len() {
        // A's face normal and a vertex on that face, expressed in B's frame.
        let n = xfb.rotation.inv_rotate(xfa.rotation.rotate(a.normals[i]));
        let v = xfb.apply_inv(xfa.apply(a.points[i]));

        // Deepest vertex of B against this face.
        let mut d = f64::INFINITY;
        for &p in &b.points {
            d = d.min(n.dot(p - v));
        }

        if d > max_separation {
            max_separation = d;
            best_index = i;
        }
    }

    (best_index, max_separation)
}

/// The edge of `b` most anti-parallel to `a`'s reference face, as a world
/// space segment.
fn find_incident_edge(
    a: &Polygon,
    xfa: Transform,
    b: &Polygon,
    xfb: Transform,
    edge: usize,
) -> [DVec2; 2] {
    // Reference normal in B's frame.
    let normal = xfb.rotation.inv_rotate(xfa.rotation.rotate(a.normals[edge]));

    let mut index = 0;
    let mut min_dot = f64::INFINITY;
    for (i, &n) in b.normals.iter().enumerate() {
        let dot = normal.dot(n);
        if dot < min_dot {
            min_dot = dot;
            index = i;
        }
    }

    let j = (index + 1) % b.points.len();
    [xfb.apply(b.points[index]), xfb.apply(b.points[j])]
}

/// Clip the segment against the half-plane `dot(n, x) <= c`, keeping the
/// intersection point when the endpoints straddle the plane. Returns how
/// many points survived.
fn clip(n: DVec2, c: f64, edge: &mut [DVec2; 2]) -> usize {
    let mut out = *edge;
    let mut sp = 0;

    // Signed distance of each endpoint to the plane.
    let d1 = n.dot(edge[0]) - c;
    let d2 = n.dot(edge[1]) - c;

    if d1 <= 0.0 {
        out[sp] = edge[0];
        sp += 1;
    }
    if d2 <= 0.0 {
        out[sp] = edge[1];
        sp += 1;
    }

    // Strictly negative so a -0.0 product does not count as straddling.
    if d1 * d2 < 0.0 {
        let alpha = d1 / (d1 - d2);
        out[sp] = edge[0] + (edge[1] - edge[0]) * alpha;
        sp += 1;
    }

    *edge = out;
    sp
}

pub fn collide_polygons(
    a: &Polygon,
    xfa: Transform,
    b: &Polygon,
    xfb: Transform,
) -> Option<Collision> {
    // A separating axis among either polygon's face normals means no contact.
    let (edge_a, separation_a) = find_max_separation(a, xfa, b, xfb);
    if separation_a >= 0.0 {
        return None;
    }
    let (edge_b, separation_b) = find_max_separation(b, xfb, a, xfa);
    if separation_b >= 0.0 {
        return None;
    }

    // The reference polygon is the one with the larger (least negative)
    // separation; `flip` keeps the reported normal pointing from A to B.
    let (a, xfa, b, xfb, edge, flip) = if separation_b > separation_a {
        (b, xfb, a, xfa, edge_b, true)
    } else {
        (a, xfa, b, xfb, edge_a, false)
    };

    let mut incident = find_incident_edge(a, xfa, b, xfb, edge);

    // Reference face in world space.
    let i = edge;
    let j = (i + 1) % a.points.len();
    let v1 = a.points[i];
    let v2 = a.points[j];

    let tangent = xfa.rotation.rotate((v2 - v1).normalize_or_zero());
    let normal = -tangent.perp();

    let v1 = xfa.apply(v1);
    let v2 = xfa.apply(v2);

    let ref_c = normal.dot(v1);
    let neg_side = -tangent.dot(v1);
    let pos_side = tangent.dot(v2);

    // Clip the incident edge to the reference face's side planes. Losing a
    // point is floating-point starvation; call it a miss.
    if clip(-tangent, neg_side, &mut incident) < 2 {
        return None;
    }
    if clip(tangent, pos_side, &mut incident) < 2 {
        return None;
    }

    // Deepest clipped point below the reference face.
    let mut overlap: f64 = 0.0;
    let separation0 = normal.dot(incident[0]) - ref_c;
    if separation0 <= 0.0 {
        overlap = -separation0;
    }
    let separation1 = normal.dot(incident[1]) - ref_c;
    if separation1 <= 0.0 {
        overlap = overlap.max(-separation1);
    }

    if overlap == 0.0 {
        return None;
    }

    Some(Collision {
        normal: if flip { -normal } else { normal },
        depth: overlap,
    })
}
