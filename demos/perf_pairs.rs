use glam::DVec2;
use std::time::Instant;
use thud::*;

fn main() {
    let n = 1_000_000u32;
    let box_a: Shape = Polygon::rect(0.0, 0.0, 2.0, 2.0).into();
    let box_b: Shape = Polygon::rect(0.0, 0.0, 1.0, 3.0).into();
    let disc = Shape::circle(DVec2::ZERO, 0.75);

    let mut acc = 0.0f64;
    let start = Instant::now();
    for i in 0..n {
        let t = (i as f64) * 0.001;
        let xfa = Transform::new(DVec2::ZERO, t.sin());
        let xfb = Transform::new(DVec2::new(1.5 + t.cos(), 0.0), 0.0);
        acc += distance(&box_a, xfa, &box_b, xfb);
    }
    println!("distance     {} iters in {:?} acc={}", n, start.elapsed(), acc);

    let mut hits = 0u32;
    let start = Instant::now();
    for i in 0..n {
        let t = (i as f64) * 0.001;
        let xfa = Transform::new(DVec2::ZERO, t.sin());
        let xfb = Transform::new(DVec2::new(1.0 + t.cos(), 0.0), 0.0);
        if collide(&box_a, xfa, &disc, xfb).is_some() {
            hits += 1;
        }
    }
    println!("collide      {} iters in {:?} hits={}", n, start.elapsed(), hits);

    let n_toi = n / 10;
    let mut acc = 0.0f64;
    let mut simplex = Simplex::default();
    let start = Instant::now();
    for i in 0..n_toi {
        let t = (i as f64) * 0.001;
        let sweep_a = Sweep::default();
        let sweep_b = Sweep {
            p0: DVec2::new(4.0 + t.sin(), 0.0),
            p1: DVec2::new(t.sin(), 0.0),
            r0: 0.0,
            r1: 0.3,
        };
        acc += time_of_impact(&mut simplex, &box_a, sweep_a, &box_b, sweep_b);
    }
    println!("toi          {} iters in {:?} acc={}", n_toi, start.elapsed(), acc);
}
