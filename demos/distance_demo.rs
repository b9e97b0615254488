//! Console walk-through: a spinning box and an incoming box, stepped with
//! sweeps. Prints distance, contact, and time of impact per frame.

use glam::DVec2;
use thud::*;

struct Body {
    position: DVec2,
    rotation: f64,
    velocity: DVec2,
    angular_velocity: f64,
    shape: Shape,
}

impl Body {
    fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    fn sweep(&self, dt: f64) -> Sweep {
        Sweep {
            p0: self.position,
            p1: self.position + self.velocity * dt,
            r0: self.rotation,
            r1: self.rotation + self.angular_velocity * dt,
        }
    }

    fn advance(&mut self, dt: f64, t: f64) {
        let sweep = self.sweep(dt).advance(t);
        self.position = sweep.p0;
        self.rotation = sweep.r0;
    }
}

fn main() {
    let mut a = Body {
        position: DVec2::ZERO,
        rotation: 0.0,
        velocity: DVec2::ZERO,
        angular_velocity: 0.8,
        shape: Polygon::rect(0.0, 0.0, 2.0, 2.0).into(),
    };
    let mut b = Body {
        position: DVec2::new(8.0, 0.4),
        rotation: 0.0,
        velocity: DVec2::new(-6.0, 0.0),
        angular_velocity: 0.0,
        shape: Polygon::rect(0.0, 0.0, 1.5, 1.0).into(),
    };

    let dt = 1.0 / 60.0;
    let mut simplex = Simplex::default();

    for step in 0..120 {
        let toi = time_of_impact(&mut simplex, &a.shape, a.sweep(dt), &b.shape, b.sweep(dt));
        a.advance(dt, toi);
        b.advance(dt, toi);

        let d = distance(&a.shape, a.transform(), &b.shape, b.transform());
        print!("step {step:3}  t {toi:.3}  distance {d:.3}");
        if let Some(c) = collide(&a.shape, a.transform(), &b.shape, b.transform()) {
            print!(
                "  contact normal ({:+.2}, {:+.2}) depth {:.3}",
                c.normal.x, c.normal.y, c.depth
            );
        }
        println!();

        if toi < 1.0 {
            println!("impact at step {step}");
            break;
        }
    }
}
