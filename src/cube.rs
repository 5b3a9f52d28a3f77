use bevy::prelude::*;

/// One face of the container, as a box collider attached to the cube body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub half_extents: Vec3,
    pub offset: Vec3,
}

/// Back, front, left, right, bottom, top.
pub fn walls(size: f32, thickness: f32) -> [Wall; 6] {
    let h = size / 2.0;
    let t = thickness / 2.0;
    let z_slab = Vec3::new(h, h, t);
    let x_slab = Vec3::new(t, h, h);
    let y_slab = Vec3::new(h, t, h);
    [
        Wall { half_extents: z_slab, offset: Vec3::new(0.0, 0.0, -h) },
        Wall { half_extents: z_slab, offset: Vec3::new(0.0, 0.0, h) },
        Wall { half_extents: x_slab, offset: Vec3::new(-h, 0.0, 0.0) },
        Wall { half_extents: x_slab, offset: Vec3::new(h, 0.0, 0.0) },
        Wall { half_extents: y_slab, offset: Vec3::new(0.0, -h, 0.0) },
        Wall { half_extents: y_slab, offset: Vec3::new(0.0, h, 0.0) },
    ]
}

pub fn edge_segments(size: f32) -> [(Vec3, Vec3); 12] {
    let h = size / 2.0;
    let c = |x: f32, y: f32, z: f32| Vec3::new(x * h, y * h, z * h);
    [
        // bottom ring
        (c(-1.0, -1.0, -1.0), c(1.0, -1.0, -1.0)),
        (c(1.0, -1.0, -1.0), c(1.0, -1.0, 1.0)),
        (c(1.0, -1.0, 1.0), c(-1.0, -1.0, 1.0)),
        (c(-1.0, -1.0, 1.0), c(-1.0, -1.0, -1.0)),
        // top ring
        (c(-1.0, 1.0, -1.0), c(1.0, 1.0, -1.0)),
        (c(1.0, 1.0, -1.0), c(1.0, 1.0, 1.0)),
        (c(1.0, 1.0, 1.0), c(-1.0, 1.0, 1.0)),
        (c(-1.0, 1.0, 1.0), c(-1.0, 1.0, -1.0)),
        // pillars
        (c(-1.0, -1.0, -1.0), c(-1.0, 1.0, -1.0)),
        (c(1.0, -1.0, -1.0), c(1.0, 1.0, -1.0)),
        (c(1.0, -1.0, 1.0), c(1.0, 1.0, 1.0)),
        (c(-1.0, -1.0, 1.0), c(-1.0, 1.0, 1.0)),
    ]
}

/// Half-range of each coordinate when dropping a ball of `radius` into the cube.
pub fn spawn_extent(size: f32, radius: f32) -> f32 {
    ((size - radius * 2.0) / 2.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_enclose_the_cube() {
        let w = walls(10.0, 0.1);
        assert_eq!(w[0].offset, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(w[0].half_extents, Vec3::new(5.0, 5.0, 0.05));
        assert_eq!(w[3].offset, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(w[3].half_extents, Vec3::new(0.05, 5.0, 5.0));
        assert_eq!(w[4].offset, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(w[5].half_extents, Vec3::new(5.0, 0.05, 5.0));

        // each wall is thin along the axis it is offset on
        for wall in w {
            let axis = wall.offset.abs().normalize();
            assert!((wall.half_extents.dot(axis) - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn edges_are_twelve_distinct_unit_segments() {
        let edges = edge_segments(10.0);
        for (a, b) in edges {
            assert!((a.distance(b) - 10.0).abs() < 1e-5);
            assert_eq!(a.abs(), Vec3::splat(5.0));
            assert_eq!(b.abs(), Vec3::splat(5.0));
        }
        for i in 0..edges.len() {
            for j in (i + 1)..edges.len() {
                let (a, b) = edges[i];
                let (c, d) = edges[j];
                assert!(!((a == c && b == d) || (a == d && b == c)));
            }
        }
    }

    #[test]
    fn spawn_extent_keeps_balls_inside() {
        assert!((spawn_extent(10.0, 0.8) - 4.2).abs() < 1e-6);
        assert_eq!(spawn_extent(1.0, 0.8), 0.0);
    }
}
