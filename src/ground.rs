//! Ground surface queries: a uniform plane, a per-tile override table, or a
//! heightfield. All three answer the same three questions — `sample_at`,
//! `raycast`, `material_at` — over `(point, normal, bodyprops)`.
//!
//! Consumes [`crate::numal`] only, the same way [`crate::collision`] does;
//! it does not know about `navsys::Coord` or any grid, so tile lookups use
//! their own small [`TileCoord`] rather than reaching into `navsys`.

use std::collections::HashMap;

use crate::numal::{Plane, Vec3};

/// Minimal surface material, named the way `rapier3d`'s `ColliderBuilder`
/// names the same two knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProps {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for BodyProps {
    fn default() -> Self {
        BodyProps { friction: 0.5, restitution: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        TileCoord { x, y }
    }
}

const PARALLEL_EPS: f32 = 1.0e-6;
const MARCH_BISECTION_ITERS: u32 = 16;

fn raycast_plane(plane: &Plane, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<(f32, Vec3, Vec3)> {
    let denom = plane.normal.dot(&dir);
    if denom.abs() <= PARALLEL_EPS {
        return None;
    }
    let sd = plane.signed_distance(origin);
    if sd.abs() <= PARALLEL_EPS {
        return Some((0.0, origin, plane.normal));
    }
    let t = -sd / denom;
    if t < 0.0 || t > max_dist {
        return None;
    }
    Some((t, origin + dir * t, plane.normal))
}

/// Borrowed per-tile override tables plus a world-position-to-tile mapper.
/// Tables are borrowed, not owned — same ownership split as the teacher's
/// short-lived query structures borrowing a `ColliderSet`/`RigidBodySet`.
pub struct Tiles<'a> {
    plane_table: &'a HashMap<TileCoord, Plane>,
    bodyprops_table: &'a HashMap<TileCoord, BodyProps>,
    mapper: Box<dyn Fn(Vec3) -> TileCoord + 'a>,
    fallback_plane: Plane,
    fallback_bodyprops: BodyProps,
}

impl<'a> Tiles<'a> {
    pub fn new(
        plane_table: &'a HashMap<TileCoord, Plane>,
        bodyprops_table: &'a HashMap<TileCoord, BodyProps>,
        mapper: impl Fn(Vec3) -> TileCoord + 'a,
        fallback_plane: Plane,
        fallback_bodyprops: BodyProps,
    ) -> Self {
        Tiles {
            plane_table,
            bodyprops_table,
            mapper: Box::new(mapper),
            fallback_plane,
            fallback_bodyprops,
        }
    }

    fn plane_at(&self, tile: TileCoord) -> &Plane {
        self.plane_table.get(&tile).unwrap_or(&self.fallback_plane)
    }

    fn bodyprops_at(&self, tile: TileCoord) -> BodyProps {
        self.bodyprops_table.get(&tile).copied().unwrap_or(self.fallback_bodyprops)
    }
}

enum ZBuffer<'a> {
    Owned(Vec<f32>),
    Borrowed(&'a [f32]),
}

impl ZBuffer<'_> {
    fn as_slice(&self) -> &[f32] {
        match self {
            ZBuffer::Owned(v) => v,
            ZBuffer::Borrowed(s) => s,
        }
    }
}

/// `z[y*width+x]` height samples on an axis-aligned grid; world height is
/// along `Z`, the grid spans world `X`/`Y`.
pub struct Heightfield<'a> {
    width: u32,
    height: u32,
    cell: f32,
    z: ZBuffer<'a>,
    bodyprops: BodyProps,
}

impl<'a> Heightfield<'a> {
    /// `None` if `z.len() != width*height`.
    pub fn owned(width: u32, height: u32, cell: f32, z: Vec<f32>, bodyprops: BodyProps) -> Option<Self> {
        if z.len() != (width * height) as usize {
            return None;
        }
        Some(Heightfield { width, height, cell, z: ZBuffer::Owned(z), bodyprops })
    }

    /// `None` if `z.len() != width*height`.
    pub fn borrowed(width: u32, height: u32, cell: f32, z: &'a [f32], bodyprops: BodyProps) -> Option<Self> {
        if z.len() != (width * height) as usize {
            return None;
        }
        Some(Heightfield { width, height, cell, z: ZBuffer::Borrowed(z), bodyprops })
    }

    fn sample_cell(&self, ix: i64, iy: i64) -> f32 {
        let cx = ix.clamp(0, self.width as i64 - 1) as usize;
        let cy = iy.clamp(0, self.height as i64 - 1) as usize;
        self.z.as_slice()[cy * self.width as usize + cx]
    }

    /// Bilinear height with clamp-to-edge sampling.
    fn height_bilinear(&self, x: f32, y: f32) -> f32 {
        let gx = x / self.cell;
        let gy = y / self.cell;
        let ix0 = gx.floor() as i64;
        let iy0 = gy.floor() as i64;
        let fx = gx - gx.floor();
        let fy = gy - gy.floor();

        let h00 = self.sample_cell(ix0, iy0);
        let h10 = self.sample_cell(ix0 + 1, iy0);
        let h01 = self.sample_cell(ix0, iy0 + 1);
        let h11 = self.sample_cell(ix0 + 1, iy0 + 1);

        let h0 = h00 + (h10 - h00) * fx;
        let h1 = h01 + (h11 - h01) * fx;
        h0 + (h1 - h0) * fy
    }

    fn normal_at(&self, x: f32, y: f32) -> Vec3 {
        let step = self.cell;
        let dzdx = (self.height_bilinear(x + step, y) - self.height_bilinear(x - step, y)) / (2.0 * step);
        let dzdy = (self.height_bilinear(x, y + step) - self.height_bilinear(x, y - step)) / (2.0 * step);
        crate::numal::vec3::normalize_or_zero(Vec3::new(-dzdx, -dzdy, 1.0))
    }

    fn ground_z(&self, world: Vec3) -> f32 {
        self.height_bilinear(world.x, world.y)
    }
}

pub enum Ground<'a> {
    Uniform { bodyprops: BodyProps, plane: Plane },
    Tiles(Tiles<'a>),
    Heightfield(Heightfield<'a>),
}

impl<'a> Ground<'a> {
    pub fn sample_at(&self, pos: Vec3) -> (Vec3, Vec3, BodyProps) {
        match self {
            Ground::Uniform { bodyprops, plane } => (plane.project(pos), plane.normal, *bodyprops),
            Ground::Tiles(tiles) => {
                let tile = (tiles.mapper)(pos);
                let plane = tiles.plane_at(tile);
                (plane.project(pos), plane.normal, tiles.bodyprops_at(tile))
            }
            Ground::Heightfield(hf) => {
                let z = hf.ground_z(pos);
                let point = Vec3::new(pos.x, pos.y, z);
                (point, hf.normal_at(pos.x, pos.y), hf.bodyprops)
            }
        }
    }

    pub fn material_at(&self, pos: Vec3) -> BodyProps {
        self.sample_at(pos).2
    }

    /// Returns `(point, normal, bodyprops, t)` on hit.
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<(Vec3, Vec3, BodyProps, f32)> {
        match self {
            Ground::Uniform { bodyprops, plane } => {
                let (t, point, normal) = raycast_plane(plane, origin, dir, max_dist)?;
                Some((point, normal, *bodyprops, t))
            }
            Ground::Tiles(tiles) => {
                let tile = (tiles.mapper)(origin);
                let plane = tiles.plane_at(tile);
                let (t, point, normal) = raycast_plane(plane, origin, dir, max_dist)?;
                Some((point, normal, tiles.bodyprops_at(tile), t))
            }
            Ground::Heightfield(hf) => heightfield_raycast(hf, origin, dir, max_dist),
        }
    }
}

fn heightfield_raycast(hf: &Heightfield, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<(Vec3, Vec3, BodyProps, f32)> {
    let f = |t: f32| -> f32 {
        let p = origin + dir * t;
        p.z - hf.ground_z(p)
    };

    let step = (hf.cell * 0.5).max(0.05);
    let mut t_prev = 0.0_f32;
    let mut f_prev = f(t_prev);

    let mut t = step;
    while t <= max_dist {
        let f_cur = f(t);
        if f_prev == 0.0 || f_prev.signum() != f_cur.signum() {
            let mut lo = t_prev;
            let mut hi = t;
            let mut f_lo = f_prev;
            for _ in 0..MARCH_BISECTION_ITERS {
                let mid = 0.5 * (lo + hi);
                let f_mid = f(mid);
                if f_lo.signum() == f_mid.signum() {
                    lo = mid;
                    f_lo = f_mid;
                } else {
                    hi = mid;
                }
            }
            let t_hit = 0.5 * (lo + hi);
            let p = origin + dir * t_hit;
            let normal = hf.normal_at(p.x, p.y);
            return Some((p, normal, hf.bodyprops, t_hit));
        }
        t_prev = t;
        f_prev = f_cur;
        t += step;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_raycast_hits_plane() {
        let ground = Ground::Uniform {
            bodyprops: BodyProps::default(),
            plane: Plane::new(Vec3::new(0.0, 0.0, 1.0), 0.0),
        };
        let hit = ground.raycast(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 10.0);
        assert!(hit.is_some());
        let (point, normal, _, t) = hit.unwrap();
        assert!((t - 5.0).abs() < 1.0e-4);
        assert!((point.z).abs() < 1.0e-4);
        assert!((normal.z - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn uniform_raycast_parallel_misses() {
        let ground = Ground::Uniform {
            bodyprops: BodyProps::default(),
            plane: Plane::new(Vec3::new(0.0, 0.0, 1.0), 0.0),
        };
        let hit = ground.raycast(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0), 10.0);
        assert!(hit.is_none());
    }

    #[test]
    fn tiles_fall_back_to_default_outside_table() {
        let planes: HashMap<TileCoord, Plane> = HashMap::new();
        let bodyprops: HashMap<TileCoord, BodyProps> = HashMap::new();
        let fallback_plane = Plane::new(Vec3::new(0.0, 0.0, 1.0), 0.0);
        let tiles = Tiles::new(
            &planes,
            &bodyprops,
            |p: Vec3| TileCoord::new(p.x.floor() as i32, p.y.floor() as i32),
            fallback_plane,
            BodyProps::default(),
        );
        let ground = Ground::Tiles(tiles);
        let (point, normal, _) = ground.sample_at(Vec3::new(3.0, 3.0, 2.0));
        assert!((point.z).abs() < 1.0e-4);
        assert!((normal.z - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn tiles_use_per_cell_override_when_present() {
        let mut planes: HashMap<TileCoord, Plane> = HashMap::new();
        planes.insert(TileCoord::new(0, 0), Plane::new(Vec3::new(0.0, 0.0, 1.0), -2.0));
        let mut bodyprops: HashMap<TileCoord, BodyProps> = HashMap::new();
        bodyprops.insert(TileCoord::new(0, 0), BodyProps { friction: 0.9, restitution: 0.1 });
        let fallback_plane = Plane::new(Vec3::new(0.0, 0.0, 1.0), 0.0);
        let tiles = Tiles::new(
            &planes,
            &bodyprops,
            |p: Vec3| TileCoord::new(p.x.floor() as i32, p.y.floor() as i32),
            fallback_plane,
            BodyProps::default(),
        );
        let ground = Ground::Tiles(tiles);
        let (point, _, props) = ground.sample_at(Vec3::new(0.5, 0.5, 5.0));
        assert!((point.z - 2.0).abs() < 1.0e-4);
        assert!((props.friction - 0.9).abs() < 1.0e-6);
    }

    #[test]
    fn heightfield_raycast_matches_known_scenario() {
        // z = 0.5 * x, 3x3 grid, cell = 1.
        let mut z = vec![0.0f32; 9];
        for gy in 0..3 {
            for gx in 0..3 {
                z[gy * 3 + gx] = 0.5 * gx as f32;
            }
        }
        let hf = Heightfield::owned(3, 3, 1.0, z, BodyProps::default()).unwrap();
        let ground = Ground::Heightfield(hf);
        let hit = ground.raycast(Vec3::new(1.2, 1.5, 5.0), Vec3::new(0.0, 0.0, -1.0), 10.0);
        assert!(hit.is_some());
        let (point, normal, _, t) = hit.unwrap();
        assert!((t - 4.4).abs() < 0.05);
        assert!((point.z - 0.6).abs() < 0.05);
        let expected_normal = crate::numal::vec3::normalize_or_zero(Vec3::new(-0.5, 0.0, 1.0));
        assert!(normal.dot(&expected_normal) > 0.999);
    }

    #[test]
    fn heightfield_raycast_misses_when_no_crossing() {
        let z = vec![0.0f32; 9];
        let hf = Heightfield::owned(3, 3, 1.0, z, BodyProps::default()).unwrap();
        let ground = Ground::Heightfield(hf);
        let hit = ground.raycast(Vec3::new(1.0, 1.0, 5.0), Vec3::new(1.0, 0.0, 0.0), 10.0);
        assert!(hit.is_none());
    }
}
