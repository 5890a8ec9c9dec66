//! Planar primitives: parallelograms (quads) and triangles.
//!
//! Both are defined by a corner `q` and two edge vectors `u` and `v`. A hit
//! point is expressed in plane coordinates (alpha, beta) such that
//! `p = q + alpha * u + beta * v`; the shapes differ only in which
//! coordinates count as interior.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Material;
use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

/// Rays closer to parallel than this never hit the plane.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Precomputed plane frame shared by quads and triangles.
#[derive(Debug, Clone, Copy)]
struct PlaneBasis {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)` for the unnormalized normal `n = u x v`
    w: Vec3,
    normal: Vec3,
    d: f64,
}

impl PlaneBasis {
    /// `None` when `u` and `v` span no area.
    fn new(q: Point3, u: Vec3, v: Vec3) -> Option<Self> {
        let n = u.cross(v);
        let normal = n.try_normalize()?;

        Some(Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
        })
    }

    /// Ray parameter and plane coordinates of the ray's crossing with the
    /// plane, if it lies inside `ray_t`.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f64, f64, f64)> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let planar_hitpt = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt));

        Some((t, alpha, beta))
    }
}

/// Parallelogram with corners `q`, `q + u`, `q + v` and `q + u + v`.
pub struct Quad {
    basis: Option<PlaneBasis>,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        // Bounding box of all four vertices
        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            basis: PlaneBasis::new(q, u, v),
            material,
            bbox: Aabb::surrounding(&diagonal1, &diagonal2),
        }
    }

    fn is_interior(alpha: f64, beta: f64) -> bool {
        let unit = Interval::new(0.0, 1.0);
        unit.contains(alpha) && unit.contains(beta)
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let basis = self.basis.as_ref()?;
        let (t, alpha, beta) = basis.intersect(ray, ray_t)?;

        if !Self::is_interior(alpha, beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            basis.normal,
            self.material.as_ref(),
            (alpha, beta),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Triangle with vertices `q`, `q + u` and `q + v`.
pub struct Triangle {
    basis: Option<PlaneBasis>,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let edge1 = Aabb::from_points(q, q + u);
        let edge2 = Aabb::from_points(q, q + v);

        Self {
            basis: PlaneBasis::new(q, u, v),
            material,
            bbox: Aabb::surrounding(&edge1, &edge2),
        }
    }

    /// Create a triangle from its three vertices.
    pub fn from_vertices(v0: Point3, v1: Point3, v2: Point3, material: Arc<dyn Material>) -> Self {
        Self::new(v0, v1 - v0, v2 - v0, material)
    }

    fn is_interior(alpha: f64, beta: f64) -> bool {
        alpha > 0.0 && beta > 0.0 && alpha + beta <= 1.0
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let basis = self.basis.as_ref()?;
        let (t, alpha, beta) = basis.intersect(ray, ray_t)?;

        if !Self::is_interior(alpha, beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            basis.normal,
            self.material.as_ref(),
            (alpha, beta),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six faces of the axis-aligned box spanned by corners `a` and `b`.
pub fn cuboid(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    faces
        .into_iter()
        .map(|(q, u, v)| Quad::new(q, u, v, material.clone()))
        .collect()
}
