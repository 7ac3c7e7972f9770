//! Named triangle groups built from mesh data.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bvh::BvhAccel;
use crate::hittable::{closest_hit, HitRecord, Hittable};
use crate::scene::SceneError;
use crate::{Material, Ray, Triangle};
use lux_core::{MeshData, MeshError, Transform};
use lux_math::{Aabb, Interval};

/// A named group of triangles sharing one material, with its own BVH.
///
/// Transforms and material changes are allowed until [`MeshTriangle::build_bvh`]
/// runs; after that the triangles are shared with the tree and frozen.
pub struct MeshTriangle {
    name: String,
    triangles: Vec<Arc<Triangle>>,
    bvh: Option<BvhAccel>,
    bbox: Aabb,
    warned_linear: AtomicBool,
}

impl MeshTriangle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::new(),
            bvh: None,
            bbox: Aabb::EMPTY,
            warned_linear: AtomicBool::new(false),
        }
    }

    /// Fan-triangulate `data`. Degenerate triangles are dropped and bad
    /// indices reported as errors.
    pub fn from_mesh_data(data: &MeshData, material: Arc<dyn Material>) -> Result<Self, MeshError> {
        let mut mesh = Self::new(data.name.clone());
        for triangle in data.triangles()? {
            mesh.push(Triangle::from_data(&triangle, Arc::clone(&material)));
        }

        log::info!("Mesh '{}': {} triangles from {} faces", mesh.name, mesh.len(), data.faces.len());
        Ok(mesh)
    }

    fn push(&mut self, triangle: Triangle) {
        self.bbox = Aabb::surrounding(&self.bbox, &triangle.bounding_box());
        self.triangles.push(Arc::new(triangle));
    }

    fn ensure_mutable(&self) -> Result<(), SceneError> {
        if self.bvh.is_some() {
            return Err(SceneError::BvhBuilt(format!("mesh '{}'", self.name)));
        }
        Ok(())
    }

    pub fn add_triangle(&mut self, triangle: Triangle) -> Result<(), SceneError> {
        self.ensure_mutable()?;
        self.push(triangle);
        Ok(())
    }

    /// Transform every triangle in place.
    pub fn apply_transform(&mut self, transform: &Transform) -> Result<(), SceneError> {
        self.ensure_mutable()?;

        let mut bbox = Aabb::EMPTY;
        for triangle in &mut self.triangles {
            let triangle = Arc::make_mut(triangle);
            triangle.apply_transform(transform);
            bbox = Aabb::surrounding(&bbox, &triangle.bounding_box());
        }
        self.bbox = bbox;
        Ok(())
    }

    /// Replace the material of every triangle.
    pub fn set_material(&mut self, material: Arc<dyn Material>) -> Result<(), SceneError> {
        self.ensure_mutable()?;
        for triangle in &mut self.triangles {
            Arc::make_mut(triangle).set_material(Arc::clone(&material));
        }
        Ok(())
    }

    /// Build the per-mesh BVH. One-shot.
    pub fn build_bvh(&mut self) -> Result<(), SceneError> {
        self.ensure_mutable()?;
        let objects: Vec<Arc<dyn Hittable>> = self
            .triangles
            .iter()
            .map(|t| Arc::clone(t) as Arc<dyn Hittable>)
            .collect();
        self.bvh = Some(BvhAccel::new(&objects));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triangles(&self) -> &[Arc<Triangle>] {
        &self.triangles
    }

    pub fn has_bvh(&self) -> bool {
        self.bvh.is_some()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl Hittable for MeshTriangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match &self.bvh {
            Some(bvh) => bvh.hit(ray, ray_t),
            None => {
                if !self.warned_linear.swap(true, Ordering::Relaxed) {
                    log::warn!("Mesh '{}' has no BVH, scanning {} triangles", self.name, self.len());
                }
                closest_hit(self.triangles.iter().map(|t| &**t), ray, ray_t)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
