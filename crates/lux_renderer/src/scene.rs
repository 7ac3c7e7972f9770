//! Top-level scene container.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bvh::BvhAccel;
use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Ray;
use lux_math::{Aabb, Interval};
use thiserror::Error;

/// Errors from modifying geometry that has been frozen by a BVH build.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("{0} is frozen: its BVH has already been built")]
    BvhBuilt(String),
}

/// The world: a set of shared hittables with an optional BVH over them.
///
/// Objects are added first, then [`Scene::build_bvh`] is called once. Until
/// the BVH exists, queries fall back to a linear scan and warn once.
#[derive(Default)]
pub struct Scene {
    objects: HittableList,
    bvh: Option<BvhAccel>,
    warned_linear: AtomicBool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object. Fails once the BVH has been built.
    pub fn add(&mut self, object: Arc<dyn Hittable>) -> Result<(), SceneError> {
        if self.bvh.is_some() {
            return Err(SceneError::BvhBuilt("scene".to_string()));
        }
        self.objects.add(object);
        Ok(())
    }

    /// Build the acceleration structure over everything added so far.
    pub fn build_bvh(&mut self) -> Result<(), SceneError> {
        if self.bvh.is_some() {
            return Err(SceneError::BvhBuilt("scene".to_string()));
        }
        log::info!("Building scene BVH over {} objects", self.objects.len());
        self.bvh = Some(BvhAccel::new(self.objects.objects()));
        Ok(())
    }

    pub fn has_bvh(&self) -> bool {
        self.bvh.is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match &self.bvh {
            Some(bvh) => bvh.hit(ray, ray_t),
            None => {
                if !self.warned_linear.swap(true, Ordering::Relaxed) {
                    log::warn!(
                        "Scene has no BVH, every ray scans all {} objects",
                        self.objects.len()
                    );
                }
                self.objects.hit(ray, ray_t)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.objects.bounding_box()
    }
}
