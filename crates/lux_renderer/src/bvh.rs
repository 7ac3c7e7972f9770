//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree with one object per leaf, built by median split on the axis
//! along which the object centroids spread the most. The tree is immutable
//! once built and can be traversed from any number of threads.

use std::sync::Arc;
use std::time::Instant;

use crate::{HitRecord, Hittable, Ray};
use lux_math::{Aabb, Interval, Vec3};

/// BVH node: a leaf holding one object, or an interior node with two children.
enum BvhNode {
    Leaf {
        bbox: Aabb,
        object: Arc<dyn Hittable>,
    },
    Interior {
        bbox: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

/// Object reference with its bounds and centroid, computed once for the build.
struct BuildPrimitive {
    object: Arc<dyn Hittable>,
    bounds: Aabb,
    centroid: Vec3,
}

/// Shape of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub nodes: usize,
    pub leaves: usize,
    /// Longest root-to-leaf path, counting the root as depth 1
    pub depth: usize,
}

/// A BVH over shared hittables. Empty hierarchies miss every ray.
pub struct BvhAccel {
    root: Option<BvhNode>,
    primitive_count: usize,
}

impl BvhAccel {
    /// Build a hierarchy over `objects`. The slice order only matters for
    /// ties between equal centroids.
    pub fn new(objects: &[Arc<dyn Hittable>]) -> Self {
        let start = Instant::now();

        let primitives: Vec<BuildPrimitive> = objects
            .iter()
            .map(|object| {
                let bounds = object.bounding_box();
                BuildPrimitive {
                    object: Arc::clone(object),
                    bounds,
                    centroid: bounds.centroid(),
                }
            })
            .collect();

        let root = if primitives.is_empty() {
            None
        } else {
            Some(Self::build(primitives))
        };

        let bvh = Self {
            root,
            primitive_count: objects.len(),
        };

        let stats = bvh.stats();
        log::info!(
            "BVH built over {} primitives in {:.2?} ({} nodes, {} leaves, depth {})",
            bvh.primitive_count,
            start.elapsed(),
            stats.nodes,
            stats.leaves,
            stats.depth
        );

        bvh
    }

    /// Recursive median split. `primitives` is never empty.
    fn build(mut primitives: Vec<BuildPrimitive>) -> BvhNode {
        match primitives.len() {
            1 => {
                let primitive = primitives.remove(0);
                BvhNode::Leaf {
                    bbox: primitive.bounds,
                    object: primitive.object,
                }
            }
            2 => {
                let right = primitives.remove(1);
                let left = primitives.remove(0);
                Self::interior(
                    BvhNode::Leaf {
                        bbox: left.bounds,
                        object: left.object,
                    },
                    BvhNode::Leaf {
                        bbox: right.bounds,
                        object: right.object,
                    },
                )
            }
            n => {
                let centroid_bounds = primitives
                    .iter()
                    .fold(Aabb::EMPTY, |acc, p| acc.union_point(p.centroid));
                let axis = centroid_bounds.longest_axis();

                // Stable, so equal centroids keep their input order
                primitives.sort_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));

                let right = primitives.split_off(n / 2);
                Self::interior(Self::build(primitives), Self::build(right))
            }
        }
    }

    fn interior(left: BvhNode, right: BvhNode) -> BvhNode {
        BvhNode::Interior {
            bbox: Aabb::surrounding(&left.bbox(), &right.bbox()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of objects the hierarchy was built over.
    pub fn len(&self) -> usize {
        self.primitive_count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Node and leaf counts plus depth.
    pub fn stats(&self) -> BvhStats {
        fn walk(node: &BvhNode, depth: usize, stats: &mut BvhStats) {
            stats.nodes += 1;
            stats.depth = stats.depth.max(depth);
            match node {
                BvhNode::Leaf { .. } => stats.leaves += 1,
                BvhNode::Interior { left, right, .. } => {
                    walk(left, depth + 1, stats);
                    walk(right, depth + 1, stats);
                }
            }
        }

        let mut stats = BvhStats::default();
        if let Some(root) = &self.root {
            walk(root, 1, &mut stats);
        }
        stats
    }

    /// Bounds of every node in pre-order (node, left subtree, right subtree).
    pub fn node_bounds(&self) -> Vec<Aabb> {
        fn walk(node: &BvhNode, out: &mut Vec<Aabb>) {
            out.push(node.bbox());
            if let BvhNode::Interior { left, right, .. } = node {
                walk(left, out);
                walk(right, out);
            }
        }

        let mut out = Vec::new();
        if let Some(root) = &self.root {
            walk(root, &mut out);
        }
        out
    }
}

impl BvhNode {
    fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Interior { bbox, .. } => *bbox,
        }
    }

    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox().hit(ray, ray_t.max) {
            return None;
        }

        match self {
            BvhNode::Leaf { object, .. } => object.hit(ray, ray_t),
            BvhNode::Interior { left, right, .. } => {
                let hit_left = left.hit(ray, ray_t);
                let hit_right = right.hit(ray, ray_t);

                match (hit_left, hit_right) {
                    (Some(l), Some(r)) => Some(if r.t < l.t { r } else { l }),
                    (l, r) => l.or(r),
                }
            }
        }
    }
}

impl Hittable for BvhAccel {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.root.as_ref()?.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.root.as_ref().map_or(Aabb::EMPTY, BvhNode::bbox)
    }
}
