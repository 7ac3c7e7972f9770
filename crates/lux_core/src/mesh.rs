//! Raw mesh data handed over by a loader.
//!
//! A `MeshData` holds vertex attribute arrays and polygon faces that index
//! into them. `triangles()` fan-triangulates the faces, validates indices and
//! drops degenerate triangles so that nothing downstream (BVH build,
//! intersection) ever sees a zero-area primitive.

use lux_math::{Aabb, Vec2, Vec3};
use thiserror::Error;

/// Edge components below this are treated as zero.
const NEAR_ZERO: f32 = 1e-8;

/// Errors that can occur while turning raw mesh data into triangles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Mesh {mesh}: {attribute} index {index} out of range ({len} entries)")]
    IndexOutOfRange {
        mesh: String,
        attribute: &'static str,
        index: u32,
        len: usize,
    },

    #[error("Mesh {mesh}: face {face} has {count} vertices, need at least 3")]
    FaceTooSmall { mesh: String, face: usize, count: usize },

    #[error("Mesh {0}: bounds have zero extent")]
    DegenerateBounds(String),
}

/// One corner of a face: indices into the mesh attribute arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceVertex {
    pub position: u32,
    pub tex_coord: Option<u32>,
    pub normal: Option<u32>,
}

impl FaceVertex {
    /// Corner with a position only.
    pub fn new(position: u32) -> Self {
        Self {
            position,
            tex_coord: None,
            normal: None,
        }
    }

    /// Corner with position, texture coordinate and normal indices.
    pub fn with_attributes(position: u32, tex_coord: u32, normal: u32) -> Self {
        Self {
            position,
            tex_coord: Some(tex_coord),
            normal: Some(normal),
        }
    }
}

/// A fully resolved triangle, ready to be turned into a renderable primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleData {
    pub positions: [Vec3; 3],
    /// Per-vertex normals, present only if every corner had one
    pub normals: Option<[Vec3; 3]>,
    /// Per-vertex texture coordinates, present only if every corner had one
    pub tex_coords: Option<[Vec2; 3]>,
}

impl TriangleData {
    /// True if an edge is (numerically) zero length or the triangle has no area.
    pub fn is_degenerate(&self) -> bool {
        let [v0, v1, v2] = self.positions;
        let e1 = v1 - v0;
        let e2 = v2 - v0;

        near_zero(e1) || near_zero(e2) || near_zero(e1.cross(e2))
    }
}

fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO
}

/// A named group of polygons with shared vertex attribute arrays.
#[derive(Clone, Debug)]
pub struct MeshData {
    /// Group name (e.g. the `g` statement of an OBJ file)
    pub name: String,

    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Vertex normals, indexed separately from positions
    pub normals: Vec<Vec3>,

    /// Texture coordinates, indexed separately from positions
    pub tex_coords: Vec<Vec2>,

    /// Polygons; each is fan-triangulated around its first corner
    pub faces: Vec<Vec<FaceVertex>>,
}

impl MeshData {
    /// Create a mesh from positions, with no faces yet.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            positions,
            normals: Vec::new(),
            tex_coords: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Attach a normal array.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    /// Attach a texture coordinate array.
    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    /// Add a polygon.
    pub fn add_face(&mut self, face: Vec<FaceVertex>) {
        self.faces.push(face);
    }

    /// Add a triangle referencing positions only.
    pub fn add_triangle(&mut self, indices: [u32; 3]) {
        self.faces.push(indices.iter().map(|&i| FaceVertex::new(i)).collect());
    }

    /// Axis-aligned bounds of all positions.
    pub fn bounds(&self) -> Aabb {
        self.positions
            .iter()
            .fold(Aabb::EMPTY, |acc, p| acc.union_point(*p))
    }

    /// Center the positions on the origin and scale them so the largest
    /// extent becomes 2, i.e. the mesh fits in `[-1, 1]`.
    pub fn normalize_positions(&mut self) -> Result<(), MeshError> {
        let bounds = self.bounds();
        let extent = bounds.diagonal().max_element();
        if bounds.is_empty() || extent <= 0.0 {
            return Err(MeshError::DegenerateBounds(self.name.clone()));
        }

        let center = bounds.centroid();
        let scale = 2.0 / extent;
        for p in &mut self.positions {
            *p = (*p - center) * scale;
        }

        Ok(())
    }

    /// Resolve all faces into triangles.
    ///
    /// Polygons are fan-triangulated. Degenerate triangles are skipped and
    /// counted; out-of-range indices are an error.
    pub fn triangles(&self) -> Result<Vec<TriangleData>, MeshError> {
        let mut triangles = Vec::with_capacity(self.faces.len());
        let mut skipped = 0usize;

        for (face_index, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::FaceTooSmall {
                    mesh: self.name.clone(),
                    face: face_index,
                    count: face.len(),
                });
            }

            for i in 1..face.len() - 1 {
                let corners = [face[0], face[i], face[i + 1]];
                let triangle = self.resolve(corners)?;

                if triangle.is_degenerate() {
                    skipped += 1;
                    continue;
                }
                triangles.push(triangle);
            }
        }

        if skipped > 0 {
            log::debug!(
                "Mesh {}: skipped {} degenerate triangles, kept {}",
                self.name,
                skipped,
                triangles.len()
            );
        }

        Ok(triangles)
    }

    fn resolve(&self, corners: [FaceVertex; 3]) -> Result<TriangleData, MeshError> {
        let mut positions = [Vec3::ZERO; 3];
        for (slot, corner) in positions.iter_mut().zip(&corners) {
            *slot = *self.lookup(&self.positions, "position", corner.position)?;
        }

        let normals = match (corners[0].normal, corners[1].normal, corners[2].normal) {
            (Some(a), Some(b), Some(c)) => Some([
                *self.lookup(&self.normals, "normal", a)?,
                *self.lookup(&self.normals, "normal", b)?,
                *self.lookup(&self.normals, "normal", c)?,
            ]),
            _ => None,
        };

        let tex_coords = match (corners[0].tex_coord, corners[1].tex_coord, corners[2].tex_coord) {
            (Some(a), Some(b), Some(c)) => Some([
                *self.lookup(&self.tex_coords, "texcoord", a)?,
                *self.lookup(&self.tex_coords, "texcoord", b)?,
                *self.lookup(&self.tex_coords, "texcoord", c)?,
            ]),
            _ => None,
        };

        Ok(TriangleData {
            positions,
            normals,
            tex_coords,
        })
    }

    fn lookup<'a, T>(&self, values: &'a [T], attribute: &'static str, index: u32) -> Result<&'a T, MeshError> {
        values.get(index as usize).ok_or_else(|| MeshError::IndexOutOfRange {
            mesh: self.name.clone(),
            attribute,
            index,
            len: values.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        let mut mesh = MeshData::new(
            "quad",
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
        )
        .with_normals(vec![Vec3::Z])
        .with_tex_coords(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]);
        mesh.add_face((0..4).map(|i| FaceVertex::with_attributes(i, i, 0)).collect());
        mesh
    }

    #[test]
    fn test_fan_triangulation() {
        let triangles = quad().triangles().unwrap();
        assert_eq!(triangles.len(), 2);

        assert_eq!(triangles[0].positions[0], Vec3::ZERO);
        assert_eq!(triangles[1].positions[2], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(triangles[1].normals, Some([Vec3::Z; 3]));
        assert_eq!(triangles[1].tex_coords.unwrap()[1], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_partial_attributes_are_dropped() {
        let mut mesh = quad();
        mesh.faces.clear();
        mesh.add_face(vec![
            FaceVertex::with_attributes(0, 0, 0),
            FaceVertex::new(1),
            FaceVertex::with_attributes(2, 2, 0),
        ]);

        let triangles = mesh.triangles().unwrap();
        assert_eq!(triangles[0].normals, None);
        assert_eq!(triangles[0].tex_coords, None);
    }

    #[test]
    fn test_degenerate_triangles_are_skipped() {
        let mut mesh = MeshData::new(
            "sliver",
            vec![
                Vec3::ZERO,
                Vec3::ZERO,
                Vec3::X,
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::Y,
            ],
        );
        mesh.add_triangle([0, 1, 2]); // zero-length edge
        mesh.add_triangle([0, 2, 3]); // collinear, zero area
        mesh.add_triangle([0, 2, 4]); // fine

        let triangles = mesh.triangles().unwrap();
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].positions, [Vec3::ZERO, Vec3::X, Vec3::Y]);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut mesh = MeshData::new("broken", vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        mesh.add_triangle([0, 1, 7]);

        let err = mesh.triangles().unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                mesh: "broken".to_string(),
                attribute: "position",
                index: 7,
                len: 3,
            }
        );
    }

    #[test]
    fn test_face_too_small() {
        let mut mesh = MeshData::new("line", vec![Vec3::ZERO, Vec3::X]);
        mesh.add_face(vec![FaceVertex::new(0), FaceVertex::new(1)]);
        assert!(matches!(mesh.triangles(), Err(MeshError::FaceTooSmall { count: 2, .. })));
    }

    #[test]
    fn test_normalize_positions() {
        let mut mesh = MeshData::new(
            "box",
            vec![Vec3::new(2.0, 2.0, 2.0), Vec3::new(6.0, 4.0, 3.0)],
        );
        mesh.normalize_positions().unwrap();

        let bounds = mesh.bounds();
        assert_eq!(bounds.min, Vec3::new(-1.0, -0.5, -0.25));
        assert_eq!(bounds.max, Vec3::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn test_normalize_single_point_fails() {
        let mut mesh = MeshData::new("dot", vec![Vec3::ONE]);
        assert_eq!(
            mesh.normalize_positions(),
            Err(MeshError::DegenerateBounds("dot".to_string()))
        );
    }
}
