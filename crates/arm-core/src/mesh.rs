//! STL mesh loading and geometry helpers

use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Zero-sized box at the origin (used for meshes without vertices)
    pub fn empty() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }

    /// Compute the box enclosing all points
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        if points.is_empty() {
            return Self::empty();
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            let p = Vec3::from(*p);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Translation that moves the X/Z midpoint to the origin, leaving Y untouched.
    ///
    /// Applying it puts the rotation pivot at the center of the body's footprint.
    pub fn base_center_offset(&self) -> Vec3 {
        let center = self.center();
        Vec3::new(-center.x, 0.0, -center.z)
    }
}

/// Named triangle mesh loaded from an STL file
#[derive(Debug, Clone)]
pub struct MeshAsset {
    /// Asset key, e.g. "torso"
    pub name: String,
    /// Welded vertex positions
    pub vertices: Vec<[f32; 3]>,
    /// Face normals (one per triangle)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices into `vertices`
    pub indices: Vec<u32>,
    /// Bounding box of `vertices`, kept current by `compute_bounding_box`
    pub bounds: BoundingBox,
}

impl MeshAsset {
    /// Create a new empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            bounds: BoundingBox::empty(),
        }
    }

    /// Recalculate the bounding box from vertices
    pub fn compute_bounding_box(&mut self) -> BoundingBox {
        self.bounds = BoundingBox::from_points(&self.vertices);
        self.bounds
    }

    /// Translate the geometry itself (not a node transform).
    ///
    /// This relocates the point the owning node rotates about.
    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            *v = (Vec3::from(*v) + offset).to_array();
        }
        self.compute_bounding_box();
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expand the indexed mesh into flat (position, normal) pairs, three per face.
    pub fn triangle_vertices(&self) -> Vec<([f32; 3], [f32; 3])> {
        let mut out = Vec::with_capacity(self.indices.len());

        for (i, tri) in self.indices.chunks_exact(3).enumerate() {
            let v0 = Vec3::from(self.vertices[tri[0] as usize]);
            let v1 = Vec3::from(self.vertices[tri[1] as usize]);
            let v2 = Vec3::from(self.vertices[tri[2] as usize]);

            let stored = self.normals.get(i).copied().map(Vec3::from);
            let normal = match stored {
                Some(n) if n.length_squared() > f32::EPSILON => n.normalize(),
                _ => triangle_normal(v0, v1, v2),
            };

            for v in [v0, v1, v2] {
                out.push((v.to_array(), normal.to_array()));
            }
        }

        out
    }
}

/// Normal of a counter-clockwise triangle, +Z for degenerate ones
pub fn triangle_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    let cross = (v1 - v0).cross(v2 - v0);
    if cross.length_squared() > 0.0 {
        cross.normalize()
    } else {
        Vec3::Z
    }
}

/// Load an STL file, keyed by its file stem
pub fn load_stl(path: impl AsRef<Path>) -> Result<MeshAsset, MeshError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string();

    read_mesh(name, &mut reader)
}

/// Parse STL data already in memory (e.g. fetched over HTTP)
pub fn load_stl_from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<MeshAsset, MeshError> {
    read_mesh(name.into(), &mut Cursor::new(bytes))
}

fn read_mesh<R: Read + Seek>(name: String, reader: &mut R) -> Result<MeshAsset, MeshError> {
    let mesh = stl_io::read_stl(reader).map_err(|e| MeshError::Parse(e.to_string()))?;
    if mesh.faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let (vertices, normals, indices) = index_mesh(&mesh);

    let mut asset = MeshAsset::new(name);
    asset.vertices = vertices;
    asset.normals = normals;
    asset.indices = indices;
    asset.compute_bounding_box();

    tracing::debug!(
        "Parsed mesh '{}': {} vertices, {} triangles",
        asset.name,
        asset.vertices.len(),
        asset.triangle_count()
    );

    Ok(asset)
}

/// Convert triangle soup to indexed mesh
fn index_mesh(mesh: &stl_io::IndexedMesh) -> (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u32>) {
    let mut unique_vertices: Vec<[f32; 3]> = Vec::new();
    let mut vertex_map: HashMap<[i32; 3], u32> = HashMap::new();
    let mut indices: Vec<u32> = Vec::with_capacity(mesh.faces.len() * 3);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(mesh.faces.len());

    // Quantization for vertex welding
    const PRECISION: f32 = 10000.0;

    for face in &mesh.faces {
        normals.push([face.normal[0], face.normal[1], face.normal[2]]);

        for &vertex_idx in &face.vertices {
            let vertex = mesh.vertices[vertex_idx];
            let v = [vertex[0], vertex[1], vertex[2]];

            let key = [
                (v[0] * PRECISION).round() as i32,
                (v[1] * PRECISION).round() as i32,
                (v[2] * PRECISION).round() as i32,
            ];

            let index = *vertex_map.entry(key).or_insert_with(|| {
                unique_vertices.push(v);
                (unique_vertices.len() - 1) as u32
            });

            indices.push(index);
        }
    }

    (unique_vertices, normals, indices)
}

/// Mesh-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::box_stl;
    use approx::assert_relative_eq;

    #[test]
    fn test_load_from_bytes_welds_vertices() {
        let bytes = box_stl(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0));
        let mesh = load_stl_from_bytes("box", &bytes).unwrap();

        assert_eq!(mesh.name, "box");
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.normals.len(), 12);
        assert_eq!(mesh.bounds.min, Vec3::ZERO);
        assert_eq!(mesh.bounds.max, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = load_stl_from_bytes("junk", b"definitely not an stl").unwrap_err();
        assert!(matches!(err, MeshError::Parse(_) | MeshError::EmptyMesh));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_stl("/nonexistent/models/torso.stl").unwrap_err();
        assert!(matches!(err, MeshError::Io(_)));
    }

    #[test]
    fn test_base_center_offset_keeps_y() {
        let bb = BoundingBox::new(Vec3::new(10.0, 5.0, -4.0), Vec3::new(30.0, 50.0, 8.0));
        let offset = bb.base_center_offset();
        assert_eq!(offset, Vec3::new(-20.0, 0.0, -2.0));
    }

    #[test]
    fn test_translate_updates_bounds() {
        let bytes = box_stl(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 5.0, 7.0));
        let mut mesh = load_stl_from_bytes("box", &bytes).unwrap();

        mesh.translate(Vec3::new(-2.0, 0.0, -4.0));

        assert_relative_eq!(mesh.bounds.min.x, -1.0);
        assert_relative_eq!(mesh.bounds.max.x, 1.0);
        assert_relative_eq!(mesh.bounds.min.y, 1.0);
        assert_relative_eq!(mesh.bounds.min.z, -3.0);
        assert_relative_eq!(mesh.bounds.max.z, 3.0);
    }

    #[test]
    fn test_triangle_vertices_recompute_zero_normals() {
        let mut mesh = MeshAsset::new("tri");
        mesh.vertices = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        mesh.normals = vec![[0.0, 0.0, 0.0]];
        mesh.indices = vec![0, 1, 2];

        let flat = mesh.triangle_vertices();
        assert_eq!(flat.len(), 3);
        for (_, n) in flat {
            assert_eq!(n, [0.0, 0.0, 1.0]);
        }
    }
}
