//! Wavefront OBJ ingestion.
//!
//! Only vertex positions are consumed; normals and UVs in the file are
//! ignored, since each triangle derives its own from its edges.

use crate::hittable::HittableList;
use crate::triangle::Triangle;
use crate::Material;
use ember_math::Point3;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to load OBJ: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("OBJ file contains no models: {0}")]
    Empty(String),
}

/// Load an OBJ file as a list of triangles sharing one material.
pub fn load_mesh(
    path: impl AsRef<Path>,
    material: Arc<dyn Material>,
) -> Result<HittableList, MeshError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )?;

    if models.is_empty() {
        return Err(MeshError::Empty(path.display().to_string()));
    }

    let mut triangles = HittableList::new();

    for model in &models {
        let mesh = &model.mesh;
        let positions = &mesh.positions;

        for face in mesh.indices.chunks_exact(3) {
            let vertex = |index: u32| {
                let i = index as usize * 3;
                Point3::new(
                    positions[i] as f64,
                    positions[i + 1] as f64,
                    positions[i + 2] as f64,
                )
            };

            triangles.add(Arc::new(Triangle::from_vertices(
                vertex(face[0]),
                vertex(face[1]),
                vertex(face[2]),
                material.clone(),
            )));
        }
    }

    log::info!(
        "Loaded mesh {}: {} triangles from {} model(s)",
        path.display(),
        triangles.len(),
        models.len()
    );

    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::Hittable;
    use crate::material::{Color, Lambertian};
    use std::io::Write;

    fn write_temp_obj(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_triangulated_quad() {
        // A unit quad as a single four-vertex face; tobj triangulates it.
        let path = write_temp_obj(
            "ember_mesh_quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );

        let material = Arc::new(Lambertian::new(Color::splat(0.5)));
        let mesh = load_mesh(&path, material).unwrap();
        assert_eq!(mesh.len(), 2);

        let bbox = mesh.bounding_box();
        assert!((bbox.x.max - 1.0).abs() < 1e-6);
        assert!((bbox.y.max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_error() {
        let material = Arc::new(Lambertian::new(Color::splat(0.5)));
        assert!(load_mesh("/nonexistent/sword.obj", material).is_err());
    }
}

