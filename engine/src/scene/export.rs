//! Wavefront OBJ export for the emitted terrain mesh.

use std::io::Write;
use std::path::Path;

use glam::Vec3;

use super::mesh::TerrainVertex;
use crate::terrain::TerrainError;

/// Write the triangle soup as OBJ text to any writer, shifted by `offset`.
pub fn write_obj_to<W: Write>(
    out: &mut W,
    vertices: &[TerrainVertex],
    offset: Vec3,
) -> Result<(), TerrainError> {
    writeln!(out, "# vector terrain: {} triangles", vertices.len() / 3)?;
    for v in vertices {
        let p = Vec3::from_array(v.position) + offset;
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for v in vertices {
        writeln!(out, "vn {} {} {}", v.normal[0], v.normal[1], v.normal[2])?;
    }
    for tri in 0..vertices.len() / 3 {
        let a = tri * 3 + 1;
        let (b, c) = (a + 1, a + 2);
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    Ok(())
}

/// Write an OBJ file, creating parent directories.
pub fn write_obj(path: &Path, vertices: &[TerrainVertex], offset: Vec3) -> Result<(), TerrainError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_obj_to(&mut file, vertices, offset)?;
    file.flush()?;
    log::info!("wrote {} vertices to {}", vertices.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obj_single_triangle() {
        let up = [0.0, 1.0, 0.0];
        let verts = [
            TerrainVertex { position: [0.0, 0.0, 0.0], normal: up },
            TerrainVertex { position: [1.0, 0.0, 0.0], normal: up },
            TerrainVertex { position: [0.0, 0.0, 1.0], normal: up },
        ];
        let mut buf = Vec::new();
        write_obj_to(&mut buf, &verts, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "v 1 0 0");
        assert_eq!(lines[2], "v 2 0 0");
        assert_eq!(lines.last().copied(), Some("f 1//1 2//2 3//3"));
        assert_eq!(lines.iter().filter(|l| l.starts_with("vn ")).count(), 3);
    }
}
