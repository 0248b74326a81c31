//! In-memory STL fixtures for tests

use glam::Vec3;

use crate::loader::LoadEvent;

/// Binary STL of an axis-aligned box spanning `min..max` (12 triangles)
pub fn box_stl(min: Vec3, max: Vec3) -> Vec<u8> {
    let corner = |x: bool, y: bool, z: bool| {
        [
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        ]
    };

    // Each face as two triangles, wound counter-clockwise seen from outside
    let faces: [([f32; 3], [[bool; 3]; 4]); 6] = [
        ([-1.0, 0.0, 0.0], [[false, false, false], [false, false, true], [false, true, true], [false, true, false]]),
        ([1.0, 0.0, 0.0], [[true, false, false], [true, true, false], [true, true, true], [true, false, true]]),
        ([0.0, -1.0, 0.0], [[false, false, false], [true, false, false], [true, false, true], [false, false, true]]),
        ([0.0, 1.0, 0.0], [[false, true, false], [false, true, true], [true, true, true], [true, true, false]]),
        ([0.0, 0.0, -1.0], [[false, false, false], [false, true, false], [true, true, false], [true, false, false]]),
        ([0.0, 0.0, 1.0], [[false, false, true], [true, false, true], [true, true, true], [false, true, true]]),
    ];

    let mut triangles = Vec::with_capacity(12);
    for (normal, quad) in faces {
        let [a, b, c, d] = quad.map(|[x, y, z]| stl_io::Vertex::new(corner(x, y, z)));
        triangles.push(stl_io::Triangle {
            normal: stl_io::Normal::new(normal),
            vertices: [a, b, c],
        });
        triangles.push(stl_io::Triangle {
            normal: stl_io::Normal::new(normal),
            vertices: [a, c, d],
        });
    }

    let mut bytes = Vec::new();
    stl_io::write_stl(&mut bytes, triangles.iter()).expect("in-memory STL write");
    bytes
}

/// Successful load event carrying a box mesh
pub fn loaded(name: &str, min: Vec3, max: Vec3) -> LoadEvent {
    LoadEvent::Loaded {
        name: name.to_string(),
        bytes: box_stl(min, max),
    }
}

/// Torso-like box: ~152 x 325 x 152, not centered on the origin
pub fn torso_event() -> LoadEvent {
    loaded("torso", Vec3::new(10.0, 0.0, 20.0), Vec3::new(162.36, 325.48, 172.40))
}

/// Humerus-like box: ~114 x 353 x 218
pub fn humerus_event() -> LoadEvent {
    loaded("humerus", Vec3::ZERO, Vec3::new(114.30, 352.95, 217.95))
}
