//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are Y-up, centered at the origin, with counter-clockwise front
//! faces, outward normals and texture coordinates.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3, VectorSpace};

use super::{
    BoxParams, GeometryData, IcosahedronParams, PlaneParams, SphereParams, Topology,
    TorusKnotParams,
};

/// Generate a box, one subdivided plane per face
pub fn generate_box(params: &BoxParams) -> GeometryData {
    let mut data = GeometryData::new();

    let w = params.width_segments.max(1);
    let h = params.height_segments.max(1);
    let d = params.depth_segments.max(1);
    let (width, height, depth) = (params.width, params.height, params.depth);

    // (u axis, v axis, w axis, u dir, v dir, plane width, plane height, plane depth, grid)
    build_box_face(&mut data, [2, 1, 0], -1.0, -1.0, [depth, height, width], [d, h]); // +x
    build_box_face(&mut data, [2, 1, 0], 1.0, -1.0, [depth, height, -width], [d, h]); // -x
    build_box_face(&mut data, [0, 2, 1], 1.0, 1.0, [width, depth, height], [w, d]); // +y
    build_box_face(&mut data, [0, 2, 1], 1.0, -1.0, [width, depth, -height], [w, d]); // -y
    build_box_face(&mut data, [0, 1, 2], 1.0, -1.0, [width, height, depth], [w, h]); // +z
    build_box_face(&mut data, [0, 1, 2], -1.0, -1.0, [width, height, -depth], [w, h]); // -z

    data
}

fn build_box_face(
    data: &mut GeometryData,
    axes: [usize; 3],
    u_dir: f32,
    v_dir: f32,
    size: [f32; 3],
    grid: [u32; 2],
) {
    let [u, v, w] = axes;
    let [width, height, depth] = size;
    let [grid_x, grid_y] = grid;

    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;
    let width_half = width / 2.0;
    let height_half = height / 2.0;
    let depth_half = depth / 2.0;
    let grid_x1 = grid_x + 1;
    let offset = data.vertices.len() as u32;

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width_half;

            let mut position = [0.0; 3];
            position[u] = x * u_dir;
            position[v] = y * v_dir;
            position[w] = depth_half;

            let mut normal = [0.0; 3];
            normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

            data.vertices.push(position);
            data.normals.push(normal);
            data.tex_coords.push([
                ix as f32 / grid_x as f32,
                1.0 - iy as f32 / grid_y as f32,
            ]);
        }
    }

    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = offset + ix + grid_x1 * iy;
            let b = offset + ix + grid_x1 * (iy + 1);
            let c = offset + (ix + 1) + grid_x1 * (iy + 1);
            let d = offset + (ix + 1) + grid_x1 * iy;

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

/// Generate a (possibly partial) UV sphere
///
/// `phi` sweeps around the Y axis, `theta` from the north pole downwards.
pub fn generate_sphere(params: &SphereParams) -> GeometryData {
    let mut data = GeometryData::new();

    let width_segments = params.width_segments.max(3);
    let height_segments = params.height_segments.max(2);
    let radius = params.radius;
    let theta_end = (params.theta_start + params.theta_length).min(PI);

    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
    let mut index = 0u32;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;

        // Pole vertices sit between their neighbours in texture space
        let u_offset = if iy == 0 && params.theta_start == 0.0 {
            0.5 / width_segments as f32
        } else if iy == height_segments && theta_end == PI {
            -0.5 / width_segments as f32
        } else {
            0.0
        };

        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = params.phi_start + u * params.phi_length;
            let theta = params.theta_start + v * params.theta_length;

            let position = Vector3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            data.vertices.push(position.into());
            data.normals.push(safe_normalize(position).into());
            data.tex_coords.push([u + u_offset, 1.0 - v]);

            row.push(index);
            index += 1;
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            if iy != 0 || params.theta_start > 0.0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 || theta_end < PI {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    data
}

/// Generate an icosahedron, each face subdivided `detail` times and
/// projected onto the sphere of the given radius
///
/// Detail 0 is flat shaded; higher detail uses smooth normals.
pub fn generate_icosahedron(params: &IcosahedronParams) -> GeometryData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    #[rustfmt::skip]
    let corners: [[f32; 3]; 12] = [
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ];

    #[rustfmt::skip]
    let faces: [[usize; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let mut positions = Vec::new();
    for face in faces.iter() {
        let [a, b, c] = face.map(|i| Vector3::from(corners[i]));
        subdivide_face(&mut positions, a, b, c, params.detail);
    }

    let mut data = GeometryData::new();
    for position in positions.iter_mut() {
        *position = safe_normalize(*position) * params.radius;
    }

    for triangle in positions.chunks_exact(3) {
        let flat = safe_normalize((triangle[1] - triangle[0]).cross(triangle[2] - triangle[0]));
        for &p in triangle {
            let normal = if params.detail == 0 { flat } else { safe_normalize(p) };
            data.normals.push(normal.into());
            data.tex_coords.push(spherical_uv(p));
        }
    }

    data.indices = (0..positions.len() as u32).collect();
    data.vertices = positions.into_iter().map(Into::into).collect();
    data
}

fn subdivide_face(
    out: &mut Vec<Vector3<f32>>,
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
    detail: u32,
) {
    let cols = detail as usize + 1;
    let mut grid: Vec<Vec<Vector3<f32>>> = Vec::with_capacity(cols + 1);

    for i in 0..=cols {
        let s = i as f32 / cols as f32;
        let aj = a.lerp(c, s);
        let bj = b.lerp(c, s);
        let rows = cols - i;

        let mut row = Vec::with_capacity(rows + 1);
        for j in 0..=rows {
            if j == 0 && i == cols {
                row.push(aj);
            } else {
                row.push(aj.lerp(bj, j as f32 / rows as f32));
            }
        }
        grid.push(row);
    }

    for i in 0..cols {
        for j in 0..(2 * (cols - i) - 1) {
            let k = j / 2;
            if j % 2 == 0 {
                out.extend_from_slice(&[grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                out.extend_from_slice(&[grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
}

fn spherical_uv(p: Vector3<f32>) -> [f32; 2] {
    let u = p.z.atan2(-p.x) / (2.0 * PI) + 0.5;
    let len = p.magnitude();
    let v = if len > 0.0 {
        (-p.y / len).clamp(-1.0, 1.0).asin() / PI + 0.5
    } else {
        0.5
    };
    [u, v]
}

/// Generate a (p, q) torus knot
pub fn generate_torus_knot(params: &TorusKnotParams) -> GeometryData {
    let mut data = GeometryData::new();

    let tubular_segments = params.tubular_segments.max(3);
    let radial_segments = params.radial_segments.max(3);
    let p = params.p as f32;
    let q = params.q as f32;
    let radius = params.radius;

    let curve = |u: f32| -> Vector3<f32> {
        let q_over_p = if p != 0.0 { q / p * u } else { 0.0 };
        let cs = q_over_p.cos();
        Vector3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * u.sin() * 0.5,
            radius * q_over_p.sin() * 0.5,
        )
    };

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p * PI * 2.0;

        // Frenet-like frame from two nearby curve points
        let p1 = curve(u);
        let p2 = curve(u + 0.01);
        let tangent = p2 - p1;
        let n = p2 + p1;
        let binormal = tangent.cross(n);
        let normal = safe_normalize(binormal.cross(tangent));
        let binormal = safe_normalize(binormal);

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * PI * 2.0;
            let cx = -params.tube * v.cos();
            let cy = params.tube * v.sin();

            let position = p1 + normal * cx + binormal * cy;
            data.vertices.push(position.into());
            data.normals.push(safe_normalize(position - p1).into());
            data.tex_coords.push([
                i as f32 / tubular_segments as f32,
                j as f32 / radial_segments as f32,
            ]);
        }
    }

    let stride = radial_segments + 1;
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    data
}

/// Generate a plane in the XY plane facing +Z
pub fn generate_plane(params: &PlaneParams) -> GeometryData {
    let mut data = GeometryData::new();

    let grid_x = params.width_segments.max(1);
    let grid_y = params.height_segments.max(1);
    let grid_x1 = grid_x + 1;

    let segment_width = params.width / grid_x as f32;
    let segment_height = params.height / grid_y as f32;
    let width_half = params.width / 2.0;
    let height_half = params.height / 2.0;

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width_half;

            data.vertices.push([x, -y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([
                ix as f32 / grid_x as f32,
                1.0 - iy as f32 / grid_y as f32,
            ]);
        }
    }

    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + grid_x1 * iy;
            let b = ix + grid_x1 * (iy + 1);
            let c = (ix + 1) + grid_x1 * (iy + 1);
            let d = (ix + 1) + grid_x1 * iy;

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    data
}

/// Line geometry for an axes helper: X red, Y green, Z blue
pub fn generate_axes(size: f32) -> GeometryData {
    let mut data = GeometryData::new();
    data.topology = Topology::Lines;

    let axes = [
        ([size, 0.0, 0.0], [1.0, 0.0, 0.0]),
        ([0.0, size, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, size], [0.0, 0.0, 1.0]),
    ];

    for (end, color) in axes {
        data.vertices.push([0.0, 0.0, 0.0]);
        data.vertices.push(end);
        data.colors.push(color);
        data.colors.push(color);
        data.normals.push([0.0, 1.0, 0.0]);
        data.normals.push([0.0, 1.0, 0.0]);
        data.tex_coords.push([0.0, 0.0]);
        data.tex_coords.push([1.0, 1.0]);
    }
    data.indices = (0..6).collect();

    data
}

fn safe_normalize(v: Vector3<f32>) -> Vector3<f32> {
    let len = v.magnitude();
    if len > f32::EPSILON {
        v / len
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_abs(data: &GeometryData, axis: usize) -> f32 {
        data.vertices
            .iter()
            .map(|v| v[axis].abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(&BoxParams::default());
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_box_dimensions_and_segments() {
        let params = BoxParams {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
            width_segments: 2,
            height_segments: 3,
            depth_segments: 1,
        };
        let data = generate_box(&params);

        assert!((max_abs(&data, 0) - 1.0).abs() < 1e-6);
        assert!((max_abs(&data, 1) - 2.0).abs() < 1e-6);
        assert!((max_abs(&data, 2) - 3.0).abs() < 1e-6);

        // faces: x (d*h), y (w*d), z (w*h), two of each
        let quads = 2 * (1 * 3 + 2 * 1 + 2 * 3);
        assert_eq!(data.triangle_count(), quads * 2);
    }

    #[test]
    fn test_box_normals_point_outward() {
        let data = generate_box(&BoxParams::default());
        for (v, n) in data.vertices.iter().zip(&data.normals) {
            let dot = v[0] * n[0] + v[1] * n[1] + v[2] * n[2];
            assert!(dot > 0.0, "vertex {:?} normal {:?}", v, n);
        }
    }

    #[test]
    fn test_box_front_face_winding_is_ccw() {
        let data = generate_box(&BoxParams::default());
        for triangle in data.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vector3::from(data.vertices[triangle[i] as usize]));
            let face_normal = (b - a).cross(c - a);
            let n = Vector3::from(data.normals[triangle[0] as usize]);
            assert!(face_normal.dot(n) > 0.0);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(&SphereParams {
            width_segments: 8,
            height_segments: 6,
            ..Default::default()
        });
        assert_eq!(sphere.vertices.len(), 9 * 7);
        // pole rows contribute one triangle per segment
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2 - 2 * 8);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
    }

    #[test]
    fn test_sphere_radius() {
        let sphere = generate_sphere(&SphereParams {
            radius: 2.5,
            ..Default::default()
        });
        for v in &sphere.vertices {
            let len = Vector3::from(*v).magnitude();
            assert!((len - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_segment_minimums() {
        let sphere = generate_sphere(&SphereParams {
            width_segments: 0,
            height_segments: 0,
            ..Default::default()
        });
        assert_eq!(sphere.vertices.len(), 4 * 3);
    }

    #[test]
    fn test_partial_sphere_keeps_cap_triangles() {
        let full = generate_sphere(&SphereParams {
            width_segments: 4,
            height_segments: 4,
            ..Default::default()
        });
        let band = generate_sphere(&SphereParams {
            width_segments: 4,
            height_segments: 4,
            theta_start: 0.5,
            theta_length: 1.0,
            ..Default::default()
        });
        assert_eq!(band.triangle_count(), 4 * 4 * 2);
        assert!(band.triangle_count() > full.triangle_count());
    }

    #[test]
    fn test_icosahedron_generation() {
        let ico = generate_icosahedron(&IcosahedronParams::default());
        assert_eq!(ico.triangle_count(), 20);

        let detailed = generate_icosahedron(&IcosahedronParams {
            radius: 3.0,
            detail: 2,
        });
        assert_eq!(detailed.triangle_count(), 20 * 9);
        for v in &detailed.vertices {
            assert!((Vector3::from(*v).magnitude() - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_torus_knot_generation() {
        let params = TorusKnotParams::default();
        let knot = generate_torus_knot(&params);
        assert_eq!(knot.vertices.len(), 65 * 9);
        assert_eq!(knot.triangle_count(), 64 * 8 * 2);
        assert!(knot.vertices.iter().flatten().all(|c| c.is_finite()));
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(&PlaneParams {
            width: 2.0,
            height: 2.0,
            width_segments: 2,
            height_segments: 2,
        });
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_axes_are_lines() {
        let axes = generate_axes(5.0);
        assert_eq!(axes.topology, Topology::Lines);
        assert_eq!(axes.indices.len(), 6);
        assert_eq!(axes.vertices[1], [5.0, 0.0, 0.0]);
        assert_eq!(axes.colors[5], [0.0, 0.0, 1.0]);
        assert_eq!(axes.triangle_count(), 0);
    }
}
