//! Sutherland-Hodgman polygon clipping and fan triangulation.
//!
//! A face enters as a three-vertex [`Polygon`] in camera space, is clipped
//! against each frustum plane in turn, and leaves as zero or more
//! [`ClipTriangle`]s via [`Polygon::triangulate`].

use super::frustum::{Frustum, FrustumPlane};
use crate::error::ClipError;
use crate::math::{Vec2, Vec3};

/// Vertex capacity of a [`Polygon`].
///
/// A triangle clipped against six planes grows by at most one vertex per
/// plane, so 9 slots are enough; the extra slot is headroom.
pub const MAX_POLY_VERTICES: usize = 10;

/// A convex polygon in camera space with per-vertex texture coordinates.
///
/// Positions and texcoords are parallel arrays sharing one length. Vertex
/// order is preserved through clipping, so the winding of the source
/// triangle carries over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polygon {
    vertices: [Vec3; MAX_POLY_VERTICES],
    texcoords: [Vec2; MAX_POLY_VERTICES],
    len: usize,
}

/// One triangle of a fan-triangulated polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipTriangle {
    pub vertices: [Vec3; 3],
    pub texcoords: [Vec2; 3],
}

impl Default for Polygon {
    fn default() -> Self {
        Self::empty()
    }
}

impl Polygon {
    pub const fn empty() -> Self {
        Self {
            vertices: [Vec3::ZERO; MAX_POLY_VERTICES],
            texcoords: [Vec2::ZERO; MAX_POLY_VERTICES],
            len: 0,
        }
    }

    /// Create a polygon from a triangle (3 vertices).
    pub fn from_triangle(vertices: [Vec3; 3], texcoords: [Vec2; 3]) -> Self {
        let mut polygon = Self::empty();
        polygon.vertices[..3].copy_from_slice(&vertices);
        polygon.texcoords[..3].copy_from_slice(&texcoords);
        polygon.len = 3;
        polygon
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices[..self.len]
    }

    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords[..self.len]
    }

    fn push(&mut self, vertex: Vec3, texcoord: Vec2) -> Result<(), ClipError> {
        if self.len == MAX_POLY_VERTICES {
            return Err(ClipError::VertexOverflow {
                capacity: MAX_POLY_VERTICES,
            });
        }
        self.vertices[self.len] = vertex;
        self.texcoords[self.len] = texcoord;
        self.len += 1;
        Ok(())
    }

    /// Clip against all six frustum planes, in order left, right, top,
    /// bottom, near, far.
    ///
    /// Afterwards the polygon may be empty, meaning nothing is visible.
    pub fn clip(&mut self, frustum: &Frustum) -> Result<(), ClipError> {
        for plane in frustum.planes() {
            if self.is_empty() {
                break;
            }
            self.clip_against_plane(plane)?;
        }
        Ok(())
    }

    /// Clip against a single plane.
    ///
    /// Walks the edges as a closed loop (previous -> current). An edge whose
    /// endpoints lie strictly on opposite sides emits the intersection; a
    /// current vertex with positive distance is kept. A vertex lying exactly
    /// on the plane is only kept if an edge crossing reproduces it.
    ///
    /// On overflow the polygon is emptied and the error returned.
    pub fn clip_against_plane(&mut self, plane: &FrustumPlane) -> Result<(), ClipError> {
        if self.is_empty() {
            return Ok(());
        }

        let mut output = Polygon::empty();
        match self.clip_into(plane, &mut output) {
            Ok(()) => {
                *self = output;
                Ok(())
            }
            Err(err) => {
                self.len = 0;
                Err(err)
            }
        }
    }

    fn clip_into(&self, plane: &FrustumPlane, output: &mut Polygon) -> Result<(), ClipError> {
        let last = self.len - 1;
        let mut prev_vertex = self.vertices[last];
        let mut prev_texcoord = self.texcoords[last];
        let mut prev_dist = plane.signed_distance(prev_vertex);

        for (&vertex, &texcoord) in self.vertices().iter().zip(self.texcoords()) {
            let dist = plane.signed_distance(vertex);

            if prev_dist * dist < 0.0 {
                let t = prev_dist / (prev_dist - dist);
                output.push(
                    prev_vertex.lerp(vertex, t),
                    prev_texcoord.lerp(texcoord, t),
                )?;
            }
            if dist > 0.0 {
                output.push(vertex, texcoord)?;
            }

            prev_vertex = vertex;
            prev_texcoord = texcoord;
            prev_dist = dist;
        }
        Ok(())
    }

    /// Fan-triangulate from vertex 0.
    ///
    /// Yields `len - 2` triangles; fewer than three vertices yield none.
    pub fn triangulate(&self) -> impl Iterator<Item = ClipTriangle> + '_ {
        (0..self.len.saturating_sub(2)).map(move |i| ClipTriangle {
            vertices: [self.vertices[0], self.vertices[i + 1], self.vertices[i + 2]],
            texcoords: [
                self.texcoords[0],
                self.texcoords[i + 1],
                self.texcoords[i + 2],
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::frustum::PlaneId;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const UVS: [Vec2; 3] = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];

    fn frustum() -> Frustum {
        Frustum::perspective(FRAC_PI_2, FRAC_PI_2, 1.0, 100.0)
    }

    fn area(t: &ClipTriangle) -> f32 {
        let [a, b, c] = t.vertices;
        (b - a).cross(c - a).magnitude() / 2.0
    }

    #[test]
    fn triangle_fully_inside_is_unchanged() {
        let verts = [
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(1.0, -1.0, 5.0),
            Vec3::new(0.0, 1.0, 6.0),
        ];
        let mut polygon = Polygon::from_triangle(verts, UVS);
        polygon.clip(&frustum()).unwrap();

        assert_eq!(polygon.len(), 3);
        for (got, want) in polygon.vertices().iter().zip(verts.iter()) {
            assert_relative_eq!(got.x, want.x);
            assert_relative_eq!(got.y, want.y);
            assert_relative_eq!(got.z, want.z);
        }
        assert_eq!(polygon.texcoords(), &UVS);

        let triangles: Vec<_> = polygon.triangulate().collect();
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].vertices, verts);
    }

    #[test]
    fn triangle_outside_one_plane_is_removed() {
        // Entirely beyond the far plane
        let mut polygon = Polygon::from_triangle(
            [
                Vec3::new(0.0, 0.0, 150.0),
                Vec3::new(1.0, 0.0, 150.0),
                Vec3::new(0.0, 1.0, 160.0),
            ],
            UVS,
        );
        polygon.clip(&frustum()).unwrap();
        assert!(polygon.is_empty());
        assert_eq!(polygon.triangulate().count(), 0);

        // Entirely left of the left plane
        let mut polygon = Polygon::from_triangle(
            [
                Vec3::new(-20.0, 0.0, 5.0),
                Vec3::new(-30.0, 0.0, 5.0),
                Vec3::new(-25.0, 1.0, 6.0),
            ],
            UVS,
        );
        polygon.clip(&frustum()).unwrap();
        assert!(polygon.is_empty());
    }

    #[test]
    fn straddling_near_plane_yields_quad_with_clipped_area() {
        // Tip pokes through the near plane at z = 1
        let mut polygon = Polygon::from_triangle(
            [
                Vec3::new(0.0, 0.0, 0.5),
                Vec3::new(-1.0, 0.0, 3.0),
                Vec3::new(1.0, 0.0, 3.0),
            ],
            UVS,
        );
        polygon.clip(&frustum()).unwrap();
        assert_eq!(polygon.len(), 4);

        let triangles: Vec<_> = polygon.triangulate().collect();
        assert_eq!(triangles.len(), 2);

        // Trapezoid: half-width 0.2 at z=1, 1.0 at z=3
        let expected = (0.4 + 2.0) / 2.0 * 2.0;
        let total: f32 = triangles.iter().map(area).sum();
        assert_relative_eq!(total, expected, epsilon = 1e-5);
    }

    #[test]
    fn intersection_interpolates_texcoords() {
        let mut polygon = Polygon::from_triangle(
            [
                Vec3::new(0.0, 0.0, 0.5),
                Vec3::new(-1.0, 0.0, 3.0),
                Vec3::new(1.0, 0.0, 3.0),
            ],
            UVS,
        );
        polygon.clip_against_plane(frustum().plane(PlaneId::Near)).unwrap();

        // Edge v2 -> v0 crosses at t = 0.8, edge v0 -> v1 at t = 0.2
        let uv = polygon.texcoords();
        assert_relative_eq!(uv[0].x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(uv[0].y, 0.2, epsilon = 1e-6);
        assert_relative_eq!(uv[1].x, 0.2, epsilon = 1e-6);
        assert_relative_eq!(uv[1].y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(polygon.vertices()[0].z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn each_plane_adds_at_most_one_vertex() {
        // Large triangle cutting through every side plane
        let mut polygon = Polygon::from_triangle(
            [
                Vec3::new(-50.0, -40.0, 10.0),
                Vec3::new(50.0, -40.0, 10.0),
                Vec3::new(0.0, 60.0, 10.0),
            ],
            UVS,
        );
        let frustum = frustum();
        let mut previous = polygon.len();
        for plane in frustum.planes() {
            polygon.clip_against_plane(plane).unwrap();
            assert!(polygon.len() <= previous + 1);
            previous = polygon.len();
        }
        assert!(polygon.len() >= 3);
        assert!(polygon.len() <= 9);
        for v in polygon.vertices() {
            assert!(v.x.abs() <= v.z + 1e-3);
            assert!(v.y.abs() <= v.z + 1e-3);
        }
    }

    #[test]
    fn vertex_exactly_on_plane_is_dropped() {
        // v0 sits on the near plane, the other two are inside. The strict
        // `> 0` test drops v0 and no edge crosses, leaving a degenerate
        // two-vertex polygon that contributes no triangles.
        let mut polygon = Polygon::from_triangle(
            [
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(-1.0, 0.0, 3.0),
                Vec3::new(1.0, 0.0, 3.0),
            ],
            UVS,
        );
        polygon.clip_against_plane(frustum().plane(PlaneId::Near)).unwrap();
        assert_eq!(polygon.len(), 2);
        assert_eq!(polygon.triangulate().count(), 0);
    }

    #[test]
    fn on_plane_vertex_between_inside_and_outside_keeps_crossing() {
        // v0 on the plane, v1 inside, v2 outside: the v1 -> v2 crossing
        // survives but v0 does not
        let mut polygon = Polygon::from_triangle(
            [
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 3.0),
                Vec3::new(0.0, -1.0, 0.5),
            ],
            UVS,
        );
        polygon.clip_against_plane(frustum().plane(PlaneId::Near)).unwrap();
        assert_eq!(polygon.len(), 2);
    }

    #[test]
    fn triangulate_fans_from_first_vertex() {
        let mut polygon = Polygon::empty();
        for i in 0..5 {
            let angle = i as f32;
            polygon
                .push(Vec3::new(angle.cos(), angle.sin(), 5.0), Vec2::new(angle, 0.0))
                .unwrap();
        }
        let triangles: Vec<_> = polygon.triangulate().collect();
        assert_eq!(triangles.len(), 3);
        for (i, t) in triangles.iter().enumerate() {
            assert_eq!(t.vertices[0], polygon.vertices()[0]);
            assert_eq!(t.vertices[1], polygon.vertices()[i + 1]);
            assert_eq!(t.vertices[2], polygon.vertices()[i + 2]);
            assert_eq!(t.texcoords[2], polygon.texcoords()[i + 2]);
        }
    }

    #[test]
    fn too_few_vertices_yield_no_triangles() {
        let mut polygon = Polygon::empty();
        assert_eq!(polygon.triangulate().count(), 0);
        polygon.push(Vec3::ZERO, Vec2::ZERO).unwrap();
        assert_eq!(polygon.triangulate().count(), 0);
    }

    #[test]
    fn overflow_is_reported_and_empties_polygon() {
        let mut polygon = Polygon::empty();
        for _ in 0..MAX_POLY_VERTICES {
            polygon.push(Vec3::ZERO, Vec2::ZERO).unwrap();
        }
        assert_eq!(
            polygon.push(Vec3::ZERO, Vec2::ZERO),
            Err(ClipError::VertexOverflow {
                capacity: MAX_POLY_VERTICES
            })
        );

        // A non-convex star re-crosses one plane many times and overflows
        let mut star = Polygon::empty();
        for i in 0..MAX_POLY_VERTICES {
            let x = if i % 2 == 0 { -1.0 } else { 1.0 };
            star.push(Vec3::new(x, i as f32, 5.0), Vec2::ZERO).unwrap();
        }
        let plane = FrustumPlane::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert!(star.clip_against_plane(&plane).is_err());
        assert!(star.is_empty());
    }
}
