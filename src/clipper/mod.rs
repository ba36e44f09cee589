//! Frustum clipping in camera space.
//!
//! Triangles are clipped before projection using the Sutherland-Hodgman
//! algorithm against six point+normal planes. Clipping before the perspective
//! divide keeps vertices behind the camera from wrapping around to the front.
//!
//! - [`frustum`]: plane construction for perspective and orthographic volumes
//! - [`polygon`]: the bounded clip polygon and fan triangulation

pub mod frustum;
pub mod polygon;

pub use frustum::{Frustum, FrustumPlane, PlaneId};
pub use polygon::{ClipTriangle, Polygon, MAX_POLY_VERTICES};
