//! Shape parameter records.
//!
//! These are the plain records the debug panel edits in place. Building a
//! record produces a [`GeometryData`] that remembers the record it came from.

use std::f32::consts::PI;

use super::{primitives, GeometryData};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxParams {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub depth_segments: u32,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
            phi_start: 0.0,
            phi_length: PI * 2.0,
            theta_start: 0.0,
            theta_length: PI,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IcosahedronParams {
    pub radius: f32,
    pub detail: u32,
}

impl Default for IcosahedronParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            detail: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusKnotParams {
    pub radius: f32,
    pub tube: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub p: u32,
    pub q: u32,
}

impl Default for TorusKnotParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            tube: 0.4,
            tubular_segments: 64,
            radial_segments: 8,
            p: 2,
            q: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneParams {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

/// Any shape record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryParams {
    Box(BoxParams),
    Sphere(SphereParams),
    Icosahedron(IcosahedronParams),
    TorusKnot(TorusKnotParams),
    Plane(PlaneParams),
}

impl GeometryParams {
    /// Construct the geometry described by the record's current values
    pub fn build(&self) -> GeometryData {
        let mut data = match self {
            Self::Box(p) => primitives::generate_box(p),
            Self::Sphere(p) => primitives::generate_sphere(p),
            Self::Icosahedron(p) => primitives::generate_icosahedron(p),
            Self::TorusKnot(p) => primitives::generate_torus_knot(p),
            Self::Plane(p) => primitives::generate_plane(p),
        };
        data.parameters = Some(*self);
        data
    }

    /// Numeric fields of the record, in panel order
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::Box(_) => &[
                "width",
                "height",
                "depth",
                "widthSegments",
                "heightSegments",
                "depthSegments",
            ],
            Self::Sphere(_) => &[
                "radius",
                "widthSegments",
                "heightSegments",
                "phiStart",
                "phiLength",
                "thetaStart",
                "thetaLength",
            ],
            Self::Icosahedron(_) => &["radius", "detail"],
            Self::TorusKnot(_) => &["radius", "tube", "tubularSegments", "radialSegments", "p", "q"],
            Self::Plane(_) => &["width", "height", "widthSegments", "heightSegments"],
        }
    }

    /// Read a field by name. Integer fields come back as whole numbers.
    pub fn field(&self, name: &str) -> Option<f32> {
        let value = match (self, name) {
            (Self::Box(p), "width") => p.width,
            (Self::Box(p), "height") => p.height,
            (Self::Box(p), "depth") => p.depth,
            (Self::Box(p), "widthSegments") => p.width_segments as f32,
            (Self::Box(p), "heightSegments") => p.height_segments as f32,
            (Self::Box(p), "depthSegments") => p.depth_segments as f32,
            (Self::Sphere(p), "radius") => p.radius,
            (Self::Sphere(p), "widthSegments") => p.width_segments as f32,
            (Self::Sphere(p), "heightSegments") => p.height_segments as f32,
            (Self::Sphere(p), "phiStart") => p.phi_start,
            (Self::Sphere(p), "phiLength") => p.phi_length,
            (Self::Sphere(p), "thetaStart") => p.theta_start,
            (Self::Sphere(p), "thetaLength") => p.theta_length,
            (Self::Icosahedron(p), "radius") => p.radius,
            (Self::Icosahedron(p), "detail") => p.detail as f32,
            (Self::TorusKnot(p), "radius") => p.radius,
            (Self::TorusKnot(p), "tube") => p.tube,
            (Self::TorusKnot(p), "tubularSegments") => p.tubular_segments as f32,
            (Self::TorusKnot(p), "radialSegments") => p.radial_segments as f32,
            (Self::TorusKnot(p), "p") => p.p as f32,
            (Self::TorusKnot(p), "q") => p.q as f32,
            (Self::Plane(p), "width") => p.width,
            (Self::Plane(p), "height") => p.height,
            (Self::Plane(p), "widthSegments") => p.width_segments as f32,
            (Self::Plane(p), "heightSegments") => p.height_segments as f32,
            _ => return None,
        };
        Some(value)
    }

    /// Write a field by name, rounding for integer fields.
    ///
    /// Returns `false` if the record has no such field.
    pub fn set_field(&mut self, name: &str, value: f32) -> bool {
        let whole = value.round().max(0.0) as u32;
        match (self, name) {
            (Self::Box(p), "width") => p.width = value,
            (Self::Box(p), "height") => p.height = value,
            (Self::Box(p), "depth") => p.depth = value,
            (Self::Box(p), "widthSegments") => p.width_segments = whole,
            (Self::Box(p), "heightSegments") => p.height_segments = whole,
            (Self::Box(p), "depthSegments") => p.depth_segments = whole,
            (Self::Sphere(p), "radius") => p.radius = value,
            (Self::Sphere(p), "widthSegments") => p.width_segments = whole,
            (Self::Sphere(p), "heightSegments") => p.height_segments = whole,
            (Self::Sphere(p), "phiStart") => p.phi_start = value,
            (Self::Sphere(p), "phiLength") => p.phi_length = value,
            (Self::Sphere(p), "thetaStart") => p.theta_start = value,
            (Self::Sphere(p), "thetaLength") => p.theta_length = value,
            (Self::Icosahedron(p), "radius") => p.radius = value,
            (Self::Icosahedron(p), "detail") => p.detail = whole,
            (Self::TorusKnot(p), "radius") => p.radius = value,
            (Self::TorusKnot(p), "tube") => p.tube = value,
            (Self::TorusKnot(p), "tubularSegments") => p.tubular_segments = whole,
            (Self::TorusKnot(p), "radialSegments") => p.radial_segments = whole,
            (Self::TorusKnot(p), "p") => p.p = whole,
            (Self::TorusKnot(p), "q") => p.q = whole,
            (Self::Plane(p), "width") => p.width = value,
            (Self::Plane(p), "height") => p.height = value,
            (Self::Plane(p), "widthSegments") => p.width_segments = whole,
            (Self::Plane(p), "heightSegments") => p.height_segments = whole,
            _ => return false,
        }
        true
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Box(_) => "Box",
            Self::Sphere(_) => "Sphere",
            Self::Icosahedron(_) => "Icosahedron",
            Self::TorusKnot(_) => "TorusKnot",
            Self::Plane(_) => "Plane",
        }
    }
}

impl From<BoxParams> for GeometryParams {
    fn from(p: BoxParams) -> Self {
        Self::Box(p)
    }
}

impl From<SphereParams> for GeometryParams {
    fn from(p: SphereParams) -> Self {
        Self::Sphere(p)
    }
}

impl From<IcosahedronParams> for GeometryParams {
    fn from(p: IcosahedronParams) -> Self {
        Self::Icosahedron(p)
    }
}

impl From<TorusKnotParams> for GeometryParams {
    fn from(p: TorusKnotParams) -> Self {
        Self::TorusKnot(p)
    }
}

impl From<PlaneParams> for GeometryParams {
    fn from(p: PlaneParams) -> Self {
        Self::Plane(p)
    }
}
