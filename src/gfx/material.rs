//! Surface materials.

/// How a material responds to scene lights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Flat colour, ignores lights
    Basic,
    /// Diffuse lighting from ambient, hemisphere and directional lights
    Lambert,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGB colour
    pub color: [f32; 3],
    pub shading: Shading,
    /// Draw triangle edges as lines instead of filled faces
    pub wireframe: bool,
    /// Multiply by per-vertex colours
    pub vertex_colors: bool,
}

impl Material {
    /// Unlit material from a `0xRRGGBB` colour
    pub fn basic(hex: u32) -> Self {
        Self {
            color: hex_to_rgb(hex),
            shading: Shading::Basic,
            wireframe: false,
            vertex_colors: false,
        }
    }

    /// Lit diffuse material from a `0xRRGGBB` colour
    pub fn lambert(hex: u32) -> Self {
        Self {
            shading: Shading::Lambert,
            ..Self::basic(hex)
        }
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    pub fn with_vertex_colors(mut self) -> Self {
        self.vertex_colors = true;
        self
    }

    pub fn is_lit(&self) -> bool {
        self.shading == Shading::Lambert
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::basic(0xffffff)
    }
}

/// Split `0xRRGGBB` into RGB components in `0.0..=1.0`
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
