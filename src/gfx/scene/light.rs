//! Scene lights
//!
//! Lights are scene nodes. A directional light shines from its node's world
//! position toward the origin.

use crate::gfx::material::hex_to_rgb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    /// Sky colour from above, ground colour from below, blended by normal.y
    Hemisphere {
        sky: [f32; 3],
        ground: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
    },
}

impl Light {
    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Self::Ambient {
            color: hex_to_rgb(hex),
            intensity,
        }
    }

    pub fn hemisphere(sky: u32, ground: u32, intensity: f32) -> Self {
        Self::Hemisphere {
            sky: hex_to_rgb(sky),
            ground: hex_to_rgb(ground),
            intensity,
        }
    }

    pub fn directional(hex: u32, intensity: f32) -> Self {
        Self::Directional {
            color: hex_to_rgb(hex),
            intensity,
        }
    }

    pub fn intensity(&self) -> f32 {
        match *self {
            Self::Ambient { intensity, .. }
            | Self::Hemisphere { intensity, .. }
            | Self::Directional { intensity, .. } => intensity,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Self::Ambient { intensity, .. }
            | Self::Hemisphere { intensity, .. }
            | Self::Directional { intensity, .. } => *intensity = value,
        }
    }
}
