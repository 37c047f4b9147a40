//! Per-tick animation state and debug text helpers

use std::time::{Duration, Instant};

use cgmath::{Matrix4, Vector3};

use crate::{
    error::Result,
    gfx::{
        resources::geometry_store::GeometryBackend,
        scene::{NodeId, SceneId},
    },
    world::World,
};

/// Everything the frame callback may touch during one tick
pub struct FrameContext<'a> {
    pub world: &'a mut World,
    /// Number of ticks before this one
    pub tick: u64,
    /// Time since the first tick
    pub elapsed: Duration,
    /// Time since the previous tick
    pub delta: Duration,
    /// Needed to regenerate mesh geometry
    pub backend: &'a mut dyn GeometryBackend,
    /// Shown in the "Debug" overlay when non-empty. Cleared before every tick.
    pub debug_text: &'a mut String,
}

/// Tick counter and timing
#[derive(Debug)]
pub struct FrameClock {
    start: Option<Instant>,
    last: Option<Instant>,
    tick: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: None,
            last: None,
            tick: 0,
        }
    }

    /// Advance one tick and return `(tick, elapsed, delta)` for it
    pub fn advance(&mut self, now: Instant) -> (u64, Duration, Duration) {
        let start = *self.start.get_or_insert(now);
        let delta = self.last.map_or(Duration::ZERO, |last| now - last);
        self.last = Some(now);
        let tick = self.tick;
        self.tick += 1;
        (tick, now - start, delta)
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }
}

/// Add a fixed Euler increment to a node's rotation every tick
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    pub scene: SceneId,
    pub node: NodeId,
    pub per_frame: Vector3<f32>,
}

impl Spin {
    pub fn new(scene: SceneId, node: NodeId, x: f32, y: f32, z: f32) -> Self {
        Self {
            scene,
            node,
            per_frame: Vector3::new(x, y, z),
        }
    }

    pub fn step(&self, world: &mut World) -> Result<()> {
        let node = world.node_mut(self.scene, self.node)?;
        node.transform.rotation += self.per_frame;
        Ok(())
    }
}

/// One matrix row per line, two decimals
pub fn format_matrix(m: &Matrix4<f32>) -> String {
    // cgmath is column-major: m[col][row]
    (0..4)
        .map(|row| {
            (0..4)
                .map(|col| format!("{:.2}", m[col][row]))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_position_block(name: &str, local: Vector3<f32>, world: Vector3<f32>) -> String {
    let mut block = String::from(name);
    for (axis, l, w) in [
        ("X", local.x, world.x),
        ("Y", local.y, world.y),
        ("Z", local.z, world.z),
    ] {
        block.push_str(&format!("\nLocal Pos {} : {:.2}", axis, l));
        block.push_str(&format!("\nWorld Pos {} : {:.2}", axis, w));
    }
    block
}

/// Blocks for several objects, separated by a blank line
pub fn join_blocks<I, S>(blocks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    blocks
        .into_iter()
        .map(|b| b.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Position blocks for the given nodes of one scene
pub fn position_report(world: &World, scene: SceneId, nodes: &[NodeId]) -> Result<String> {
    let scene = world.scene(scene)?;
    let mut blocks = Vec::with_capacity(nodes.len());
    for id in nodes {
        let node = scene.node(*id)?;
        blocks.push(format_position_block(
            &node.name,
            node.transform.position,
            scene.world_position(*id)?,
        ));
    }
    Ok(join_blocks(blocks))
}
