//! Owner of every scene and camera in the app

use crate::{
    error::{Error, Result},
    gfx::{
        camera::{Camera, CameraId},
        scene::{Node, NodeId, Scene, SceneId},
    },
};

/// All scenes and cameras.
///
/// The world is mutated by exactly one writer per tick: queued panel edits,
/// then orbit input, then the frame callback.
#[derive(Default)]
pub struct World {
    scenes: Vec<Scene>,
    cameras: Vec<Camera>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        self.scenes.push(scene);
        SceneId(self.scenes.len() - 1)
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        self.cameras.push(camera);
        CameraId(self.cameras.len() - 1)
    }

    pub fn scene(&self, id: SceneId) -> Result<&Scene> {
        self.scenes.get(id.0).ok_or(Error::UnknownScene(id))
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Result<&mut Scene> {
        self.scenes.get_mut(id.0).ok_or(Error::UnknownScene(id))
    }

    pub fn camera(&self, id: CameraId) -> Result<&Camera> {
        self.cameras.get(id.0).ok_or(Error::UnknownCamera(id))
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Result<&mut Camera> {
        self.cameras.get_mut(id.0).ok_or(Error::UnknownCamera(id))
    }

    pub fn node(&self, scene: SceneId, node: NodeId) -> Result<&Node> {
        self.scene(scene)?.node(node)
    }

    pub fn node_mut(&mut self, scene: SceneId, node: NodeId) -> Result<&mut Node> {
        self.scene_mut(scene)?.node_mut(node)
    }

    pub fn scenes_mut(&mut self) -> impl Iterator<Item = &mut Scene> {
        self.scenes.iter_mut()
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut world = World::new();
        let a = world.add_scene(Scene::new("a"));
        let b = world.add_scene(Scene::new("b"));
        let cam = world.add_camera(Camera::perspective("main", 75.0, 1.0, 0.1, 100.0));

        assert_eq!(a, SceneId(0));
        assert_eq!(b, SceneId(1));
        assert_eq!(world.scene(b).unwrap().name, "b");
        assert_eq!(world.camera(cam).unwrap().name, "main");
    }

    #[test]
    fn test_unknown_handles() {
        let mut world = World::new();
        assert!(matches!(world.scene(SceneId(0)), Err(Error::UnknownScene(_))));
        assert!(matches!(world.camera_mut(CameraId(2)), Err(Error::UnknownCamera(_))));

        let scene = world.add_scene(Scene::new("a"));
        assert!(matches!(
            world.node(scene, NodeId(0)),
            Err(Error::UnknownNode(NodeId(0)))
        ));
    }
}
