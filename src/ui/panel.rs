//! Debug panel: collapsible folders of sliders and checkboxes bound to
//! fields of the [`World`].
//!
//! The panel never writes to the world while drawing. Widgets are
//! initialised from each control's getter, and user interaction is queued
//! as [`PanelEdit`]s that [`DebugPanel::apply_pending`] applies at the start
//! of the next tick.

use imgui::{TreeNodeFlags, Ui};

use crate::{error::Result, gfx::resources::GeometryBackend, world::World};

/// Index of a control inside its [`DebugPanel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f32),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// The value moved during a drag
    Changing,
    /// The gesture ended (slider released, checkbox clicked)
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelEdit {
    pub control: ControlId,
    pub value: Value,
    pub phase: EditPhase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Slider { min: f32, max: f32, step: Option<f32> },
    Checkbox,
}

impl ControlKind {
    /// Snap a slider value to its step and clamp it to the range
    pub fn normalize(&self, value: Value) -> Option<Value> {
        match (self, value) {
            (Self::Slider { min, max, step }, Value::Number(v)) => {
                let v = match step {
                    Some(step) if *step > 0.0 => min + ((v - min) / step).round() * step,
                    _ => v,
                };
                Some(Value::Number(v.clamp(*min, *max)))
            }
            (Self::Checkbox, Value::Bool(b)) => Some(Value::Bool(b)),
            _ => None,
        }
    }
}

type Getter = Box<dyn Fn(&World) -> Result<Value>>;
type Setter = Box<dyn FnMut(&mut World, Value) -> Result<()>>;

/// Called after the setter with access to the geometry backend
pub type Callback = Box<dyn FnMut(&mut World, &mut dyn GeometryBackend) -> Result<()>>;

/// A widget bound to one field
pub struct Control {
    pub label: String,
    pub kind: ControlKind,
    get: Getter,
    set: Setter,
    on_change: Option<Callback>,
    on_finish_change: Option<Callback>,
}

impl Control {
    pub fn slider<G, S>(label: impl Into<String>, min: f32, max: f32, get: G, mut set: S) -> Self
    where
        G: Fn(&World) -> Result<f32> + 'static,
        S: FnMut(&mut World, f32) -> Result<()> + 'static,
    {
        Self {
            label: label.into(),
            kind: ControlKind::Slider {
                min,
                max,
                step: None,
            },
            get: Box::new(move |world| get(world).map(Value::Number)),
            set: Box::new(move |world, value| match value {
                Value::Number(v) => set(world, v),
                Value::Bool(_) => Ok(()),
            }),
            on_change: None,
            on_finish_change: None,
        }
    }

    pub fn checkbox<G, S>(label: impl Into<String>, get: G, mut set: S) -> Self
    where
        G: Fn(&World) -> Result<bool> + 'static,
        S: FnMut(&mut World, bool) -> Result<()> + 'static,
    {
        Self {
            label: label.into(),
            kind: ControlKind::Checkbox,
            get: Box::new(move |world| get(world).map(Value::Bool)),
            set: Box::new(move |world, value| match value {
                Value::Bool(b) => set(world, b),
                Value::Number(_) => Ok(()),
            }),
            on_change: None,
            on_finish_change: None,
        }
    }

    /// Snap slider values to multiples of `step` from `min`. Ignored on checkboxes.
    pub fn step(mut self, step: f32) -> Self {
        if let ControlKind::Slider { step: s, .. } = &mut self.kind {
            *s = Some(step);
        }
        self
    }

    /// Runs after every applied edit
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut World, &mut dyn GeometryBackend) -> Result<()> + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Runs once per gesture, after the final edit
    pub fn on_finish_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut World, &mut dyn GeometryBackend) -> Result<()> + 'static,
    {
        self.on_finish_change = Some(Box::new(callback));
        self
    }

    pub fn value(&self, world: &World) -> Result<Value> {
        (self.get)(world)
    }
}

enum Entry {
    Control(Control),
    Folder(Folder),
}

/// Named group of controls and sub-folders, as built by the caller
pub struct Folder {
    pub name: String,
    pub open: bool,
    entries: Vec<Entry>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: false,
            entries: Vec::new(),
        }
    }

    /// Start expanded
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn control(mut self, control: Control) -> Self {
        self.entries.push(Entry::Control(control));
        self
    }

    pub fn folder(mut self, folder: Folder) -> Self {
        self.entries.push(Entry::Folder(folder));
        self
    }
}

// Folders after registration refer to controls by id
enum Item {
    Control(ControlId),
    Folder(FolderNode),
}

struct FolderNode {
    name: String,
    open: bool,
    items: Vec<Item>,
}

/// A window of folders whose edits are applied once per tick
pub struct DebugPanel {
    pub title: String,
    folders: Vec<FolderNode>,
    controls: Vec<Control>,
    pending: Vec<PanelEdit>,
}

impl DebugPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            folders: Vec::new(),
            controls: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn add_folder(&mut self, folder: Folder) {
        let node = self.register(folder);
        self.folders.push(node);
    }

    fn register(&mut self, folder: Folder) -> FolderNode {
        let mut items = Vec::with_capacity(folder.entries.len());
        for entry in folder.entries {
            match entry {
                Entry::Control(control) => {
                    let id = ControlId(self.controls.len());
                    self.controls.push(control);
                    items.push(Item::Control(id));
                }
                Entry::Folder(sub) => items.push(Item::Folder(self.register(sub))),
            }
        }
        FolderNode {
            name: folder.name,
            open: folder.open,
            items,
        }
    }

    /// Look a control up by folder path and label, e.g. `"Cube/Rotation/x"`
    pub fn find(&self, path: &str) -> Option<ControlId> {
        let (folders, label) = path.rsplit_once('/')?;
        let mut names = folders.split('/');
        let first = names.next()?;
        let mut items = &self.folders.iter().find(|folder| folder.name == first)?.items;
        for name in names {
            items = items.iter().find_map(|item| match item {
                Item::Folder(folder) if folder.name == name => Some(&folder.items),
                _ => None,
            })?;
        }
        items.iter().find_map(|item| match item {
            Item::Control(id) if self.controls[id.0].label == label => Some(*id),
            _ => None,
        })
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.0)
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn queue_edit(&mut self, edit: PanelEdit) {
        self.pending.push(edit);
    }

    pub fn pending_edits(&self) -> &[PanelEdit] {
        &self.pending
    }

    /// Apply every queued edit in order.
    ///
    /// For each edit: the setter, then `on_change`, then `on_finish_change`
    /// for finished gestures. A failing edit is logged and skipped. Returns
    /// the number of edits applied.
    pub fn apply_pending(&mut self, world: &mut World, backend: &mut dyn GeometryBackend) -> usize {
        let mut applied = 0;
        for edit in std::mem::take(&mut self.pending) {
            let Some(control) = self.controls.get_mut(edit.control.0) else {
                log::warn!("edit for unknown control {:?}", edit.control);
                continue;
            };
            match apply_edit(control, edit, world, backend) {
                Ok(true) => applied += 1,
                Ok(false) => log::warn!(
                    "ignoring {:?} for control '{}'",
                    edit.value,
                    control.label
                ),
                Err(e) => log::warn!("panel control '{}': {}", control.label, e),
            }
        }
        applied
    }

    /// Draw the panel window. Interaction is queued, not applied.
    pub fn draw(&mut self, ui: &Ui, world: &World) {
        let Self {
            title,
            folders,
            controls,
            pending,
        } = self;
        ui.window(title.as_str())
            .size([320.0, 420.0], imgui::Condition::FirstUseEver)
            .position([10.0, 10.0], imgui::Condition::FirstUseEver)
            .build(|| {
                for folder in folders.iter() {
                    let flags = if folder.open {
                        TreeNodeFlags::DEFAULT_OPEN
                    } else {
                        TreeNodeFlags::empty()
                    };
                    if ui.collapsing_header(&folder.name, flags) {
                        draw_items(ui, &folder.items, controls, world, pending);
                    }
                }
            });
    }
}

fn apply_edit(
    control: &mut Control,
    edit: PanelEdit,
    world: &mut World,
    backend: &mut dyn GeometryBackend,
) -> Result<bool> {
    let Some(value) = control.kind.normalize(edit.value) else {
        return Ok(false);
    };
    (control.set)(world, value)?;
    if let Some(on_change) = control.on_change.as_mut() {
        on_change(world, backend)?;
    }
    if edit.phase == EditPhase::Finished {
        if let Some(on_finish_change) = control.on_finish_change.as_mut() {
            on_finish_change(world, backend)?;
        }
    }
    Ok(true)
}

fn draw_items(
    ui: &Ui,
    items: &[Item],
    controls: &[Control],
    world: &World,
    pending: &mut Vec<PanelEdit>,
) {
    for item in items {
        match item {
            Item::Control(id) => {
                let _id = ui.push_id_usize(id.0);
                if let Some(edit) = draw_control(ui, *id, &controls[id.0], world) {
                    pending.push(edit);
                }
            }
            Item::Folder(folder) => {
                if let Some(_node) = ui
                    .tree_node_config(&folder.name)
                    .opened(folder.open, imgui::Condition::FirstUseEver)
                    .push()
                {
                    draw_items(ui, &folder.items, controls, world, pending);
                }
            }
        }
    }
}

fn draw_control(ui: &Ui, id: ControlId, control: &Control, world: &World) -> Option<PanelEdit> {
    let current = match control.value(world) {
        Ok(value) => value,
        Err(e) => {
            ui.text_disabled(format!("{}: {}", control.label, e));
            return None;
        }
    };

    match (control.kind, current) {
        (ControlKind::Slider { min, max, .. }, Value::Number(mut v)) => {
            let changed = ui.slider(&control.label, min, max, &mut v);
            let phase = if ui.is_item_deactivated_after_edit() {
                EditPhase::Finished
            } else if changed {
                EditPhase::Changing
            } else {
                return None;
            };
            Some(PanelEdit {
                control: id,
                value: Value::Number(v),
                phase,
            })
        }
        (ControlKind::Checkbox, Value::Bool(mut b)) => {
            ui.checkbox(&control.label, &mut b).then_some(PanelEdit {
                control: id,
                value: Value::Bool(b),
                phase: EditPhase::Finished,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::BoxParams,
        material::Material,
        resources::geometry_store::{
            recording::{Event, RecordingBackend},
            GeometryId,
        },
        scene::{Mesh, Node, NodeId, Scene, SceneId},
    };
    use std::{cell::Cell, rc::Rc};

    fn world_with_cube() -> (World, SceneId, NodeId) {
        let mut world = World::new();
        let mut scene = Scene::new("panel");
        let cube = scene.add(Node::mesh(
            "cube",
            Mesh::from_params(BoxParams::default(), Material::basic(0x00ff00)),
        ));
        let scene = world.add_scene(scene);
        (world, scene, cube)
    }

    fn x_slider(scene: SceneId, node: NodeId) -> Control {
        Control::slider(
            "x",
            -10.0,
            10.0,
            move |w| Ok(w.node(scene, node)?.transform.position.x),
            move |w, v| {
                w.node_mut(scene, node)?.transform.position.x = v;
                Ok(())
            },
        )
    }

    fn edit(control: ControlId, value: f32, phase: EditPhase) -> PanelEdit {
        PanelEdit {
            control,
            value: Value::Number(value),
            phase,
        }
    }

    #[test]
    fn test_edits_apply_only_when_applied() {
        let (mut world, scene, cube) = world_with_cube();
        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(Folder::new("Cube").control(x_slider(scene, cube)));
        let id = panel.find("Cube/x").unwrap();

        panel.queue_edit(edit(id, 3.0, EditPhase::Changing));
        assert_eq!(world.node(scene, cube).unwrap().transform.position.x, 0.0);
        assert_eq!(panel.pending_edits().len(), 1);

        let mut backend = RecordingBackend::default();
        assert_eq!(panel.apply_pending(&mut world, &mut backend), 1);
        assert_eq!(world.node(scene, cube).unwrap().transform.position.x, 3.0);
        assert!(panel.pending_edits().is_empty());
        assert_eq!(
            panel.control(id).unwrap().value(&world).unwrap(),
            Value::Number(3.0)
        );
    }

    #[test]
    fn test_finish_fires_once_per_gesture() {
        let (mut world, scene, cube) = world_with_cube();
        let changes = Rc::new(Cell::new(0));
        let finishes = Rc::new(Cell::new(0));
        let (c, f) = (changes.clone(), finishes.clone());

        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(
            Folder::new("Cube").control(
                x_slider(scene, cube)
                    .on_change(move |_, _| {
                        c.set(c.get() + 1);
                        Ok(())
                    })
                    .on_finish_change(move |_, _| {
                        f.set(f.get() + 1);
                        Ok(())
                    }),
            ),
        );
        let id = panel.find("Cube/x").unwrap();

        for v in [1.0, 2.0, 3.0] {
            panel.queue_edit(edit(id, v, EditPhase::Changing));
        }
        panel.queue_edit(edit(id, 3.5, EditPhase::Finished));
        panel.apply_pending(&mut world, &mut RecordingBackend::default());

        assert_eq!(changes.get(), 4);
        assert_eq!(finishes.get(), 1);
        assert_eq!(world.node(scene, cube).unwrap().transform.position.x, 3.5);
    }

    #[test]
    fn test_slider_snaps_and_clamps() {
        let kind = ControlKind::Slider {
            min: -10.0,
            max: 10.0,
            step: Some(0.5),
        };
        assert_eq!(kind.normalize(Value::Number(1.3)), Some(Value::Number(1.5)));
        assert_eq!(kind.normalize(Value::Number(42.0)), Some(Value::Number(10.0)));
        assert_eq!(kind.normalize(Value::Number(-11.2)), Some(Value::Number(-10.0)));
        assert_eq!(kind.normalize(Value::Bool(true)), None);

        let unstepped = ControlKind::Slider {
            min: 0.0,
            max: 1.0,
            step: None,
        };
        assert_eq!(unstepped.normalize(Value::Number(0.33)), Some(Value::Number(0.33)));
        assert_eq!(
            ControlKind::Checkbox.normalize(Value::Bool(false)),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn test_nested_folders_and_lookup() {
        let (_, scene, cube) = world_with_cube();
        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(
            Folder::new("Cube")
                .open()
                .control(Control::checkbox(
                    "visible",
                    move |w| Ok(w.node(scene, cube)?.visible),
                    move |w, b| {
                        w.node_mut(scene, cube)?.visible = b;
                        Ok(())
                    },
                ))
                .folder(Folder::new("Position").control(x_slider(scene, cube))),
        );
        panel.add_folder(Folder::new("Other").control(x_slider(scene, cube)));

        assert_eq!(panel.control_count(), 3);
        assert_eq!(panel.find("Cube/visible"), Some(ControlId(0)));
        assert_eq!(panel.find("Cube/Position/x"), Some(ControlId(1)));
        assert_eq!(panel.find("Other/x"), Some(ControlId(2)));
        assert_eq!(panel.find("Cube/x"), None);
        assert_eq!(panel.find("Missing/x"), None);
    }

    #[test]
    fn test_checkbox_and_mismatched_values() {
        let (mut world, scene, cube) = world_with_cube();
        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(Folder::new("Cube").control(Control::checkbox(
            "visible",
            move |w| Ok(w.node(scene, cube)?.visible),
            move |w, b| {
                w.node_mut(scene, cube)?.visible = b;
                Ok(())
            },
        )));
        let id = panel.find("Cube/visible").unwrap();

        panel.queue_edit(edit(id, 1.0, EditPhase::Finished));
        panel.queue_edit(PanelEdit {
            control: id,
            value: Value::Bool(false),
            phase: EditPhase::Finished,
        });
        let applied = panel.apply_pending(&mut world, &mut RecordingBackend::default());

        assert_eq!(applied, 1);
        assert!(!world.node(scene, cube).unwrap().visible);
    }

    #[test]
    fn test_failing_setter_is_skipped() {
        let (mut world, scene, _) = world_with_cube();
        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(Folder::new("Ghost").control(x_slider(scene, NodeId(99))));
        let id = panel.find("Ghost/x").unwrap();

        panel.queue_edit(edit(id, 1.0, EditPhase::Finished));
        assert_eq!(panel.apply_pending(&mut world, &mut RecordingBackend::default()), 0);
        assert!(panel.control(id).unwrap().value(&world).is_err());
    }

    #[test]
    fn test_finish_change_can_regenerate() {
        let (mut world, scene, cube) = world_with_cube();
        let mut panel = DebugPanel::new("Debug");
        panel.add_folder(
            Folder::new("Geometry").control(
                Control::slider(
                    "width",
                    0.1,
                    10.0,
                    move |w| {
                        let mesh = w.node(scene, cube)?.as_mesh();
                        Ok(mesh.and_then(|m| m.shape).and_then(|s| s.field("width")).unwrap_or(0.0))
                    },
                    move |w, v| {
                        if let Some(shape) = w.scene_mut(scene)?.mesh_mut(cube)?.shape.as_mut() {
                            shape.set_field("width", v);
                        }
                        Ok(())
                    },
                )
                .on_finish_change(move |w, backend| w.scene_mut(scene)?.regenerate(cube, backend)),
            ),
        );
        let id = panel.find("Geometry/width").unwrap();
        let mut backend = RecordingBackend::default();
        world.scene_mut(scene).unwrap().upload_pending(&mut backend);

        panel.queue_edit(edit(id, 2.0, EditPhase::Changing));
        panel.queue_edit(edit(id, 4.0, EditPhase::Finished));
        panel.apply_pending(&mut world, &mut backend);

        let mesh = world.node(scene, cube).unwrap().as_mesh().unwrap();
        assert_eq!(mesh.geometry.parameters.and_then(|p| p.field("width")), Some(4.0));
        assert_eq!(backend.live.len(), 1);
        assert_eq!(
            backend.events,
            vec![
                Event::Upload(GeometryId::new(0, 0)),
                Event::Release(GeometryId::new(0, 0)),
                Event::Upload(GeometryId::new(1, 0)),
            ]
        );
    }
}
