use super::input::{ActionStates, InputAction};
use crate::playback::{ActorRole, CommandToken, MatchOutcome, ViewportMetrics};

pub const DEFAULT_ORTHOGRAPHIC_SIZE: f32 = 5.0;
pub const DEFAULT_TARGET_ASPECT: f32 = 16.0 / 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Restart,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// True only on the tick the key went down.
    pub fn pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    /// Pressed planning keys, in a fixed order.
    pub fn pressed_commands(&self) -> impl Iterator<Item = CommandToken> + '_ {
        InputAction::ALL
            .into_iter()
            .filter(|action| self.pressed(*action))
            .filter_map(InputAction::command_token)
    }

    pub fn with_action_pressed(mut self, action: InputAction) -> Self {
        self.actions.set(action, true);
        self
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Orthographic camera. `orthographic_size` is half the visible height in
/// world units; the visible width follows from the target aspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub orthographic_size: f32,
    pub target_aspect: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            orthographic_size: DEFAULT_ORTHOGRAPHIC_SIZE,
            target_aspect: DEFAULT_TARGET_ASPECT,
        }
    }
}

impl Camera2D {
    pub fn effective_orthographic_size(&self) -> f32 {
        if self.orthographic_size.is_finite() && self.orthographic_size > 0.0 {
            self.orthographic_size
        } else {
            DEFAULT_ORTHOGRAPHIC_SIZE
        }
    }

    pub fn effective_aspect(&self) -> f32 {
        if self.target_aspect.is_finite() && self.target_aspect > 0.0 {
            self.target_aspect
        } else {
            DEFAULT_TARGET_ASPECT
        }
    }

    pub fn visible_height(&self) -> f32 {
        self.effective_orthographic_size() * 2.0
    }

    pub fn right_edge(&self) -> f32 {
        self.position.x + self.visible_width() * 0.5
    }

    pub fn left_edge(&self) -> f32 {
        self.position.x - self.visible_width() * 0.5
    }
}

impl ViewportMetrics for Camera2D {
    fn visible_width(&self) -> f32 {
        self.visible_height() * self.effective_aspect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderableKind {
    Actor(ActorRole),
}

#[derive(Debug, Clone)]
pub struct RenderableDesc {
    pub kind: RenderableKind,
    pub debug_name: &'static str,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec2,
    pub half_extent: f32,
    pub renderable: RenderableDesc,
}

/// What the renderer shows outside the world: the plan strip and the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudState {
    pub planned: Vec<CommandToken>,
    pub plan_capacity: Option<usize>,
    pub playing: Vec<CommandToken>,
    pub outcome: Option<MatchOutcome>,
}

#[derive(Debug, Default)]
struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
    camera: Camera2D,
    ground_y: Option<f32>,
    hud: HudState,
}

impl SceneWorld {
    /// Spawns become visible after the next `apply_pending`.
    pub fn spawn(&mut self, position: Vec2, half_extent: f32, renderable: RenderableDesc) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity {
            id,
            position,
            half_extent,
            renderable,
        });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            let pending = std::mem::take(&mut self.pending_despawns);
            self.entities.retain(|entity| !pending.contains(&entity.id));
            self.pending_spawns
                .retain(|entity| !pending.contains(&entity.id));
        }
        self.entities.append(&mut self.pending_spawns);
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
        self.camera = Camera2D::default();
        self.ground_y = None;
        self.hud = HudState::default();
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn set_entity_position(&mut self, id: EntityId, position: Vec2) -> bool {
        match self.find_entity_mut(id) {
            Some(entity) => {
                entity.position = position;
                true
            }
            None => false,
        }
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn ground_y(&self) -> Option<f32> {
        self.ground_y
    }

    pub fn set_ground_y(&mut self, ground_y: Option<f32>) {
        self.ground_y = ground_y;
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    pub fn set_hud(&mut self, hud: HudState) {
        self.hud = hud;
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn render(&mut self, world: &SceneWorld);
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

/// Owns the single running scene and its world.
pub(crate) struct SceneHost {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneHost {
    pub(crate) fn new(scene: Box<dyn Scene>, camera: Camera2D) -> Self {
        let mut world = SceneWorld::default();
        *world.camera_mut() = camera;
        Self {
            scene,
            world,
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.world.apply_pending();
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        let command = self.scene.update(fixed_dt_seconds, input, &mut self.world);
        self.world.apply_pending();
        command
    }

    pub(crate) fn render(&mut self) {
        self.scene.render(&self.world);
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }

    /// Unloads, wipes the world and loads again. The camera survives.
    pub(crate) fn restart(&mut self) {
        let camera = *self.world.camera();
        if self.is_loaded {
            self.scene.unload(&mut self.world);
        }
        self.world.clear();
        *self.world.camera_mut() = camera;
        self.is_loaded = false;
        self.load();
    }

    pub(crate) fn shutdown(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.world);
            self.world.clear();
            self.is_loaded = false;
        }
    }
}
