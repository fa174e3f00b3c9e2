fn build_physics(level: &LevelDef) -> (PhysicsWorld, BodyHandle, BodyHandle) {
    let mut physics = PhysicsWorld::default();
    let spawn = |position: Vec2| {
        RigidBody::resting_on_floor(position.x, position.y, ACTOR_HALF_EXTENT, level.floor_y)
    };
    let player = physics.add(spawn(level.player.position));
    let adversary = physics.add(spawn(level.adversary.position));
    (physics, player, adversary)
}

struct PuzzleScene {
    level: LevelDef,
    director: TurnDirector,
    physics: PhysicsWorld,
    player_body: BodyHandle,
    adversary_body: BodyHandle,
    player_entity: Option<EntityId>,
    adversary_entity: Option<EntityId>,
    events: Vec<TurnEvent>,
    stalled_actor: Option<ActorRole>,
}

impl PuzzleScene {
    fn new(level: LevelDef) -> Self {
        let (physics, player_body, adversary_body) = build_physics(&level);
        Self {
            director: TurnDirector::new(level.turn_setup()),
            physics,
            player_body,
            adversary_body,
            player_entity: None,
            adversary_entity: None,
            events: Vec::new(),
            stalled_actor: None,
            level,
        }
    }

    fn reset_match(&mut self) {
        let (physics, player_body, adversary_body) = build_physics(&self.level);
        self.physics = physics;
        self.player_body = player_body;
        self.adversary_body = adversary_body;
        self.director = TurnDirector::new(self.level.turn_setup());
        self.events.clear();
        self.stalled_actor = None;
    }

    fn apply_planning_input(&mut self, input: &InputSnapshot) {
        for token in input.pressed_commands() {
            if !self.director.record_input(token) {
                debug!(command = token.as_token(), "plan_input_rejected");
            }
        }
        if input.pressed(InputAction::Undo) {
            self.director.undo_last();
        }
        if input.pressed(InputAction::ClearPlan) {
            self.director.clear_plan();
        }
        if input.pressed(InputAction::Play) {
            let outcome = self.director.trigger();
            if !outcome.started() {
                debug!(outcome = ?outcome, phase = ?self.director.phase(), "play_ignored");
            }
        }
    }

    fn step_match(&mut self, fixed_dt_seconds: f32, camera: &Camera2D) {
        let Some((player, adversary)) = self
            .physics
            .pair_mut(self.player_body, self.adversary_body)
        else {
            warn!("actor_bodies_missing");
            return;
        };
        self.director
            .tick(fixed_dt_seconds, player, adversary, camera, &mut self.events);
        self.physics.step(fixed_dt_seconds);

        if self.director.outcome().is_some() {
            return;
        }
        let Some((player, adversary)) = self
            .physics
            .pair_mut(self.player_body, self.adversary_body)
        else {
            return;
        };
        if let Some(outcome) = judge_outcome(player, adversary, camera) {
            self.director
                .resolve(outcome, player, adversary, &mut self.events);
        }
    }

    fn drain_events(&mut self) {
        for event in self.events.drain(..) {
            let (role, playback) = match event {
                TurnEvent::Player(playback) => (ActorRole::Player, playback),
                TurnEvent::Adversary(playback) => (ActorRole::Adversary, playback),
                TurnEvent::Resolved { outcome } => {
                    info!(banner = outcome.banner(), "match_banner");
                    self.stalled_actor = None;
                    continue;
                }
                TurnEvent::AdversaryTurnStarted { .. } | TurnEvent::TurnCompleted { .. } => {
                    continue
                }
            };
            match playback {
                PlaybackEvent::Stalled { .. } => self.stalled_actor = Some(role),
                _ if self.stalled_actor == Some(role) => self.stalled_actor = None,
                _ => {}
            }
        }
    }

    fn sync_world(&self, world: &mut SceneWorld) {
        let bodies = [
            (self.player_entity, self.player_body),
            (self.adversary_entity, self.adversary_body),
        ];
        for (entity, handle) in bodies {
            if let (Some(entity), Some(body)) = (entity, self.physics.get(handle)) {
                world.set_entity_position(entity, body.position);
            }
        }
        world.set_hud(self.hud());
    }

    fn hud(&self) -> HudState {
        let planner = self.director.planner();
        HudState {
            planned: planner.list().as_slice().to_vec(),
            plan_capacity: planner.max_inputs_per_turn(),
            playing: match self.director.phase() {
                TurnPhase::AdversaryPlayback => self.director.adversary().executor().pending_tokens(),
                _ => self.director.player().executor().pending_tokens(),
            },
            outcome: self.director.outcome(),
        }
    }

    fn status_text(&self) -> String {
        if let Some(outcome) = self.director.outcome() {
            return outcome.banner().to_string();
        }
        let status = match self.director.phase() {
            TurnPhase::Planning => "Planning",
            TurnPhase::PlayerPlayback => "Player moving",
            TurnPhase::AdversaryPlayback => "Enemy moving",
            TurnPhase::Resolved => "Resolved",
        };
        match self.stalled_actor {
            Some(role) => format!("{status} (waiting for {} to land)", role.as_token()),
            None => status.to_string(),
        }
    }
}

impl Scene for PuzzleScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.reset_match();
        world.camera_mut().orthographic_size = self.level.camera_size;
        world.set_ground_y(Some(self.level.floor_y));

        let spawn_actor = |world: &mut SceneWorld, role: ActorRole, position: Vec2| {
            world.spawn(
                position,
                ACTOR_HALF_EXTENT,
                RenderableDesc {
                    kind: RenderableKind::Actor(role),
                    debug_name: role.as_token(),
                },
            )
        };
        let player_position = self
            .physics
            .get(self.player_body)
            .map_or(self.level.player.position, |body| body.position);
        let adversary_position = self
            .physics
            .get(self.adversary_body)
            .map_or(self.level.adversary.position, |body| body.position);
        self.player_entity = Some(spawn_actor(world, ActorRole::Player, player_position));
        self.adversary_entity = Some(spawn_actor(world, ActorRole::Adversary, adversary_position));
        world.set_hud(self.hud());

        info!(
            level = self.level.name.as_str(),
            scripted_turns = self.level.script.scripted_turns(),
            "match_ready"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.pressed(InputAction::Restart) {
            return SceneCommand::Restart;
        }

        self.apply_planning_input(input);
        let camera = *world.camera();
        self.step_match(fixed_dt_seconds, &camera);
        self.drain_events();
        self.sync_world(world);
        SceneCommand::None
    }

    fn render(&mut self, _world: &SceneWorld) {}

    fn unload(&mut self, world: &mut SceneWorld) {
        world.clear();
        self.player_entity = None;
        self.adversary_entity = None;
        info!(level = self.level.name.as_str(), "match_unloaded");
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        Some(format!(
            "Stepwise | {} | Turn {} | {} | {}",
            self.level.name,
            self.director.turn() + 1,
            self.director.planner().summary(),
            self.status_text()
        ))
    }
}
