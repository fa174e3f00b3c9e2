    use super::*;
    use engine::playback::{CommandToken, ScriptedSequencer};

    const DT: f32 = 1.0 / 60.0;

    fn level_with(player_x: f32, adversary_x: f32) -> LevelDef {
        let mut level = LevelDef::default();
        level.player.position = Vec2::new(player_x, level.floor_y + ACTOR_HALF_EXTENT);
        level.adversary.position = Vec2::new(adversary_x, level.floor_y + ACTOR_HALF_EXTENT);
        level
    }

    fn loaded(level: LevelDef) -> (PuzzleScene, SceneWorld) {
        let mut scene = PuzzleScene::new(level);
        let mut world = SceneWorld::default();
        scene.load(&mut world);
        world.apply_pending();
        (scene, world)
    }

    fn press(scene: &mut PuzzleScene, world: &mut SceneWorld, action: InputAction) -> SceneCommand {
        let command = scene.update(
            DT,
            &InputSnapshot::empty().with_action_pressed(action),
            world,
        );
        world.apply_pending();
        command
    }

    fn run_ticks(scene: &mut PuzzleScene, world: &mut SceneWorld, ticks: usize) {
        for _ in 0..ticks {
            scene.update(DT, &InputSnapshot::empty(), world);
            world.apply_pending();
        }
    }

    fn entity_x(world: &SceneWorld, entity: Option<EntityId>) -> f32 {
        world
            .find_entity(entity.expect("entity id"))
            .expect("entity")
            .position
            .x
    }

    fn move_distance_for(world: &SceneWorld) -> f32 {
        engine::playback::move_distance(world.camera())
    }

    #[test]
    fn pair_mut_returns_disjoint_bodies() {
        let mut physics = PhysicsWorld::default();
        let a = physics.add(RigidBody::resting_on_floor(0.0, 0.0, 0.5, -1.0));
        let b = physics.add(RigidBody::resting_on_floor(3.0, 0.0, 0.5, -1.0));

        let (first, second) = physics.pair_mut(b, a).expect("pair");
        assert_eq!(first.position.x, 3.0);
        assert_eq!(second.position.x, 0.0);
        assert!(physics.pair_mut(a, a).is_none());
        assert!(physics.pair_mut(a, BodyHandle(7)).is_none());
    }

    #[test]
    fn jump_impulse_leaves_and_returns_to_floor() {
        let mut body = RigidBody::resting_on_floor(0.0, -10.0, 0.5, -3.0);
        assert_eq!(body.position.y, -2.5);
        assert!(body.is_grounded());

        body.apply_impulse(Vec2::new(2.0, 5.0));
        assert!(!body.is_grounded());
        body.step(DT);
        assert!(body.position.y > -2.5);

        for _ in 0..120 {
            body.step(DT);
        }
        assert!(body.is_grounded());
        assert_eq!(body.position.y, -2.5);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert!(body.position.x > 1.9 && body.position.x < 2.2, "x={}", body.position.x);
    }

    #[test]
    fn judge_prefers_leaving_the_view() {
        let camera = Camera2D::default();
        let far = RigidBody::resting_on_floor(-6.0, 0.0, 0.5, -3.0);
        let mut player = RigidBody::resting_on_floor(0.0, 0.0, 0.5, -3.0);
        assert_eq!(judge_outcome(&player, &far, &camera), None);

        player.position.x = camera.right_edge() + 0.01;
        assert_eq!(
            judge_outcome(&player, &far, &camera),
            Some(MatchOutcome::PlayerWins)
        );

        player.position.x = -5.2;
        assert_eq!(
            judge_outcome(&player, &far, &camera),
            Some(MatchOutcome::AdversaryWins)
        );
    }

    #[test]
    fn load_spawns_both_actors_and_hud() {
        let (scene, world) = loaded(LevelDef::default());

        assert_eq!(world.entity_count(), 2);
        assert_eq!(world.ground_y(), Some(-3.0));
        assert_eq!(world.hud().plan_capacity, Some(3));
        assert!(world.hud().planned.is_empty());
        let title = scene.debug_title(&world).expect("title");
        assert!(title.contains("Sandbox"));
        assert!(title.contains("Plan 0/3: (empty)"));
        assert!(title.contains("Planning"));
    }

    #[test]
    fn planned_inputs_show_in_hud_and_respect_cap() {
        let (mut scene, mut world) = loaded(LevelDef::default());
        for _ in 0..4 {
            press(&mut scene, &mut world, InputAction::MoveRight);
        }
        assert_eq!(world.hud().planned.len(), 3);

        press(&mut scene, &mut world, InputAction::Undo);
        assert_eq!(
            world.hud().planned,
            vec![CommandToken::MoveRight, CommandToken::MoveRight]
        );

        press(&mut scene, &mut world, InputAction::ClearPlan);
        assert!(world.hud().planned.is_empty());
    }

    #[test]
    fn played_move_shifts_player_one_step() {
        let mut level = level_with(-6.0, 4.0);
        level.script = ScriptedSequencer::empty();
        let (mut scene, mut world) = loaded(level);
        let start = entity_x(&world, scene.player_entity);

        press(&mut scene, &mut world, InputAction::MoveLeft);
        press(&mut scene, &mut world, InputAction::Play);
        assert_eq!(scene.director.phase(), TurnPhase::PlayerPlayback);
        assert_eq!(world.hud().playing, vec![CommandToken::MoveLeft]);

        run_ticks(&mut scene, &mut world, 120);
        let moved = start - entity_x(&world, scene.player_entity);
        assert!((moved - move_distance_for(&world)).abs() < 0.001, "moved={moved}");
        assert_eq!(scene.director.phase(), TurnPhase::Planning);
        assert_eq!(scene.director.turn(), 1);
        assert!(world.hud().playing.is_empty());
    }

    #[test]
    fn adversary_follows_its_script_after_player_turn() {
        let (mut scene, mut world) = loaded(level_with(-6.0, 4.0));
        let adversary_start = entity_x(&world, scene.adversary_entity);

        press(&mut scene, &mut world, InputAction::Wait);
        press(&mut scene, &mut world, InputAction::Play);
        run_ticks(&mut scene, &mut world, 600);

        let step = move_distance_for(&world);
        let adversary_now = entity_x(&world, scene.adversary_entity);
        assert!((adversary_start - 2.0 * step - adversary_now).abs() < 0.001);
        assert_eq!(scene.director.phase(), TurnPhase::Planning);
        assert_eq!(scene.director.outcome(), None);
    }

    #[test]
    fn walking_past_right_edge_wins() {
        let (mut scene, mut world) = loaded(level_with(7.5, -4.0));

        press(&mut scene, &mut world, InputAction::MoveRight);
        press(&mut scene, &mut world, InputAction::Play);
        run_ticks(&mut scene, &mut world, 120);

        assert_eq!(scene.director.outcome(), Some(MatchOutcome::PlayerWins));
        assert_eq!(world.hud().outcome, Some(MatchOutcome::PlayerWins));
        let title = scene.debug_title(&world).expect("title");
        assert!(title.ends_with("Player Wins!!"));
    }

    #[test]
    fn touching_adversary_loses_and_locks_input() {
        let (mut scene, mut world) = loaded(level_with(0.0, 1.5));

        press(&mut scene, &mut world, InputAction::MoveRight);
        press(&mut scene, &mut world, InputAction::Play);
        run_ticks(&mut scene, &mut world, 120);

        assert_eq!(scene.director.outcome(), Some(MatchOutcome::AdversaryWins));
        assert_eq!(scene.director.phase(), TurnPhase::Resolved);

        press(&mut scene, &mut world, InputAction::MoveLeft);
        assert!(world.hud().planned.is_empty());
        assert!(scene
            .debug_title(&world)
            .expect("title")
            .ends_with("Enemy Wins..."));
    }

    #[test]
    fn restart_key_requests_restart_and_reload_resets_match() {
        let (mut scene, mut world) = loaded(level_with(0.0, 1.5));
        press(&mut scene, &mut world, InputAction::MoveRight);
        press(&mut scene, &mut world, InputAction::Play);
        run_ticks(&mut scene, &mut world, 120);
        assert!(scene.director.outcome().is_some());

        assert_eq!(
            press(&mut scene, &mut world, InputAction::Restart),
            SceneCommand::Restart
        );

        scene.unload(&mut world);
        assert_eq!(world.entity_count(), 0);
        scene.load(&mut world);
        world.apply_pending();
        assert_eq!(world.entity_count(), 2);
        assert_eq!(scene.director.outcome(), None);
        assert_eq!(scene.director.phase(), TurnPhase::Planning);
        assert_eq!(entity_x(&world, scene.player_entity), 0.0);
    }
