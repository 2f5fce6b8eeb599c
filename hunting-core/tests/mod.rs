use hunting_core::box_search::BoxSearch;
use hunting_core::entity::{
    Entity, Kind, ShotOutcome, Species, State, StepContext, shooting_ranges,
};
use hunting_core::scene::{self, Color, Fill, MAX_GRID_LINES, Shape};
use hunting_core::settings::{
    GameSettings, MAX_NEIGHBOUR_RADIUS, MIN_GRID_SPACING, SettingsError, ShootingRange,
};
use hunting_core::steering::compute_steering_force;
use hunting_core::world::{StepOutcome, World, WorldInfo};
use hunting_core::{Controls, Game, HuntingGame, Vec2, Viewport};

use rand::SeedableRng;
use rand::rngs::StdRng;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn big_world_info() -> WorldInfo {
    WorldInfo::from_screen(1450.0, 900.0, 4.0)
}

/// A world with only the entities a test spawns.
fn empty_world(settings: &GameSettings) -> World {
    World::empty(big_world_info(), settings, StdRng::seed_from_u64(7))
}

fn step_context<'a>(
    info: &'a WorldInfo,
    settings: &'a GameSettings,
    rng: &'a mut StdRng,
    dt: f32,
) -> StepContext<'a> {
    StepContext {
        dt,
        info,
        settings,
        rng,
    }
}

fn wolf_hunger(world: &World, id: u32) -> f32 {
    match world.get(id).unwrap().kind() {
        Kind::Wolf(wolf) => wolf.time_without_meal_left(),
        other => panic!("Expected a wolf, got {:?}", other),
    }
}

fn grid_lines(scene: &scene::Scene) -> Vec<(Vec2, Vec2)> {
    scene
        .shapes
        .iter()
        .filter_map(|s| match s {
            Shape::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Steering Tests
// ============================================================================

#[test]
fn test_steering_from_rest_points_at_target() {
    let force = compute_steering_force(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::ZERO, 100.0, 1000.0);
    assert!(approx(force.x, 100.0));
    assert!(approx(force.y, 0.0));
}

#[test]
fn test_steering_is_capped() {
    let force = compute_steering_force(Vec2::ZERO, Vec2::new(0.0, 10.0), Vec2::ZERO, 100.0, 5.0);
    assert!(approx(force.length(), 5.0));
    assert!(force.y > 0.0);
}

#[test]
fn test_steering_at_target_only_brakes() {
    let force = compute_steering_force(
        Vec2::new(5.0, 5.0),
        Vec2::new(5.0, 5.0),
        Vec2::new(3.0, 0.0),
        100.0,
        100.0,
    );
    assert_eq!(force, Vec2::new(-3.0, 0.0));
}

#[test]
fn test_steering_cancels_velocity_at_target_speed() {
    let velocity = Vec2::new(50.0, 0.0);
    let force = compute_steering_force(Vec2::ZERO, Vec2::new(10.0, 0.0), velocity, 50.0, 100.0);
    assert!(approx(force.length(), 0.0));
}

// ============================================================================
// BoxSearch Tests
// ============================================================================

#[test]
fn test_box_search_excludes_self() {
    let mut search = BoxSearch::new(10, 50, 50);
    search.update_point(1, 10.0, 10.0);
    search.update_point(2, 20.0, 20.0);

    let ids: Vec<u32> = search.neighbours(1, 1).iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn test_box_search_unknown_id_has_no_neighbours() {
    let mut search = BoxSearch::new(10, 50, 50);
    search.update_point(1, 10.0, 10.0);
    assert!(search.neighbours(99, 3).is_empty());
}

#[test]
fn test_box_search_radius_limits_results() {
    let mut search = BoxSearch::new(20, 50, 50);
    search.update_point(1, 10.0, 10.0);
    search.update_point(2, 60.0, 10.0); // next chunk
    search.update_point(3, 310.0, 10.0); // six chunks away

    let near: Vec<u32> = search.neighbours(1, 1).iter().map(|p| p.id).collect();
    assert_eq!(near, vec![2]);

    let mut far: Vec<u32> = search.neighbours(1, 6).iter().map(|p| p.id).collect();
    far.sort();
    assert_eq!(far, vec![2, 3]);
}

#[test]
fn test_box_search_moves_between_chunks() {
    let mut search = BoxSearch::new(20, 50, 50);
    search.update_point(1, 10.0, 10.0);
    search.update_point(2, 500.0, 500.0);
    assert!(search.neighbours(1, 1).is_empty());

    search.update_point(2, 30.0, 30.0);
    let found = search.neighbours(1, 1);
    assert_eq!(found.len(), 1);
    assert_eq!((found[0].x, found[0].y), (30, 30));
    assert_eq!(search.len(), 2);
}

#[test]
fn test_box_search_remove_point() {
    let mut search = BoxSearch::new(10, 50, 50);
    search.update_point(1, 10.0, 10.0);
    search.update_point(2, 20.0, 20.0);
    search.remove_point(2);

    assert!(!search.contains(2));
    assert!(search.neighbours(1, 1).is_empty());
    assert_eq!(search.len(), 1);
}

#[test]
fn test_box_search_left_edge_does_not_wrap_to_previous_row() {
    // 10 chunks per row; the point at the far right of row 0 must not show
    // up as a left neighbour of a point at the start of row 1.
    let mut search = BoxSearch::new(10, 50, 50);
    search.update_point(1, 5.0, 60.0);
    search.update_point(2, 495.0, 10.0);

    assert!(search.neighbours(1, 1).is_empty());
}

// ============================================================================
// Settings Tests
// ============================================================================

#[test]
fn test_default_settings_are_valid() {
    let settings = GameSettings::default();
    assert!(settings.validate().is_ok());
    assert!(approx(settings.world_scale, 4.0));
    assert!(approx(settings.camera_scale, 1.5));
    assert_eq!(settings.population.rabbits, 20);
    assert_eq!(settings.population.wolves, 10);
    assert_eq!(settings.population.deer, 100);
    assert!(approx(settings.hunter.physics.friction_k, 0.65));
    assert_eq!(settings.hunter_behaviour.ammunition, 20);
    assert!(approx(settings.max_shooting_distance(), 360.0));
}

#[test]
fn test_settings_partial_json_keeps_defaults() {
    let raw = r#"{ "population": { "wolves": 3 }, "world_speed": 2.0 }"#;
    let settings = GameSettings::from_json(raw).unwrap();
    assert_eq!(settings.population.wolves, 3);
    assert_eq!(settings.population.rabbits, 20);
    assert!(approx(settings.world_speed, 2.0));
    assert!(approx(settings.deer.physics.mass, 10.0));
}

#[test]
fn test_settings_reject_empty_shooting_ranges() {
    let raw = r#"{ "hunter_behaviour": { "shooting_ranges": [] } }"#;
    let err = GameSettings::from_json(raw).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
}

#[test]
fn test_settings_reject_unsorted_shooting_ranges() {
    let mut settings = GameSettings::default();
    settings.hunter_behaviour.shooting_ranges = vec![
        ShootingRange::new(300.0, 0.5),
        ShootingRange::new(100.0, 1.0),
    ];
    assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
}

#[test]
fn test_settings_reject_bad_probability() {
    let mut settings = GameSettings::default();
    settings.hunter_behaviour.shooting_ranges = vec![ShootingRange::new(100.0, 1.5)];
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("1.5"));
}

#[test]
fn test_settings_reject_non_positive_mass() {
    let mut settings = GameSettings::default();
    settings.wolf.physics.mass = 0.0;
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("wolf.physics.mass"));
}

#[test]
fn test_settings_reject_tiny_grid_spacing() {
    let err = GameSettings::from_json(r#"{ "grid_spacing": 0.000001 }"#).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
    assert!(err.to_string().contains("grid_spacing"));

    let mut settings = GameSettings::default();
    settings.grid_spacing = MIN_GRID_SPACING;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_reject_huge_neighbour_radius() {
    let mut settings = GameSettings::default();
    settings.neighbour_radius = u32::MAX;
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("neighbour_radius"));

    settings.neighbour_radius = MAX_NEIGHBOUR_RADIUS;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_parse_error() {
    let err = GameSettings::from_json("{ not json").unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
}

#[test]
fn test_settings_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "grid_spacing": 100.0 }"#).unwrap();

    let settings = GameSettings::load(&path).unwrap();
    assert!(approx(settings.grid_spacing, 100.0));
}

#[test]
fn test_settings_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameSettings::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, SettingsError::Io(_)));
}

#[test]
fn test_settings_serialization_roundtrip_preserves_defaults() {
    let json = serde_json::to_string(&GameSettings::default()).unwrap();
    let back = GameSettings::from_json(&json).unwrap();
    assert_eq!(back, GameSettings::default());
}

// ============================================================================
// WorldInfo Tests
// ============================================================================

#[test]
fn test_world_info_from_screen() {
    let info = big_world_info();
    assert!(approx(info.width, 5800.0));
    assert!(approx(info.height, 3600.0));
    assert!(approx(info.screen_width, 1450.0));
    assert_eq!(info.center(), Vec2::new(2900.0, 1800.0));
}

#[test]
fn test_world_info_adjust_bounds() {
    let info = WorldInfo::new(100.0, 50.0, 10.0, 10.0);
    assert_eq!(info.adjust_bounds(Vec2::new(-5.0, 70.0)), Vec2::new(0.0, 50.0));
    assert_eq!(info.adjust_bounds(Vec2::new(20.0, 20.0)), Vec2::new(20.0, 20.0));
}

#[test]
fn test_world_info_check_position_margin() {
    let info = WorldInfo::new(100.0, 100.0, 10.0, 10.0);
    assert!(info.check_position(Vec2::new(0.0, 100.0), 0.0));
    assert!(!info.check_position(Vec2::new(5.0, 50.0), 10.0));
    assert!(info.check_position(Vec2::new(10.0, 90.0), 10.0));
    assert!(!info.check_position(Vec2::new(50.0, 101.0), 0.0));
}

// ============================================================================
// World Tests
// ============================================================================

#[test]
fn test_world_new_populates_everything() {
    let settings = GameSettings::default();
    let world = World::with_seed(big_world_info(), &settings, 1);

    assert_eq!(world.count(Species::Hunter), 1);
    assert_eq!(world.count(Species::Rabbit), 20);
    assert_eq!(world.count(Species::Wolf), 10);
    assert_eq!(world.count(Species::Deer), 100);
    assert_eq!(world.hunter().unwrap().position(), world.info().center());

    let info = *world.info();
    for entity in world.entities() {
        assert!(info.check_position(entity.position(), entity.radius()));
    }
}

#[test]
fn test_world_without_hunter_asks_for_restart() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Rabbit, Vec2::new(100.0, 100.0));
    assert_eq!(world.step(0.016), StepOutcome::Restart);
}

#[test]
fn test_world_populated_steps_keep_everyone_inside() {
    let settings = GameSettings::default();
    let mut world = World::with_seed(big_world_info(), &settings, 42);

    for _ in 0..120 {
        if world.step(1.0 / 60.0) == StepOutcome::Restart {
            break;
        }
    }

    let info = *world.info();
    for entity in world.entities() {
        assert!(entity.position().is_finite());
        assert!(info.check_position(entity.position(), 0.0));
    }
}

#[test]
fn test_move_hunter_applies_force_and_friction() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));

    let position = world
        .move_hunter(Vec2::new(100.0, 0.0), 1.0, Vec2::new(2000.0, 1000.0))
        .unwrap();

    // 100 / mass 8 = 12.5, minus friction 8 * 0.65 = 5.2
    let velocity = world.hunter().unwrap().velocity();
    assert!(approx(velocity.x, 7.3));
    assert!(approx(position.x, 1007.3));
    assert!(approx(position.y, 1000.0));

    let aim = world.hunter().unwrap().hunter().unwrap().aim();
    assert!(approx(aim.x, 1.0));
}

#[test]
fn test_move_hunter_without_hunter() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    assert!(world.move_hunter(Vec2::new(1.0, 0.0), 1.0, Vec2::ZERO).is_none());
    assert_eq!(world.hunter_shoot(), ShotOutcome::NoHunter);
}

#[test]
fn test_translate_mouse_position_centres_on_hunter() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 500.0));

    // Screen centre maps onto the hunter.
    let centre = world.translate_mouse_position(400.0, 300.0, 800.0, 600.0);
    assert_eq!(centre, Vec2::new(1000.0, 500.0));

    // Top-left corner of the screen is up-left of the hunter.
    let corner = world.translate_mouse_position(0.0, 0.0, 800.0, 600.0);
    assert_eq!(corner, Vec2::new(600.0, 800.0));
}

#[test]
fn test_hunter_reload_gates_shots() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));

    assert_eq!(world.hunter_shoot(), ShotOutcome::Fired);
    assert_eq!(world.hunter_shoot(), ShotOutcome::Reloading);

    world.step(2.5);
    assert_eq!(world.hunter_shoot(), ShotOutcome::Fired);
    assert_eq!(world.hunter().unwrap().hunter().unwrap().ammunition(), 18);
}

#[test]
fn test_hunter_runs_out_of_ammo() {
    let mut settings = GameSettings::default();
    settings.hunter_behaviour.ammunition = 1;
    settings.hunter_behaviour.reload = 0.0;
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));

    assert_eq!(world.hunter_shoot(), ShotOutcome::Fired);
    assert_eq!(world.hunter_shoot(), ShotOutcome::OutOfAmmo);
}

#[test]
fn test_bullet_kills_rabbit_at_close_range() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));
    world.spawn(Species::Rabbit, Vec2::new(1050.0, 1000.0));

    world.move_hunter(Vec2::ZERO, 0.0, Vec2::new(1100.0, 1000.0));
    assert_eq!(world.hunter_shoot(), ShotOutcome::Fired);

    for _ in 0..8 {
        world.step(0.001);
    }

    assert_eq!(world.count(Species::Rabbit), 0);
    assert!(world.hunter().unwrap().hunter().unwrap().bullets().is_empty());
}

#[test]
fn test_bullet_expires_after_last_range() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));

    world.move_hunter(Vec2::ZERO, 0.0, Vec2::new(1000.0, 2000.0));
    world.hunter_shoot();
    assert_eq!(world.hunter().unwrap().hunter().unwrap().bullets().len(), 1);

    // 360 units at 10 per step
    for _ in 0..40 {
        world.step(0.001);
    }
    assert!(world.hunter().unwrap().hunter().unwrap().bullets().is_empty());
}

#[test]
fn test_passing_bullet_scares_then_deer_runs() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));
    let deer = world.spawn(Species::Deer, Vec2::new(1300.0, 1000.0));

    world.move_hunter(Vec2::ZERO, 0.0, Vec2::new(1000.0, 2000.0));
    world.hunter_shoot();

    world.step(0.001);
    assert!(world.get(deer).unwrap().is_scared());

    world.step(0.6);
    world.step(0.6);

    let deer = world.get(deer).unwrap();
    assert!(!deer.is_scared());
    match deer.state() {
        State::Run { heading, .. } => {
            assert!(heading.x > 0.0, "deer should run away from the hunter")
        }
        other => panic!("Expected Run state, got {:?}", other),
    }
}

#[test]
fn test_bullet_scares_only_within_scare_radius() {
    let mut settings = GameSettings::default();
    // Reach past the 1000 unit scare radius.
    settings.neighbour_radius = 30;
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));
    let near = world.spawn(Species::Rabbit, Vec2::new(1990.0, 1000.0));
    let far = world.spawn(Species::Rabbit, Vec2::new(2020.0, 1000.0));

    world.move_hunter(Vec2::ZERO, 0.0, Vec2::new(1000.0, 2000.0));
    world.hunter_shoot();
    world.step(0.001);

    // The bullet sits at (1000, 1010): 990.05 from one rabbit, 1020.05 from the other.
    assert!(world.get(near).unwrap().is_scared());
    assert!(!world.get(far).unwrap().is_scared());
}

#[test]
fn test_wolf_eats_rabbit_in_contact() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    let wolf = world.spawn(Species::Wolf, Vec2::new(2000.0, 2000.0));
    world.spawn(Species::Rabbit, Vec2::new(2005.0, 2000.0));

    assert_eq!(world.step(0.016), StepOutcome::Continue);

    assert_eq!(world.count(Species::Rabbit), 0);
    let wolf = world.get(wolf).unwrap();
    assert!(matches!(wolf.state(), State::Eat { .. }));
    assert_eq!(wolf.velocity(), Vec2::ZERO);
}

#[test]
fn test_wolf_finishes_meal_and_idles() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    let wolf = world.spawn(Species::Wolf, Vec2::new(2000.0, 2000.0));
    world.spawn(Species::Rabbit, Vec2::new(2005.0, 2000.0));

    world.step(0.016);
    assert!(wolf_hunger(&world, wolf) < settings.wolf_behaviour.life_time_without_meal);

    world.step(settings.wolf_behaviour.eat_duration + 1.0);

    assert!(matches!(world.get(wolf).unwrap().state(), State::Idle { .. }));
    assert_eq!(
        wolf_hunger(&world, wolf),
        settings.wolf_behaviour.life_time_without_meal
    );
}

#[test]
fn test_wolf_chases_visible_prey() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    let wolf = world.spawn(Species::Wolf, Vec2::new(2000.0, 2000.0));
    world.spawn(Species::Deer, Vec2::new(2150.0, 2000.0));

    world.step(0.016);

    let wolf = world.get(wolf).unwrap();
    assert!(wolf.is_running());
    assert!(wolf.velocity().x > 0.0);
}

#[test]
fn test_wolf_starves() {
    let mut settings = GameSettings::default();
    settings.wolf_behaviour.life_time_without_meal = 0.5;
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    let wolf = world.spawn(Species::Wolf, Vec2::new(2000.0, 2000.0));

    world.step(0.25);
    assert_eq!(wolf_hunger(&world, wolf), 0.25);

    world.step(1.0);
    assert_eq!(world.count(Species::Wolf), 0);
}

#[test]
fn test_wolf_kills_hunter_then_restart() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));
    world.spawn(Species::Wolf, Vec2::new(1005.0, 1000.0));

    assert_eq!(world.step(0.016), StepOutcome::Continue);
    assert!(world.hunter().is_none());
    assert_eq!(world.step(0.016), StepOutcome::Restart);
}

#[test]
fn test_rabbit_flees_from_anything() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    let rabbit = world.spawn(Species::Rabbit, Vec2::new(2000.0, 2000.0));
    world.spawn(Species::Deer, Vec2::new(2100.0, 2000.0));

    world.step(0.016);

    let rabbit = world.get(rabbit).unwrap();
    assert!(rabbit.is_running());
    assert!(rabbit.velocity().x < 0.0);
}

#[test]
fn test_deer_flees_from_wolf() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    let deer = world.spawn(Species::Deer, Vec2::new(2000.0, 2000.0));
    world.spawn(Species::Wolf, Vec2::new(2000.0, 2150.0));

    world.step(0.016);

    let deer = world.get(deer).unwrap();
    assert!(deer.is_running());
    assert!(deer.velocity().y < 0.0);
}

#[test]
fn test_lonely_deer_walks_to_herd() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    let deer = world.spawn(Species::Deer, Vec2::new(2000.0, 2000.0));
    world.spawn(Species::Deer, Vec2::new(2150.0, 2000.0));

    world.step(0.016);

    let deer = world.get(deer).unwrap();
    assert!(deer.velocity().x > 0.0);
    assert!(deer.velocity().length() <= settings.deer.physics.max_speed);
}

#[test]
fn test_deer_copies_herd_target() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    let leader = world.spawn(Species::Deer, Vec2::new(2000.0, 2000.0));
    let follower = world.spawn(Species::Deer, Vec2::new(2030.0, 2000.0));

    world.step(0.016);

    assert!(matches!(
        world.get(leader).unwrap().state(),
        State::Idle { to: Some(_), copy: false }
    ));
    assert!(matches!(
        world.get(follower).unwrap().state(),
        State::Idle { to: Some(_), copy: true }
    ));
}

#[test]
fn test_dead_entities_are_removed() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));
    world.spawn(Species::Wolf, Vec2::new(2000.0, 2000.0));
    world.spawn(Species::Rabbit, Vec2::new(2004.0, 2000.0));
    assert_eq!(world.len(), 3);

    world.step(0.016);
    assert_eq!(world.len(), 2);
}

// ============================================================================
// Entity Movement Tests
// ============================================================================

#[test]
fn test_walls_force_grows_toward_each_wall() {
    let settings = GameSettings::default();
    let info = big_world_info();
    let push = |x, y| {
        Entity::new(0, Species::Rabbit, Vec2::new(x, y), &settings)
            .walls_force(&info, &settings.walls)
    };

    assert_eq!(push(2900.0, 1800.0), Vec2::ZERO);
    assert_eq!(push(60.0, 60.0), Vec2::ZERO);
    // (60 - 30) / 60 * 50
    assert_eq!(push(30.0, 1800.0), Vec2::new(25.0, 0.0));
    assert_eq!(push(0.0, 1800.0), Vec2::new(50.0, 0.0));
    assert_eq!(push(2900.0, 0.0), Vec2::new(0.0, 50.0));
    // 45 units past the trigger line on both axes
    assert_eq!(push(5785.0, 3585.0), Vec2::new(-37.5, -37.5));
}

#[test]
fn test_walls_force_disabled_without_trigger() {
    let mut settings = GameSettings::default();
    settings.walls.trigger_distance = 0.0;
    let rabbit = Entity::new(0, Species::Rabbit, Vec2::new(0.0, 0.0), &settings);
    assert_eq!(rabbit.walls_force(&big_world_info(), &settings.walls), Vec2::ZERO);
}

#[test]
fn test_shooting_ranges_shrink_with_speed() {
    let settings = GameSettings::default();
    let behaviour = &settings.hunter_behaviour;
    let max_speed = settings.hunter.physics.max_speed;

    assert_eq!(
        shooting_ranges(Vec2::ZERO, max_speed, behaviour),
        behaviour.shooting_ranges
    );

    // Half speed shrinks every range by 60 / 2.
    let half = shooting_ranges(Vec2::new(0.0, 40.0), max_speed, behaviour);
    let distances: Vec<f32> = half.iter().map(|r| r.distance).collect();
    assert_eq!(distances, vec![170.0, 180.0, 195.0, 240.0, 330.0]);
    assert_eq!(half[1].probability, 0.8);

    let full = shooting_ranges(Vec2::new(80.0, 0.0), max_speed, behaviour);
    assert_eq!(full[0].distance, 140.0);
}

#[test]
fn test_scene_rings_follow_hunter_speed() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(1000.0, 1000.0));
    world.move_hunter(Vec2::new(100.0, 0.0), 1.0, Vec2::new(2000.0, 1000.0));

    let scene = scene::compose(&world, scene::Camera::new(100.0, 100.0));
    let radii: Vec<f32> = scene
        .shapes
        .iter()
        .filter_map(|s| match s {
            Shape::Circle { radius, fill: Fill::Outline, .. } => Some(*radius),
            _ => None,
        })
        .collect();

    // Speed 7.3 of 80 shrinks each ring by 60 * 7.3 / 80.
    assert_eq!(radii.len(), 5);
    assert!(approx(radii[0], 200.0 - 5.475));
    assert!(approx(radii[4], 360.0 - 5.475));
}

#[test]
fn test_run_fades_then_returns_to_idle() {
    let settings = GameSettings::default();
    let info = big_world_info();

    for species in [Species::Rabbit, Species::Deer] {
        let mut rng = StdRng::seed_from_u64(1);
        let mut animal = Entity::new(0, species, Vec2::new(2900.0, 1800.0), &settings);
        let duration = match species {
            Species::Rabbit => settings.rabbit.run_duration,
            _ => settings.deer.run_duration,
        };
        let away = Vec2::new(-1.0, 0.0);
        let first = duration / 5.0;
        let rest = duration - first;

        let mut ctx = step_context(&info, &settings, &mut rng, first);
        animal.run_from_danger(&[Vec2::new(2910.0, 1800.0)], &ctx);
        assert_eq!(
            animal.state(),
            State::Run {
                countdown: duration,
                heading: away
            }
        );
        assert_eq!(animal.run_heading(), away);

        animal.ask_to_move(&[], &mut ctx);
        assert_eq!(
            animal.state(),
            State::Run {
                countdown: rest,
                heading: away
            }
        );
        assert!(approx(animal.run_heading().x, -0.8));
        assert!(approx(animal.run_heading().y, 0.0));

        ctx.dt = rest;
        animal.ask_to_move(&[], &mut ctx);
        assert_eq!(
            animal.state(),
            State::Run {
                countdown: 0.0,
                heading: away
            }
        );
        assert_eq!(animal.run_heading(), Vec2::ZERO);

        animal.ask_to_move(&[], &mut ctx);
        assert!(
            matches!(animal.state(), State::Idle { to: Some(_), copy: false }),
            "{:?} should idle once the run is over",
            species
        );
    }
}

#[test]
fn test_idle_point_falls_back_to_world_centre() {
    let settings = GameSettings::default();
    // A deer keeps 10 * 10 units from every wall, more than this world has room for.
    let info = WorldInfo::new(100.0, 100.0, 100.0, 100.0);
    let mut rng = StdRng::seed_from_u64(5);
    let mut ctx = step_context(&info, &settings, &mut rng, 0.016);

    let mut deer = Entity::new(0, Species::Deer, Vec2::new(0.0, 0.0), &settings);
    assert_eq!(deer.choose_idle_point(&mut ctx), Vec2::new(50.0, 50.0));

    deer.ask_to_move(&[], &mut ctx);
    assert_eq!(
        deer.state(),
        State::Idle {
            to: Some(Vec2::new(50.0, 50.0)),
            copy: false
        }
    );
    assert!(deer.is_alive());
}

// ============================================================================
// Scene Tests
// ============================================================================

#[test]
fn test_gun_outline_points_up_without_aim() {
    let points = scene::gun_outline(Vec2::new(10.0, 10.0), Vec2::ZERO, 6.0, 25.0);
    assert_eq!(points.len(), 4);
    assert!(approx(points[0].x, 7.0));
    assert!(approx(points[2].y, 35.0));
}

#[test]
fn test_gun_outline_follows_aim() {
    let points = scene::gun_outline(Vec2::ZERO, Vec2::new(1.0, 0.0), 6.0, 25.0);
    let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
    assert!(approx(max_x, 25.0));
}

#[test]
fn test_scene_draws_background_first() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(100.0, 100.0));

    let scene = scene::compose(&world, scene::Camera::new(100.0, 100.0));
    match &scene.shapes[0] {
        Shape::Rect { size, color, fill, .. } => {
            assert_eq!(*size, Vec2::new(5800.0, 3600.0));
            assert_eq!(*color, Color::WHITE);
            assert_eq!(*fill, Fill::Outline);
        }
        other => panic!("Expected world border, got {:?}", other),
    }
    assert_eq!(scene.clear, Color::BLACK);
}

#[test]
fn test_scene_draws_hunter_body_and_reload_arc() {
    let settings = GameSettings::default();
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(500.0, 500.0));

    let scene = scene::compose(&world, scene::Camera::new(100.0, 100.0));
    assert!(scene.shapes.iter().any(|s| matches!(
        s,
        Shape::Circle { color, fill: Fill::Solid, .. } if *color == Color::SALMON
    )));
    assert!(scene.shapes.iter().any(|s| matches!(
        s,
        Shape::Arc { degrees, .. } if approx(*degrees, 360.0)
    )));
    let rings = scene
        .shapes
        .iter()
        .filter(|s| matches!(s, Shape::Circle { fill: Fill::Outline, .. }))
        .count();
    assert_eq!(rings, settings.hunter_behaviour.shooting_ranges.len());
}

#[test]
fn test_scene_debug_overlays() {
    let mut settings = GameSettings::default();
    settings.debug.vision_circle = true;
    let mut world = empty_world(&settings);
    world.spawn(Species::Hunter, Vec2::new(500.0, 500.0));
    world.spawn(Species::Rabbit, Vec2::new(3000.0, 3000.0));

    let scene = scene::compose(&world, scene::Camera::new(100.0, 100.0));
    assert!(scene.shapes.iter().any(|s| matches!(
        s,
        Shape::Circle { radius, fill: Fill::Outline, .. } if approx(*radius, 200.0)
    )));
}

#[test]
fn test_scene_grid_lines_every_spacing() {
    let settings = GameSettings::default();
    let world = empty_world(&settings);

    let scene = scene::compose(&world, scene::Camera::new(100.0, 100.0));
    let lines = grid_lines(&scene);

    // 5800 / 150 rounds up to 39 columns, 3600 / 150 is exactly 24 rows.
    assert_eq!(lines.len(), 39 + 24);
    assert_eq!(lines[0], (Vec2::ZERO, Vec2::new(0.0, 3600.0)));
    assert_eq!(lines[38], (Vec2::new(5700.0, 0.0), Vec2::new(5700.0, 3600.0)));
    assert_eq!(lines[39], (Vec2::ZERO, Vec2::new(5800.0, 0.0)));
}

#[test]
fn test_scene_grid_is_capped() {
    // Built directly, so validation never sees the spacing.
    let mut settings = GameSettings::default();
    settings.grid_spacing = 0.000001;
    let world = empty_world(&settings);

    let scene = scene::compose(&world, scene::Camera::new(100.0, 100.0));
    assert_eq!(grid_lines(&scene).len(), 2 * MAX_GRID_LINES);
}

// ============================================================================
// HuntingGame Tests
// ============================================================================

#[test]
fn test_game_renders_nothing_before_create() {
    let mut game = HuntingGame::with_seed(GameSettings::default(), 3);
    assert!(!game.is_created());
    let scene = game.render(0.016, &Controls::default());
    assert!(scene.shapes.is_empty());
}

#[test]
fn test_game_create_sizes_world_and_camera() {
    let mut game = HuntingGame::with_seed(GameSettings::default(), 3);
    game.create(Viewport::new(1450, 900));

    assert!(game.is_created());
    let info = *game.world().unwrap().info();
    assert!(approx(info.width, 5800.0));
    assert!(approx(info.height, 3600.0));

    let camera = game.camera();
    assert!(approx(camera.viewport_width, 2175.0));
    assert!(approx(camera.viewport_height, 1350.0));
}

#[test]
fn test_game_camera_follows_hunter() {
    let mut settings = GameSettings::default();
    settings.population.wolves = 0;
    let mut game = HuntingGame::with_seed(settings, 3);
    game.create(Viewport::new(1450, 900));

    let controls = Controls {
        horizontal: 1.0,
        pointer: Vec2::new(725.0, 450.0),
        ..Controls::default()
    };
    let scene = game.render(0.1, &controls);

    let hunter = game.world().unwrap().hunter().unwrap().position();
    assert!(hunter.x > 2900.0);
    assert_eq!(scene.camera.position, hunter);
    assert!(!scene.shapes.is_empty());
}

#[test]
fn test_game_restarts_when_out_of_ammo() {
    let mut settings = GameSettings::default();
    settings.hunter_behaviour.ammunition = 0;
    let mut game = HuntingGame::with_seed(settings, 3);
    game.create(Viewport::new(800, 600));

    let controls = Controls {
        shooting: true,
        ..Controls::default()
    };
    game.render(0.016, &controls);
    assert_eq!(game.restarts(), 1);
}

#[test]
fn test_game_restarts_when_hunter_dies() {
    let mut settings = GameSettings::default();
    settings.population = hunting_core::settings::Population {
        rabbits: 0,
        wolves: 0,
        deer: 0,
    };
    let mut game = HuntingGame::with_seed(settings, 3);
    game.create(Viewport::new(800, 600));

    let world = game.world_mut().unwrap();
    let hunter = world.hunter().unwrap().position();
    world.spawn(Species::Wolf, hunter + Vec2::new(3.0, 0.0));

    game.render(0.016, &Controls::default());
    assert_eq!(game.restarts(), 0);
    game.render(0.016, &Controls::default());
    assert_eq!(game.restarts(), 1);
    assert!(game.world().unwrap().hunter().is_some());
}

#[test]
fn test_game_resize_keeps_world() {
    let mut game = HuntingGame::with_seed(GameSettings::default(), 3);
    game.create(Viewport::new(800, 600));
    game.resize(Viewport::new(1000, 1000));

    assert!(approx(game.world().unwrap().info().width, 3200.0));
    assert!(approx(game.camera().viewport_width, 1500.0));
}

#[test]
fn test_viewport_never_zero() {
    assert_eq!(Viewport::new(0, 0), Viewport { width: 1, height: 1 });
}
