//! Headless breakout arena exercising the physics core
//!
//! Builds four walls, a brick grid and a ball, wires up collision bindings,
//! then runs a fixed number of ticks. No rendering, no input: progress is
//! reported through the logger. An optional JSON tuning file can override
//! the defaults:
//!
//! ```text
//! polyarena-demo [config.json]
//! ```

use std::error::Error;
use std::f64::consts::PI;
use std::{env, fs};

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Deserialize;

use polyarena::body::{Body, INFINITE_MASS, Rgb};
use polyarena::forces;
use polyarena::geometry::Polygon;
use polyarena::scene::{BodyId, Scene};

const WIDTH: f64 = 100.0;
const HEIGHT: f64 = 100.0;
const WALL_THICKNESS: f64 = 10.0;

const BALL_RADIUS: f64 = 2.0;
const BALL_SIDES: usize = 16;
const BALL_MASS: f64 = 5.0;
const BALL_SPEED: f64 = 100.0;

const BRICK_SPACING: f64 = 1.0;
const BRICK_HEIGHT: f64 = 9.0;

// Pendant: a light body tethered to an anchor, there to keep the spring and
// drag creators honest in a long-running scene.
const PENDANT_MASS: f64 = 1.0;
const PENDANT_SPRING_K: f64 = 4.0;
const PENDANT_DRAG: f64 = 0.8;

const BALL_COLOR: Rgb = Rgb::new(0.54, 0.87, 0.86);
const BRICK_COLOR: Rgb = Rgb::new(0.45, 0.33, 0.45);
const WALL_COLOR: Rgb = Rgb::new(0.1, 0.1, 0.1);
const PENDANT_COLOR: Rgb = Rgb::new(0.99, 0.32, 0.52);

/// Demo tuning, loadable from a JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DemoConfig {
    seed: u64,
    brick_rows: usize,
    brick_cols: usize,
    brick_health: u32,
    elasticity: f64,
    ticks: u64,
    dt: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            brick_rows: 3,
            brick_cols: 6,
            brick_health: 3,
            elasticity: 1.0,
            ticks: 12_000,
            dt: 1.0 / 120.0,
        }
    }
}

/// Brick state carried in the body's data slot.
struct Brick {
    health: u32,
    max_health: u32,
}

/// Add the four immovable arena walls.
fn add_walls(scene: &mut Scene, elasticity: f64, ball: BodyId) {
    let walls = [
        // (center, width, height)
        (DVec2::new(-WALL_THICKNESS / 2.0, HEIGHT / 2.0), WALL_THICKNESS, 3.0 * HEIGHT),
        (DVec2::new(WIDTH + WALL_THICKNESS / 2.0, HEIGHT / 2.0), WALL_THICKNESS, 3.0 * HEIGHT),
        (DVec2::new(WIDTH / 2.0, HEIGHT + WALL_THICKNESS / 2.0), 3.0 * WIDTH, WALL_THICKNESS),
        (DVec2::new(WIDTH / 2.0, -WALL_THICKNESS / 2.0), 3.0 * WIDTH, WALL_THICKNESS),
    ];
    for (center, w, h) in walls {
        let mut body = Body::new(Polygon::rectangle(w, h), INFINITE_MASS, WALL_COLOR);
        body.set_centroid(center);
        let id = scene.add_body(body);
        forces::physics_collision(scene, elasticity, ball, id);
    }
}

/// Lay out the brick grid along the top of the arena and bind each brick to
/// the ball: an elastic bounce plus a damage handler in one registration.
fn add_bricks(scene: &mut Scene, config: &DemoConfig, ball: BodyId) -> Vec<BodyId> {
    let total_width = WIDTH / config.brick_cols as f64;
    let brick_width = total_width - BRICK_SPACING;
    let mut bricks = Vec::new();

    for row in 0..config.brick_rows {
        for col in 0..config.brick_cols {
            let center = DVec2::new(
                total_width * (col as f64 + 0.5),
                HEIGHT - (BRICK_HEIGHT + BRICK_SPACING) * (row as f64 + 0.5),
            );
            let brick = Brick {
                health: config.brick_health,
                max_health: config.brick_health,
            };
            let mut body = Body::with_data(
                Polygon::rectangle(brick_width, BRICK_HEIGHT),
                INFINITE_MASS,
                BRICK_COLOR,
                brick,
            );
            body.set_centroid(center);
            let id = scene.add_body(body);

            forces::physics_collision(scene, config.elasticity, ball, id);
            forces::collision(scene, ball, id, |_ball, brick, _axis| {
                let state = brick.data_mut::<Brick>().expect("brick data");
                state.health -= 1;
                if state.health == 0 {
                    brick.remove();
                } else {
                    let dim = state.health as f32 / state.max_health as f32;
                    brick.set_color(BRICK_COLOR.scaled(dim.max(0.4)));
                }
            });
            bricks.push(id);
        }
    }
    bricks
}

/// Spawn the ball at the arena center, aimed upward at a seeded angle.
fn add_ball(scene: &mut Scene, rng: &mut Pcg32) -> BodyId {
    let mut body = Body::new(
        Polygon::regular(BALL_SIDES, BALL_RADIUS),
        BALL_MASS,
        BALL_COLOR,
    );
    body.set_centroid(DVec2::new(WIDTH / 2.0, HEIGHT / 4.0));
    let angle = PI / 2.0 + rng.random_range(-PI / 8.0..PI / 8.0);
    body.set_velocity(BALL_SPEED * DVec2::from_angle(angle));
    scene.add_body(body)
}

/// Tether a small pendant body to an immovable anchor with a damped spring.
fn add_pendant(scene: &mut Scene, rng: &mut Pcg32) {
    let mut anchor = Body::new(Polygon::regular(4, 1.0), INFINITE_MASS, WALL_COLOR);
    anchor.set_centroid(DVec2::new(WIDTH / 2.0, HEIGHT / 2.0));
    let anchor_id = scene.add_body(anchor);

    let mut pendant = Body::new(Polygon::regular(5, 1.5), PENDANT_MASS, PENDANT_COLOR);
    let offset = DVec2::new(rng.random_range(-20.0..20.0), rng.random_range(-20.0..20.0));
    pendant.set_centroid(DVec2::new(WIDTH / 2.0, HEIGHT / 2.0) + offset);
    let pendant_id = scene.add_body(pendant);

    forces::spring(scene, PENDANT_SPRING_K, pendant_id, anchor_id);
    forces::drag(scene, PENDANT_DRAG, pendant_id);
}

fn brick_count(scene: &Scene) -> usize {
    scene
        .bodies()
        .filter(|(_, body)| body.data::<Brick>().is_some())
        .count()
}

fn load_config() -> Result<DemoConfig, Box<dyn Error>> {
    match env::args().nth(1) {
        Some(path) => {
            let raw = fs::read_to_string(&path)?;
            let config = serde_json::from_str(&raw)?;
            log::info!("Loaded tuning from {path}");
            Ok(config)
        }
        None => Ok(DemoConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = load_config()?;
    log::info!("Arena starting with seed {}: {config:?}", config.seed);
    let mut rng = Pcg32::seed_from_u64(config.seed);

    let mut scene = Scene::new();
    let ball = add_ball(&mut scene, &mut rng);
    add_walls(&mut scene, config.elasticity, ball);
    let bricks = add_bricks(&mut scene, &config, ball);
    add_pendant(&mut scene, &mut rng);
    log::info!(
        "Scene built: {} bodies, {} force bindings, {} bricks",
        scene.len(),
        scene.force_count(),
        bricks.len()
    );

    let mut remaining = brick_count(&scene);
    let mut ticks_run = 0;
    for t in 0..config.ticks {
        scene.tick(config.dt);
        ticks_run = t + 1;

        let now = brick_count(&scene);
        if now != remaining {
            remaining = now;
            log::info!("Brick destroyed at tick {t}: {remaining} remaining");
        }
        if remaining == 0 {
            log::info!("All bricks cleared after {ticks_run} ticks");
            break;
        }
    }

    let ball_pos = scene.body(ball).map(|b| b.centroid()).unwrap_or_default();
    log::info!(
        "Done: {ticks_run} ticks, {} bodies alive, {remaining} bricks left, ball at ({:.1}, {:.1})",
        scene.len(),
        ball_pos.x,
        ball_pos.y
    );
    Ok(())
}
