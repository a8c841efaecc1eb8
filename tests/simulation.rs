use approx::assert_relative_eq;
use glam::{IVec2, Vec2};
use rollersim::ecs::components::{Position, Velocity};
use rollersim::sensor::buffer::{DataBuffer, RetentionPolicy};
use rollersim::sensor::{Reading, Sensor};
use rollersim::{roster, BotSpec, SimConfig, SimulationContext, Terrain};

const AIR: [u8; 4] = [25, 255, 255, 255];
const ROCK: [u8; 4] = [0, 0, 0, 255];
const DT: f32 = 1.0 / 60.0;

fn seeded(seed: u64) -> SimConfig {
    SimConfig {
        rng_seed: Some(seed),
        ..SimConfig::default()
    }
}

fn floor_from(y_ground: u32) -> Terrain {
    Terrain::from_fn(200, 200, |_, y| if y >= y_ground { ROCK } else { AIR })
}

#[test]
fn falling_bot_touches_ground_on_eighth_tick() {
    let mut sim = SimulationContext::new(seeded(0), floor_from(105)).unwrap();
    sim.spawn_bot(BotSpec::new("drop", Vec2::new(100.0, 80.0), 20.0))
        .unwrap();

    for tick in 1..=7 {
        sim.tick(DT);
        assert!(!sim.bots()[0].touching, "touching early on tick {tick}");
    }
    sim.tick(DT);
    assert!(sim.bots()[0].touching);
}

#[test]
fn bot_comes_to_rest_on_flat_floor() {
    let mut sim = SimulationContext::new(seeded(0), floor_from(150)).unwrap();
    let bot = sim
        .spawn_bot(BotSpec::new("ball", Vec2::new(100.0, 60.0), 20.0))
        .unwrap();
    for _ in 0..2000 {
        sim.tick(DT);
    }
    let pos = sim.world().get::<&Position>(bot).unwrap().0;
    let vel = sim.world().get::<&Velocity>(bot).unwrap().0;
    assert!(sim.bots()[0].touching);
    assert!((129.5..131.5).contains(&pos.y), "resting at {}", pos.y);
    assert_relative_eq!(pos.x, 100.0);
    assert!(vel.y.abs() < 0.5);
}

#[test]
fn rangefinder_hits_the_first_solid_pixel() {
    let config = SimConfig {
        gravity: 0.0,
        ..seeded(0)
    };
    let terrain = Terrain::from_fn(200, 100, |x, _| if x >= 150 { ROCK } else { AIR });
    let mut sim = SimulationContext::new(config, terrain).unwrap();
    sim.spawn_bot(
        BotSpec::new("ranger", Vec2::new(40.5, 50.5), 10.0)
            .sensor(Sensor::rangefinder().range(300.0)),
    )
    .unwrap();

    sim.tick(DT);

    let readings = &sim.bots()[0].sensors[0].readings;
    assert_eq!(
        readings,
        &vec![Reading::Segment {
            origin: IVec2::new(40, 50),
            hit: IVec2::new(150, 50),
        }]
    );
    assert!(sim.overlays().interpretation.is_marked(IVec2::new(150, 50)));
    assert!(!sim.overlays().interpretation.is_marked(IVec2::new(151, 50)));
}

#[test]
fn round_robin_keeps_the_newest_entries() {
    let mut rng = fastrand::Rng::with_seed(0);
    let mut buffer = DataBuffer::new(10, RetentionPolicy::RoundRobin).unwrap();
    for value in 0..15 {
        buffer.record(value, &mut rng);
    }
    let kept: Vec<i32> = buffer.chronological().into_iter().copied().collect();
    assert_eq!(kept, (5..15).collect::<Vec<_>>());
}

#[test]
fn tracker_trail_is_bounded_by_retention() {
    let mut sim = SimulationContext::new(seeded(0), floor_from(190)).unwrap();
    let tracker = Sensor::inertial_tracker().retention_period(0.5);
    sim.spawn_bot(BotSpec::new("tracker", Vec2::new(100.0, 20.0), 10.0).sensor(tracker))
        .unwrap();
    for _ in 0..120 {
        sim.tick(DT);
    }
    let readings = &sim.bots()[0].sensors[0].readings;
    assert_eq!(readings.len(), 30);
    for reading in readings {
        let Reading::Point(p) = reading else {
            panic!("trackers log points");
        };
        assert!(sim.overlays().memory.is_marked(*p));
    }
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut sim =
            SimulationContext::new(seeded(seed), roster::demo_terrain(800, 450)).unwrap();
        roster::spawn_demo(&mut sim).unwrap();
        for _ in 0..90 {
            sim.tick(DT);
        }
        sim.bots()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn config_file_overrides_defaults() {
    let config = SimConfig::from_json_str(r#"{ "gravity": 0.5, "rng_seed": 9 }"#).unwrap();
    assert_eq!(config.gravity, 0.5);
    assert_eq!(config.rng_seed, Some(9));
    assert_eq!(config.tick_rate, SimConfig::default().tick_rate);
    assert!(SimConfig::from_json_str(r#"{ "tick_rate": 0 }"#).is_err());
    assert!(SimConfig::from_json_str("not json").is_err());
}
