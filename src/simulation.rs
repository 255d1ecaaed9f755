//! The per-frame flight simulation and its Bevy host.
//!
//! [`FlightSimulation`] owns the planets, their trails, the sun and the ship,
//! and advances them with [`FlightSimulation::tick`]:
//!
//! 1. planets step along their orbits (remembering the previous position),
//! 2. the sun pulses and the planet wakes sample and decay,
//! 3. the ship rides its planet or flies under thrust, drag and gravity,
//! 4. contacts are classified and landings/destruction applied,
//! 5. the ship wake decays.
//!
//! [`SimulationPlugin`] wraps it as a resource and ticks it once per frame.

use std::f64::consts::TAU;

use bevy::prelude::*;
use fastrand::Rng;

use crate::collision::{detect_contact, Contact};
use crate::config::{ConfigError, FlightConfig, WorldBounds};
use crate::input::{read_pilot_input, InputGate, PilotInput};
use crate::orbit::Planet;
use crate::outcome::{score_for_fuel, Destruction, DestructionCause, FlightEvent, TickReport};
use crate::ship::{FlightContext, Ship};
use crate::sun::Sun;
use crate::trail::TrailBuffer;
use crate::types::{ms_to_seconds, FlightSystemSet, PlanetId, MS_PER_SECOND};

/// Pick a target uniformly among the planets other than `start`.
fn pick_target(rng: &mut Rng, planet_count: usize, start: usize) -> usize {
    let target = rng.usize(..planet_count - 1);
    if target >= start { target + 1 } else { target }
}

/// Planets at random phases plus a ship docked at a random angle on `start`.
fn lay_out(config: &FlightConfig, rng: &mut Rng, start: PlanetId) -> (Vec<Planet>, Ship) {
    let center = config.world.center();
    let planets: Vec<Planet> = config
        .planets
        .iter()
        .enumerate()
        .map(|(i, spec)| Planet::new(PlanetId(i), spec, center, rng.f64() * TAU))
        .collect();

    let theta = rng.f64() * TAU;
    let ship = Ship::docked_on(
        &planets[start.index()],
        theta,
        config.ship.initial_fuel,
        config.ship.tail_offset,
    );

    (planets, ship)
}

/// Complete simulation state for one scene.
#[derive(Resource)]
pub struct FlightSimulation {
    config: FlightConfig,
    rng: Rng,
    bounds: WorldBounds,
    planets: Vec<Planet>,
    planet_trails: Vec<TrailBuffer>,
    sun: Sun,
    ship: Ship,
    target: PlanetId,
    destruction: Option<Destruction>,
    victory: Option<u32>,
}

impl FlightSimulation {
    /// New scene with a random start planet and a different random target.
    pub fn new(config: FlightConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Rng::with_seed(seed);
        let count = config.planets.len();
        let start = rng.usize(..count);
        let target = pick_target(&mut rng, count, start);
        Ok(Self::build(config, rng, PlanetId(start), PlanetId(target)))
    }

    /// New scene with a fixed start and target; phases and docking angle
    /// still come from `seed`.
    pub fn with_start(
        config: FlightConfig,
        seed: u64,
        start: PlanetId,
        target: PlanetId,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let planets = config.planets.len();
        if start.index() >= planets || target.index() >= planets || start == target {
            return Err(ConfigError::InvalidStart {
                start: start.index(),
                target: target.index(),
                planets,
            });
        }
        Ok(Self::build(config, Rng::with_seed(seed), start, target))
    }

    fn build(config: FlightConfig, mut rng: Rng, start: PlanetId, target: PlanetId) -> Self {
        let (planets, ship) = lay_out(&config, &mut rng, start);
        Self {
            bounds: config.world.bounds(),
            planet_trails: vec![TrailBuffer::new(); planets.len()],
            sun: Sun::new(config.world.center(), &config.sun),
            planets,
            ship,
            target,
            destruction: None,
            victory: None,
            rng,
            config,
        }
    }

    /// Start over: new phases, new start planet, new target, full tank.
    pub fn restart(&mut self) {
        let count = self.planets.len();
        let start = self.rng.usize(..count);
        let target = pick_target(&mut self.rng, count, start);
        let (planets, ship) = lay_out(&self.config, &mut self.rng, PlanetId(start));

        self.planet_trails = vec![TrailBuffer::new(); planets.len()];
        self.planets = planets;
        self.ship = ship;
        self.sun = Sun::new(self.config.world.center(), &self.config.sun);
        self.target = PlanetId(target);
        self.destruction = None;
        self.victory = None;

        debug!("Scene restarted: start {}, target {}", PlanetId(start), self.target);
    }

    /// Advance one frame.
    ///
    /// `gated` freezes pilot control and contact checks (a dialog is open); a
    /// docked ship still follows its planet so its launch baseline stays fresh.
    pub fn tick(&mut self, input: &PilotInput, gated: bool, now_ms: f64, dt_ms: f64) -> TickReport {
        let mut report = TickReport::default();
        let dt = ms_to_seconds(dt_ms);

        for planet in &mut self.planets {
            planet.step(dt);
        }

        let jitter = self.rng.f64();
        self.sun.update(&self.config.sun, now_ms, jitter);

        let wake = self.config.wake;
        for (planet, trail) in self.planets.iter().zip(&mut self.planet_trails) {
            trail.push(planet.position(), now_ms, wake.min_step, wake.sample_interval_ms);
            trail.prune(now_ms, wake.max_age_ms);
        }

        let prompt_due = self
            .destruction
            .as_mut()
            .map(|d| d.advance(dt_ms, &self.config.destruction));
        match prompt_due {
            Some(true) => report.push(FlightEvent::RestartReady),
            Some(false) => {}
            None => self.step_ship(input, gated, now_ms, dt, &mut report),
        }

        self.ship.wake_mut().prune(now_ms, wake.max_age_ms);
        report
    }

    fn step_ship(
        &mut self,
        input: &PilotInput,
        gated: bool,
        now_ms: f64,
        dt: f64,
        report: &mut TickReport,
    ) {
        match self.ship.docked_planet() {
            Some(id) => {
                let planet = &self.planets[id.index()];
                let input = (!gated).then_some(input);
                if let Some(velocity) = self.ship.ride(planet, input, &self.config.ship, dt) {
                    report.push(FlightEvent::Launched {
                        planet: id,
                        velocity,
                    });
                }
            }
            None if gated => {}
            None => {
                let ctx = FlightContext {
                    config: &self.config,
                    planets: &self.planets,
                    sun: &self.sun,
                    bounds: self.bounds,
                };
                self.ship.fly(input, &ctx, now_ms, dt);
            }
        }

        if gated {
            return;
        }

        if let Some(contact) =
            detect_contact(&self.ship, &self.planets, &self.sun, &self.config.ship, dt)
        {
            self.resolve_contact(contact, report);
        }
    }

    fn resolve_contact(&mut self, contact: Contact, report: &mut TickReport) {
        match contact {
            Contact::SolarDestruction => {
                report.push(FlightEvent::SolarDestruction);
                if self.destroy(DestructionCause::Sun) {
                    report.push(FlightEvent::Explosion {
                        position: self.ship.pos,
                    });
                }
            }
            Contact::Crash {
                planet,
                relative_speed,
            } => {
                report.push(FlightEvent::Crashed {
                    planet,
                    relative_speed,
                });
                if self.destroy(DestructionCause::Crash {
                    planet,
                    relative_speed,
                }) {
                    report.push(FlightEvent::Explosion {
                        position: self.ship.pos,
                    });
                }
            }
            Contact::Landing {
                planet,
                relative_speed,
                ..
            } => {
                let theta = self
                    .ship
                    .land_on(&self.planets[planet.index()], self.config.ship.tail_offset);
                report.push(FlightEvent::Landed {
                    planet,
                    theta,
                    relative_speed,
                });

                if planet == self.target {
                    let score = score_for_fuel(self.ship.fuel);
                    self.victory = Some(score);
                    report.push(FlightEvent::Victory { planet, score });
                }
            }
        }
    }

    /// Start the destruction sequence. Returns `false` if one is already
    /// running, in which case nothing changes.
    pub fn destroy(&mut self, cause: DestructionCause) -> bool {
        if self.destruction.is_some() {
            return false;
        }
        self.ship.halt();
        self.destruction = Some(Destruction::new(cause, self.ship.pos));
        true
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    /// Wake of each planet, parallel to [`FlightSimulation::planets`].
    pub fn planet_trails(&self) -> &[TrailBuffer] {
        &self.planet_trails
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn target(&self) -> PlanetId {
        self.target
    }

    pub fn destruction(&self) -> Option<&Destruction> {
        self.destruction.as_ref()
    }

    /// Ship is gone (exploding or waiting for a restart).
    pub fn is_destroyed(&self) -> bool {
        self.destruction.is_some()
    }

    pub fn is_exploding(&self) -> bool {
        self.destruction
            .is_some_and(|d| d.is_exploding(&self.config.destruction))
    }

    pub fn restart_ready(&self) -> bool {
        self.destruction.is_some_and(|d| d.restart_ready())
    }

    /// Score of the last victory in this scene, if any.
    pub fn victory(&self) -> Option<u32> {
        self.victory
    }

    /// Direct ship access for scripted scenarios.
    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }
}

/// Seed for the scene's random layout.
#[derive(Resource, Clone, Copy, Debug)]
pub struct SimulationSeed(pub u64);

impl Default for SimulationSeed {
    fn default() -> Self {
        Self(fastrand::u64(..))
    }
}

/// The report of the most recent tick, for systems that react to it.
#[derive(Resource, Clone, Debug, Default)]
pub struct FlightLog {
    pub last: TickReport,
    /// Number of ticks run since startup.
    pub ticks: u64,
}

/// Plugin hosting the flight simulation.
///
/// Adds:
/// - Default [`FlightConfig`], [`SimulationSeed`], [`PilotInput`] and [`InputGate`]
/// - Startup creation of the [`FlightSimulation`] resource
/// - Input sampling, restart handling and the per-frame tick in `Update`
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightConfig>()
            .init_resource::<SimulationSeed>()
            .init_resource::<PilotInput>()
            .init_resource::<InputGate>()
            .init_resource::<FlightLog>()
            .configure_sets(
                Update,
                (
                    FlightSystemSet::Input,
                    FlightSystemSet::Simulate,
                    FlightSystemSet::React,
                )
                    .chain(),
            )
            .add_systems(Startup, setup_simulation)
            .add_systems(
                Update,
                (
                    read_pilot_input.in_set(FlightSystemSet::Input),
                    (handle_restart, advance_simulation)
                        .chain()
                        .in_set(FlightSystemSet::Simulate),
                    log_flight_events.in_set(FlightSystemSet::React),
                ),
            );
    }
}

fn setup_simulation(mut commands: Commands, config: Res<FlightConfig>, seed: Res<SimulationSeed>) {
    match FlightSimulation::new(config.clone(), seed.0) {
        Ok(sim) => {
            info!(
                "Flight ready: docked on {:?}, target {}",
                sim.ship().docked_planet(),
                sim.target()
            );
            commands.insert_resource(sim);
        }
        Err(err) => error!("Cannot start flight simulation: {err}"),
    }
}

/// Restart on request once the destruction sequence is over or after a victory.
fn handle_restart(
    sim: Option<ResMut<FlightSimulation>>,
    input: Res<PilotInput>,
    gate: Res<InputGate>,
) {
    let Some(mut sim) = sim else {
        return;
    };
    if !input.restart || gate.is_gated() {
        return;
    }
    if sim.restart_ready() || sim.victory().is_some() {
        sim.restart();
        info!("Restarted, new target {}", sim.target());
    }
}

fn advance_simulation(
    sim: Option<ResMut<FlightSimulation>>,
    input: Res<PilotInput>,
    gate: Res<InputGate>,
    time: Res<Time>,
    mut log: ResMut<FlightLog>,
) {
    let Some(mut sim) = sim else {
        return;
    };

    let now_ms = time.elapsed_secs_f64() * MS_PER_SECOND;
    let dt_ms = time.delta_secs_f64() * MS_PER_SECOND;

    log.last = sim.tick(&input, gate.is_gated(), now_ms, dt_ms);
    log.ticks += 1;
}

fn log_flight_events(log: Res<FlightLog>) {
    for event in &log.last.events {
        match event {
            FlightEvent::Launched { planet, velocity } => {
                info!("Launched from {} at {:.1} u/s", planet, velocity.length());
            }
            FlightEvent::Landed {
                planet,
                relative_speed,
                ..
            } => {
                info!("Landed on {} at {:.1} u/s", planet, relative_speed);
            }
            FlightEvent::Crashed {
                planet,
                relative_speed,
            } => {
                warn!("CRASH! Hit {} at {:.1} u/s", planet, relative_speed);
            }
            FlightEvent::SolarDestruction => warn!("Ship burned up in the sun"),
            FlightEvent::Explosion { position } => {
                debug!("Explosion at ({:.1}, {:.1})", position.x, position.y);
            }
            FlightEvent::Victory { planet, score } => {
                info!("VICTORY on {}! Score {}", planet, score);
            }
            FlightEvent::RestartReady => info!("Press R to restart"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bevy_test, fixtures};
    use approx::assert_relative_eq;
    use bevy::math::DVec2;

    const FRAME_MS: f64 = 16.0;

    #[test]
    fn test_new_picks_distinct_start_and_target() {
        for seed in 0..50 {
            let sim = FlightSimulation::new(FlightConfig::default(), seed).unwrap();
            let start = sim.ship().docked_planet().unwrap();
            assert_ne!(start, sim.target(), "seed {seed}");
            assert!(sim.target().index() < 6);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = FlightSimulation::new(FlightConfig::default(), 42).unwrap();
        let b = FlightSimulation::new(FlightConfig::default(), 42).unwrap();
        assert_eq!(a.target(), b.target());
        assert_eq!(a.ship().pos, b.ship().pos);
        for (pa, pb) in a.planets().iter().zip(b.planets()) {
            assert_eq!(pa.position(), pb.position());
        }
    }

    #[test]
    fn test_with_start_rejects_bad_pairs() {
        let config = FlightConfig::default();
        assert!(matches!(
            FlightSimulation::with_start(config.clone(), 1, PlanetId(2), PlanetId(2)),
            Err(ConfigError::InvalidStart { .. })
        ));
        assert!(matches!(
            FlightSimulation::with_start(config, 1, PlanetId(0), PlanetId(6)),
            Err(ConfigError::InvalidStart { .. })
        ));
    }

    #[test]
    fn test_invalid_config_refused() {
        let mut config = FlightConfig::default();
        config.planets.truncate(1);
        assert!(FlightSimulation::new(config, 0).is_err());
    }

    #[test]
    fn test_docked_ship_follows_planet() {
        let mut sim = fixtures::simulation(0, 3);
        for i in 1..=30 {
            sim.tick(&PilotInput::default(), false, i as f64 * FRAME_MS, FRAME_MS);
        }
        let planet = &sim.planets()[0];
        let standoff = planet.radius() + sim.config().ship.tail_offset;
        assert!(sim.ship().is_docked());
        assert_relative_eq!(
            sim.ship().pos.distance(planet.position()),
            standoff,
            epsilon = 1e-9
        );
        assert_eq!(sim.ship().vel, DVec2::ZERO);
    }

    #[test]
    fn test_launch_inherits_orbital_velocity() {
        let mut sim = fixtures::simulation(1, 4);
        sim.tick(&PilotInput::default(), false, FRAME_MS, FRAME_MS);

        let report = sim.tick(&PilotInput::thrust_tap(), false, 2.0 * FRAME_MS, FRAME_MS);

        let planet = &sim.planets()[1];
        let expected = planet.velocity(FRAME_MS / 1000.0);
        match report.events.as_slice() {
            [FlightEvent::Launched { planet, velocity }] => {
                assert_eq!(*planet, PlanetId(1));
                assert_relative_eq!(velocity.x, expected.x, epsilon = 1e-9);
                assert_relative_eq!(velocity.y, expected.y, epsilon = 1e-9);
            }
            other => panic!("expected a launch, got {other:?}"),
        }
        assert!(!sim.ship().is_docked());
        assert_eq!(sim.ship().vel, expected);
        // Thrust only acts from the next frame.
        assert_eq!(sim.ship().fuel, 100.0);
    }

    #[test]
    fn test_gate_freezes_launch_and_contacts() {
        let mut sim = fixtures::simulation(0, 1);
        let report = sim.tick(&PilotInput::thrust_tap(), true, FRAME_MS, FRAME_MS);
        assert!(report.is_empty());
        assert!(sim.ship().is_docked());

        // A flying ship parked inside the sun survives while gated.
        let center = sim.sun().center();
        *sim.ship_mut() = Ship::flying(center, DVec2::new(5.0, 0.0), 0.0, 100.0);
        let report = sim.tick(&PilotInput::default(), true, 2.0 * FRAME_MS, FRAME_MS);
        assert!(report.is_empty());
        assert_eq!(sim.ship().pos, center);
        assert!(!sim.is_destroyed());

        let report = sim.tick(&PilotInput::default(), false, 3.0 * FRAME_MS, FRAME_MS);
        assert!(report.destroyed());
    }

    #[test]
    fn test_solar_destruction_sequence() {
        let mut sim = fixtures::simulation(2, 0);
        let center = sim.sun().center();
        *sim.ship_mut() = Ship::flying(center + DVec2::new(5.0, 0.0), DVec2::ZERO, 0.0, 100.0);

        let report = sim.tick(&PilotInput::default(), false, FRAME_MS, FRAME_MS);
        assert_eq!(report.events[0], FlightEvent::SolarDestruction);
        assert!(matches!(report.events[1], FlightEvent::Explosion { .. }));
        assert!(sim.is_destroyed());
        assert!(sim.is_exploding());
        assert_eq!(sim.ship().vel, DVec2::ZERO);
        assert!(sim.ship().wake().is_empty());

        // Frozen while destroyed; the restart prompt arrives once.
        let frozen = sim.ship().pos;
        let mut prompts = 0;
        let mut now = FRAME_MS;
        for _ in 0..250 {
            now += FRAME_MS;
            let report = sim.tick(&PilotInput::thrust_tap(), false, now, FRAME_MS);
            if report.restart_ready() {
                prompts += 1;
            }
        }
        assert_eq!(prompts, 1);
        assert_eq!(sim.ship().pos, frozen);
        assert!(!sim.is_exploding());
        assert!(sim.restart_ready());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut sim = fixtures::simulation(0, 1);
        assert!(sim.destroy(DestructionCause::Sun));
        let first = *sim.destruction().unwrap();

        assert!(!sim.destroy(DestructionCause::Crash {
            planet: PlanetId(1),
            relative_speed: 500.0,
        }));
        assert_eq!(*sim.destruction().unwrap(), first);
    }

    #[test]
    fn test_restart_resets_scene() {
        let mut sim = fixtures::simulation(0, 1);
        sim.destroy(DestructionCause::Sun);
        sim.restart();

        assert!(!sim.is_destroyed());
        assert!(sim.ship().is_docked());
        assert_eq!(sim.ship().fuel, sim.config().ship.initial_fuel);
        assert_ne!(sim.ship().docked_planet(), Some(sim.target()));
        assert!(sim.planet_trails().iter().all(TrailBuffer::is_empty));
        assert_eq!(sim.victory(), None);
    }

    #[test]
    fn test_restart_key_waits_for_prompt() {
        let mut app = bevy_test::headless_app();
        app.insert_resource(SimulationSeed(9))
            .add_plugins(SimulationPlugin)
            .init_resource::<ButtonInput<KeyCode>>();
        app.update();

        {
            let mut sim = app.world_mut().resource_mut::<FlightSimulation>();
            sim.destroy(DestructionCause::Sun);
        }
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyR);
        app.update();
        assert!(app.world().resource::<FlightSimulation>().is_destroyed());

        {
            let mut sim = app.world_mut().resource_mut::<FlightSimulation>();
            sim.tick(&PilotInput::default(), false, 0.0, 3500.0);
            assert!(sim.restart_ready());
        }
        app.update();

        let sim = app.world().resource::<FlightSimulation>();
        assert!(!sim.is_destroyed());
        assert!(sim.ship().is_docked());
    }

    #[test]
    fn test_planet_trails_sample_every_planet() {
        let mut sim = fixtures::simulation(0, 1);
        sim.tick(&PilotInput::default(), false, 1000.0, FRAME_MS);
        assert!(sim.planet_trails().iter().all(|t| t.len() == 1));

        // Long after, the first samples have aged out but fresh ones arrived.
        sim.tick(&PilotInput::default(), false, 5000.0, FRAME_MS);
        assert!(sim.planet_trails().iter().all(|t| t.len() == 1));
        assert!(sim
            .planet_trails()
            .iter()
            .all(|t| t.last().map(|s| s.time_ms) == Some(5000.0)));
    }
}
