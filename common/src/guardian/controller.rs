use bevy_math::Vec3;
use rand::{SeedableRng, rngs::StdRng};
use std::{collections::VecDeque, sync::Arc, time::Duration};
use tracing::{debug, info};

use super::{
    config::GuardianConfig,
    movement::{Body, horizontal_distance, steer},
    state::{GuardianMode, GuardianState, Hunt, Phase, SearchPlan, countdown},
    zones::ZoneRegistry,
};
use crate::{
    hunt::{HuntIndicator, HuntSignal},
    nav::{NavGraph, find_path},
    obstruction::{Obstruction, OpenField},
    sampler::SafeSpotSampler,
};

// ============================================================================
// Terrain
// ============================================================================

/// Level data shared by every guardian: the routing graph, the investigation
/// zones and the line-of-sight query. Immutable once the level is loaded.
#[derive(Clone)]
pub struct Terrain {
    pub graph: Arc<NavGraph>,
    pub zones: Arc<ZoneRegistry>,
    pub obstruction: Arc<dyn Obstruction>,
}

impl Terrain {
    #[must_use]
    pub fn new(graph: NavGraph, zones: ZoneRegistry, obstruction: impl Obstruction + 'static) -> Self {
        Self {
            graph: Arc::new(graph),
            zones: Arc::new(zones),
            obstruction: Arc::new(obstruction),
        }
    }

    // No graph, no zones, nothing blocks line of sight.
    #[must_use]
    pub fn open() -> Self {
        Self::new(NavGraph::new(), ZoneRegistry::new(), OpenField)
    }
}

impl std::fmt::Debug for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terrain")
            .field("nodes", &self.graph.len())
            .field("zones", &self.zones.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Guardian Controller
// ============================================================================

/// Patrol / alarm / search state machine for one guardian.
///
/// Driven by [`advance`](Self::advance) once per simulation tick. Alerts are
/// plain method calls that replace whatever the guardian was doing.
#[derive(Debug)]
pub struct GuardianController<H = HuntIndicator> {
    name: String,
    config: GuardianConfig,
    waypoints: Vec<Vec3>,
    terrain: Terrain,
    hunt_signal: H,
    sampler: SafeSpotSampler,
    rng: StdRng,
    state: GuardianState,
}

impl<H: HuntSignal> GuardianController<H> {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        config: GuardianConfig,
        waypoints: Vec<Vec3>,
        terrain: Terrain,
        hunt_signal: H,
    ) -> Self {
        let state = GuardianState::patrolling(waypoints.first().copied());
        Self {
            name: name.into(),
            sampler: config.sampler(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            waypoints,
            terrain,
            hunt_signal,
            state,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn state(&self) -> &GuardianState {
        &self.state
    }

    #[must_use]
    pub const fn mode(&self) -> GuardianMode {
        self.state.mode()
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    #[must_use]
    pub const fn hunt_signal(&self) -> &H {
        &self.hunt_signal
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    // Alarm at a position. Cancels whatever was in progress.
    pub fn alert_to_position(&mut self, position: Vec3) {
        self.raise(position, None);
    }

    /// Alarm qualified by an investigation zone.
    ///
    /// Unknown or empty zones are ignored without touching the state or the
    /// hunt cue. Returns whether the alert was taken.
    pub fn alert_to_zone(&mut self, position: Vec3, zone_id: &str) -> bool {
        if self.terrain.zones.configured(zone_id).is_none() {
            debug!("{}: ignoring alert for unconfigured zone '{zone_id}'", self.name);
            return false;
        }
        self.raise(position, Some(zone_id.to_owned()));
        true
    }

    // Drop any hunt at once (e.g. the player was caught) and resume patrol.
    pub fn stand_down(&mut self) {
        self.hunt_signal.hide_immediate();
        if self.state.hunt.take().is_none() {
            return;
        }
        info!("{}: standing down", self.name);
        self.resume_patrol();
    }

    fn raise(&mut self, position: Vec3, zone: Option<String>) {
        info!(
            "{}: alarm at ({:.1}, {:.1}, {:.1}){}",
            self.name,
            position.x,
            position.y,
            position.z,
            zone.as_deref().map(|z| format!(" in zone '{z}'")).unwrap_or_default()
        );

        self.hunt_signal.start_hunt();

        let search = if zone.is_some() {
            SearchPlan::Zone { nodes: VecDeque::new() }
        } else {
            SearchPlan::Sampled {
                remaining: self.config.search_points,
            }
        };
        self.state.hunt = Some(Hunt {
            origin: position,
            zone,
            route: VecDeque::new(),
            search,
        });
        self.state.phase = Phase::Reacting(countdown(self.config.reaction_delay));
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the state machine by `dt` seconds, moving `body` when the
    /// current phase walks or runs. A tick that completes a wait does not move.
    pub fn advance(&mut self, body: &mut impl Body, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let delta = Duration::try_from_secs_f32(dt).unwrap_or_default();
        let position = body.pose().position;

        match &mut self.state.phase {
            Phase::Walking => {
                let Some(target) = self.state.target else {
                    return;
                };
                if horizontal_distance(position, target) < self.config.arrival_threshold {
                    debug!("{}: reached waypoint {}", self.name, self.state.waypoint_index);
                    self.state.phase = Phase::Dwelling(countdown(self.config.waypoint_dwell));
                } else {
                    self.step(body, target, self.config.patrol_speed, dt);
                }
            }
            Phase::Dwelling(timer) => {
                if timer.tick(delta).is_finished() {
                    self.next_waypoint();
                }
            }
            Phase::Reacting(timer) => {
                if timer.tick(delta).is_finished() {
                    self.begin_pursuit(position);
                }
            }
            Phase::Pursuing(timeout) => {
                let timed_out = timeout
                    .as_mut()
                    .is_some_and(|timer| timer.tick(delta).is_finished());
                let Some(target) = self.state.target else {
                    self.begin_search(position);
                    return;
                };
                if timed_out {
                    debug!("{}: gave up running to target, searching from here", self.name);
                    self.begin_search(position);
                } else if horizontal_distance(position, target) < self.config.arrival_threshold {
                    let next = self.state.hunt.as_mut().and_then(|hunt| hunt.route.pop_front());
                    match next {
                        Some(waypoint) => {
                            self.state.target = Some(waypoint);
                            self.state.phase = self.pursuit();
                        }
                        None => self.begin_search(position),
                    }
                } else {
                    self.step(body, target, self.config.run_speed, dt);
                }
            }
            Phase::Settling(timer) => {
                if timer.tick(delta).is_finished() {
                    self.next_search_point(position);
                }
            }
            Phase::Approaching(timeout) => {
                let timed_out = timeout
                    .as_mut()
                    .is_some_and(|timer| timer.tick(delta).is_finished());
                let Some(target) = self.state.target else {
                    self.look_around();
                    return;
                };
                if timed_out || horizontal_distance(position, target) < self.search_threshold() {
                    self.look_around();
                } else {
                    self.step(body, target, self.config.patrol_speed, dt);
                }
            }
            Phase::Looking(timer) => {
                if timer.tick(delta).is_finished() {
                    self.next_search_point(position);
                }
            }
        }
    }

    fn step(&self, body: &mut impl Body, target: Vec3, speed: f32, dt: f32) {
        if let Some(pose) = steer(body.pose(), target, speed, self.config.turn_speed, dt) {
            body.move_to(pose.position, pose.rotation);
        }
    }

    // ========================================================================
    // Patrol
    // ========================================================================

    fn next_waypoint(&mut self) {
        if !self.waypoints.is_empty() {
            self.state.waypoint_index = (self.state.waypoint_index + 1) % self.waypoints.len();
        }
        self.resume_patrol();
    }

    fn resume_patrol(&mut self) {
        self.state.target = self.waypoints.get(self.state.waypoint_index).copied();
        self.state.phase = Phase::Walking;
    }

    // ========================================================================
    // Hunt
    // ========================================================================

    fn begin_pursuit(&mut self, position: Vec3) {
        let Some(hunt) = self.state.hunt.as_mut() else {
            self.resume_patrol();
            return;
        };

        let Some(zone_id) = hunt.zone.as_deref() else {
            debug!("{}: pursuing alarm position", self.name);
            self.state.target = Some(hunt.origin);
            self.state.phase = self.pursuit();
            return;
        };

        let graph = &self.terrain.graph;
        let Some(zone) = self.terrain.zones.get(zone_id) else {
            self.finish_hunt();
            return;
        };

        hunt.search = SearchPlan::Zone {
            nodes: zone
                .interior()
                .iter()
                .filter_map(|&id| graph.position(id))
                .collect(),
        };

        let route = zone
            .entrance()
            .zip(graph.nearest(position))
            .and_then(|(entrance, start)| find_path(graph, start, entrance));

        match route {
            Some(route) => {
                debug!(
                    "{}: routing to zone '{zone_id}' over {} nodes",
                    self.name,
                    route.len()
                );
                hunt.route = route.positions(graph).into();
                self.state.target = hunt.route.pop_front();
                self.state.phase = self.pursuit();
            }
            None => {
                debug!("{}: no route to zone '{zone_id}', searching interior directly", self.name);
                hunt.route.clear();
                self.begin_search(position);
            }
        }
    }

    // Each leg of a run gets a fresh limit.
    fn pursuit(&self) -> Phase {
        Phase::Pursuing(self.config.pursuit_timeout.map(countdown))
    }

    fn begin_search(&mut self, position: Vec3) {
        match self.state.hunt.as_ref().map(|hunt| &hunt.search) {
            Some(SearchPlan::Sampled { .. }) => {
                debug!("{}: arrived, settling before search", self.name);
                self.state.phase = Phase::Settling(countdown(self.config.settle_duration));
            }
            Some(SearchPlan::Zone { .. }) => self.next_search_point(position),
            None => self.resume_patrol(),
        }
    }

    fn next_search_point(&mut self, position: Vec3) {
        let Some(hunt) = self.state.hunt.as_mut() else {
            self.resume_patrol();
            return;
        };

        let next = match &mut hunt.search {
            SearchPlan::Sampled { remaining } if *remaining > 0 => {
                *remaining -= 1;
                let spot = self.sampler.sample(
                    hunt.origin,
                    position,
                    self.terrain.obstruction.as_ref(),
                    &mut self.rng,
                );
                Some((spot, Some(self.config.search_arrival_timeout)))
            }
            SearchPlan::Zone { nodes } => nodes
                .pop_front()
                .map(|node| (node, self.config.zone_arrival_timeout)),
            SearchPlan::Sampled { .. } => None,
        };

        match next {
            Some((spot, timeout)) => {
                debug!(
                    "{}: searching ({:.1}, {:.1}, {:.1})",
                    self.name, spot.x, spot.y, spot.z
                );
                self.state.target = Some(spot);
                self.state.phase = Phase::Approaching(timeout.map(countdown));
            }
            None => self.finish_hunt(),
        }
    }

    fn look_around(&mut self) {
        self.state.phase = Phase::Looking(countdown(self.config.look_duration));
    }

    fn search_threshold(&self) -> f32 {
        match self.state.hunt.as_ref().map(|hunt| &hunt.search) {
            Some(SearchPlan::Sampled { .. }) => self.config.search_arrival_threshold,
            _ => self.config.arrival_threshold,
        }
    }

    fn finish_hunt(&mut self) {
        info!("{}: search complete, returning to patrol", self.name);
        self.hunt_signal.end_hunt();
        self.state.hunt = None;
        self.resume_patrol();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::SEARCH_ARRIVAL_TIMEOUT,
        guardian::{movement::Pose, zones::InvestigationZone},
        obstruction::{Wall, WallSet},
    };

    const DT: f32 = 0.05;

    fn quick_config() -> GuardianConfig {
        GuardianConfig {
            reaction_delay: 0.5,
            settle_duration: 0.2,
            look_duration: 0.2,
            waypoint_dwell: 0.2,
            ..GuardianConfig::default()
        }
    }

    fn run(guardian: &mut GuardianController, body: &mut Pose, seconds: f32) {
        let ticks = (seconds / DT).ceil() as usize;
        for _ in 0..ticks {
            guardian.advance(body, DT);
        }
    }

    fn run_until(
        guardian: &mut GuardianController,
        body: &mut Pose,
        limit: f32,
        done: impl Fn(&GuardianController) -> bool,
    ) -> bool {
        let ticks = (limit / DT).ceil() as usize;
        for _ in 0..ticks {
            guardian.advance(body, DT);
            if done(guardian) {
                return true;
            }
        }
        false
    }

    // A body pinned in place never arrives anywhere
    struct Pinned(Pose);

    impl Body for Pinned {
        fn pose(&self) -> Pose {
            self.0
        }

        fn move_to(&mut self, _: Vec3, rotation: bevy_math::Quat) {
            self.0.rotation = rotation;
        }
    }

    // Ticks until the guardian is back on patrol, or None if `limit` seconds pass first.
    fn seconds_until_patrol(guardian: &mut GuardianController, body: &mut impl Body, limit: f32) -> Option<f32> {
        let ticks = (limit / DT).ceil() as usize;
        for tick in 1..=ticks {
            guardian.advance(body, DT);
            if guardian.mode() == GuardianMode::Patrolling {
                return Some(tick as f32 * DT);
            }
        }
        None
    }

    // Corridor A-B-C-D along +x with a zone whose entrance is D.
    fn corridor_terrain() -> Terrain {
        let mut graph = NavGraph::new();
        let a = graph.add_node("A", Vec3::new(0.0, 0.0, 0.0));
        let b = graph.add_node("B", Vec3::new(4.0, 0.0, 0.0));
        let c = graph.add_node("C", Vec3::new(8.0, 0.0, 0.0));
        let d = graph.add_node("D", Vec3::new(12.0, 0.0, 0.0));
        let e = graph.add_node("E", Vec3::new(12.0, 0.0, 4.0));
        graph.connect(a, b);
        graph.connect(b, c);
        graph.connect(c, d);
        graph.connect(d, e);

        let mut zones = ZoneRegistry::new();
        zones
            .insert(InvestigationZone::new("vault", vec![d, e]))
            .expect("unique zone");
        zones
            .insert(InvestigationZone::new("unset", Vec::new()))
            .expect("unique zone");
        Terrain::new(graph, zones, OpenField)
    }

    #[test]
    fn starts_patrolling_first_waypoint() {
        let guardian: GuardianController = GuardianController::new(
            "g",
            GuardianConfig::default(),
            vec![Vec3::X, Vec3::Z],
            Terrain::open(),
            HuntIndicator::default(),
        );
        assert_eq!(guardian.mode(), GuardianMode::Patrolling);
        assert_eq!(guardian.state().target(), Some(Vec3::X));
        assert_eq!(guardian.state().waypoint_index(), 0);
    }

    #[test]
    fn without_waypoints_stays_put() {
        let mut guardian: GuardianController = GuardianController::new(
            "g",
            GuardianConfig::default(),
            Vec::new(),
            Terrain::open(),
            HuntIndicator::default(),
        );
        let mut body = Pose::at(Vec3::new(1.0, 0.0, 1.0));
        run(&mut guardian, &mut body, 3.0);
        assert_eq!(body.position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(guardian.state().target(), None);
        assert_eq!(guardian.mode(), GuardianMode::Patrolling);
    }

    #[test]
    fn point_alert_runs_full_search_and_resumes_patrol_index() {
        let waypoints = vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 6.0)];
        let mut guardian: GuardianController =
            GuardianController::new("g", quick_config(), waypoints, Terrain::open(), HuntIndicator::default());
        let mut body = Pose::at(Vec3::ZERO);

        // Reach waypoint 1 first
        assert!(run_until(&mut guardian, &mut body, 10.0, |g| g.state().waypoint_index() == 1));

        let alarm = Vec3::new(5.0, 0.0, 0.0);
        guardian.alert_to_position(alarm);
        assert_eq!(guardian.mode(), GuardianMode::Reacting);
        assert!(guardian.hunt_signal().is_hunting());
        assert_eq!(guardian.state().alert_origin(), Some(alarm));

        assert!(run_until(&mut guardian, &mut body, 2.0, |g| g.mode() == GuardianMode::Pursuing));
        assert_eq!(guardian.state().target(), Some(alarm));

        assert!(run_until(&mut guardian, &mut body, 10.0, |g| g.mode() == GuardianMode::Searching));
        assert!(horizontal_distance(body.position, alarm) < GuardianConfig::default().arrival_threshold);

        assert!(run_until(&mut guardian, &mut body, 20.0, |g| g.mode() == GuardianMode::Patrolling));
        assert!(!guardian.hunt_signal().is_hunting());
        assert_eq!(guardian.hunt_signal().starts(), 1);
        assert_eq!(guardian.hunt_signal().ends(), 1);

        // Back on the waypoint that was current before the alarm
        assert_eq!(guardian.state().waypoint_index(), 1);
        assert_eq!(guardian.state().target(), Some(Vec3::new(0.0, 0.0, 6.0)));
        assert!(guardian.state().alert_origin().is_none());
    }

    #[test]
    fn sampled_targets_ring_the_alarm() {
        let mut guardian: GuardianController =
            GuardianController::new("g", quick_config(), Vec::new(), Terrain::open(), HuntIndicator::default());
        let alarm = Vec3::new(2.0, 0.0, 0.0);
        let mut body = Pose::at(alarm);
        guardian.alert_to_position(alarm);

        let mut targets = Vec::new();
        for _ in 0..400 {
            guardian.advance(&mut body, DT);
            if guardian.mode() == GuardianMode::Searching
                && let Some(target) = guardian.state().target()
                && target != alarm
                && targets.last() != Some(&target)
            {
                targets.push(target);
            }
            if guardian.mode() == GuardianMode::Patrolling {
                break;
            }
        }

        assert_eq!(targets.len(), 2);
        for target in targets {
            assert!((target.distance(alarm) - SafeSpotSampler::default().radius).abs() < 1e-3);
        }
    }

    #[test]
    fn newest_alert_wins() {
        let mut guardian: GuardianController =
            GuardianController::new("g", quick_config(), Vec::new(), Terrain::open(), HuntIndicator::default());
        let mut body = Pose::at(Vec3::ZERO);

        guardian.alert_to_position(Vec3::new(10.0, 0.0, 0.0));
        run(&mut guardian, &mut body, 1.0);
        assert_eq!(guardian.mode(), GuardianMode::Pursuing);

        let second = Vec3::new(-10.0, 0.0, 0.0);
        guardian.alert_to_position(second);
        assert_eq!(guardian.mode(), GuardianMode::Reacting);
        assert_eq!(guardian.hunt_signal().starts(), 1);

        run(&mut guardian, &mut body, 1.0);
        assert_eq!(guardian.state().target(), Some(second));
    }

    #[test]
    fn stand_down_hides_cue_and_resumes_patrol() {
        let waypoints = vec![Vec3::new(3.0, 0.0, 0.0)];
        let mut guardian: GuardianController =
            GuardianController::new("g", quick_config(), waypoints, Terrain::open(), HuntIndicator::default());
        let mut body = Pose::at(Vec3::ZERO);

        guardian.alert_to_position(Vec3::new(0.0, 0.0, 9.0));
        run(&mut guardian, &mut body, 1.0);
        guardian.stand_down();

        assert_eq!(guardian.mode(), GuardianMode::Patrolling);
        assert!(!guardian.hunt_signal().is_hunting());
        assert_eq!(guardian.hunt_signal().ends(), 0);
        assert_eq!(guardian.state().target(), Some(Vec3::new(3.0, 0.0, 0.0)));
        assert!(guardian.state().active_zone().is_none());
    }

    #[test]
    fn unconfigured_zones_are_ignored() {
        let mut guardian: GuardianController = GuardianController::new(
            "g",
            quick_config(),
            vec![Vec3::new(0.0, 0.0, 3.0)],
            corridor_terrain(),
            HuntIndicator::default(),
        );

        assert!(!guardian.alert_to_zone(Vec3::ONE, "missing"));
        assert!(!guardian.alert_to_zone(Vec3::ONE, "unset"));
        assert_eq!(guardian.mode(), GuardianMode::Patrolling);
        assert_eq!(guardian.hunt_signal().starts(), 0);
        assert_eq!(guardian.state().target(), Some(Vec3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn zone_alert_follows_route_then_interior() {
        let mut guardian: GuardianController =
            GuardianController::new("g", quick_config(), Vec::new(), corridor_terrain(), HuntIndicator::default());
        let mut body = Pose::at(Vec3::new(0.5, 0.0, 0.0));

        assert!(guardian.alert_to_zone(Vec3::new(12.0, 0.0, 0.0), "vault"));
        assert_eq!(guardian.state().active_zone(), Some("vault"));

        let mut targets = Vec::new();
        for _ in 0..2000 {
            guardian.advance(&mut body, DT);
            if let Some(target) = guardian.state().target()
                && targets.last() != Some(&target)
            {
                targets.push(target);
            }
            if guardian.mode() == GuardianMode::Patrolling {
                break;
            }
        }

        assert_eq!(
            targets,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(8.0, 0.0, 0.0),
                Vec3::new(12.0, 0.0, 0.0),
                Vec3::new(12.0, 0.0, 4.0),
            ]
        );
        assert_eq!(guardian.mode(), GuardianMode::Patrolling);
        assert_eq!(guardian.hunt_signal().ends(), 1);
    }

    #[test]
    fn zone_without_route_goes_straight_to_interior() {
        let mut graph = NavGraph::new();
        let entrance = graph.add_node("gate", Vec3::new(10.0, 0.0, 0.0));
        let inner = graph.add_node("inner", Vec3::new(10.0, 0.0, 3.0));
        let _island = graph.add_node("island", Vec3::new(-10.0, 0.0, 0.0));
        graph.connect(entrance, inner);

        let mut zones = ZoneRegistry::new();
        zones
            .insert(InvestigationZone::new("gate", vec![entrance, inner]))
            .expect("unique zone");
        let terrain = Terrain::new(graph, zones, OpenField);

        let mut guardian: GuardianController =
            GuardianController::new("g", quick_config(), Vec::new(), terrain, HuntIndicator::default());
        let mut body = Pose::at(Vec3::new(-10.0, 0.0, 0.0));
        assert!(guardian.alert_to_zone(Vec3::new(10.0, 0.0, 0.0), "gate"));

        assert!(run_until(&mut guardian, &mut body, 1.0, |g| g.mode() != GuardianMode::Reacting));
        assert_eq!(guardian.mode(), GuardianMode::Searching);
        assert_eq!(guardian.state().target(), Some(Vec3::new(10.0, 0.0, 3.0)));
    }

    #[test]
    fn zone_arrival_timeout_bounds_unreachable_nodes() {
        // Interior node sits behind a wall the body cannot cross
        let mut graph = NavGraph::new();
        let entrance = graph.add_node("gate", Vec3::ZERO);
        let inner = graph.add_node("inner", Vec3::new(0.0, 0.0, 5.0));
        graph.connect(entrance, inner);
        let mut zones = ZoneRegistry::new();
        zones
            .insert(InvestigationZone::new("gate", vec![entrance, inner]))
            .expect("unique zone");
        let terrain = Terrain::new(graph, zones, WallSet::new(vec![Wall::new(-5.0, 2.0, 5.0, 2.0)]));

        let config = GuardianConfig {
            zone_arrival_timeout: Some(1.0),
            ..quick_config()
        };
        let mut guardian: GuardianController =
            GuardianController::new("g", config, Vec::new(), terrain, HuntIndicator::default());

        let mut body = Pinned(Pose::at(Vec3::ZERO));

        assert!(guardian.alert_to_zone(Vec3::ZERO, "gate"));
        let mut finished = false;
        for _ in 0..100 {
            guardian.advance(&mut body, DT);
            if guardian.mode() == GuardianMode::Patrolling {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(guardian.hunt_signal().ends(), 1);
    }

    #[test]
    fn stuck_pursuit_gives_up_and_searches() {
        let config = GuardianConfig {
            pursuit_timeout: Some(1.0),
            ..quick_config()
        };
        let mut guardian: GuardianController =
            GuardianController::new("g", config, Vec::new(), Terrain::open(), HuntIndicator::default());
        let mut body = Pinned(Pose::at(Vec3::ZERO));

        guardian.alert_to_position(Vec3::new(10.0, 0.0, 0.0));
        let mut searched = false;
        for _ in 0..40 {
            guardian.advance(&mut body, DT);
            if guardian.mode() == GuardianMode::Searching {
                searched = true;
                break;
            }
        }
        assert!(searched, "still {:?} after reaction delay plus pursuit limit", guardian.mode());

        // Sampled points time out too, so the hunt ends
        assert!(seconds_until_patrol(&mut guardian, &mut body, 10.0).is_some());
        assert!(!guardian.hunt_signal().is_hunting());
        assert_eq!(guardian.hunt_signal().ends(), 1);
    }

    #[test]
    fn unreachable_search_points_time_out() {
        let config = quick_config();
        let bound = config.reaction_delay
            + config.settle_duration
            + config.search_points as f32 * (config.search_arrival_timeout + config.look_duration);
        let mut guardian: GuardianController =
            GuardianController::new("g", config, Vec::new(), Terrain::open(), HuntIndicator::default());
        let mut body = Pinned(Pose::at(Vec3::ZERO));

        // Alarm on the spot: the run ends at once and every approach has to time out
        guardian.alert_to_position(Vec3::ZERO);
        let took = seconds_until_patrol(&mut guardian, &mut body, bound + 1.0);

        assert!(took.is_some(), "search did not finish within {bound} s");
        assert!(took.is_some_and(|t| t >= 2.0 * SEARCH_ARRIVAL_TIMEOUT));
        assert_eq!(guardian.hunt_signal().ends(), 1);
    }

    #[test]
    fn stand_down_while_patrolling_keeps_dwell() {
        let config = GuardianConfig {
            waypoint_dwell: 1.0,
            ..quick_config()
        };
        let waypoints = vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)];
        let mut guardian: GuardianController =
            GuardianController::new("g", config, waypoints, Terrain::open(), HuntIndicator::default());
        let mut body = Pose::at(Vec3::ZERO);

        run(&mut guardian, &mut body, 0.6);
        assert_eq!(guardian.state().waypoint_index(), 0);
        guardian.stand_down();
        run(&mut guardian, &mut body, 0.5);

        assert_eq!(guardian.state().waypoint_index(), 1);
        assert_eq!(guardian.hunt_signal().starts(), 0);
    }

    #[test]
    fn bad_tick_lengths_are_ignored() {
        let mut guardian: GuardianController =
            GuardianController::new("g", quick_config(), vec![Vec3::new(5.0, 0.0, 0.0)], Terrain::open(), HuntIndicator::default());
        let mut body = Pose::at(Vec3::ZERO);
        guardian.advance(&mut body, f32::NAN);
        guardian.advance(&mut body, -1.0);
        assert_eq!(body.position, Vec3::ZERO);
    }
}
