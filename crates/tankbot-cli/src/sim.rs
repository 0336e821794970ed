//! Headless match: one bot tank driven by the decision trees against a hostile shooter.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result};
use tank_core::{CollisionWorld, TankAgent, TickContext, Vec2};
use tank_dectree::{Decision, DecisionTrees, TickDecisions, TreeKind};
use tank_nav::config::{TANK_HEIGHT, TANK_RADIUS};
use tank_nav::{GridPlanner, NavPath, Navigator, ObstacleWorld};
use tank_tools::{TraceEvent, TraceLog, TraceSink};

use crate::config::{BotConfig, EnemyConfig, FlagConfig, Team};

/// Height of the gun barrel above ground.
pub const MUZZLE_HEIGHT: f32 = 1.57;
/// Seconds of incoming-shot extrapolation when looking for danger.
const DANGER_LOOKAHEAD: f32 = 1.0;
/// A shot passing closer than this is treated as a threat.
const DANGER_RADIUS: f32 = 2.0 * TANK_RADIUS;
/// Turret turn rate in radians per second.
const TURN_RATE: f32 = core::f32::consts::FRAC_PI_2;
const GOAL_REACHED: f32 = 2.0;

/// A shot in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Distance left before the shot expires.
    pub range_left: f32,
}

impl Shot {
    /// Closest point to `target` along the next `horizon` seconds of flight, and its distance.
    fn closest_approach(&self, target: Vec2, horizon: f32) -> (Vec2, f32) {
        let speed_sq = self.velocity.length_squared();
        let horizon = if speed_sq > f32::EPSILON {
            horizon.min(self.range_left / speed_sq.sqrt())
        } else {
            0.0
        };
        let t = if speed_sq > f32::EPSILON {
            ((target - self.position).dot(self.velocity) / speed_sq).clamp(0.0, horizon.max(0.0))
        } else {
            0.0
        };
        let point = self.position + self.velocity * t;
        (point, point.distance(target))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TankStats {
    pub shots_fired: u64,
    pub shots_delayed: u64,
    pub evasions: u64,
    pub deaths: u64,
    pub flags_dropped: u64,
    pub plans: u64,
    pub unreachable: u64,
    pub goals_reached: u64,
    pub first_goal_tick: Option<u64>,
}

#[derive(Debug, Clone)]
struct Route {
    path: NavPath,
    next: usize,
}

/// The bot-controlled tank and everything it can observe.
#[derive(Debug)]
pub struct SimTank {
    planner: GridPlanner<ObstacleWorld>,
    team: Team,
    position: Vec2,
    aim: Vec2,
    alive: bool,
    respawn_in: f32,
    patrol: [Vec2; 2],
    leg: usize,
    route: Option<Route>,
    speed: f32,
    reload_time: f32,
    shot_delay: f32,
    respawn_time: f32,
    reload_left: f32,
    shot_timer: f32,
    flag: Option<FlagConfig>,
    target: Option<Vec2>,
    allies: Vec<Vec2>,
    incoming: Vec<Shot>,
    stats: TankStats,
}

impl SimTank {
    pub fn new(config: &BotConfig) -> Result<Self> {
        let planner =
            GridPlanner::new(config.world(), &config.nav).context("invalid nav config")?;
        let tank = &config.tank;
        Ok(Self {
            planner,
            team: tank.team,
            position: tank.spawn,
            aim: Vec2::new(1.0, 0.0),
            alive: true,
            respawn_in: 0.0,
            patrol: [tank.goal, tank.spawn],
            leg: 0,
            route: None,
            speed: tank.speed,
            reload_time: tank.reload_time,
            shot_delay: tank.shot_delay,
            respawn_time: tank.respawn_time,
            reload_left: 0.0,
            shot_timer: 0.0,
            flag: tank.flag,
            target: None,
            allies: config.allies.clone(),
            incoming: Vec::new(),
            stats: TankStats::default(),
        })
    }

    fn world(&self) -> &ObstacleWorld {
        self.planner.descriptor().world()
    }

    fn spawn(&self) -> Vec2 {
        self.patrol[1]
    }

    fn goal(&self) -> Vec2 {
        self.patrol[self.leg]
    }

    /// Timers, respawn and turret motion; runs before the trees each tick.
    fn advance(&mut self, target: Option<Vec2>, dt: f32) {
        self.reload_left = (self.reload_left - dt).max(0.0);
        self.shot_timer = (self.shot_timer - dt).max(0.0);

        if !self.alive {
            self.respawn_in -= dt;
            if self.respawn_in <= 0.0 {
                self.alive = true;
                self.position = self.spawn();
                self.route = None;
                tracing::debug!(position = ?self.position, "respawned");
            }
        }

        self.target = target.filter(|_| self.alive);
        if let Some(target) = self.target {
            let desired = (target - self.position).normalize_or_zero();
            if desired != Vec2::ZERO {
                self.aim = rotate_towards(self.aim, desired, TURN_RATE * dt);
            }
        }
    }

    fn kill(&mut self) {
        self.alive = false;
        self.respawn_in = self.respawn_time;
        self.route = None;
        self.stats.deaths += 1;
        tracing::debug!(position = ?self.position, "tank destroyed");
    }

    fn threat(&self) -> Option<&Shot> {
        self.incoming.iter().find(|shot| {
            let (point, distance) = shot.closest_approach(self.position, DANGER_LOOKAHEAD);
            distance <= DANGER_RADIUS
                && !self.world().segment_blocked(shot.position, point, MUZZLE_HEIGHT)
        })
    }

    fn try_move(&mut self, delta: Vec2) -> bool {
        let next = self.position + delta;
        let world = self.world();
        if world.contains(next) && !world.is_point_in_solid(next, TANK_RADIUS, TANK_HEIGHT) {
            self.position = next;
            true
        } else {
            false
        }
    }

    fn replan(&mut self) {
        self.stats.plans += 1;
        self.route = self
            .planner
            .find_path(self.position, self.goal())
            .map(|path| Route { path, next: 1 });
        if self.route.is_none() {
            self.stats.unreachable += 1;
        }
    }
}

impl TankAgent for SimTank {
    fn is_alive(&self, _ctx: &TickContext) -> bool {
        self.alive
    }

    fn is_shot_danger(&self, _ctx: &TickContext) -> bool {
        self.threat().is_some()
    }

    fn is_shot_ready(&self, _ctx: &TickContext) -> bool {
        self.reload_left <= 0.0
    }

    fn is_shot_timer_elapsed(&self, _ctx: &TickContext) -> bool {
        self.shot_timer <= 0.0
    }

    fn is_aim_good(&self, _ctx: &TickContext) -> bool {
        self.target.is_some_and(|target| {
            let to_target = target - self.position;
            self.aim.dot(to_target) > 0.0 && self.aim.perp_dot(to_target).abs() <= TANK_RADIUS
        })
    }

    fn is_shot_obstructed_by_building(&self, _ctx: &TickContext) -> bool {
        self.target.is_some_and(|target| {
            self.world()
                .segment_blocked(self.position, target, MUZZLE_HEIGHT)
        })
    }

    fn is_shot_obstructed_by_ally(&self, _ctx: &TickContext) -> bool {
        self.target.is_some_and(|target| {
            self.allies
                .iter()
                .any(|&ally| segment_distance(self.position, target, ally) <= TANK_RADIUS)
        })
    }

    fn is_holding_flag(&self, _ctx: &TickContext) -> bool {
        self.flag.is_some()
    }

    fn is_flag_sticky(&self, _ctx: &TickContext) -> bool {
        self.flag.is_some_and(|f| f.sticky)
    }

    fn is_holding_team_flag(&self, _ctx: &TickContext) -> bool {
        self.flag.and_then(|f| f.team).is_some()
    }

    fn is_holding_my_team_flag(&self, _ctx: &TickContext) -> bool {
        self.flag.and_then(|f| f.team) == Some(self.team)
    }

    fn evade(&mut self, ctx: &TickContext) {
        let Some(shot) = self.threat().copied() else {
            return;
        };
        // Step off the shot's line, away from the side it is on.
        let side = shot.velocity.perp_dot(self.position - shot.position);
        let dodge = shot.velocity.perp().normalize_or_zero();
        let dodge = if side >= 0.0 { dodge } else { -dodge };
        let step = self.speed * ctx.dt_seconds;

        if !self.try_move(dodge * step) {
            self.try_move(-dodge * step);
        }
        self.route = None;
        self.stats.evasions += 1;
    }

    fn follow_path(&mut self, ctx: &TickContext) {
        if self.position.distance(self.goal()) <= GOAL_REACHED {
            self.stats.goals_reached += 1;
            if self.stats.first_goal_tick.is_none() {
                self.stats.first_goal_tick = Some(ctx.tick);
            }
            self.leg ^= 1;
            self.route = None;
            tracing::debug!(tick = ctx.tick, goal = ?self.position, "goal reached");
            return;
        }

        if self.route.is_none() {
            self.replan();
        }

        let mut budget = self.speed * ctx.dt_seconds;
        while budget > 0.0 {
            let Some(route) = self.route.as_mut() else {
                break;
            };
            let Some(&waypoint) = route.path.points.get(route.next) else {
                self.route = None;
                break;
            };
            let distance = self.position.distance(waypoint);
            if distance <= budget {
                self.position = waypoint;
                route.next += 1;
                budget -= distance;
            } else {
                self.position = self.position.move_towards(waypoint, budget);
                budget = 0.0;
            }
        }
    }

    fn delay_shot(&mut self, _ctx: &TickContext) {
        self.shot_timer += self.shot_delay;
        self.stats.shots_delayed += 1;
    }

    fn shoot(&mut self, ctx: &TickContext) {
        self.reload_left = self.reload_time;
        self.shot_timer = self.reload_time;
        self.stats.shots_fired += 1;
        tracing::debug!(tick = ctx.tick, aim = ?self.aim, "shot fired");
    }

    fn drop_flag(&mut self, ctx: &TickContext) {
        tracing::debug!(tick = ctx.tick, flag = ?self.flag, "flag dropped");
        self.flag = None;
        self.stats.flags_dropped += 1;
    }
}

/// Stationary enemy tank firing at the bot whenever it has a clear line.
#[derive(Debug, Clone)]
pub struct Shooter {
    position: Vec2,
    reload_time: f32,
    shot_speed: f32,
    shot_range: f32,
    cooldown: f32,
}

impl Shooter {
    pub fn new(config: &EnemyConfig) -> Self {
        Self {
            position: config.position,
            reload_time: config.reload_time,
            shot_speed: config.shot_speed,
            shot_range: config.shot_range,
            cooldown: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    fn try_fire(&mut self, target: Vec2, world: &ObstacleWorld, dt: f32) -> Option<Shot> {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown > 0.0
            || self.position.distance(target) > self.shot_range
            || world.segment_blocked(self.position, target, MUZZLE_HEIGHT)
        {
            return None;
        }
        self.cooldown = self.reload_time;
        let direction = (target - self.position).normalize_or_zero();
        Some(Shot {
            position: self.position,
            velocity: direction * self.shot_speed,
            range_left: self.shot_range,
        })
    }
}

/// Per-tree leaf counts plus tank statistics after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimSummary {
    pub ticks: u64,
    pub seconds: f64,
    pub decisions: BTreeMap<(TreeKind, &'static str), u64>,
    pub stats: TankStats,
    pub final_position: Vec2,
    pub alive: bool,
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulated {} ticks ({:.1}s)", self.ticks, self.seconds)?;
        writeln!(f)?;
        writeln!(f, "Decisions:")?;
        for ((kind, leaf), count) in &self.decisions {
            writeln!(f, "  {:<9} {:<12} {}", kind.name(), leaf, count)?;
        }
        writeln!(f)?;
        let s = &self.stats;
        writeln!(f, "Shots fired:    {}", s.shots_fired)?;
        writeln!(f, "Shots delayed:  {}", s.shots_delayed)?;
        writeln!(f, "Evasions:       {}", s.evasions)?;
        writeln!(f, "Deaths:         {}", s.deaths)?;
        writeln!(f, "Flags dropped:  {}", s.flags_dropped)?;
        writeln!(f, "Path plans:     {} ({} failed)", s.plans, s.unreachable)?;
        match s.first_goal_tick {
            Some(tick) => writeln!(f, "Goals reached:  {} (first at tick {})", s.goals_reached, tick)?,
            None => writeln!(f, "Goals reached:  0")?,
        }
        write!(
            f,
            "Final position: ({:.1}, {:.1}){}",
            self.final_position.x,
            self.final_position.y,
            if self.alive { "" } else { " [dead]" }
        )
    }
}

/// Fixed-step match loop.
pub struct Simulation<'t> {
    trees: &'t DecisionTrees<SimTank>,
    tank: SimTank,
    enemy: Option<Shooter>,
    ctx: TickContext,
    decisions: BTreeMap<(TreeKind, &'static str), u64>,
    trace: Option<TraceLog>,
}

impl<'t> Simulation<'t> {
    pub fn new(trees: &'t DecisionTrees<SimTank>, config: &BotConfig) -> Result<Self> {
        Ok(Self {
            trees,
            tank: SimTank::new(config)?,
            enemy: config.enemy.as_ref().map(Shooter::new),
            ctx: TickContext::new(0, config.dt),
            decisions: BTreeMap::new(),
            trace: None,
        })
    }

    /// Record every tree step into a [`TraceLog`].
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(TraceLog::default());
        self
    }

    pub fn trace(&self) -> Option<&TraceLog> {
        self.trace.as_ref()
    }

    pub fn step(&mut self) -> TickDecisions {
        let ctx = self.ctx;
        let dt = ctx.dt_seconds;

        self.tank.advance(self.enemy.as_ref().map(Shooter::position), dt);
        self.move_shots(dt);
        if self.tank.alive {
            if let Some(enemy) = self.enemy.as_mut() {
                let world = self.tank.planner.descriptor().world();
                if let Some(shot) = enemy.try_fire(self.tank.position, world, dt) {
                    self.tank.incoming.push(shot);
                }
            }
        }

        let decisions = match self.trace.as_mut() {
            Some(log) => {
                let mut evaluate = |kind| {
                    log.emit(TraceEvent::at(&ctx, kind_tag(kind)));
                    self.trees.evaluate_traced(kind, &mut self.tank, &ctx, log)
                };
                TickDecisions {
                    motion: evaluate(TreeKind::Motion),
                    shooting: evaluate(TreeKind::Shooting),
                    flags: evaluate(TreeKind::Flags),
                }
            }
            None => self.trees.tick(&mut self.tank, &ctx),
        };

        for (kind, decision) in [
            (TreeKind::Motion, decisions.motion),
            (TreeKind::Shooting, decisions.shooting),
            (TreeKind::Flags, decisions.flags),
        ] {
            let leaf = match decision {
                Decision::Fired { name, .. } => name,
                Decision::NoTerminal { .. } => "(none)",
            };
            *self.decisions.entry((kind, leaf)).or_default() += 1;
        }
        tracing::trace!(
            tick = ctx.tick,
            motion = ?decisions.motion.leaf_name(),
            shooting = ?decisions.shooting.leaf_name(),
            flags = ?decisions.flags.leaf_name(),
            "bot update"
        );

        self.ctx = ctx.next();
        decisions
    }

    pub fn run(&mut self, ticks: u64) -> SimSummary {
        for _ in 0..ticks {
            self.step();
        }
        self.summary()
    }

    pub fn summary(&self) -> SimSummary {
        SimSummary {
            ticks: self.ctx.tick,
            seconds: self.ctx.elapsed_seconds(),
            decisions: self.decisions.clone(),
            stats: self.tank.stats,
            final_position: self.tank.position,
            alive: self.tank.alive,
        }
    }

    /// Advances enemy shots by `dt`, resolving hits on the tank and on buildings.
    fn move_shots(&mut self, dt: f32) {
        let mut shots = std::mem::take(&mut self.tank.incoming);
        shots.retain_mut(|shot| {
            if self.tank.alive {
                let (_, distance) = shot.closest_approach(self.tank.position, dt);
                if distance <= TANK_RADIUS {
                    self.tank.kill();
                    return false;
                }
            }
            let next = shot.position + shot.velocity * dt;
            let world = self.tank.world();
            if world.segment_blocked(shot.position, next, MUZZLE_HEIGHT) || !world.contains(next) {
                return false;
            }
            shot.range_left -= shot.velocity.length() * dt;
            shot.position = next;
            shot.range_left > 0.0
        });
        self.tank.incoming = shots;
    }
}

fn kind_tag(kind: TreeKind) -> &'static str {
    match kind {
        TreeKind::Motion => "tree.motion",
        TreeKind::Shooting => "tree.shooting",
        TreeKind::Flags => "tree.flags",
    }
}

fn rotate_towards(from: Vec2, to: Vec2, max_angle: f32) -> Vec2 {
    let angle = from.perp_dot(to).atan2(from.dot(to));
    let (sin, cos) = angle.clamp(-max_angle, max_angle).sin_cos();
    Vec2::new(from.x * cos - from.y * sin, from.x * sin + from.y * cos).normalize_or_zero()
}

/// Distance from `p` to the segment `a -> b`.
fn segment_distance(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
