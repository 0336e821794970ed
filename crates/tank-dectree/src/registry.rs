use std::sync::OnceLock;

use tank_core::{TankAgent, TickContext};
use tank_tools::TraceSink;

use crate::tree::{Decision, DecisionTree};
use crate::{RegistryError, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreeKind {
    Motion,
    Shooting,
    Flags,
}

impl TreeKind {
    /// Order in which [`DecisionTrees::tick`] runs the trees.
    pub const ALL: [TreeKind; 3] = [TreeKind::Motion, TreeKind::Shooting, TreeKind::Flags];

    pub fn name(self) -> &'static str {
        match self {
            TreeKind::Motion => "motion",
            TreeKind::Shooting => "shooting",
            TreeKind::Flags => "flags",
        }
    }
}

/// The three decisions of one bot update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDecisions {
    pub motion: Decision,
    pub shooting: Decision,
    pub flags: Decision,
}

/// The bot's motion, shooting and flag trees, wired once.
#[derive(Debug)]
pub struct DecisionTrees<A> {
    motion: DecisionTree<A>,
    shooting: DecisionTree<A>,
    flags: DecisionTree<A>,
}

impl<A> DecisionTrees<A>
where
    A: TankAgent + 'static,
{
    pub fn initialize() -> Result<Self, TreeError> {
        Ok(Self {
            motion: motion_tree()?,
            shooting: shooting_tree()?,
            flags: flags_tree()?,
        })
    }

    pub fn tree(&self, kind: TreeKind) -> &DecisionTree<A> {
        match kind {
            TreeKind::Motion => &self.motion,
            TreeKind::Shooting => &self.shooting,
            TreeKind::Flags => &self.flags,
        }
    }

    pub fn evaluate(&self, kind: TreeKind, agent: &mut A, ctx: &TickContext) -> Decision {
        self.tree(kind).evaluate(agent, ctx)
    }

    pub fn evaluate_traced(
        &self,
        kind: TreeKind,
        agent: &mut A,
        ctx: &TickContext,
        sink: &mut dyn TraceSink,
    ) -> Decision {
        self.tree(kind).evaluate_traced(agent, ctx, sink)
    }

    /// One full bot update: motion, then shooting, then flags.
    pub fn tick(&self, agent: &mut A, ctx: &TickContext) -> TickDecisions {
        TickDecisions {
            motion: self.motion.evaluate(agent, ctx),
            shooting: self.shooting.evaluate(agent, ctx),
            flags: self.flags.evaluate(agent, ctx),
        }
    }
}

/// Holder for a process-wide set of trees with a single-initialization contract.
///
/// ```ignore
/// static TREES: SharedDecisionTrees<MyTank> = SharedDecisionTrees::new();
/// TREES.initialize()?;
/// let trees = TREES.get()?;
/// ```
#[derive(Debug)]
pub struct SharedDecisionTrees<A> {
    cell: OnceLock<DecisionTrees<A>>,
}

impl<A> Default for SharedDecisionTrees<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> SharedDecisionTrees<A> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<&DecisionTrees<A>, RegistryError> {
        self.cell.get().ok_or(RegistryError::NotInitialized)
    }
}

impl<A> SharedDecisionTrees<A>
where
    A: TankAgent + 'static,
{
    /// Builds the trees. Only the first successful call builds anything; later calls
    /// return [`RegistryError::AlreadyInitialized`] and leave the stored trees alone.
    pub fn initialize(&self) -> Result<&DecisionTrees<A>, RegistryError> {
        if self.is_initialized() {
            return Err(RegistryError::AlreadyInitialized);
        }

        let built = DecisionTrees::initialize()?;
        let mut stored = false;
        let trees = self.cell.get_or_init(|| {
            stored = true;
            built
        });

        if stored {
            Ok(trees)
        } else {
            // Lost a race with another initializer.
            Err(RegistryError::AlreadyInitialized)
        }
    }
}

fn motion_tree<A>() -> Result<DecisionTree<A>, TreeError>
where
    A: TankAgent + 'static,
{
    let mut t = DecisionTree::<A>::builder(TreeKind::Motion.name());

    let alive = t.branch("alive", A::is_alive);
    let danger = t.branch("shot_danger", A::is_shot_danger);

    let nothing = t.leaf("do_nothing", A::do_nothing);
    let evade = t.leaf("evade", A::evade);
    let follow = t.leaf("follow_path", A::follow_path);

    t.wire(alive, Some(danger.into()), Some(nothing.into()))?
        .wire(danger, Some(evade.into()), Some(follow.into()))?;

    t.build(alive.into())
}

fn shooting_tree<A>() -> Result<DecisionTree<A>, TreeError>
where
    A: TankAgent + 'static,
{
    let mut t = DecisionTree::<A>::builder(TreeKind::Shooting.name());

    let alive = t.branch("alive", A::is_alive);
    let ready = t.branch("shot_ready", A::is_shot_ready);
    let timer = t.branch("shot_timer_elapsed", A::is_shot_timer_elapsed);
    let aim = t.branch("aim_good", A::is_aim_good);
    let building = t.branch("obstructed_by_building", A::is_shot_obstructed_by_building);
    let ally = t.branch("obstructed_by_ally", A::is_shot_obstructed_by_ally);

    let nothing = t.leaf("do_nothing", A::do_nothing);
    let delay = t.leaf("delay_shot", A::delay_shot);
    let shoot = t.leaf("shoot", A::shoot);

    t.wire(alive, Some(ready.into()), Some(nothing.into()))?
        .wire(ready, Some(timer.into()), Some(nothing.into()))?
        .wire(timer, Some(aim.into()), Some(nothing.into()))?
        .wire(aim, Some(building.into()), Some(nothing.into()))?
        .wire(building, Some(delay.into()), Some(ally.into()))?
        .wire(ally, Some(delay.into()), Some(shoot.into()))?;

    t.build(alive.into())
}

fn flags_tree<A>() -> Result<DecisionTree<A>, TreeError>
where
    A: TankAgent + 'static,
{
    let mut t = DecisionTree::<A>::builder(TreeKind::Flags.name());

    let alive = t.branch("alive", A::is_alive);
    let holding = t.branch("holding_flag", A::is_holding_flag);
    let sticky = t.branch("flag_sticky", A::is_flag_sticky);
    let team = t.branch("team_flag", A::is_holding_team_flag);
    let mine = t.branch("my_team_flag", A::is_holding_my_team_flag);

    let nothing = t.leaf("do_nothing", A::do_nothing);
    let drop_flag = t.leaf("drop_flag", A::drop_flag);

    t.wire(alive, Some(holding.into()), Some(nothing.into()))?
        .wire(holding, Some(sticky.into()), Some(nothing.into()))?
        .wire(sticky, Some(nothing.into()), Some(team.into()))?
        .wire(team, Some(mine.into()), Some(drop_flag.into()))?
        .wire(mine, Some(drop_flag.into()), Some(nothing.into()))?;

    t.build(alive.into())
}
