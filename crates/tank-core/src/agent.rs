use crate::TickContext;

/// Live state of one bot-controlled tank, as seen by the decision trees.
///
/// Predicates take `&self` and must not mutate the agent. Actions take `&mut self` and
/// are the only place where a tree tick changes anything. The trees order their gates so
/// that an action is only reached when the predicates guarding it held (for example,
/// `shoot` is never called on a dead tank), so actions do not re-check those conditions.
pub trait TankAgent {
    fn is_alive(&self, ctx: &TickContext) -> bool;

    /// A live, visible enemy shot is about to hit this tank.
    fn is_shot_danger(&self, ctx: &TickContext) -> bool;

    /// The weapon is loaded.
    fn is_shot_ready(&self, ctx: &TickContext) -> bool;

    /// The bot's own firing cooldown has run out.
    fn is_shot_timer_elapsed(&self, ctx: &TickContext) -> bool;

    /// A shot fired now would pass within tolerance of the current target.
    fn is_aim_good(&self, ctx: &TickContext) -> bool;

    fn is_shot_obstructed_by_building(&self, ctx: &TickContext) -> bool;

    fn is_shot_obstructed_by_ally(&self, ctx: &TickContext) -> bool;

    fn is_holding_flag(&self, ctx: &TickContext) -> bool;

    /// The held flag cannot be dropped voluntarily.
    fn is_flag_sticky(&self, ctx: &TickContext) -> bool;

    /// The held flag belongs to some team (as opposed to a power-up flag).
    fn is_holding_team_flag(&self, ctx: &TickContext) -> bool;

    /// The held flag belongs to this tank's own team.
    fn is_holding_my_team_flag(&self, ctx: &TickContext) -> bool;

    fn do_nothing(&mut self, _ctx: &TickContext) {}

    fn evade(&mut self, ctx: &TickContext);

    fn follow_path(&mut self, ctx: &TickContext);

    /// Push the firing cooldown back a little instead of firing into an obstruction.
    fn delay_shot(&mut self, ctx: &TickContext);

    /// Fire and restart the firing cooldown.
    fn shoot(&mut self, ctx: &TickContext);

    fn drop_flag(&mut self, ctx: &TickContext);
}
