//! Authoritative battle state representation.
//!
//! This module owns the data structures that describe teams, combatants, and
//! the round counter. Runtime layers query this state and mutate combatants
//! only through the operations exposed on [`Combatant`].
pub mod types;

pub use types::{
    BaseStats, CharacterBlueprint, Combatant, CombatantId, ControllerKind, Position, Team, TeamId,
};

use crate::ability::TargetScope;
use crate::engine::BattleOutcome;

/// Canonical snapshot of one battle.
///
/// Combatants are stored in roster order, so `combatants[i].id == CombatantId(i)`.
/// Defeated combatants stay in the list for status display; they are excluded
/// from turn order and target lists.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// Current round, starting at 1.
    round: u32,
    teams: Vec<Team>,
    combatants: Vec<Combatant>,
}

impl BattleState {
    /// Assembles a state from already-instantiated teams and combatants.
    ///
    /// Prefer [`crate::engine::setup_battle`], which validates references and
    /// assigns ids.
    pub fn new(teams: Vec<Team>, combatants: Vec<Combatant>) -> Self {
        Self {
            round: 1,
            teams,
            combatants,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Moves to the next round after a full pass over the turn order.
    pub fn advance_round(&mut self) {
        self.round += 1;
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index())
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.index())
    }

    /// Controller of the team the combatant belongs to.
    pub fn controller_of(&self, id: CombatantId) -> Option<ControllerKind> {
        let combatant = self.combatant(id)?;
        self.team(combatant.team).map(|team| team.controller)
    }

    /// Iterator over combatants that are still standing, in roster order.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    /// Living combatants on any team other than the actor's, in roster order.
    pub fn enemies_of(&self, actor: CombatantId) -> Vec<CombatantId> {
        self.legal_targets(actor, TargetScope::Enemies)
    }

    /// Living combatants on the actor's team (the actor included), in roster order.
    pub fn allies_of(&self, actor: CombatantId) -> Vec<CombatantId> {
        self.legal_targets(actor, TargetScope::Allies)
    }

    /// Living combatants the actor may aim an ability with `scope` at.
    pub fn legal_targets(&self, actor: CombatantId, scope: TargetScope) -> Vec<CombatantId> {
        let Some(actor_state) = self.combatant(actor) else {
            return Vec::new();
        };

        self.living()
            .filter(|candidate| {
                scope.permits(candidate.id == actor, candidate.team == actor_state.team)
            })
            .map(|candidate| candidate.id)
            .collect()
    }

    /// Returns true if `target` is alive and within `scope` for `actor`.
    pub fn is_legal_target(&self, actor: CombatantId, target: CombatantId, scope: TargetScope) -> bool {
        match (self.combatant(actor), self.combatant(target)) {
            (Some(actor_state), Some(target_state)) => {
                target_state.is_alive()
                    && scope.permits(actor == target, actor_state.team == target_state.team)
            }
            _ => false,
        }
    }

    /// Distinct teams that still have at least one living member, in team order.
    pub fn living_teams(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> = self.living().map(|c| c.team).collect();
        teams.sort_unstable();
        teams.dedup();
        teams
    }

    /// Terminal predicate: at most one team has survivors.
    pub fn is_terminal(&self) -> bool {
        self.living_teams().len() <= 1
    }

    /// Outcome of the battle if it has reached a terminal state.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.living_teams().as_slice() {
            [] => Some(BattleOutcome::mutual_elimination()),
            [winner] => {
                let name = self.team(*winner).map(|t| t.name.clone()).unwrap_or_default();
                Some(BattleOutcome::victory(*winner, name))
            }
            _ => None,
        }
    }

    /// SHA-256 over the bincode encoding of the state.
    ///
    /// Two battles fed identical inputs produce identical fingerprints after every
    /// round, which makes divergence easy to spot in tests and logs.
    #[cfg(feature = "serde")]
    pub fn fingerprint(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        // bincode serialization is deterministic and consistent
        if let Ok(bytes) = bincode::serialize(self) {
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DrawReason;

    fn duel() -> BattleState {
        let red = CharacterBlueprint::new("Knight", BaseStats::new(100, 15, 5, 10));
        let blue = CharacterBlueprint::new("Goblin", BaseStats::new(40, 8, 2, 5));

        let mut red_team = Team::new(TeamId(0), "Red", ControllerKind::BuiltinAi);
        red_team.members.push(CombatantId(0));
        let mut blue_team = Team::new(TeamId(1), "Blue", ControllerKind::BuiltinAi);
        blue_team.members.push(CombatantId(1));

        BattleState::new(
            vec![red_team, blue_team],
            vec![
                Combatant::from_blueprint(CombatantId(0), TeamId(0), "Red", &red),
                Combatant::from_blueprint(CombatantId(1), TeamId(1), "Blue", &blue),
            ],
        )
    }

    #[test]
    fn enemies_and_allies_are_partitioned_by_team() {
        let state = duel();
        assert_eq!(state.enemies_of(CombatantId(0)), vec![CombatantId(1)]);
        assert_eq!(state.allies_of(CombatantId(0)), vec![CombatantId(0)]);
    }

    #[test]
    fn not_terminal_while_two_teams_stand() {
        let state = duel();
        assert!(!state.is_terminal());
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn single_survivor_team_wins() {
        let mut state = duel();
        state.combatant_mut(CombatantId(1)).unwrap().take_damage(1_000);

        assert!(state.is_terminal());
        assert_eq!(
            state.outcome(),
            Some(BattleOutcome::victory(TeamId(0), "Red".to_string()))
        );
        assert!(state.enemies_of(CombatantId(0)).is_empty());
    }

    #[test]
    fn no_survivors_is_a_draw() {
        let mut state = duel();
        state.combatant_mut(CombatantId(0)).unwrap().take_damage(1_000);
        state.combatant_mut(CombatantId(1)).unwrap().take_damage(1_000);

        assert_eq!(
            state.outcome(),
            Some(BattleOutcome::Draw {
                reason: DrawReason::MutualElimination
            })
        );
    }

    #[test]
    fn dead_targets_are_illegal() {
        let mut state = duel();
        assert!(state.is_legal_target(CombatantId(0), CombatantId(1), TargetScope::Enemies));
        state.combatant_mut(CombatantId(1)).unwrap().take_damage(1_000);
        assert!(!state.is_legal_target(CombatantId(0), CombatantId(1), TargetScope::Enemies));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn fingerprint_tracks_state_changes() {
        let a = duel();
        let mut b = duel();
        assert_eq!(hex::encode(a.fingerprint()), hex::encode(b.fingerprint()));

        b.combatant_mut(CombatantId(1)).unwrap().take_damage(10);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
