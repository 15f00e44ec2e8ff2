use super::{CombatantId, Position, TeamId};
use crate::ability::AbilityId;
use crate::combat::{
    DamageOutcome, HealOutcome, apply_damage, apply_heal, calculate_damage, calculate_heal,
    effective_defense,
};

/// Base statistics of a character. Never modified during a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub max_hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl BaseStats {
    pub const fn new(max_hp: u32, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            max_hp,
            attack,
            defense,
            speed,
        }
    }
}

/// Immutable, file-defined template a [`Combatant`] is instantiated from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterBlueprint {
    pub name: String,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    /// AI policy script used when the owning team is script-controlled.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ai_script: Option<String>,
}

impl CharacterBlueprint {
    pub fn new(name: impl Into<String>, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            stats,
            position: Position::ORIGIN,
            abilities: Vec::new(),
            ai_script: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_abilities<I, A>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AbilityId>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_ai_script(mut self, script: impl Into<String>) -> Self {
        self.ai_script = Some(script.into());
        self
    }
}

/// Battle-scoped runtime instance of a character.
///
/// # Invariants
///
/// - `0 <= current_hp <= stats.max_hp`
/// - `current_hp` only changes through [`Combatant::take_damage`] and
///   [`Combatant::heal`]
/// - once `current_hp` reaches 0 the combatant stays defeated for the rest of
///   the battle (healing does not revive)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub team: TeamId,
    pub team_name: String,
    pub stats: BaseStats,
    pub position: Position,
    pub abilities: Vec<AbilityId>,
    pub ai_script: Option<String>,

    current_hp: u32,
    is_defending: bool,
}

impl Combatant {
    /// Deep-copies a blueprint into a fresh battle instance at full HP.
    pub fn from_blueprint(
        id: CombatantId,
        team: TeamId,
        team_name: impl Into<String>,
        blueprint: &CharacterBlueprint,
    ) -> Self {
        Self {
            id,
            name: blueprint.name.clone(),
            team,
            team_name: team_name.into(),
            stats: blueprint.stats,
            position: blueprint.position,
            abilities: blueprint.abilities.clone(),
            ai_script: blueprint.ai_script.clone(),
            current_hp: blueprint.stats.max_hp,
            is_defending: false,
        }
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_defending(&self) -> bool {
        self.is_defending
    }

    pub fn knows(&self, ability: &str) -> bool {
        self.abilities.iter().any(|id| id.as_str() == ability)
    }

    /// Resets battle-scoped state: full HP, no stance.
    pub fn reset_for_battle(&mut self) {
        self.current_hp = self.stats.max_hp;
        self.is_defending = false;
    }

    /// Called at the start of the combatant's own turn; a stance lasts until then.
    pub fn begin_turn(&mut self) {
        self.is_defending = false;
    }

    /// Applies one hit through the canonical damage formula.
    ///
    /// A defeated combatant takes no further damage.
    pub fn take_damage(&mut self, base_damage: i32) -> DamageOutcome {
        let was_alive = self.is_alive();
        let defense = effective_defense(self.stats.defense, self.is_defending);
        let dealt = if was_alive {
            calculate_damage(base_damage, self.stats.defense, self.is_defending)
                .min(self.current_hp)
        } else {
            0
        };

        self.current_hp = apply_damage(self.current_hp, dealt);

        DamageOutcome {
            base_damage,
            effective_defense: defense,
            dealt,
            remaining_hp: self.current_hp,
            defeated: was_alive && !self.is_alive(),
        }
    }

    /// Restores HP, clamped to max HP. Defeated combatants are not revived.
    pub fn heal(&mut self, amount: i32) -> HealOutcome {
        let before = self.current_hp;
        if self.is_alive() {
            self.current_hp = apply_heal(self.current_hp, self.stats.max_hp, calculate_heal(amount));
        }

        HealOutcome {
            requested: amount,
            restored: self.current_hp - before,
            current_hp: self.current_hp,
        }
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Enters a defensive stance until the start of this combatant's next turn.
    pub fn defend(&mut self) {
        if self.is_alive() {
            self.is_defending = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(max_hp: u32, defense: i32) -> Combatant {
        let blueprint = CharacterBlueprint::new("Fighter", BaseStats::new(max_hp, 10, defense, 5))
            .with_abilities(["attack"]);
        Combatant::from_blueprint(CombatantId(0), TeamId(0), "Red", &blueprint)
    }

    #[test]
    fn instance_starts_at_full_hp() {
        let combatant = fighter(100, 5);
        assert_eq!(combatant.current_hp(), 100);
        assert!(combatant.is_alive());
        assert!(!combatant.is_defending());
        assert!(combatant.knows("attack"));
    }

    #[test]
    fn damage_subtracts_defense() {
        let mut target = fighter(100, 5);
        let outcome = target.take_damage(15);
        assert_eq!(outcome.dealt, 10);
        assert_eq!(target.current_hp(), 90);
    }

    #[test]
    fn defending_target_takes_minimum_damage() {
        let mut target = fighter(100, 5);
        target.defend();
        let outcome = target.take_damage(8);
        assert_eq!(outcome.effective_defense, 10);
        assert_eq!(outcome.dealt, 1);
        assert_eq!(target.current_hp(), 99);
    }

    #[test]
    fn stance_ends_at_turn_start() {
        let mut combatant = fighter(100, 5);
        combatant.defend();
        combatant.begin_turn();
        assert!(!combatant.is_defending());
    }

    #[test]
    fn lethal_damage_clamps_and_reports_defeat() {
        let mut target = fighter(20, 0);
        let outcome = target.take_damage(50);
        assert_eq!(outcome.dealt, 20);
        assert_eq!(target.current_hp(), 0);
        assert!(outcome.defeated);
        assert!(!target.is_alive());

        let again = target.take_damage(50);
        assert_eq!(again.dealt, 0);
        assert!(!again.defeated);
    }

    #[test]
    fn heal_clamps_to_max_hp() {
        let mut combatant = fighter(100, 0);
        combatant.take_damage(20);
        let outcome = combatant.heal(30);
        assert_eq!(combatant.current_hp(), 100);
        assert_eq!(outcome.restored, 20);
    }

    #[test]
    fn heal_does_not_revive() {
        let mut combatant = fighter(10, 0);
        combatant.take_damage(10);
        let outcome = combatant.heal(50);
        assert_eq!(outcome.restored, 0);
        assert!(!combatant.is_alive());
    }

    #[test]
    fn blueprint_is_deep_copied() {
        let blueprint = CharacterBlueprint::new("Mage", BaseStats::new(50, 12, 2, 7))
            .with_abilities(["fireball"]);
        let mut first = Combatant::from_blueprint(CombatantId(0), TeamId(0), "Red", &blueprint);
        let second = Combatant::from_blueprint(CombatantId(1), TeamId(1), "Blue", &blueprint);

        first.take_damage(30);
        first.abilities.clear();

        assert_eq!(second.current_hp(), 50);
        assert_eq!(second.abilities.len(), 1);
        assert_eq!(blueprint.abilities.len(), 1);
    }
}
