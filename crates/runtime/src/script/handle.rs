//! Restricted view of a combatant handed to scripts.
//!
//! A handle exposes read accessors and the four mutators (`take_damage`,
//! `heal`, `set_position`, `defend`). Mutators run the canonical formulas and
//! append an [`EffectRecord`] to the log shared by every handle of one call.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use game_core::{Combatant, CombatantId, DamageOutcome, HealOutcome, Position};
use serde::{Deserialize, Serialize};

/// Observable result of one mutator call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectRecord {
    Damaged {
        target: CombatantId,
        outcome: DamageOutcome,
    },
    Healed {
        target: CombatantId,
        outcome: HealOutcome,
    },
    Moved {
        target: CombatantId,
        from: Position,
        to: Position,
    },
    Defended {
        target: CombatantId,
    },
}

impl EffectRecord {
    pub fn target(&self) -> CombatantId {
        match self {
            Self::Damaged { target, .. }
            | Self::Healed { target, .. }
            | Self::Moved { target, .. }
            | Self::Defended { target } => *target,
        }
    }

    /// True when this effect took its target from alive to defeated.
    pub fn defeated(&self) -> bool {
        matches!(self, Self::Damaged { outcome, .. } if outcome.defeated)
    }
}

type EffectLog = Rc<RefCell<Vec<EffectRecord>>>;

/// Mutation attempted through a read-only handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("combatant handles are read-only while choosing an action")]
pub struct ReadOnlyHandle;

/// Shared, single-threaded handle to one combatant's battle state.
///
/// Cloning a handle yields another reference to the same combatant, so a
/// mutation through one clone is visible through every other.
#[derive(Clone, Debug)]
pub struct CombatantHandle {
    combatant: Rc<RefCell<Combatant>>,
    log: EffectLog,
    writable: bool,
}

impl CombatantHandle {
    pub fn id(&self) -> CombatantId {
        self.combatant.borrow().id
    }

    /// Runs `f` against the current state.
    pub fn with<R>(&self, f: impl FnOnce(&Combatant) -> R) -> R {
        f(&self.combatant.borrow())
    }

    pub fn name(&self) -> String {
        self.with(|c| c.name.clone())
    }

    pub fn team_name(&self) -> String {
        self.with(|c| c.team_name.clone())
    }

    pub fn current_hp(&self) -> u32 {
        self.with(Combatant::current_hp)
    }

    pub fn max_hp(&self) -> u32 {
        self.with(Combatant::max_hp)
    }

    pub fn attack(&self) -> i32 {
        self.with(|c| c.stats.attack)
    }

    pub fn defense(&self) -> i32 {
        self.with(|c| c.stats.defense)
    }

    pub fn speed(&self) -> i32 {
        self.with(|c| c.stats.speed)
    }

    pub fn position(&self) -> Position {
        self.with(|c| c.position)
    }

    pub fn is_alive(&self) -> bool {
        self.with(Combatant::is_alive)
    }

    pub fn is_defending(&self) -> bool {
        self.with(Combatant::is_defending)
    }

    pub fn abilities(&self) -> Vec<String> {
        self.with(|c| c.abilities.iter().map(|a| a.as_str().to_string()).collect())
    }

    pub fn take_damage(&self, amount: i32) -> Result<DamageOutcome, ReadOnlyHandle> {
        self.ensure_writable()?;
        let outcome = self.combatant.borrow_mut().take_damage(amount);
        self.record(EffectRecord::Damaged {
            target: self.id(),
            outcome,
        });
        Ok(outcome)
    }

    pub fn heal(&self, amount: i32) -> Result<HealOutcome, ReadOnlyHandle> {
        self.ensure_writable()?;
        let outcome = self.combatant.borrow_mut().heal(amount);
        self.record(EffectRecord::Healed {
            target: self.id(),
            outcome,
        });
        Ok(outcome)
    }

    pub fn set_position(&self, to: Position) -> Result<(), ReadOnlyHandle> {
        self.ensure_writable()?;
        let from = self.position();
        self.combatant.borrow_mut().set_position(to);
        self.record(EffectRecord::Moved {
            target: self.id(),
            from,
            to,
        });
        Ok(())
    }

    pub fn defend(&self) -> Result<(), ReadOnlyHandle> {
        self.ensure_writable()?;
        if self.is_alive() {
            self.combatant.borrow_mut().defend();
            self.record(EffectRecord::Defended { target: self.id() });
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), ReadOnlyHandle> {
        if self.writable { Ok(()) } else { Err(ReadOnlyHandle) }
    }

    fn record(&self, effect: EffectRecord) {
        self.log.borrow_mut().push(effect);
    }
}

/// Creates the handles for one script call, deduplicated by combatant id.
#[derive(Debug, Default)]
pub struct HandleArena {
    handles: BTreeMap<CombatantId, CombatantHandle>,
    log: EffectLog,
    writable: bool,
}

impl HandleArena {
    /// Arena for an ability effect: handles accept mutators.
    pub fn writable() -> Self {
        Self {
            writable: true,
            ..Self::default()
        }
    }

    /// Arena for an AI decision: mutators fail.
    pub fn read_only() -> Self {
        Self::default()
    }

    /// Returns the handle for `combatant`, creating it on first request.
    pub fn handle(&mut self, combatant: &Combatant) -> CombatantHandle {
        self.handles
            .entry(combatant.id)
            .or_insert_with(|| CombatantHandle {
                combatant: Rc::new(RefCell::new(combatant.clone())),
                log: Rc::clone(&self.log),
                writable: self.writable,
            })
            .clone()
    }

    pub fn handles(&mut self, combatants: &[Combatant]) -> Vec<CombatantHandle> {
        combatants.iter().map(|c| self.handle(c)).collect()
    }

    /// Final state of every combatant the call touched, plus the effect log.
    pub fn finish(self) -> (Vec<Combatant>, Vec<EffectRecord>) {
        let combatants = self
            .handles
            .values()
            .map(|handle| handle.combatant.borrow().clone())
            .collect();
        let effects = self.log.borrow().clone();
        (combatants, effects)
    }
}
