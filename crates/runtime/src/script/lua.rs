//! Embedded Lua 5.4 script host.
//!
//! Every call gets a fresh interpreter with only the `math`, `string` and
//! `table` libraries; `print` is routed to `tracing`. The interpreter runs on
//! a blocking worker and is dropped when the call returns, so no script state
//! survives between calls.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use game_content::ScriptLibrary;
use game_core::{Combatant, CombatantId, Position};
use mlua::{
    AnyUserData, Function, HookTriggers, Lua, LuaOptions, MetaMethod, StdLib, Table, UserData,
    UserDataFields, UserDataMethods, UserDataRef, Value, Variadic, VmState,
};

use super::{
    ABILITY_ENTRY_POINT, AI_ENTRY_POINT, AbilityEffect, AiChoice, AiDecision, AiTarget,
    CombatantHandle, HandleArena, ScriptError, ScriptHost,
};

/// Wall-clock limit for one script call, checked every `hook_interval` VM
/// instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptBudget {
    pub timeout: Duration,
    pub hook_interval: u32,
}

impl ScriptBudget {
    pub const DEFAULT_HOOK_INTERVAL: u32 = 1_000;

    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            hook_interval: Self::DEFAULT_HOOK_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_hook_interval(mut self, hook_interval: u32) -> Self {
        self.hook_interval = hook_interval.max(1);
        self
    }
}

impl UserData for CombatantHandle {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("id", |_, this| Ok(this.id().0));
        fields.add_field_method_get("name", |_, this| Ok(this.name()));
        fields.add_field_method_get("team", |_, this| Ok(this.team_name()));
        fields.add_field_method_get("max_hp", |_, this| Ok(this.max_hp()));
        fields.add_field_method_get("current_hp", |_, this| Ok(this.current_hp()));
        fields.add_field_method_get("hp", |_, this| Ok(this.current_hp()));
        fields.add_field_method_get("attack", |_, this| Ok(this.attack()));
        fields.add_field_method_get("defense", |_, this| Ok(this.defense()));
        fields.add_field_method_get("speed", |_, this| Ok(this.speed()));
        fields.add_field_method_get("x", |_, this| Ok(this.position().x));
        fields.add_field_method_get("y", |_, this| Ok(this.position().y));
        fields.add_field_method_get("position", |lua, this| {
            let position = this.position();
            let table = lua.create_table()?;
            table.set("x", position.x)?;
            table.set("y", position.y)?;
            Ok(table)
        });
        fields.add_field_method_get("is_alive", |_, this| Ok(this.is_alive()));
        fields.add_field_method_get("is_defending", |_, this| Ok(this.is_defending()));
        fields.add_field_method_get("abilities", |lua, this| {
            lua.create_sequence_from(this.abilities())
        });
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        // Fractional amounts truncate toward zero.
        methods.add_method("take_damage", |_, this, amount: f64| {
            this.take_damage(amount as i32)
                .map(|outcome| outcome.dealt)
                .map_err(mlua::Error::external)
        });
        methods.add_method("heal", |_, this, amount: f64| {
            this.heal(amount as i32)
                .map(|outcome| outcome.restored)
                .map_err(mlua::Error::external)
        });
        methods.add_method("set_position", |_, this, (x, y): (i32, i32)| {
            this.set_position(Position::new(x, y))
                .map_err(mlua::Error::external)
        });
        methods.add_method("defend", |_, this, ()| {
            this.defend().map_err(mlua::Error::external)
        });

        methods.add_meta_method(
            MetaMethod::Eq,
            |_, this, other: UserDataRef<CombatantHandle>| Ok(this.id() == other.id()),
        );
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!("{} ({}/{})", this.name(), this.current_hp(), this.max_hp()))
        });
    }
}

/// Script host running Lua sources from a [`ScriptLibrary`].
#[derive(Clone)]
pub struct LuaScriptHost {
    library: Arc<ScriptLibrary>,
    budget: Option<ScriptBudget>,
}

impl LuaScriptHost {
    pub fn new(library: Arc<ScriptLibrary>) -> Self {
        Self {
            library,
            budget: None,
        }
    }

    #[must_use]
    pub fn with_budget(mut self, budget: Option<ScriptBudget>) -> Self {
        self.budget = budget;
        self
    }

    fn source(&self, reference: &str) -> Result<Arc<str>, ScriptError> {
        self.library
            .load(reference)
            .map_err(|err| ScriptError::ScriptNotFound {
                reference: reference.to_string(),
                message: err.to_string(),
            })
    }
}

#[async_trait]
impl ScriptHost for LuaScriptHost {
    async fn run_ability_effect(
        &self,
        reference: &str,
        user: &Combatant,
        target: &Combatant,
    ) -> Result<AbilityEffect, ScriptError> {
        let source = self.source(reference)?;
        let call = AbilityCall {
            reference: reference.to_string(),
            source,
            budget: self.budget,
            user: user.clone(),
            target: target.clone(),
        };

        tokio::task::spawn_blocking(move || call.run())
            .await
            .map_err(|err| ScriptError::Worker(err.to_string()))?
    }

    async fn run_ai_decision(
        &self,
        reference: &str,
        actor: &Combatant,
        enemies: &[Combatant],
        allies: &[Combatant],
    ) -> Result<Option<AiDecision>, ScriptError> {
        let source = self.source(reference)?;
        let call = DecisionCall {
            reference: reference.to_string(),
            source,
            budget: self.budget,
            actor: actor.clone(),
            enemies: enemies.to_vec(),
            allies: allies.to_vec(),
        };

        tokio::task::spawn_blocking(move || call.run())
            .await
            .map_err(|err| ScriptError::Worker(err.to_string()))?
    }
}

struct AbilityCall {
    reference: String,
    source: Arc<str>,
    budget: Option<ScriptBudget>,
    user: Combatant,
    target: Combatant,
}

impl AbilityCall {
    fn run(self) -> Result<AbilityEffect, ScriptError> {
        let reference = self.reference.as_str();
        let lua = sandbox(reference).map_err(|err| ScriptError::runtime(reference, err.to_string()))?;
        let guard = BudgetGuard::arm(&lua, self.budget);
        let entry = load_entry_point(&lua, &guard, reference, &self.source, ABILITY_ENTRY_POINT)?;

        let mut arena = HandleArena::writable();
        let mut userdata = UserDataCache::default();
        let user = userdata
            .get(&lua, arena.handle(&self.user))
            .map_err(|err| guard.classify(reference, err))?;
        let target = userdata
            .get(&lua, arena.handle(&self.target))
            .map_err(|err| guard.classify(reference, err))?;

        let globals = lua.globals();
        globals
            .set("user", user.clone())
            .and_then(|()| globals.set("target", target.clone()))
            .and_then(|()| entry.call::<()>((user, target)))
            .map_err(|err| guard.classify(reference, err))?;

        let (combatants, effects) = arena.finish();
        Ok(AbilityEffect {
            combatants,
            effects,
        })
    }
}

struct DecisionCall {
    reference: String,
    source: Arc<str>,
    budget: Option<ScriptBudget>,
    actor: Combatant,
    enemies: Vec<Combatant>,
    allies: Vec<Combatant>,
}

impl DecisionCall {
    fn run(self) -> Result<Option<AiDecision>, ScriptError> {
        let reference = self.reference.as_str();
        let lua = sandbox(reference).map_err(|err| ScriptError::runtime(reference, err.to_string()))?;
        let guard = BudgetGuard::arm(&lua, self.budget);
        let entry = load_entry_point(&lua, &guard, reference, &self.source, AI_ENTRY_POINT)?;

        let returned = self
            .invoke(&lua, &entry)
            .map_err(|err| guard.classify(reference, err))?;

        let choice = parse_choice(reference, returned)?;
        choice
            .map(|choice| choice.resolve(reference, &self.enemies))
            .transpose()
    }

    fn invoke(&self, lua: &Lua, entry: &Function) -> mlua::Result<Value> {
        let mut arena = HandleArena::read_only();
        let mut userdata = UserDataCache::default();

        let me = userdata.get(lua, arena.handle(&self.actor))?;
        let enemies = userdata.sequence(lua, arena.handles(&self.enemies))?;
        let allies = userdata.sequence(lua, arena.handles(&self.allies))?;
        lua.globals().set("self", me.clone())?;

        entry.call::<Value>((me, enemies, allies))
    }
}

/// One userdata object per combatant so identity survives round trips
/// through Lua.
#[derive(Default)]
struct UserDataCache {
    objects: HashMap<CombatantId, AnyUserData>,
}

impl UserDataCache {
    fn get(&mut self, lua: &Lua, handle: CombatantHandle) -> mlua::Result<AnyUserData> {
        let id = handle.id();
        if let Some(existing) = self.objects.get(&id) {
            return Ok(existing.clone());
        }
        let object = lua.create_userdata(handle)?;
        self.objects.insert(id, object.clone());
        Ok(object)
    }

    fn sequence(&mut self, lua: &Lua, handles: Vec<CombatantHandle>) -> mlua::Result<Table> {
        let objects = handles
            .into_iter()
            .map(|handle| self.get(lua, handle))
            .collect::<mlua::Result<Vec<_>>>()?;
        lua.create_sequence_from(objects)
    }
}

/// Installs the budget hook for the lifetime of the guard.
struct BudgetGuard<'lua> {
    lua: &'lua Lua,
    budget: Option<ScriptBudget>,
    exceeded: Rc<Cell<bool>>,
}

impl<'lua> BudgetGuard<'lua> {
    fn arm(lua: &'lua Lua, budget: Option<ScriptBudget>) -> Self {
        let exceeded = Rc::new(Cell::new(false));

        if let Some(budget) = budget {
            let started = Instant::now();
            let flag = Rc::clone(&exceeded);
            lua.set_hook(
                HookTriggers::new().every_nth_instruction(budget.hook_interval.max(1)),
                move |lua, _debug| {
                    if started.elapsed() < budget.timeout {
                        return Ok(VmState::Continue);
                    }
                    flag.set(true);
                    // Once exhausted, every further instruction fails so that
                    // `pcall` cannot swallow the error and keep running.
                    lua.set_hook(HookTriggers::new().every_nth_instruction(1), move |_, _| {
                        Err(budget_exhausted(budget))
                    });
                    Err(budget_exhausted(budget))
                },
            );
        }

        Self {
            lua,
            budget,
            exceeded,
        }
    }

    fn classify(&self, reference: &str, err: mlua::Error) -> ScriptError {
        match self.budget {
            Some(budget) if self.exceeded.get() => ScriptError::Budget {
                reference: reference.to_string(),
                budget_ms: u64::try_from(budget.timeout.as_millis()).unwrap_or(u64::MAX),
            },
            _ => ScriptError::runtime(reference, err.to_string()),
        }
    }
}

fn budget_exhausted(budget: ScriptBudget) -> mlua::Error {
    mlua::Error::RuntimeError(format!(
        "script execution budget exceeded ({}ms)",
        budget.timeout.as_millis()
    ))
}

impl Drop for BudgetGuard<'_> {
    fn drop(&mut self) {
        if self.budget.is_some() {
            self.lua.remove_hook();
        }
    }
}

/// Creates an interpreter exposing only the whitelisted libraries.
fn sandbox(reference: &str) -> mlua::Result<Lua> {
    let lua = Lua::new_with(
        StdLib::MATH | StdLib::STRING | StdLib::TABLE,
        LuaOptions::default(),
    )?;

    let globals = lua.globals();
    for name in ["dofile", "loadfile", "load", "require", "collectgarbage"] {
        globals.set(name, Value::Nil)?;
    }

    let script = reference.to_string();
    let print = lua.create_function(move |_, args: Variadic<Value>| {
        let line = args.iter().map(describe).collect::<Vec<_>>().join("\t");
        tracing::info!(target: "battle::script", script = %script, "{line}");
        Ok(())
    })?;
    globals.set("print", print)?;

    Ok(lua)
}

fn load_entry_point(
    lua: &Lua,
    guard: &BudgetGuard<'_>,
    reference: &str,
    source: &str,
    entry_point: &'static str,
) -> Result<Function, ScriptError> {
    lua.load(source)
        .set_name(reference)
        .exec()
        .map_err(|err| guard.classify(reference, err))?;

    match lua.globals().get::<Value>(entry_point) {
        Ok(Value::Function(function)) => Ok(function),
        _ => Err(ScriptError::MissingEntryPoint {
            reference: reference.to_string(),
            entry_point,
        }),
    }
}

fn parse_choice(reference: &str, value: Value) -> Result<Option<AiChoice>, ScriptError> {
    let table = match value {
        Value::Nil => return Ok(None),
        Value::Table(table) => table,
        other => {
            return Err(ScriptError::malformed(
                reference,
                format!("expected a table, got {}", other.type_name()),
            ));
        }
    };

    let field = |name: &str| {
        table
            .get::<Value>(name)
            .map_err(|err| ScriptError::malformed(reference, err.to_string()))
    };

    let ability = match field("ability")? {
        Value::String(text) => text.to_string_lossy(),
        Value::Nil => return Err(ScriptError::malformed(reference, "missing `ability`")),
        other => {
            return Err(ScriptError::malformed(
                reference,
                format!("`ability` must be a string, got {}", other.type_name()),
            ));
        }
    };

    let target = match field("target")? {
        Value::Integer(index) => AiTarget::Index(index),
        Value::Number(index) if index.fract() == 0.0 => AiTarget::Index(index as i64),
        Value::UserData(object) => {
            let handle = object
                .borrow::<CombatantHandle>()
                .map_err(|_| ScriptError::malformed(reference, "`target` is not a combatant"))?;
            AiTarget::Combatant(handle.id())
        }
        Value::Nil => return Err(ScriptError::malformed(reference, "missing `target`")),
        other => {
            return Err(ScriptError::malformed(
                reference,
                format!("`target` must be an index or a combatant, got {}", other.type_name()),
            ));
        }
    };

    Ok(Some(AiChoice::new(ability, target)))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(flag) => flag.to_string(),
        Value::Integer(number) => number.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.to_string_lossy(),
        other => other.type_name().to_string(),
    }
}
