use std::collections::BTreeSet;

use super::SetupError;
use crate::roster::Roster;
use crate::state::{BattleState, Combatant, CombatantId, Team, TeamId};

/// Instantiates the selected teams into a fresh battle.
///
/// Teams keep the selection order and members keep their file order, which
/// fixes every [`CombatantId`]. Each combatant is a deep copy of its blueprint
/// at full HP with no stance. Fails fast on the first invalid reference.
pub fn setup_battle<S: AsRef<str>>(
    roster: &Roster,
    selection: &[S],
) -> Result<BattleState, SetupError> {
    if selection.len() < 2 {
        return Err(SetupError::NotEnoughTeams(selection.len()));
    }
    if selection.len() > usize::from(u8::MAX) + 1 {
        return Err(SetupError::TooManyTeams {
            max: usize::from(u8::MAX) + 1,
        });
    }

    let mut seen = BTreeSet::new();
    let mut teams = Vec::with_capacity(selection.len());
    let mut combatants = Vec::new();

    for (team_index, team_key) in selection.iter().enumerate() {
        let team_key = team_key.as_ref();
        if !seen.insert(team_key) {
            return Err(SetupError::DuplicateTeam(team_key.to_string()));
        }

        let definition = roster
            .teams
            .get(team_key)
            .ok_or_else(|| SetupError::UnknownTeam(team_key.to_string()))?;
        roster.validate_team(team_key, definition)?;

        let team_id = TeamId(team_index as u8);
        let controller = definition.resolve_controller(&roster.characters);
        let mut team = Team::new(team_id, definition.name.clone(), controller);

        for member in &definition.members {
            let blueprint = roster.characters.get(member).ok_or_else(|| {
                SetupError::UnknownCharacter {
                    team: team_key.to_string(),
                    character: member.clone(),
                }
            })?;
            roster.validate_character(member, blueprint)?;

            let id = u16::try_from(combatants.len())
                .map(CombatantId)
                .map_err(|_| SetupError::TooManyCombatants {
                    max: usize::from(u16::MAX) + 1,
                })?;

            let mut combatant = Combatant::from_blueprint(id, team_id, &definition.name, blueprint);
            combatant.reset_for_battle();

            team.members.push(id);
            combatants.push(combatant);
        }

        teams.push(team);
    }

    Ok(BattleState::new(teams, combatants))
}
