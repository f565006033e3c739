use super::{PlanetListView, truncate};
use crate::clients::{DragonBallApi, DragonBallClient, Paginated};
use crate::config::Config;
use crate::services::{LoadError, LoadState, ReadinessPolicy, Roster, RosterLoader};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub async fn cmd_roster(
    config: &Config,
    all_pages: bool,
    explicit_readiness: bool,
) -> anyhow::Result<()> {
    let client = DragonBallClient::new(&config.api)?;
    let policy = if explicit_readiness {
        ReadinessPolicy::Completed
    } else {
        config.loader.readiness
    };

    let state = if all_pages {
        await_roster(RosterLoader::new(Paginated(client), policy)).await?
    } else {
        await_roster(RosterLoader::new(client, policy)).await?
    };

    match state {
        LoadState::Ready(roster) => {
            print!("{}", RosterView(&roster));
            Ok(())
        }
        LoadState::Failed(err) => Err(err.into()),
        LoadState::Loading => {
            warn!(%policy, "Both fetches finished but the roster never became ready");
            print!("{}", still_loading_notice(policy));
            Ok(())
        }
    }
}

fn still_loading_notice(policy: ReadinessPolicy) -> String {
    let mut notice = format!(
        "Still loading under the {policy} readiness policy: characters or planets came back empty.\n"
    );
    if policy == ReadinessPolicy::NonEmpty {
        notice.push_str("Run with --explicit-readiness to show empty results.\n");
    }
    notice
}

/// Waits for the spawned load to settle. Returns the last published state
/// when both fetch tasks finish without settling it.
async fn await_roster<A: DragonBallApi + 'static>(
    loader: RosterLoader<A>,
) -> anyhow::Result<LoadState> {
    let cancellation = CancellationToken::new();
    let mut rx = loader.spawn(cancellation.clone());

    eprintln!("Loading characters and planets...");

    let settled = tokio::select! {
        result = rx.wait_for(|state| !state.is_loading()) => {
            result.map(|state| state.clone()).ok()
        }
        _ = tokio::signal::ctrl_c() => {
            cancellation.cancel();
            return Err(LoadError::Cancelled.into());
        }
    };

    Ok(settled.unwrap_or_else(|| rx.borrow().clone()))
}

/// Terminal rendering of a joined roster.
pub struct RosterView<'a>(pub &'a Roster);

impl fmt::Display for RosterView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roster = self.0;

        writeln!(f, "The Dragon Ball API")?;
        writeln!(f)?;
        writeln!(f, "Characters ({} total)", roster.len())?;
        writeln!(f, "{:-<60}", "")?;

        for entry in &roster.entries {
            let character = &entry.character;
            let origin = if entry.planet.is_destroyed {
                format!("{} (destroyed)", entry.planet.name)
            } else {
                entry.planet.name.clone()
            };

            writeln!(f, "• {} (ID: {})", character.name, character.id)?;
            writeln!(
                f,
                "  Race: {} | Gender: {}",
                character.race, character.gender
            )?;
            writeln!(f, "  Ki: {} | Max Ki: {}", character.ki, character.max_ki)?;
            writeln!(f, "  Affiliation: {}", character.affiliation)?;
            writeln!(f, "  Origin: {origin}")?;
            if !character.description.is_empty() {
                writeln!(f, "  {}", truncate(&character.description, 200))?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", PlanetListView(&roster.planets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Character, Planet};

    #[test]
    fn renders_characters_then_planets() {
        let characters = vec![
            Character {
                id: 1,
                name: "Goku".to_string(),
                ki: "60.000.000".to_string(),
                max_ki: "90 Septillion".to_string(),
                race: "Saiyan".to_string(),
                gender: "Male".to_string(),
                description: String::new(),
                image: String::new(),
                affiliation: "Z Fighter".to_string(),
                origin_planet_id: Some(3),
                transformations: Vec::new(),
            },
            Character {
                id: 2,
                name: "Bulma".to_string(),
                ki: "3".to_string(),
                max_ki: "3".to_string(),
                race: "Human".to_string(),
                gender: "Female".to_string(),
                description: String::new(),
                image: String::new(),
                affiliation: "Z Fighter".to_string(),
                origin_planet_id: None,
                transformations: Vec::new(),
            },
        ];
        let planets = vec![Planet {
            id: 3,
            name: "Vegeta".to_string(),
            description: String::new(),
            image: String::new(),
            is_destroyed: true,
        }];

        let out = RosterView(&Roster::build(&characters, &planets)).to_string();

        assert!(out.contains("Characters (2 total)"));
        assert!(out.contains("• Goku (ID: 1)"));
        assert!(out.contains("  Origin: Vegeta (destroyed)"));
        assert!(out.contains("  Origin: Unknown"));
        let characters_at = out.find("• Bulma").unwrap();
        let planets_at = out.find("Planets (1 total)").unwrap();
        assert!(characters_at < planets_at);
    }

    #[test]
    fn still_loading_notice_names_policy() {
        let non_empty = still_loading_notice(ReadinessPolicy::NonEmpty);
        assert!(non_empty.contains("under the non-empty readiness policy"));
        assert!(non_empty.contains("--explicit-readiness"));

        let completed = still_loading_notice(ReadinessPolicy::Completed);
        assert!(completed.contains("under the completed readiness policy"));
        assert!(!completed.contains("--explicit-readiness"));
    }
}
