use crate::clients::DragonBallClient;
use crate::config::Config;
use crate::models::{Character, Planet};
use crate::services::PlanetLookup;
use std::fmt;
use tracing::warn;

pub async fn cmd_character(config: &Config, id: i32) -> anyhow::Result<()> {
    let client = DragonBallClient::new(&config.api)?;

    let (character, planets) = tokio::join!(client.fetch_character(id), client.fetch_planets());

    let character = character?;
    let planets = planets.unwrap_or_else(|e| {
        warn!("Failed to fetch planets: {}", e);
        Vec::new()
    });

    let lookup = PlanetLookup::new(&planets);
    let origin = lookup.resolve(&character);

    print!("{}", CharacterView { character: &character, origin });
    Ok(())
}

/// Terminal rendering of a single character with its resolved origin.
pub struct CharacterView<'a> {
    pub character: &'a Character,
    pub origin: &'a Planet,
}

impl fmt::Display for CharacterView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.character;

        writeln!(f, "Character Info")?;
        writeln!(f, "{:-<60}", "")?;
        writeln!(f, "Name:        {}", c.name)?;
        writeln!(f, "ID:          {}", c.id)?;
        writeln!(f, "Race:        {}", c.race)?;
        writeln!(f, "Gender:      {}", c.gender)?;
        writeln!(f, "Ki:          {}", c.ki)?;
        writeln!(f, "Max Ki:      {}", c.max_ki)?;
        writeln!(f, "Affiliation: {}", c.affiliation)?;
        if self.origin.is_destroyed {
            writeln!(f, "Origin:      {} (destroyed)", self.origin.name)?;
        } else {
            writeln!(f, "Origin:      {}", self.origin.name)?;
        }
        if !c.image.is_empty() {
            writeln!(f, "Image:       {}", c.image)?;
        }
        if !c.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", c.description)?;
        }

        writeln!(f)?;
        if c.has_transformations() {
            writeln!(f, "Transformations ({}):", c.transformations.len())?;
            for t in &c.transformations {
                writeln!(f, "  - {} | Ki: {}", t.name, t.ki)?;
            }
        } else {
            writeln!(f, "No transformations.")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transformation;

    fn goku() -> Character {
        Character {
            id: 1,
            name: "Goku".to_string(),
            ki: "60.000.000".to_string(),
            max_ki: "90 Septillion".to_string(),
            race: "Saiyan".to_string(),
            gender: "Male".to_string(),
            description: "Protagonist".to_string(),
            image: String::new(),
            affiliation: "Z Fighter".to_string(),
            origin_planet_id: Some(3),
            transformations: vec![Transformation {
                id: 1,
                name: "Goku SSJ".to_string(),
                ki: "3 Billion".to_string(),
                image: String::new(),
            }],
        }
    }

    #[test]
    fn renders_transformations_and_origin() {
        let character = goku();
        let origin = Planet::unknown();

        let out = CharacterView {
            character: &character,
            origin: &origin,
        }
        .to_string();

        assert!(out.contains("Name:        Goku"));
        assert!(out.contains("Origin:      Unknown"));
        assert!(out.contains("Transformations (1):"));
        assert!(out.contains("  - Goku SSJ | Ki: 3 Billion"));
        assert!(!out.contains("Image:"));
    }

    #[test]
    fn renders_without_transformations() {
        let mut character = goku();
        character.transformations.clear();
        let origin = Planet::unknown();

        let out = CharacterView {
            character: &character,
            origin: &origin,
        }
        .to_string();

        assert!(out.contains("No transformations."));
    }
}
