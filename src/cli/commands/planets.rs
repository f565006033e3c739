use super::truncate;
use crate::clients::DragonBallClient;
use crate::config::Config;
use crate::models::Planet;
use std::fmt;

pub async fn cmd_planets(config: &Config, all_pages: bool) -> anyhow::Result<()> {
    let client = DragonBallClient::new(&config.api)?;

    let planets = if all_pages {
        client.fetch_all_planets().await?
    } else {
        client.fetch_planets().await?
    };

    if planets.is_empty() {
        println!("No planets returned by {}", client.base_url());
        return Ok(());
    }

    print!("{}", PlanetListView(&planets));
    Ok(())
}

/// Terminal rendering of a planet list.
pub struct PlanetListView<'a>(pub &'a [Planet]);

impl fmt::Display for PlanetListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Planets ({} total)", self.0.len())?;
        writeln!(f, "{:-<60}", "")?;

        for planet in self.0 {
            let status = if planet.is_destroyed {
                "destroyed"
            } else {
                "intact"
            };
            writeln!(f, "• {} [{}] (ID: {})", planet.name, status, planet.id)?;
            if !planet.description.is_empty() {
                writeln!(f, "  {}", truncate(&planet.description, 200))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_destroyed_flag() {
        let planets = vec![
            Planet {
                id: 1,
                name: "Namek".to_string(),
                description: "Home of the Namekians".to_string(),
                image: String::new(),
                is_destroyed: true,
            },
            Planet {
                id: 2,
                name: "Earth".to_string(),
                description: String::new(),
                image: String::new(),
                is_destroyed: false,
            },
        ];

        let out = PlanetListView(&planets).to_string();
        assert!(out.starts_with("Planets (2 total)"));
        assert!(out.contains("• Namek [destroyed] (ID: 1)"));
        assert!(out.contains("  Home of the Namekians"));
        assert!(out.contains("• Earth [intact] (ID: 2)"));
    }
}
