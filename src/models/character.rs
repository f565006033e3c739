use super::planet::string_or_empty;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: i32,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub ki: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub max_ki: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub race: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub gender: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub affiliation: String,
    /// Foreign key into the planet collection. The wire format may embed the
    /// whole planet object; only its id is kept.
    #[serde(
        rename(serialize = "originPlanetId", deserialize = "originPlanet"),
        alias = "originPlanetId",
        default,
        deserialize_with = "origin_planet_id"
    )]
    pub origin_planet_id: Option<i32>,
    #[serde(default, deserialize_with = "transformations_or_empty")]
    pub transformations: Vec<Transformation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub id: i32,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub ki: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OriginPlanetRef {
    Id(i32),
    Embedded(EmbeddedPlanet),
}

#[derive(Deserialize)]
struct EmbeddedPlanet {
    id: i32,
}

fn origin_planet_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let reference = Option::<OriginPlanetRef>::deserialize(deserializer)?;
    Ok(reference.map(|r| match r {
        OriginPlanetRef::Id(id) => id,
        OriginPlanetRef::Embedded(planet) => planet.id,
    }))
}

fn transformations_or_empty<'de, D>(deserializer: D) -> Result<Vec<Transformation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Transformation>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Character {
    #[must_use]
    pub fn has_transformations(&self) -> bool {
        !self.transformations.is_empty()
    }
}
