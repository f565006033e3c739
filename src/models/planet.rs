use serde::{Deserialize, Deserializer, Serialize};

/// Id carried by the placeholder planet used when a character's origin
/// cannot be resolved.
pub const UNKNOWN_PLANET_ID: i32 = -1;

pub const UNKNOWN_PLANET_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub id: i32,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image: String,
    #[serde(default)]
    pub is_destroyed: bool,
}

impl Planet {
    /// The sentinel planet substituted for missing or dangling origin
    /// references.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            id: UNKNOWN_PLANET_ID,
            name: UNKNOWN_PLANET_NAME.to_string(),
            description: String::new(),
            image: String::new(),
            is_destroyed: false,
        }
    }

    /// Whether this is exactly the sentinel. An API planet that happens to
    /// use id -1 is not.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.id == UNKNOWN_PLANET_ID
            && self.name == UNKNOWN_PLANET_NAME
            && self.description.is_empty()
            && self.image.is_empty()
            && !self.is_destroyed
    }
}

/// The API sends `null` for some text fields; treat those like an absent
/// field.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_planet() {
        let json = r#"{
            "id": 3,
            "name": "Vegeta",
            "isDestroyed": true,
            "description": "Home world of the Saiyans",
            "image": "https://dragonball-api.com/planetas/vegeta.webp",
            "deletedAt": null
        }"#;

        let planet: Planet = serde_json::from_str(json).unwrap();
        assert_eq!(planet.id, 3);
        assert_eq!(planet.name, "Vegeta");
        assert!(planet.is_destroyed);
        assert!(!planet.is_unknown());
    }

    #[test]
    fn missing_fields_default() {
        let planet: Planet = serde_json::from_str(r#"{"id": 7, "description": null}"#).unwrap();
        assert_eq!(planet.id, 7);
        assert!(planet.name.is_empty());
        assert!(planet.description.is_empty());
        assert!(!planet.is_destroyed);
    }

    #[test]
    fn sentinel_shape() {
        let unknown = Planet::unknown();
        assert_eq!(unknown.id, -1);
        assert_eq!(unknown.name, "Unknown");
        assert!(unknown.description.is_empty());
        assert!(unknown.image.is_empty());
        assert!(!unknown.is_destroyed);
        assert!(unknown.is_unknown());
    }

    #[test]
    fn real_planet_with_sentinel_id_is_not_unknown() {
        let planet = Planet {
            id: UNKNOWN_PLANET_ID,
            name: "Planet X".to_string(),
            description: String::new(),
            image: String::new(),
            is_destroyed: false,
        };
        assert!(!planet.is_unknown());
    }
}
