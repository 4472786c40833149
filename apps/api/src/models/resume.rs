use serde::{Deserialize, Deserializer, Serialize};

/// One structured extraction result; the unit of storage.
///
/// Always serialized with exactly these five keys. Missing keys and `null`
/// values deserialize to their empty defaults so a single hand-edited entry
/// does not make the rest of the store unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    /// Order is the language model's output order; duplicates are kept.
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResumeRecord {
    /// Skills flattened to a single display string, as searched and exported.
    pub fn skills_display(&self) -> String {
        self.skills.join(", ")
    }

    pub fn experience_display(&self) -> String {
        self.experience.join(" | ")
    }
}
