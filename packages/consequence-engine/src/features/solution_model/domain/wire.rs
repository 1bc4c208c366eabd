//! Solver artifact wire format
//!
//! ```json
//! {
//!   "mappings": {"1": {"predicate": "pay_rent", "args": ["tenant"], "full": "pay_rent(tenant)", "type": "obligation"}},
//!   "solutions": [[1]],
//!   "num_solutions": 1,
//!   "satisfiable": true
//! }
//! ```

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level artifact as emitted by the compiler
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawArtifact {
    pub mappings: RawMappings,
    #[serde(default)]
    pub solutions: Vec<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_solutions: Option<usize>,
    /// Derived from `solutions` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfiable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawMapping {
    pub predicate: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Mapping table in document order
///
/// Kept as a list rather than a map so repeated keys survive parsing and can
/// be reported instead of silently overwriting each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMappings(pub Vec<(String, RawMapping)>);

impl RawMappings {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, RawMapping)> {
        self.0.iter()
    }
}

impl IntoIterator for RawMappings {
    type Item = (String, RawMapping);
    type IntoIter = std::vec::IntoIter<(String, RawMapping)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de> Deserialize<'de> for RawMappings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MappingsVisitor;

        impl<'de> Visitor<'de> for MappingsVisitor {
            type Value = RawMappings;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping predicate ids to predicate descriptions")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, RawMapping>()? {
                    entries.push((key, value));
                }
                Ok(RawMappings(entries))
            }
        }

        deserializer.deserialize_map(MappingsVisitor)
    }
}

impl Serialize for RawMappings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
