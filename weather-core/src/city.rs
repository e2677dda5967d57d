use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

/// Cities known out of the box, in listing order.
pub const BUILTIN_CITIES: &[(&str, &str)] = &[
    ("北京", "101010100"),
    ("上海", "101020100"),
    ("武汉", "101200101"),
    ("郑州", "101180101"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityEntry {
    pub display_name: String,
    pub provider_id: String,
}

/// The requested city is not in the table.
///
/// Carries every supported display name so callers can suggest one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported city '{city}'")]
pub struct UnsupportedCity {
    pub city: String,
    pub supported: Vec<String>,
}

impl UnsupportedCity {
    /// Supported names joined the way the reports list them.
    pub fn supported_list(&self) -> String {
        self.supported.join("、")
    }
}

/// Immutable city name -> provider id table.
///
/// Lookups are exact: no trimming, case folding or aliasing.
#[derive(Debug, Clone)]
pub struct CityTable {
    entries: Vec<CityEntry>,
    index: HashMap<String, usize>,
}

impl CityTable {
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_CITIES.iter().map(|(name, id)| (*name, *id)))
    }

    /// Build a table from `(display name, provider id)` pairs.
    ///
    /// A repeated name keeps its first position and takes the last id.
    pub fn from_entries<I, N, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for (name, id) in entries {
            table.insert(name.into(), id.into());
        }
        table
    }

    /// Built-in cities extended with configured ones.
    pub fn builtin_with(extra: &BTreeMap<String, String>) -> Self {
        let mut table = Self::builtin();
        for (name, id) in extra {
            table.insert(name.clone(), id.clone());
        }
        table
    }

    fn insert(&mut self, display_name: String, provider_id: String) {
        match self.index.get(&display_name) {
            Some(&pos) => self.entries[pos].provider_id = provider_id,
            None => {
                self.index.insert(display_name.clone(), self.entries.len());
                self.entries.push(CityEntry {
                    display_name,
                    provider_id,
                });
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Result<&str, UnsupportedCity> {
        self.index
            .get(name)
            .map(|&pos| self.entries[pos].provider_id.as_str())
            .ok_or_else(|| UnsupportedCity {
                city: name.to_string(),
                supported: self.display_names(),
            })
    }

    pub fn display_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.display_name.clone()).collect()
    }

    pub fn entries(&self) -> &[CityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CityTable {
    fn default() -> Self {
        Self::builtin()
    }
}
