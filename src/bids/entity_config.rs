use super::*;
use serde::Deserialize;
use std::fs;

// Entity definitions used when no user configuration is given.
// Patterns are matched against the file path relative to the data set root (with a leading '/').
const DEFAULT_ENTITIES: &[(&str, &str)] = &[
    ("subject", r"[/\\]+sub-([a-zA-Z0-9]+)"),
    ("session", r"[_/\\]+ses-([a-zA-Z0-9]+)"),
    ("task", r"[_/\\]+task-([a-zA-Z0-9]+)"),
    ("acquisition", r"[_/\\]+acq-([a-zA-Z0-9]+)"),
    ("ceagent", r"[_/\\]+ce-([a-zA-Z0-9]+)"),
    ("reconstruction", r"[_/\\]+rec-([a-zA-Z0-9]+)"),
    ("direction", r"[_/\\]+dir-([a-zA-Z0-9]+)"),
    ("run", r"[_/\\]+run-0*(\d+)"),
    ("echo", r"[_/\\]+echo-([0-9]+)"),
    ("space", r"[_/\\]+space-([a-zA-Z0-9]+)"),
    ("atlas", r"[_/\\]+atlas-([a-zA-Z0-9]+)"),
    ("roi", r"[_/\\]+roi-([a-zA-Z0-9]+)"),
    ("label", r"[_/\\]+label-([a-zA-Z0-9]+)"),
    ("desc", r"[_/\\]+desc-([a-zA-Z0-9]+)"),
    ("datatype", r"[/\\]+(anat|func|dwi|fmap|perf|beh|figures)[/\\]+"),
    ("suffix", r"[._]*([a-zA-Z0-9]*?)\.[^/\\]+$"),
    ("extension", r"[._]*[a-zA-Z0-9]*?(\.[^/\\]+)$"),
];

/// A named regular expression extracting one attribute from a file path.
/// The first capture group holds the attribute value.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityPattern {
    pub name: String,
    pub pattern: String,
}

/// The set of entities known to the file discovery.
/// Its entity names form the vocabulary QC specifications are validated against.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityConfig {
    pub entities: Vec<EntityPattern>,
}

impl EntityConfig {
    /// Loads a JSON entity configuration of the form {"entities": [{"name": .., "pattern": ..}]}.
    /// Additional keys (as found in pybids configuration files) are ignored.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<EntityConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<EntityConfig> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn compile(&self) -> Result<EntityExtractor> {
        let mut patterns = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            let regex = Regex::new(&entity.pattern).map_err(|source| {
                DiscoveryError::InvalidEntityPattern {
                    name: entity.name.clone(),
                    source,
                }
            })?;
            patterns.push((entity.name.clone(), regex));
        }

        Ok(EntityExtractor { patterns })
    }
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            entities: DEFAULT_ENTITIES
                .iter()
                .map(|(name, pattern)| EntityPattern {
                    name: name.to_string(),
                    pattern: pattern.to_string(),
                })
                .collect(),
        }
    }
}

/// Compiled form of an EntityConfig.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: Vec<(String, Regex)>,
}

impl EntityExtractor {
    /// Extracts all entities found in the given relative path.
    /// Entities whose pattern does not match (or captures an empty value) are absent.
    pub fn extract(&self, relative_path: &str) -> BTreeMap<String, String> {
        let mut entities = BTreeMap::new();
        for (name, regex) in &self.patterns {
            let value = regex
                .captures(relative_path)
                .and_then(|captures| captures.get(1))
                .map(|value| value.as_str());
            if let Some(value) = value {
                if !value.is_empty() {
                    entities.insert(name.clone(), value.to_string());
                }
            }
        }

        entities
    }
}
