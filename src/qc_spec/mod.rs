//! The declarative QC specification: which images form a QC entity, how rows and
//! columns of the QC table are named and which ratings a component offers.
//!
//! Specifications are JSON documents, e.g.
//!
//! {
//!   "ImageExtensions": [".svg"],
//!   "RowDescription": {"name": "sub-${subject}", "entities": ["subject"]},
//!   "Components": [{
//!     "entities": ["subject"],
//!     "name": "sub-${subject}_anat",
//!     "column": "anat",
//!     "images": [{"desc": "T1"}, {"desc": "mask"}],
//!     "ratings": ["Pass", "Fail", "Uncertain"]
//!   }]
//! }
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::bids::EntityConfig;

pub mod template;
pub use self::template::{Template, TemplateError};
mod errors;
pub use self::errors::*;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QcSpec {
    #[serde(rename = "ImageExtensions")]
    pub image_extensions: Vec<String>,
    #[serde(rename = "RowDescription")]
    pub row_description: RowDescription,
    #[serde(rename = "Components")]
    pub components: Vec<ComponentSpec>,
}

/// Names the rows of the QC table. Shared by all components of a specification.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowDescription {
    pub name: Template,
    pub entities: Vec<String>,
}

impl RowDescription {
    pub fn row_name(&self, bindings: &BTreeMap<String, String>) -> template::Result<String> {
        self.name.resolve_restricted(bindings, &self.entities)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    /// Entities used to group image files into QC entities.
    pub entities: Vec<String>,
    pub name: Template,
    pub column: Template,
    pub images: Vec<SlotDescriptor>,
    pub ratings: Vec<String>,
}

/// A partial entity map describing one expected image of a QC entity.
/// A file fills the slot if it has all of the slot's entities with equal values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SlotDescriptor {
    pub pattern: BTreeMap<String, String>,
}

impl fmt::Display for SlotDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<_> = self
            .pattern
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

/// The entity names a specification may refer to.
/// Built per validation from the active entity configuration.
#[derive(Debug, Clone)]
pub struct EntityVocabulary {
    names: BTreeSet<String>,
}

impl EntityVocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &EntityConfig) -> Self {
        Self::new(config.names())
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn check(&self, location: &str, names: &[String]) -> Result<()> {
        match names.iter().find(|name| !self.is_valid(name)) {
            Some(name) => Err(SpecError::UnknownEntity {
                location: location.to_string(),
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl QcSpec {
    /// Reads, parses and validates the specification file at the given path.
    pub fn load<P: AsRef<Path>>(path: P, vocabulary: &EntityVocabulary) -> Result<QcSpec> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content, vocabulary)
    }

    pub fn from_json(content: &str, vocabulary: &EntityVocabulary) -> Result<QcSpec> {
        let spec: QcSpec = serde_json::from_str(content)?;
        spec.validate(vocabulary)?;

        Ok(spec)
    }

    /// Checks that all entity names are part of the vocabulary and that every template
    /// placeholder is covered by the entities available when the template is resolved.
    pub fn validate(&self, vocabulary: &EntityVocabulary) -> Result<()> {
        if self.image_extensions.is_empty() {
            return Err(SpecError::InvalidShape {
                location: "ImageExtensions".to_string(),
                message: "at least one image extension is required",
            });
        }

        let row = &self.row_description;
        vocabulary.check("RowDescription.entities", &row.entities)?;
        check_coverage("RowDescription.name", &row.name, &row.entities)?;

        for (index, component) in self.components.iter().enumerate() {
            let location = format!("Components[{}]", index);
            if component.images.is_empty() {
                return Err(SpecError::InvalidShape {
                    location: format!("{}.images", location),
                    message: "at least one image descriptor is required",
                });
            }

            vocabulary.check(&format!("{}.entities", location), &component.entities)?;
            for (slot_index, slot) in component.images.iter().enumerate() {
                let keys: Vec<String> = slot.pattern.keys().cloned().collect();
                vocabulary.check(&format!("{}.images[{}]", location, slot_index), &keys)?;
            }

            check_coverage(&format!("{}.name", location), &component.name, &component.entities)?;
            check_coverage(
                &format!("{}.column", location),
                &component.column,
                &component.entities,
            )?;
            // Row names are resolved from the component's group entities.
            check_coverage(
                &format!("RowDescription.name (for {})", location),
                &row.name,
                &component.entities,
            )?;
        }

        Ok(())
    }
}

fn check_coverage(location: &str, template: &Template, entities: &[String]) -> Result<()> {
    match template
        .placeholders()
        .into_iter()
        .find(|key| !entities.iter().any(|entity| entity.as_str() == *key))
    {
        Some(key) => Err(SpecError::UncoveredPlaceholder {
            location: location.to_string(),
            template: template.as_str().to_string(),
            key: key.to_string(),
        }),
        None => Ok(()),
    }
}
