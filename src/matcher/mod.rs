//! Groups discovered image files into QC entities as described by one component
//! of the QC specification.
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, error};

use crate::bids::FileRecord;
use crate::qc_spec::{template, ComponentSpec, RowDescription, SlotDescriptor, Template};

mod errors;
pub use self::errors::*;

/// One ratable unit before it is written to the QC database.
/// Names are derived lazily from the component's templates.
#[derive(Debug, Clone, PartialEq)]
pub struct QcEntity<'a> {
    /// Matched image paths in image slot order, unmatched slots are left out.
    pub images: Vec<PathBuf>,
    /// The values of the component's group entities.
    pub entities: BTreeMap<String, String>,
    pub name_template: &'a Template,
    pub column_template: &'a Template,
}

impl<'a> QcEntity<'a> {
    pub fn name(&self) -> template::Result<String> {
        self.name_template.resolve(&self.entities)
    }

    pub fn column_name(&self) -> template::Result<String> {
        self.column_template.resolve(&self.entities)
    }

    pub fn row_name(&self, row_description: &RowDescription) -> template::Result<String> {
        row_description.row_name(&self.entities)
    }
}

/// Groups all files having every one of the given entities by their values for these entities.
/// Files missing any of the entities are dropped. Groups are ordered by their key.
pub fn group_by_entities<'f>(
    files: &'f [FileRecord],
    keys: &[String],
) -> BTreeMap<Vec<String>, Vec<&'f FileRecord>> {
    let mut groups: BTreeMap<Vec<String>, Vec<&'f FileRecord>> = BTreeMap::new();
    for file in files.iter().filter(|file| file.has_entities(keys)) {
        let key = keys.iter().map(|key| file.entities[key].clone()).collect();
        groups.entry(key).or_insert_with(Vec::new).push(file);
    }

    groups
}

/// Finds the single file of a group that fits the image slot.
/// No match is not an error (the image is simply missing), multiple matches are.
pub fn find_match<'f>(
    group: &[&'f FileRecord],
    slot: &SlotDescriptor,
    group_entities: &BTreeMap<String, String>,
) -> Result<Option<&'f FileRecord>> {
    let matches: Vec<&'f FileRecord> = group
        .iter()
        .cloned()
        .filter(|file| file.matches(&slot.pattern))
        .collect();

    match matches.len() {
        0 => {
            debug!("Found 0 matches for {} in group {:?}", slot, group_entities);
            Ok(None)
        }
        1 => Ok(Some(matches[0])),
        n => {
            error!("Got {} matches to image {}, expected 1!", n, slot);
            let mut paths: Vec<PathBuf> = matches.iter().map(|file| file.path.clone()).collect();
            paths.sort();
            Err(MatchError::AmbiguousMatch {
                group: group_entities.clone(),
                slot: slot.clone(),
                paths,
            })
        }
    }
}

/// Builds all QC entities of one component from the discovered files.
///
/// Every group of files (see group_by_entities) yields one QC entity if at least one of the
/// component's image slots is filled. Any ambiguous slot fails the whole component.
pub fn build_qc_entities<'a>(
    files: &[FileRecord],
    component: &'a ComponentSpec,
) -> Result<Vec<QcEntity<'a>>> {
    let mut qc_entities = Vec::new();

    for (key, group) in group_by_entities(files, &component.entities) {
        let group_entities: BTreeMap<String, String> = component
            .entities
            .iter()
            .cloned()
            .zip(key.into_iter())
            .collect();

        let mut matched = Vec::with_capacity(component.images.len());
        for slot in &component.images {
            if let Some(file) = find_match(&group, slot, &group_entities)? {
                matched.push(file);
            }
        }

        // Groups without a single image are not worth rating.
        if let Some(first) = matched.first() {
            qc_entities.push(QcEntity {
                images: matched.iter().map(|file| file.path.clone()).collect(),
                entities: component
                    .entities
                    .iter()
                    .map(|key| (key.clone(), first.entities[key].clone()))
                    .collect(),
                name_template: &component.name,
                column_template: &component.column,
            });
        }
    }

    Ok(qc_entities)
}
