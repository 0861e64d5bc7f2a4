use super::*;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    // More than one file of a group fits the same image slot.
    AmbiguousMatch {
        group: BTreeMap<String, String>,
        slot: SlotDescriptor,
        paths: Vec<PathBuf>,
    },
}
pub type Result<T> = std::result::Result<T, MatchError>;

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousMatch { group, slot, paths } => {
                let paths: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "Got {} matches for image {} in group {:?}, expected 1: [{}]",
                    paths.len(),
                    slot,
                    group,
                    paths.join(", ")
                )
            }
        }
    }
}
impl Error for MatchError {}
