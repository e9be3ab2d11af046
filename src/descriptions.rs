use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::err::{InputError, InputResult};
use crate::luares_parser::IterEntries;

/// A single item's localized description texts, already defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    pub en: String,
    pub ja: String,
}

/// Id-keyed lookup over the secondary `item_descriptions.lua` blob.
///
/// Built once up front, then only queried during the merge. An id with no
/// entry here simply gets no description attached.
#[derive(Debug, Default)]
pub struct DescriptionTable(BTreeMap<u32, Description>);

impl DescriptionTable {
    /// An empty table; every lookup misses.
    pub fn new() -> Self {
        DescriptionTable(BTreeMap::new())
    }

    /// Parses a descriptions blob with the same entry scanner used for
    /// items. Duplicate ids collapse to the last occurrence, missing texts
    /// default to `""`.
    pub fn parse(data: &str) -> Self {
        let mut table = BTreeMap::new();

        for entry in IterEntries::new(data) {
            let fields = entry.fields();
            table.insert(
                entry.id,
                Description {
                    en: fields.str_or_default("en"),
                    ja: fields.str_or_default("ja"),
                },
            );
        }

        debug!("collected {} descriptions", table.len());
        DescriptionTable(table)
    }

    /// Attempts to load and parse a descriptions blob from a path.
    pub fn from_path(path: impl AsRef<Path>) -> InputResult<Self> {
        let path = path.as_ref();
        let path = path
            .canonicalize()
            .map_err(|source| InputError::InvalidInputPath {
                source,
                path: path.to_string_lossy().into_owned(),
            })?;

        let data = fs::read_to_string(&path).map_err(|source| InputError::FailedToReadFile {
            source,
            path: path.clone(),
        })?;

        Ok(Self::parse(&data))
    }

    pub fn get(&self, id: u32) -> Option<&Description> {
        self.0.get(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
