use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, trace};

use crate::ParserSettings;
use crate::err::{InputError, InputResult};
use crate::lua_fields::FieldMap;

/// A parser over one resource blob, the `[<id>] = { ... }` table literals
/// found in Windower's `items.lua` and its sibling files.
///
/// The parser owns the source text; entries and their fields borrow from it.
pub struct LuaresParser {
    data: String,
    config: ParserSettings,
}

impl LuaresParser {
    /// Attempts to load a parser from a filesystem path.
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

        Ok(Self::from_string(data))
    }

    /// Attempts to load a parser from a buffer, which must be UTF-8.
    pub fn from_buffer(buffer: Vec<u8>) -> InputResult<Self> {
        let data =
            String::from_utf8(buffer).map_err(|source| InputError::InputNotUtf8 { source })?;

        Ok(Self::from_string(data))
    }

    pub fn from_string(data: String) -> Self {
        LuaresParser {
            data,
            config: ParserSettings::default(),
        }
    }

    pub fn with_configuration(mut self, configuration: ParserSettings) -> Self {
        self.config = configuration;
        self
    }

    pub(crate) fn settings(&self) -> &ParserSettings {
        &self.config
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// A single forward scan over the source. Entries come back in source
    /// order, duplicates included; a fresh iterator restarts from the top.
    pub fn entries(&self) -> IterEntries<'_> {
        IterEntries::new(&self.data)
    }

    /// Collects all entries into an id-keyed map, the later of two duplicate
    /// ids winning.
    pub fn tables(&self) -> BTreeMap<u32, FieldMap<'_>> {
        let mut tables = BTreeMap::new();
        let mut entries = self.entries();

        for entry in entries.by_ref() {
            tables.insert(entry.id, entry.fields());
        }

        if entries.skipped() > 0 {
            debug!("skipped {} malformed entry spans", entries.skipped());
        }

        tables
    }
}

/// One `[<id>] = { ... }` unit lifted out of the source text, body not yet
/// tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry<'a> {
    pub id: u32,
    pub body: &'a str,
}

impl<'a> RawEntry<'a> {
    pub fn fields(&self) -> FieldMap<'a> {
        FieldMap::parse(self.body)
    }
}

/// Lazy iterator over the entries of a resource blob.
///
/// A candidate starts at `[` followed by a digit. When a candidate turns out
/// malformed (bad key, missing `= {`, or an unterminated body) the scan
/// resynchronizes at the byte after its `[`, so entries nested in a damaged
/// span are still recovered.
pub struct IterEntries<'a> {
    data: &'a str,
    pos: usize,
    skipped: usize,
}

impl<'a> IterEntries<'a> {
    pub(crate) fn new(data: &'a str) -> Self {
        IterEntries {
            data,
            pos: 0,
            skipped: 0,
        }
    }

    /// Number of candidates discarded as malformed so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<'a> Iterator for IterEntries<'a> {
    type Item = RawEntry<'a>;

    fn next(&mut self) -> Option<RawEntry<'a>> {
        let bytes = self.data.as_bytes();

        while let Some(found) = self.data[self.pos..].find('[') {
            let open = self.pos + found;

            if open + 1 >= bytes.len() || !bytes[open + 1].is_ascii_digit() {
                self.pos = open + 1;
                continue;
            }

            match scan_entry(self.data, open) {
                Some((id, body, resume)) => {
                    trace!("entry [{id}] at offset {open}");
                    self.pos = resume;
                    return Some(RawEntry { id, body });
                }
                None => {
                    debug!("malformed entry candidate at offset {open}, rescanning");
                    self.skipped += 1;
                    self.pos = open + 1;
                }
            }
        }

        self.pos = self.data.len();
        None
    }
}

/// Scans one candidate starting at `open` (a `[` with a digit after it).
///
/// Returns the entry id, its body slice and the position right after the
/// closing brace, or `None` when the candidate is malformed.
fn scan_entry(data: &str, open: usize) -> Option<(u32, &str, usize)> {
    let bytes = data.as_bytes();

    let mut i = open + 1;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b']' {
        return None;
    }
    // Bad keys include ids too large for the record set.
    let id = data[open + 1..i].parse::<u32>().ok()?;
    i += 1;

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'=' {
        return None;
    }
    i += 1;

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'{' {
        return None;
    }

    let body_start = i + 1;
    let mut depth = 1usize;
    for (rel, &b) in bytes[body_start..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let close = body_start + rel;
                    return Some((id, &data[body_start..close], close + 1));
                }
            }
            _ => {}
        }
    }

    // Ran off the end of the blob with the body still open.
    None
}
