//! A resilient parser for Windower resource tables, the `items.lua` and
//! `item_descriptions.lua` Lua table literals shipped with FFXI tooling,
//! which it turns into one normalized, id-ascending JSON document.
//!
//! Parsing is best effort by design: malformed entry spans are skipped,
//! malformed scalars degrade to strings, and any input text produces a
//! document.
//!
//! # Example
//!
//! ```no_run
//! use luares::{DescriptionTable, ItemIndex, LuaresParser, ParserSettings};
//!
//! fn main() -> Result<(), luares::err::LuaresError> {
//!     let parser = LuaresParser::from_path("items.lua")?
//!         .with_configuration(ParserSettings::new().num_threads(1));
//!     let descriptions = DescriptionTable::from_path("item_descriptions.lua")?;
//!
//!     let index = ItemIndex::build(&parser, &descriptions);
//!     println!("{}", index.to_json(true)?);
//!     Ok(())
//! }
//! ```

pub mod err;

pub mod descriptions;
pub mod item_index;
pub mod item_record;
pub mod lua_fields;
pub mod lua_value;
pub mod luares_parser;
pub mod masks;

pub use crate::descriptions::{Description, DescriptionTable};
pub use crate::item_index::{FORMAT_VERSION, ItemIndex};
pub use crate::item_record::ItemRecord;
pub use crate::lua_fields::FieldMap;
pub use crate::lua_value::LuaValue;
pub use crate::luares_parser::{IterEntries, LuaresParser, RawEntry};

/// Settings that control how a parser walks a blob and how the resulting
/// index is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserSettings {
    /// Worker threads used while normalizing records.
    /// `0` means "number of cores", `1` forces the synchronous path.
    /// Only meaningful with the `multithreading` feature.
    pub(crate) num_threads: usize,
    /// Whether rendered JSON is indented.
    pub(crate) indent: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings {
            num_threads: 0,
            indent: true,
        }
    }
}

impl ParserSettings {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the number of worker threads. `0` lets the thread pool decide.
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Sets whether rendered JSON is indented.
    pub fn indent(mut self, pretty_output: bool) -> Self {
        self.indent = pretty_output;
        self
    }

    pub fn should_indent(&self) -> bool {
        self.indent
    }
}
