use log::info;
#[cfg(feature = "multithreading")]
use log::warn;
#[cfg(feature = "multithreading")]
use rayon::prelude::*;
use serde::Serialize;

use crate::ParserSettings;
use crate::descriptions::DescriptionTable;
use crate::err::SerializationResult;
use crate::item_record::ItemRecord;
use crate::lua_fields::FieldMap;
use crate::luares_parser::LuaresParser;

/// Version tag emitted at the top of every index document.
pub const FORMAT_VERSION: u32 = 1;

/// The complete output document: every surviving item, normalized, ascending
/// by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemIndex {
    pub version: u32,
    pub item_count: usize,
    pub records: Vec<ItemRecord>,
}

impl ItemIndex {
    /// Builds the index from a parsed items blob and a description table.
    ///
    /// Duplicate item ids collapse to the last occurrence before
    /// normalization, so every id appears exactly once in the output.
    /// Descriptions are attached by id where one exists; an unmatched
    /// description contributes nothing.
    pub fn build(parser: &LuaresParser, descriptions: &DescriptionTable) -> ItemIndex {
        let tables: Vec<(u32, FieldMap)> = parser.tables().into_iter().collect();
        info!("normalizing {} items", tables.len());

        let records = normalize_all(&tables, descriptions, parser.settings());

        ItemIndex {
            version: FORMAT_VERSION,
            item_count: records.len(),
            records,
        }
    }

    /// Serializes the document, indented or compact.
    pub fn to_json(&self, indent: bool) -> SerializationResult<String> {
        let data = if indent {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };

        Ok(data)
    }
}

#[cfg(feature = "multithreading")]
fn normalize_all(
    tables: &[(u32, FieldMap)],
    descriptions: &DescriptionTable,
    settings: &ParserSettings,
) -> Vec<ItemRecord> {
    if settings.num_threads == 1 {
        return normalize_sequential(tables, descriptions);
    }

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(settings.num_threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!("failed to create thread pool, falling back to single threaded mode: {e}");
            return normalize_sequential(tables, descriptions);
        }
    };

    // Indexed parallel map over the sorted pairs, so record order is the
    // key order.
    pool.install(|| {
        tables
            .par_iter()
            .map(|(id, fields)| ItemRecord::from_fields(*id, fields, descriptions))
            .collect()
    })
}

#[cfg(not(feature = "multithreading"))]
fn normalize_all(
    tables: &[(u32, FieldMap)],
    descriptions: &DescriptionTable,
    _settings: &ParserSettings,
) -> Vec<ItemRecord> {
    normalize_sequential(tables, descriptions)
}

fn normalize_sequential(
    tables: &[(u32, FieldMap)],
    descriptions: &DescriptionTable,
) -> Vec<ItemRecord> {
    tables
        .iter()
        .map(|(id, fields)| ItemRecord::from_fields(*id, fields, descriptions))
        .collect()
}
