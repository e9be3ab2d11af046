//! Bitmask label tables for the three categorical item fields.
//!
//! Bit positions are fixed by the game client and must not be reordered.

/// Job labels, bit 0 = WAR through bit 21 = RUN.
pub const JOB_LABELS: &[&str] = &[
    "WAR", "MNK", "WHM", "BLM", "RDM", "THF", "PLD", "DRK", "BST", "BRD", "RNG", "SAM", "NIN",
    "DRG", "SMN", "BLU", "COR", "PUP", "DNC", "SCH", "GEO", "RUN",
];

/// Equipment slot labels, bit 0 = main hand through bit 15 = back.
pub const SLOT_LABELS: &[&str] = &[
    "main", "sub", "range", "ammo", "head", "body", "hands", "legs", "feet", "neck", "waist",
    "ear1", "ear2", "ring1", "ring2", "back",
];

/// Race and gender labels, bit 0 = male Hume through bit 8 = Galka.
pub const RACE_LABELS: &[&str] = &[
    "Hum_M", "Hum_F", "Elv_M", "Elv_F", "Tar_M", "Tar_F", "Mit_M", "Mit_F", "Gal",
];

/// Expands a bitmask into the labels of its set bits, ascending by position.
///
/// `None` (the field was present but not an integer) expands to an empty
/// list. Bits past the end of `labels` are ignored.
pub fn expand_mask(mask: Option<i64>, labels: &'static [&'static str]) -> Vec<&'static str> {
    let Some(mask) = mask else {
        return Vec::new();
    };

    labels
        .iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, &label)| label)
        .collect()
}
