use std::borrow::Cow;

use serde::Serialize;

use crate::descriptions::DescriptionTable;
use crate::lua_fields::FieldMap;
use crate::lua_value::LuaValue;
use crate::masks::{JOB_LABELS, RACE_LABELS, SLOT_LABELS, expand_mask};

/// The normalized form of one item entry.
///
/// Declaration order here is serialization order. Optional fields are
/// emitted only when the raw entry carried them; consumers detect equipment
/// by key presence, so an absent field must stay absent rather than
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    pub id: u32,
    pub en: String,
    pub ja: String,
    pub enl: String,
    pub jal: String,
    pub category: String,
    #[serde(rename = "type")]
    pub type_code: LuaValue<'static>,
    pub flags: LuaValue<'static>,
    pub stack: LuaValue<'static>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LuaValue<'static>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub races: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<LuaValue<'static>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<LuaValue<'static>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<LuaValue<'static>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shield_size: Option<LuaValue<'static>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_ja: Option<String>,
}

impl ItemRecord {
    /// Normalizes one entry's fields, expanding masks and attaching the
    /// matching description.
    ///
    /// `id` always comes from the entry's bracket key, never from an `id`
    /// field inside the body. Display names default to `""`, `stack` to `1`,
    /// and the mask fields decode to label lists (empty when the raw value
    /// is not an integer).
    pub fn from_fields(id: u32, fields: &FieldMap<'_>, descriptions: &DescriptionTable) -> Self {
        let (description_en, description_ja) = match descriptions.get(id) {
            Some(description) => (
                Some(description.en.clone()),
                Some(description.ja.clone()),
            ),
            None => (None, None),
        };

        ItemRecord {
            id,
            en: fields.str_or_default("en"),
            ja: fields.str_or_default("ja"),
            enl: fields.str_or_default("enl"),
            jal: fields.str_or_default("jal"),
            category: fields.str_or_default("category"),
            type_code: fields
                .scalar("type")
                .unwrap_or(LuaValue::Str(Cow::Borrowed(""))),
            flags: fields
                .scalar("flags")
                .unwrap_or(LuaValue::Str(Cow::Borrowed(""))),
            stack: fields.scalar("stack").unwrap_or(LuaValue::Int(1)),
            level: fields.scalar("level"),
            jobs: fields
                .get("jobs")
                .map(|mask| expand_mask(mask.as_int(), JOB_LABELS)),
            slots: fields
                .get("slots")
                .map(|mask| expand_mask(mask.as_int(), SLOT_LABELS)),
            races: fields
                .get("races")
                .map(|mask| expand_mask(mask.as_int(), RACE_LABELS)),
            damage: fields.scalar("damage"),
            delay: fields.scalar("delay"),
            skill: fields.scalar("skill"),
            shield_size: fields.scalar("shield_size"),
            description_en,
            description_ja,
        }
    }
}
