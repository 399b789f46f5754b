//! Builds a [`SkillDatabase`] from a parsed schema.
//!
//! The schema has two required top-level mappings:
//!
//! ```json
//! {
//!     "skills": {
//!         "agitator": { "name": "Agitator", "limit": 5, "secret_limit": 7, "states": 2 }
//!     },
//!     "set_bonuses": {
//!         "teostra_blaze": {
//!             "name": "Teostra Technique",
//!             "stages": [ { "parts": 2, "skill": "master_touch" } ]
//!         }
//!     }
//! }
//! ```
//!
//! All skills are built before any set bonus stage is resolved, so a set
//! bonus may name a skill declared anywhere in the document.

use crate::loader::DataLoadError;
use crate::model::{
    EntityKind, MINIMUM_SKILL_STATES, SetBonus, SetBonusStage, Skill, SkillDatabase,
    SkillDatabaseBuilder, derive_symbol,
};
use crate::raw::RawValue;

const DOCUMENT_OWNER: &str = "schema document";

type Entries = [(String, RawValue)];

/// Build the database from a schema value.
pub fn build_database(root: &RawValue) -> Result<SkillDatabase, DataLoadError> {
    let root = expect_object(root, DOCUMENT_OWNER, "<root>")?;
    let skills = expect_object(
        required(root, DOCUMENT_OWNER, "skills")?,
        DOCUMENT_OWNER,
        "skills",
    )?;
    let set_bonuses = expect_object(
        required(root, DOCUMENT_OWNER, "set_bonuses")?,
        DOCUMENT_OWNER,
        "set_bonuses",
    )?;

    let mut builder = SkillDatabaseBuilder::new();

    for (id, entry) in skills {
        builder.register_skill(parse_skill(id, entry)?)?;
    }
    for (id, entry) in set_bonuses {
        let set_bonus = parse_set_bonus(id, entry, &builder)?;
        builder.register_set_bonus(set_bonus)?;
    }

    let db = builder.build();
    tracing::info!(
        skills = db.skills().len(),
        set_bonuses = db.set_bonuses().len(),
        "built skill database"
    );
    Ok(db)
}

fn parse_skill(id: &str, entry: &RawValue) -> Result<Skill, DataLoadError> {
    let owner = EntityKind::Skill.describe(id);
    let fields = expect_object(entry, &owner, id)?;

    let name = expect_str(required(fields, &owner, "name")?, &owner, "name")?;
    let normal_limit = expect_u32(required(fields, &owner, "limit")?, &owner, "limit")?;
    let secret_limit = match optional(fields, "secret_limit") {
        Some(v) => expect_u32(v, &owner, "secret_limit")?,
        None => normal_limit,
    };
    // The floor only applies to the default; an explicit smaller value is kept.
    let states = match optional(fields, "states") {
        Some(v) => expect_u32(v, &owner, "states")?,
        None => MINIMUM_SKILL_STATES,
    };

    Ok(Skill {
        id: id.to_string(),
        name: name.to_string(),
        normal_limit,
        secret_limit,
        states,
        symbol: derive_symbol(EntityKind::Skill, id)?,
    })
}

fn parse_set_bonus(
    id: &str,
    entry: &RawValue,
    skills: &SkillDatabaseBuilder,
) -> Result<SetBonus, DataLoadError> {
    let owner = EntityKind::SetBonus.describe(id);
    let fields = expect_object(entry, &owner, id)?;

    let name = expect_str(required(fields, &owner, "name")?, &owner, "name")?;
    let raw_stages = expect_array(required(fields, &owner, "stages")?, &owner, "stages")?;

    let stages = raw_stages
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let field = format!("stages[{i}]");
            let stage = expect_object(raw, &owner, &field)?;
            let parts_field = format!("{field}.parts");
            let skill_field = format!("{field}.skill");
            let parts = expect_u32(required(stage, &owner, &parts_field)?, &owner, &parts_field)?;
            let skill_ref = expect_str(required(stage, &owner, &skill_field)?, &owner, &skill_field)?;
            Ok(SetBonusStage {
                parts,
                skill: skills.resolve_skill(skill_ref, id)?,
            })
        })
        .collect::<Result<Vec<_>, DataLoadError>>()?;

    Ok(SetBonus {
        id: id.to_string(),
        name: name.to_string(),
        stages,
        symbol: derive_symbol(EntityKind::SetBonus, id)?,
    })
}

// ===========================================================================
// Field helpers
// ===========================================================================

/// Fetch a field by name. `field` may be a dotted path for error messages;
/// only its last segment is looked up.
fn required<'a>(fields: &'a Entries, owner: &str, field: &str) -> Result<&'a RawValue, DataLoadError> {
    let key = field.rsplit('.').next().unwrap_or(field);
    optional(fields, key).ok_or_else(|| DataLoadError::MissingField {
        owner: owner.to_string(),
        field: field.to_string(),
    })
}

/// Fetch an optional field. Repeated keys resolve to the last entry.
fn optional<'a>(fields: &'a Entries, key: &str) -> Option<&'a RawValue> {
    fields.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn invalid(value: &RawValue, owner: &str, field: &str, expected: &'static str) -> DataLoadError {
    DataLoadError::InvalidField {
        owner: owner.to_string(),
        field: field.to_string(),
        expected,
        found: value.kind(),
    }
}

fn expect_object<'a>(
    value: &'a RawValue,
    owner: &str,
    field: &str,
) -> Result<&'a Entries, DataLoadError> {
    value
        .as_object()
        .ok_or_else(|| invalid(value, owner, field, "a mapping"))
}

fn expect_array<'a>(
    value: &'a RawValue,
    owner: &str,
    field: &str,
) -> Result<&'a [RawValue], DataLoadError> {
    value
        .as_array()
        .ok_or_else(|| invalid(value, owner, field, "a list"))
}

fn expect_str<'a>(value: &'a RawValue, owner: &str, field: &str) -> Result<&'a str, DataLoadError> {
    value
        .as_str()
        .ok_or_else(|| invalid(value, owner, field, "a string"))
}

fn expect_u32(value: &RawValue, owner: &str, field: &str) -> Result<u32, DataLoadError> {
    value
        .as_i64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid(value, owner, field, "a non-negative integer"))
}
