pub mod builder;
pub mod loader;
pub mod model;
pub mod raw;

use std::path::Path;

pub use builder::build_database;
pub use loader::{DataLoadError, Format, load_schema};
pub use model::{
    EntityKind, MINIMUM_SKILL_STATES, RESERVED_SYMBOLS, SET_BONUS_TABLE_SYMBOL, SKILL_TABLE_SYMBOL,
    SetBonus, SetBonusStage, Skill, SkillDatabase, SkillId,
};
pub use raw::RawValue;

/// Load a schema file and build the skill database from it.
pub fn load_database(path: &Path) -> Result<SkillDatabase, DataLoadError> {
    let raw = load_schema(path)?;
    build_database(&raw)
}
