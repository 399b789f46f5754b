//! Typed skill and set bonus records, and the immutable database holding them.

use std::collections::HashMap;
use std::fmt;

use crate::loader::{DataLoadError, check_duplicate, resolve_skill};

/// Default state count for skills whose source omits `states`.
pub const MINIMUM_SKILL_STATES: u32 = 2;

/// Identifies a skill in a [`SkillDatabase`]. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkillId(pub u32);

/// The two entity kinds described by a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Skill,
    SetBonus,
}

impl EntityKind {
    /// Prefix of every symbol derived for this kind.
    pub fn symbol_prefix(self) -> &'static str {
        match self {
            EntityKind::Skill => "g_skill_",
            EntityKind::SetBonus => "g_setbonus_",
        }
    }

    /// Human-readable owner label used in error messages, e.g. `skill 'agitator'`.
    pub fn describe(self, id: &str) -> String {
        format!("{self} '{id}'")
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Skill => f.write_str("skill"),
            EntityKind::SetBonus => f.write_str("set bonus"),
        }
    }
}

// ===========================================================================
// Symbols
// ===========================================================================

/// Returns true if `s` is a valid C/C++ identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Name of the generated id → skill lookup table.
pub const SKILL_TABLE_SYMBOL: &str = "g_skills_map";

/// Name of the generated id → set bonus lookup table.
pub const SET_BONUS_TABLE_SYMBOL: &str = "g_setbonus_map";

/// Symbols emitted next to the entity globals in the generated namespace.
/// `g_skills_map` is reachable from skill id `s_map`, `g_setbonus_map` from
/// set bonus id `map`.
pub const RESERVED_SYMBOLS: [&str; 2] = [SKILL_TABLE_SYMBOL, SET_BONUS_TABLE_SYMBOL];

/// Derive the global symbol bound to an entity: kind prefix plus the
/// lower-cased id.
///
/// The symbol must be an identifier without `__` (reserved to the C++
/// implementation), and must not shadow one of [`RESERVED_SYMBOLS`].
pub fn derive_symbol(kind: EntityKind, id: &str) -> Result<String, DataLoadError> {
    let symbol = format!("{}{}", kind.symbol_prefix(), id.to_lowercase());
    if id.is_empty() || !is_valid_identifier(&symbol) || symbol.contains("__") {
        return Err(DataLoadError::InvalidSymbol {
            kind,
            id: id.to_string(),
        });
    }
    if RESERVED_SYMBOLS.contains(&symbol.as_str()) {
        return Err(DataLoadError::ReservedSymbol {
            kind,
            id: id.to_string(),
            symbol,
        });
    }
    Ok(symbol)
}

// ===========================================================================
// Records
// ===========================================================================

/// A skill definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub normal_limit: u32,
    pub secret_limit: u32,
    pub states: u32,
    pub symbol: String,
}

/// One stage of a set bonus: wearing `parts` pieces grants `skill`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetBonusStage {
    pub parts: u32,
    pub skill: SkillId,
}

/// A set bonus definition. Stages keep their source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetBonus {
    pub id: String,
    pub name: String,
    pub stages: Vec<SetBonusStage>,
    pub symbol: String,
}

// ===========================================================================
// Builder
// ===========================================================================

/// Builder for constructing an immutable [`SkillDatabase`].
///
/// Skills must all be registered before set bonuses, because set bonus
/// stages resolve their skill references against the skills seen so far.
#[derive(Debug, Default)]
pub struct SkillDatabaseBuilder {
    skills: Vec<Skill>,
    skill_index: HashMap<String, SkillId>,
    skill_symbols: HashMap<String, String>,
    set_bonuses: Vec<SetBonus>,
    set_bonus_index: HashMap<String, usize>,
    set_bonus_symbols: HashMap<String, String>,
}

impl SkillDatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill. Returns its handle.
    pub fn register_skill(&mut self, skill: Skill) -> Result<SkillId, DataLoadError> {
        check_duplicate(&self.skill_index, &skill.id, EntityKind::Skill)?;
        check_symbol(&self.skill_symbols, &skill.id, &skill.symbol, EntityKind::Skill)?;

        let id = skill_handle(self.skills.len())?;
        self.skill_index.insert(skill.id.clone(), id);
        self.skill_symbols
            .insert(skill.symbol.clone(), skill.id.clone());
        tracing::debug!(skill = %skill.id, symbol = %skill.symbol, "registered skill");
        self.skills.push(skill);
        Ok(id)
    }

    /// Resolve a skill reference made by the set bonus `set_bonus`.
    pub fn resolve_skill(&self, skill: &str, set_bonus: &str) -> Result<SkillId, DataLoadError> {
        resolve_skill(&self.skill_index, skill, set_bonus).copied()
    }

    /// Register a set bonus whose stages are already resolved.
    pub fn register_set_bonus(&mut self, set_bonus: SetBonus) -> Result<(), DataLoadError> {
        check_duplicate(&self.set_bonus_index, &set_bonus.id, EntityKind::SetBonus)?;
        check_symbol(
            &self.set_bonus_symbols,
            &set_bonus.id,
            &set_bonus.symbol,
            EntityKind::SetBonus,
        )?;

        self.set_bonus_index
            .insert(set_bonus.id.clone(), self.set_bonuses.len());
        self.set_bonus_symbols
            .insert(set_bonus.symbol.clone(), set_bonus.id.clone());
        tracing::debug!(
            set_bonus = %set_bonus.id,
            stages = set_bonus.stages.len(),
            "registered set bonus"
        );
        self.set_bonuses.push(set_bonus);
        Ok(())
    }

    /// Freeze the builder.
    pub fn build(self) -> SkillDatabase {
        SkillDatabase {
            skills: self.skills,
            skill_index: self.skill_index,
            set_bonuses: self.set_bonuses,
            set_bonus_index: self.set_bonus_index,
        }
    }
}

/// Handle for the skill stored at `index`.
fn skill_handle(index: usize) -> Result<SkillId, DataLoadError> {
    u32::try_from(index)
        .map(SkillId)
        .map_err(|_| DataLoadError::CapacityExceeded {
            kind: EntityKind::Skill,
            count: index,
        })
}

/// Fail if `symbol` was already derived from another id of the same kind.
fn check_symbol(
    seen: &HashMap<String, String>,
    id: &str,
    symbol: &str,
    kind: EntityKind,
) -> Result<(), DataLoadError> {
    match seen.get(symbol) {
        Some(first) => Err(DataLoadError::SymbolCollision {
            kind,
            symbol: symbol.to_string(),
            first: first.clone(),
            second: id.to_string(),
        }),
        None => Ok(()),
    }
}

// ===========================================================================
// Database
// ===========================================================================

/// Immutable skills and set bonuses, in source encounter order.
#[derive(Debug, Clone)]
pub struct SkillDatabase {
    skills: Vec<Skill>,
    skill_index: HashMap<String, SkillId>,
    set_bonuses: Vec<SetBonus>,
    set_bonus_index: HashMap<String, usize>,
}

impl SkillDatabase {
    /// All skills in encounter order.
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// All set bonuses in encounter order.
    pub fn set_bonuses(&self) -> &[SetBonus] {
        &self.set_bonuses
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skill_id(id).map(|sid| self.skill_by_id(sid))
    }

    pub fn skill_id(&self, id: &str) -> Option<SkillId> {
        self.skill_index.get(id).copied()
    }

    /// Look up a skill by handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this database.
    pub fn skill_by_id(&self, id: SkillId) -> &Skill {
        &self.skills[id.0 as usize]
    }

    pub fn set_bonus(&self, id: &str) -> Option<&SetBonus> {
        self.set_bonus_index.get(id).map(|&i| &self.set_bonuses[i])
    }

    /// The stages of `set_bonus` paired with the skills they grant.
    pub fn stage_skills<'a>(
        &'a self,
        set_bonus: &'a SetBonus,
    ) -> impl Iterator<Item = (u32, &'a Skill)> + 'a {
        set_bonus
            .stages
            .iter()
            .map(move |stage| (stage.parts, self.skill_by_id(stage.skill)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: &str) -> Skill {
        Skill {
            id: id.to_string(),
            name: id.to_uppercase(),
            normal_limit: 5,
            secret_limit: 5,
            states: MINIMUM_SKILL_STATES,
            symbol: derive_symbol(EntityKind::Skill, id).unwrap(),
        }
    }

    // -----------------------------------------------------------------------
    // Symbols
    // -----------------------------------------------------------------------

    #[test]
    fn derive_symbol_lowercases_and_prefixes() {
        assert_eq!(
            derive_symbol(EntityKind::Skill, "Agitator").unwrap(),
            "g_skill_agitator"
        );
        assert_eq!(
            derive_symbol(EntityKind::SetBonus, "TEOSTRA_BLAZE").unwrap(),
            "g_setbonus_teostra_blaze"
        );
    }

    #[test]
    fn derive_symbol_accepts_leading_digit() {
        assert_eq!(
            derive_symbol(EntityKind::Skill, "3rd_eye").unwrap(),
            "g_skill_3rd_eye"
        );
    }

    #[test]
    fn derive_symbol_rejects_invalid_characters() {
        for bad in ["", "free-elem", "two words", "ammo.up", "élan"] {
            assert!(
                matches!(
                    derive_symbol(EntityKind::Skill, bad),
                    Err(DataLoadError::InvalidSymbol { .. })
                ),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn derive_symbol_rejects_double_underscore() {
        for bad in ["_x", "a__b", "_"] {
            assert!(
                matches!(
                    derive_symbol(EntityKind::Skill, bad),
                    Err(DataLoadError::InvalidSymbol { ref id, .. }) if id == bad
                ),
                "expected '{bad}' to be rejected"
            );
        }
        assert_eq!(
            derive_symbol(EntityKind::Skill, "a_b_").unwrap(),
            "g_skill_a_b_"
        );
    }

    #[test]
    fn derive_symbol_rejects_lookup_table_names() {
        let result = derive_symbol(EntityKind::SetBonus, "map");
        assert!(matches!(
            result,
            Err(DataLoadError::ReservedSymbol { kind: EntityKind::SetBonus, ref symbol, .. })
                if symbol == SET_BONUS_TABLE_SYMBOL
        ));
        assert!(matches!(
            derive_symbol(EntityKind::SetBonus, "MAP"),
            Err(DataLoadError::ReservedSymbol { .. })
        ));
        assert!(matches!(
            derive_symbol(EntityKind::Skill, "s_map"),
            Err(DataLoadError::ReservedSymbol { ref symbol, .. }) if symbol == SKILL_TABLE_SYMBOL
        ));

        // Only the exact table names are taken.
        assert_eq!(derive_symbol(EntityKind::Skill, "map").unwrap(), "g_skill_map");
        assert_eq!(
            derive_symbol(EntityKind::SetBonus, "map_2").unwrap(),
            "g_setbonus_map_2"
        );
    }

    #[test]
    fn skill_handle_bounds() {
        assert_eq!(skill_handle(0).unwrap(), SkillId(0));
        assert_eq!(skill_handle(u32::MAX as usize).unwrap(), SkillId(u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn skill_handle_overflow() {
        let count = u32::MAX as usize + 1;
        assert!(matches!(
            skill_handle(count),
            Err(DataLoadError::CapacityExceeded { kind: EntityKind::Skill, count: c }) if c == count
        ));
    }

    #[test]
    fn identifier_check() {
        assert!(is_valid_identifier("_x1"));
        assert!(is_valid_identifier("SkillsDatabase"));
        assert!(!is_valid_identifier("1x"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("a-b"));
    }

    // -----------------------------------------------------------------------
    // Builder
    // -----------------------------------------------------------------------

    #[test]
    fn register_and_lookup() {
        let mut builder = SkillDatabaseBuilder::new();
        let agitator = builder.register_skill(skill("agitator")).unwrap();
        let wex = builder.register_skill(skill("weakness_exploit")).unwrap();
        assert_ne!(agitator, wex);

        let resolved = builder.resolve_skill("agitator", "teostra_blaze").unwrap();
        builder
            .register_set_bonus(SetBonus {
                id: "teostra_blaze".to_string(),
                name: "Teostra Technique".to_string(),
                stages: vec![SetBonusStage {
                    parts: 4,
                    skill: resolved,
                }],
                symbol: "g_setbonus_teostra_blaze".to_string(),
            })
            .unwrap();

        let db = builder.build();
        assert_eq!(db.skills().len(), 2);
        assert_eq!(db.skill("weakness_exploit").unwrap().symbol, "g_skill_weakness_exploit");
        assert!(db.skill("absent").is_none());

        let sb = db.set_bonus("teostra_blaze").unwrap();
        let stages: Vec<(u32, &str)> = db
            .stage_skills(sb)
            .map(|(parts, s)| (parts, s.id.as_str()))
            .collect();
        assert_eq!(stages, [(4, "agitator")]);
    }

    #[test]
    fn register_duplicate_skill() {
        let mut builder = SkillDatabaseBuilder::new();
        builder.register_skill(skill("agitator")).unwrap();
        let result = builder.register_skill(skill("agitator"));
        assert!(matches!(
            result,
            Err(DataLoadError::DuplicateIdentifier { kind: EntityKind::Skill, ref id }) if id == "agitator"
        ));
    }

    #[test]
    fn register_case_variant_collides_on_symbol() {
        let mut builder = SkillDatabaseBuilder::new();
        builder.register_skill(skill("agitator")).unwrap();
        let result = builder.register_skill(skill("Agitator"));
        assert!(matches!(
            result,
            Err(DataLoadError::SymbolCollision { ref first, ref second, .. })
                if first == "agitator" && second == "Agitator"
        ));
    }

    #[test]
    fn resolve_unknown_skill() {
        let builder = SkillDatabaseBuilder::new();
        let result = builder.resolve_skill("agitator", "teostra_blaze");
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedReference { .. })
        ));
    }
}
