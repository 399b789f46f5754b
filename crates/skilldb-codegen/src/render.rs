//! Renders a [`SkillDatabase`] into a C++ header and translation unit.
//!
//! Output is a pure function of the database and the render options: the
//! same input always produces byte-identical documents. Records and table
//! rows follow the database's encounter order.

use skilldb_data::{
    EntityKind, SET_BONUS_TABLE_SYMBOL, SKILL_TABLE_SYMBOL, SetBonus, Skill, SkillDatabase,
};

use crate::config::RenderOptions;
use crate::error::CodegenError;

/// The two rendered documents, held in memory until both are complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Header: forward declarations and lookup signatures.
    pub declarations: String,
    /// Translation unit: record literals, lookup tables and function bodies.
    pub definitions: String,
}

/// Render both documents. Fails before producing any output if a string
/// field cannot be written as a C++ string literal.
pub fn render(db: &SkillDatabase, options: &RenderOptions) -> Result<GeneratedSources, CodegenError> {
    check_string_fields(db)?;

    let sources = GeneratedSources {
        declarations: render_declarations(db, options),
        definitions: render_definitions(db, options),
    };
    tracing::debug!(
        declarations_bytes = sources.declarations.len(),
        definitions_bytes = sources.definitions.len(),
        "rendered sources"
    );
    Ok(sources)
}

// ===========================================================================
// String literal validation
// ===========================================================================

/// Characters that would break a plain `"..."` literal. No escaping is
/// attempted; such data is rejected.
fn is_unsupported(c: char) -> bool {
    c == '"' || c == '\\' || c.is_control()
}

/// Check a single string field destined for a C++ string literal.
pub fn check_literal(
    kind: EntityKind,
    id: &str,
    field: &'static str,
    value: &str,
) -> Result<(), CodegenError> {
    match value.chars().find(|&c| is_unsupported(c)) {
        Some(character) => Err(CodegenError::UnsupportedCharacter {
            owner: kind.describe(id),
            field,
            character,
        }),
        None => Ok(()),
    }
}

fn check_string_fields(db: &SkillDatabase) -> Result<(), CodegenError> {
    for skill in db.skills() {
        check_literal(EntityKind::Skill, &skill.id, "id", &skill.id)?;
        check_literal(EntityKind::Skill, &skill.id, "name", &skill.name)?;
    }
    for set_bonus in db.set_bonuses() {
        check_literal(EntityKind::SetBonus, &set_bonus.id, "id", &set_bonus.id)?;
        check_literal(EntityKind::SetBonus, &set_bonus.id, "name", &set_bonus.name)?;
    }
    Ok(())
}

// ===========================================================================
// Declarations
// ===========================================================================

/// Render the header document.
pub fn render_declarations(db: &SkillDatabase, options: &RenderOptions) -> String {
    let RenderOptions {
        namespace,
        core_namespace,
        core_header,
        include_guard,
        ..
    } = options;

    let skill_declarations = db
        .skills()
        .iter()
        .map(|s| format!("extern const Skill {};", s.symbol))
        .collect::<Vec<_>>()
        .join("\n");
    let setbonus_declarations = db
        .set_bonuses()
        .iter()
        .map(|sb| format!("extern const SetBonus {};", sb.symbol))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
/*
 * This file is auto-generated.
 * Do not edit directly!
 */

#ifndef {include_guard}
#define {include_guard}

#include <string>
#include <vector>

#include "{core_header}"

namespace {namespace}
{{

using {core_namespace}::Skill;
using {core_namespace}::SetBonus;


{skill_declarations}

{setbonus_declarations}

// Precondition: skill_id names a generated skill. Any other id terminates the program.
const Skill* get_skill(const std::string& skill_id) noexcept;

// Precondition: setbonus_id names a generated set bonus. Any other id terminates the program.
const SetBonus* get_setbonus(const std::string& setbonus_id) noexcept;
// Returns every set bonus. The order of the returned elements is unspecified.
std::vector<const SetBonus*> get_all_set_bonuses() noexcept;


}} // namespace

#endif // {include_guard}

"#
    )
}

// ===========================================================================
// Definitions
// ===========================================================================

fn skill_literal(skill: &Skill) -> String {
    format!(
        "const Skill {symbol} = {{\n\
         \x20   \"{id}\", // id\n\
         \x20   \"{name}\", // name\n\
         \x20   {normal_limit}, // normal_limit\n\
         \x20   {secret_limit}, // secret_limit\n\
         \x20   {states} // states\n\
         }};",
        symbol = skill.symbol,
        id = skill.id,
        name = skill.name,
        normal_limit = skill.normal_limit,
        secret_limit = skill.secret_limit,
        states = skill.states,
    )
}

fn set_bonus_literal(db: &SkillDatabase, set_bonus: &SetBonus) -> String {
    let mut out = format!(
        "const SetBonus {} = {{\n    \"{}\", // id\n    \"{}\", // name\n    {{ // stages\n",
        set_bonus.symbol, set_bonus.id, set_bonus.name,
    );
    for (parts, skill) in db.stage_skills(set_bonus) {
        out.push_str(&format!("        {{ {parts}, &{} }},\n", skill.symbol));
    }
    out.push_str("    }\n};");
    out
}

fn map_element(id: &str, symbol: &str) -> String {
    format!("    {{ \"{id}\", &{symbol} }},")
}

/// Render the translation unit.
pub fn render_definitions(db: &SkillDatabase, options: &RenderOptions) -> String {
    let RenderOptions {
        namespace,
        header_include,
        ..
    } = options;

    let skill_definitions = db
        .skills()
        .iter()
        .map(skill_literal)
        .collect::<Vec<_>>()
        .join("\n\n");
    let setbonus_definitions = db
        .set_bonuses()
        .iter()
        .map(|sb| set_bonus_literal(db, sb))
        .collect::<Vec<_>>()
        .join("\n\n");
    let skill_map_elements = db
        .skills()
        .iter()
        .map(|s| map_element(&s.id, &s.symbol))
        .collect::<Vec<_>>()
        .join("\n");
    let setbonus_map_elements = db
        .set_bonuses()
        .iter()
        .map(|sb| map_element(&sb.id, &sb.symbol))
        .collect::<Vec<_>>()
        .join("\n");
    let skill_table = SKILL_TABLE_SYMBOL;
    let setbonus_table = SET_BONUS_TABLE_SYMBOL;

    format!(
        r#"
/*
 * This file is auto-generated.
 * Do not edit directly!
 */

#include <unordered_map>

#include "{header_include}"

namespace {namespace}
{{


{skill_definitions}


{setbonus_definitions}


static const std::unordered_map<std::string, const Skill*> {skill_table} = {{
{skill_map_elements}
}};


static const std::unordered_map<std::string, const SetBonus*> {setbonus_table} = {{
{setbonus_map_elements}
}};


const Skill* get_skill(const std::string& skill_id) noexcept {{
    return {skill_table}.at(skill_id);
}}


const SetBonus* get_setbonus(const std::string& setbonus_id) noexcept {{
    return {setbonus_table}.at(setbonus_id);
}}


std::vector<const SetBonus*> get_all_set_bonuses() noexcept {{
    std::vector<const SetBonus*> ret;
    for (const auto& e : {setbonus_table}) {{
        ret.emplace_back(e.second);
    }}
    return ret;
}}


}} // namespace

"#
    )
}
