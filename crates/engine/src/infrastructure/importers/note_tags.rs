//! Text extraction from spell and bonus notes.
//!
//! Spell notes become roster entries; bonus notes carry inline tags:
//!
//! - `#3_spellSlot_5` grants 3 extra level-5 slots
//! - `#2fireball` grants 2 free casts of "fireball" (`_` and `-` read as spaces)
//! - `bonus-cantrips: 1` / `bonus-prepared-spells: 2` raise the maxima

use std::sync::OnceLock;

use thiserror::Error;

use spelltracker_domain::{
    BonusSlot, DomainError, EntryOrigin, ExtraSpellUse, NoteContribution, Spell, SpellBonuses,
    SpellLevel, SpellName,
};

use crate::infrastructure::ports::NoteFile;

// Static regex patterns (compiled once)
static SLOT_TAG_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
static EXTRA_USE_TAG_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
static BONUS_CANTRIPS_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
static BONUS_PREPARED_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
static SCHOOL_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
static LEVEL_FIELD_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();

fn slot_tag_regex() -> &'static regex_lite::Regex {
    SLOT_TAG_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"(?i)#(\d+)_spellSlot_(\d+)")
            .expect("SLOT_TAG_REGEX pattern is invalid")
    })
}

fn extra_use_tag_regex() -> &'static regex_lite::Regex {
    EXTRA_USE_TAG_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"(?:^|\s)#(\d+)([A-Za-z][A-Za-z0-9_-]*)")
            .expect("EXTRA_USE_TAG_REGEX pattern is invalid")
    })
}

fn bonus_cantrips_regex() -> &'static regex_lite::Regex {
    BONUS_CANTRIPS_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"(?mi)^\s*bonus-cantrips:\s*(\d+)")
            .expect("BONUS_CANTRIPS_REGEX pattern is invalid")
    })
}

fn bonus_prepared_regex() -> &'static regex_lite::Regex {
    BONUS_PREPARED_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"(?mi)^\s*bonus-prepared-spells:\s*(\d+)")
            .expect("BONUS_PREPARED_REGEX pattern is invalid")
    })
}

fn school_regex() -> &'static regex_lite::Regex {
    SCHOOL_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"(?i)school of (.*?)[,.\n]")
            .expect("SCHOOL_REGEX pattern is invalid")
    })
}

fn level_field_regex() -> &'static regex_lite::Regex {
    LEVEL_FIELD_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"(?mi)^\s*level:\s*(.*?)\s*$")
            .expect("LEVEL_FIELD_REGEX pattern is invalid")
    })
}

/// `#1st-level` and `#3fa` match the extra-use shape but are ordinary text.
fn looks_like_prose(number: &str, name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    let ordinal = ["st", "nd", "rd", "th"].iter().any(|suffix| {
        lower.strip_prefix(*suffix).is_some_and(|rest| {
            rest.is_empty() || rest.starts_with(|c: char| c == '-' || c == '_')
        })
    });
    let hex_colour = matches!(number.len() + name.len(), 3 | 6 | 8)
        && number
            .chars()
            .chain(name.chars())
            .all(|c| c.is_ascii_hexdigit());
    ordinal || hex_colour
}

/// Why a spell note was not imported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoteSkipped {
    #[error("note content could not be read")]
    MissingContent,
    #[error("unparseable spell level: {0}")]
    InvalidLevel(String),
    #[error("invalid spell name: {0}")]
    InvalidName(#[from] DomainError),
}

/// Build an unknown-roster spell from a note in a spell-level folder.
///
/// A `level:` field in the note overrides `folder_level`.
pub fn parse_spell_note(note: &NoteFile, folder_level: u8) -> Result<Spell, NoteSkipped> {
    let content = note.content.as_deref().ok_or(NoteSkipped::MissingContent)?;

    let level = match level_field_regex().captures(content) {
        Some(caps) => parse_level(&caps[1])?,
        None => SpellLevel::try_from(folder_level)
            .map_err(|_| NoteSkipped::InvalidLevel(folder_level.to_string()))?,
    };

    let mut spell = Spell::new(SpellName::new(note.name.as_str())?, level).with_path(&note.path);
    if let Some(school) = detect_school(content) {
        spell = spell.with_school(school);
    }
    if let Some(description) = first_paragraph(content) {
        spell = spell.with_description(description);
    }
    Ok(spell)
}

fn parse_level(raw: &str) -> Result<SpellLevel, NoteSkipped> {
    let raw = raw.trim().trim_matches('"');
    if raw.eq_ignore_ascii_case("cantrip") {
        return Ok(SpellLevel::Cantrip);
    }
    raw.parse::<u8>()
        .ok()
        .and_then(|n| SpellLevel::try_from(n).ok())
        .ok_or_else(|| NoteSkipped::InvalidLevel(raw.to_string()))
}

/// `"... school of evocation, ..."` yields `Evocation`.
pub fn detect_school(content: &str) -> Option<String> {
    let caps = school_regex().captures(content)?;
    let raw = caps[1].trim();
    let mut chars = raw.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// First prose paragraph after any frontmatter.
fn first_paragraph(content: &str) -> Option<String> {
    let body = strip_frontmatter(content);
    body.split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty() && !p.starts_with('#'))
        .map(str::to_string)
}

fn strip_frontmatter(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("---") else {
        return content;
    };
    match rest.find("\n---") {
        Some(end) => rest[end + 4..].trim_start_matches(|c: char| c == '\r' || c == '\n'),
        None => content,
    }
}

/// Everything a bonus note grants, sourced by the note's name.
///
/// Tags that do not form a valid entry are ignored.
pub fn parse_bonus_note(note: &NoteFile) -> NoteContribution {
    let Some(content) = note.content.as_deref() else {
        return NoteContribution::default();
    };
    let source = note.name.as_str();
    let origin = EntryOrigin::scanned(&note.path);

    let bonus_slots = slot_tag_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let amount = caps[1].parse::<u8>().ok()?;
            let level = caps[2].parse::<u8>().ok()?;
            BonusSlot::new(level, amount, source, origin.clone()).ok()
        })
        .collect();

    let extra_uses = extra_use_tag_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            if looks_like_prose(&caps[1], &caps[2]) {
                return None;
            }
            let uses = caps[1].parse::<u32>().ok()?;
            let name = caps[2].replace(|c: char| c == '_' || c == '-', " ");
            let name = SpellName::new(name).ok()?;
            ExtraSpellUse::new(name, uses, source, origin.clone()).ok()
        })
        .collect();

    let number = |re: &regex_lite::Regex| {
        re.captures(content)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .unwrap_or(0)
    };
    let spell_bonuses = SpellBonuses::new(
        number(bonus_cantrips_regex()),
        number(bonus_prepared_regex()),
        source,
        origin,
    )
    .ok();

    NoteContribution {
        bonus_slots,
        extra_uses,
        spell_bonuses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: &str, content: &str) -> NoteFile {
        NoteFile::new(format!("Notes/{}.md", name), name, Some(content.to_string()))
    }

    #[test]
    fn spell_note_takes_folder_level_and_school() {
        let spell = parse_spell_note(
            &note(
                "Fireball",
                "# Fireball\n\n3rd-level school of evocation, range 150 ft.\n\nMore text",
            ),
            3,
        )
        .unwrap();
        assert_eq!(spell.name().as_str(), "Fireball");
        assert_eq!(spell.level().as_number(), 3);
        assert_eq!(spell.school(), Some("Evocation"));
        assert_eq!(spell.path(), Some("Notes/Fireball.md"));
        assert_eq!(
            spell.description(),
            "3rd-level school of evocation, range 150 ft."
        );
        assert!(!spell.is_prepared());
    }

    #[test]
    fn level_field_overrides_folder() {
        let spell = parse_spell_note(&note("Light", "---\nlevel: cantrip\n---\nGlow."), 1).unwrap();
        assert!(spell.is_cantrip());
        assert_eq!(spell.description(), "Glow.");

        let spell = parse_spell_note(&note("Shield", "level: 1\nSchool of Abjuration."), 0).unwrap();
        assert_eq!(spell.level().as_number(), 1);
        assert_eq!(spell.school(), Some("Abjuration"));
    }

    #[test]
    fn malformed_spell_notes_are_skipped() {
        assert_eq!(
            parse_spell_note(&note("Wish", "level: twelve"), 9).unwrap_err(),
            NoteSkipped::InvalidLevel("twelve".into())
        );
        assert_eq!(
            parse_spell_note(&note("Wish", "level: 12"), 9).unwrap_err(),
            NoteSkipped::InvalidLevel("12".into())
        );
        let unreadable = NoteFile::new("Notes/Wish.md", "Wish", None);
        assert_eq!(
            parse_spell_note(&unreadable, 9).unwrap_err(),
            NoteSkipped::MissingContent
        );
        assert!(matches!(
            parse_spell_note(&note("   ", "text"), 1),
            Err(NoteSkipped::InvalidName(_))
        ));
    }

    #[test]
    fn bonus_note_tags() {
        let contribution = parse_bonus_note(&note(
            "Ring of Wizardry",
            "---\nbonus-cantrips: 1\nbonus-prepared-spells: 2\n---\n\
             #3_spellSlot_5 #1_spellSlot_1\n#2fireball #1magic_missile #1misty-step",
        ));

        let slots: Vec<(u8, u8)> = contribution
            .bonus_slots
            .iter()
            .map(|b| (b.spell_level(), b.amount()))
            .collect();
        assert_eq!(slots, vec![(5, 3), (1, 1)]);
        assert!(contribution
            .bonus_slots
            .iter()
            .all(|b| b.source() == "Ring of Wizardry"));

        let uses: Vec<(&str, u32)> = contribution
            .extra_uses
            .iter()
            .map(|e| (e.spell_name().as_str(), e.uses()))
            .collect();
        assert_eq!(
            uses,
            vec![("fireball", 2), ("magic missile", 1), ("misty step", 1)]
        );

        let bonuses = contribution.spell_bonuses.unwrap();
        assert_eq!(bonuses.bonus_cantrips(), 1);
        assert_eq!(bonuses.bonus_prepared_spells(), 2);
    }

    #[test]
    fn invalid_bonus_tags_are_ignored() {
        let contribution = parse_bonus_note(&note(
            "Junk",
            "#0_spellSlot_3 #2_spellSlot_12 #0fireball #999_spellSlot_1",
        ));
        assert!(contribution.is_empty());
        assert!(parse_bonus_note(&NoteFile::new("a.md", "a", None)).is_empty());
    }

    #[test]
    fn ordinary_hash_text_is_not_an_extra_use() {
        let contribution = parse_bonus_note(&note(
            "Staff",
            "Casts as a #1st-level spell, or #3rd. Glows color:#3fa and #a0c0ff.\n\
             Also#2fireball inside a word. #4th_level slots.",
        ));
        assert!(contribution.extra_uses.is_empty());

        // Accepted false positive: a bare hashtag shaped like a tag still counts
        let contribution = parse_bonus_note(&note("Staff", "Wielder of the #1thunderwave style"));
        assert_eq!(contribution.extra_uses.len(), 1);

        let contribution = parse_bonus_note(&note("Staff", "#2thunderwave\n#1bead"));
        let names: Vec<&str> = contribution
            .extra_uses
            .iter()
            .map(|e| e.spell_name().as_str())
            .collect();
        assert_eq!(names, vec!["thunderwave", "bead"]);
    }
}
