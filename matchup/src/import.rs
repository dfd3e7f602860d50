use std::{
    str::FromStr,
    sync::LazyLock,
};

use log::debug;
use matchup_data::{
    Nature,
    PartialStatTable,
    Stat,
    StatTable,
};
use regex::Regex;

use crate::team::{
    Combatant,
    ResolvedSpread,
    SpreadState,
};

/// How imported roster text should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// The roster is fully specified, so inline EV and nature lines are trusted.
    Full,
    /// The roster is scouted from partial knowledge.
    ///
    /// Inline EV and nature lines are discarded, since a partial export rarely reflects the true
    /// spread. Every combatant starts with an unresolved spread that must be confirmed before
    /// damage can be calculated.
    Scouted,
}

/// Options for roster import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Level assumed when a block has no valid `Level:` line.
    pub default_level: u8,
    /// Nature assumed for a fully-specified combatant with no nature line.
    pub fallback_nature: Nature,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            default_level: 50,
            fallback_nature: Nature::Serious,
        }
    }
}

/// Attributes collected from one block of roster text.
#[derive(Debug)]
struct BlockState {
    ability: Option<String>,
    level: Option<u8>,
    tera_type: Option<String>,
    evs: StatTable,
    ivs: StatTable,
    nature: Option<Nature>,
    moves: Vec<String>,
}

impl Default for BlockState {
    fn default() -> Self {
        Self {
            ability: None,
            level: None,
            tera_type: None,
            evs: StatTable::default(),
            ivs: StatTable::uniform(31),
            nature: None,
            moves: Vec::new(),
        }
    }
}

/// Matches an attribute line to its rule.
type MatchLine = fn(&str) -> bool;
/// Extracts an attribute from a matched line into the block state.
type ExtractLine = fn(&mut BlockState, &str);

// Rules are checked in order, and only the first matching rule applies to a line.
static ATTRIBUTE_RULES: &[(MatchLine, ExtractLine)] = &[
    (|line| line.starts_with("Ability:"), extract_ability),
    (|line| line.starts_with("Level:"), extract_level),
    (|line| line.starts_with("Tera Type:"), extract_tera_type),
    (|line| line.starts_with("EVs:"), extract_evs),
    (|line| line.starts_with("IVs:"), extract_ivs),
    (|line| line.ends_with("Nature"), extract_nature),
    (|line| line.starts_with('-'), extract_move),
];

fn extract_ability(state: &mut BlockState, line: &str) {
    if let Some(value) = line.strip_prefix("Ability:") {
        state.ability = non_empty(value);
    }
}

fn extract_level(state: &mut BlockState, line: &str) {
    if let Some(value) = line.strip_prefix("Level:") {
        state.level = value.trim().parse().ok().filter(|level| *level > 0);
    }
}

fn extract_tera_type(state: &mut BlockState, line: &str) {
    if let Some(value) = line.strip_prefix("Tera Type:") {
        state.tera_type = non_empty(value);
    }
}

fn extract_evs(state: &mut BlockState, line: &str) {
    if let Some(value) = line.strip_prefix("EVs:") {
        // Stats not mentioned on the line are zero.
        state.evs = StatTable::from(&parse_stat_entries(value));
    }
}

fn extract_ivs(state: &mut BlockState, line: &str) {
    if let Some(value) = line.strip_prefix("IVs:") {
        // Stats not mentioned on the line stay at the perfect default of 31.
        let mut ivs = StatTable::uniform(31);
        for (stat, value) in parse_stat_entries(value) {
            ivs.set(stat, value);
        }
        state.ivs = ivs;
    }
}

fn extract_nature(state: &mut BlockState, line: &str) {
    if let Some(value) = line.strip_suffix("Nature") {
        if let Ok(nature) = Nature::from_str(value.trim()) {
            state.nature = Some(nature);
        }
    }
}

fn extract_move(state: &mut BlockState, line: &str) {
    if let Some(value) = line.strip_prefix('-') {
        let value = value.trim();
        if !value.is_empty() {
            state.moves.push(value.to_owned());
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Parses a stat list of the form `4 HP / 252 Atk / 252 Spe`.
///
/// Unrecognized abbreviations and malformed entries are silently ignored.
fn parse_stat_entries(value: &str) -> PartialStatTable {
    static ENTRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+(\w+)").unwrap());
    let mut entries = PartialStatTable::default();
    for part in value.split('/') {
        if let Some(captures) = ENTRY.captures(part) {
            if let (Ok(value), Ok(stat)) =
                (captures[1].parse::<u16>(), Stat::from_str(&captures[2]))
            {
                entries.insert(stat, value);
            }
        }
    }
    entries
}

/// Parses the header line of a block into a species name and an optional held item.
///
/// Text after the first `@` is the item. A trailing gender marker is stripped from the name
/// portion before it is checked for the `Nickname (Species)` form, so a marker is never mistaken
/// for a nickname.
fn parse_header(line: &str) -> (Option<String>, Option<String>) {
    let (name_part, item) = match line.split_once('@') {
        Some((name_part, item)) => (name_part, non_empty(item)),
        None => (line, None),
    };
    (parse_species(name_part), item)
}

fn parse_species(name_part: &str) -> Option<String> {
    static GENDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\((?:M|F)\)\s*$").unwrap());
    static NICKNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.+?\((.+)\)\s*$").unwrap());
    let name_part = GENDER.replace(name_part, "");
    if let Some(captures) = NICKNAME.captures(&name_part) {
        return non_empty(&captures[1]);
    }
    non_empty(&name_part)
}

fn parse_block(block: &str, mode: ImportMode, options: &ImportOptions) -> Option<Combatant> {
    let mut lines = block
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty());
    let header = lines.next()?;
    let (species, item) = parse_header(header);
    let name = match species {
        Some(name) => name,
        None => {
            debug!("skipping roster block with no species name: {header:?}");
            return None;
        }
    };

    let mut state = BlockState::default();
    for line in lines {
        for (matches, extract) in ATTRIBUTE_RULES {
            if matches(line) {
                extract(&mut state, line);
                break;
            }
        }
    }

    let spread = match mode {
        ImportMode::Full => SpreadState::Resolved(ResolvedSpread {
            nature: state.nature.unwrap_or(options.fallback_nature),
            evs: state.evs,
        }),
        ImportMode::Scouted => SpreadState::Unresolved,
    };

    Some(Combatant {
        name,
        item,
        ability: state.ability,
        tera_type: state.tera_type,
        level: state.level.unwrap_or(options.default_level),
        ivs: state.ivs,
        spread,
        moves: state.moves,
    })
}

/// Parses freeform exported team text into an ordered roster.
///
/// Blocks are separated by one or more blank lines. Within a block, the first non-empty line
/// names the combatant and its held item, and every other line is matched against a fixed set of
/// attribute rules, in any order. A block that yields no species name is dropped entirely.
///
/// Parsing is pure: the same text always produces the same roster.
pub fn parse_roster(text: &str, mode: ImportMode, options: &ImportOptions) -> Vec<Combatant> {
    static BLOCK_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
    BLOCK_SEPARATOR
        .split(text)
        .filter_map(|block| parse_block(block, mode, options))
        .collect()
}

#[cfg(test)]
mod import_test {
    use matchup_data::{
        Nature,
        StatTable,
    };
    use pretty_assertions::assert_eq;

    use crate::{
        import::{
            ImportMode,
            ImportOptions,
            parse_roster,
        },
        team::{
            Combatant,
            ResolvedSpread,
            SpreadState,
        },
    };

    fn parse(text: &str, mode: ImportMode) -> Vec<Combatant> {
        parse_roster(text, mode, &ImportOptions::default())
    }

    #[test]
    fn parses_fully_specified_block() {
        let team = parse(
            "Blaze (Incineroar) @ Safety Goggles\nAbility: Intimidate\nLevel: 50\nTera Type: Ghost\nEVs: 252 HP / 4 Atk / 252 SpD\nCareful Nature\n- Fake Out\n- Knock Off\n- Parting Shot",
            ImportMode::Full,
        );
        assert_eq!(
            team,
            Vec::from_iter([Combatant {
                name: "Incineroar".to_owned(),
                item: Some("Safety Goggles".to_owned()),
                ability: Some("Intimidate".to_owned()),
                tera_type: Some("Ghost".to_owned()),
                level: 50,
                ivs: StatTable::uniform(31),
                spread: SpreadState::Resolved(ResolvedSpread {
                    nature: Nature::Careful,
                    evs: StatTable {
                        hp: 252,
                        atk: 4,
                        def: 0,
                        spa: 0,
                        spd: 252,
                        spe: 0,
                    },
                }),
                moves: Vec::from_iter(["Fake Out".to_owned(), "Knock Off".to_owned(), "Parting Shot".to_owned()]),
            }])
        );
    }

    #[test]
    fn splits_blocks_on_blank_lines() {
        let team = parse(
            "Pikachu\n- Thunderbolt\n\nSnorlax\n- Body Slam\n   \t\nGarchomp",
            ImportMode::Full,
        );
        assert_eq!(
            team.iter().map(|member| member.name.as_str()).collect::<Vec<_>>(),
            Vec::from_iter(["Pikachu", "Snorlax", "Garchomp"])
        );
    }

    #[test]
    fn strips_gender_marker_from_species() {
        let team = parse("Landorus (M)", ImportMode::Full);
        assert_eq!(team[0].name, "Landorus");

        let team = parse("Indeedee (F) @ Psychic Seed", ImportMode::Full);
        assert_eq!(team[0].name, "Indeedee");
        assert_eq!(team[0].item, Some("Psychic Seed".to_owned()));
    }

    #[test]
    fn resolves_nickname_to_species() {
        let team = parse("Big Cat (Incineroar) @ Sitrus Berry", ImportMode::Full);
        assert_eq!(team[0].name, "Incineroar");

        let team = parse("Pointy (Garchomp) (F)", ImportMode::Full);
        assert_eq!(team[0].name, "Garchomp");
    }

    #[test]
    fn drops_block_with_no_species_name() {
        let team = parse("@ Leftovers\nAbility: Gluttony\n\nSnorlax", ImportMode::Full);
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].name, "Snorlax");
        assert!(team.iter().all(|member| !member.name.is_empty()));
    }

    #[test]
    fn merges_partial_ivs_over_perfect_default() {
        let team = parse("Ditto\nIVs: 0 Atk", ImportMode::Full);
        assert_eq!(
            team[0].ivs,
            StatTable {
                hp: 31,
                atk: 0,
                def: 31,
                spa: 31,
                spd: 31,
                spe: 31,
            }
        );
    }

    #[test]
    fn unmentioned_evs_are_zero() {
        let team = parse("Dragonite\nEVs: 252 Atk / 4 Def", ImportMode::Full);
        match &team[0].spread {
            SpreadState::Resolved(spread) => assert_eq!(
                spread.evs,
                StatTable {
                    hp: 0,
                    atk: 252,
                    def: 4,
                    spa: 0,
                    spd: 0,
                    spe: 0,
                }
            ),
            other => panic!("spread was not resolved: {other:?}"),
        }
    }

    #[test]
    fn ignores_unrecognized_stat_tokens() {
        let team = parse("Dragonite\nEVs: 252 Atk / 100 Wis / 4 Def", ImportMode::Full);
        match &team[0].spread {
            SpreadState::Resolved(spread) => {
                assert_eq!(spread.evs.atk, 252);
                assert_eq!(spread.evs.def, 4);
            }
            other => panic!("spread was not resolved: {other:?}"),
        }
    }

    #[test]
    fn invalid_level_falls_back_to_default() {
        let team = parse(
            "Pikachu\nLevel: abc\n\nRaichu\nLevel: 0\n\nPichu\nLevel: 5",
            ImportMode::Full,
        );
        assert_eq!(team[0].level, 50);
        assert_eq!(team[1].level, 50);
        assert_eq!(team[2].level, 5);
    }

    #[test]
    fn missing_nature_falls_back_for_full_roster() {
        let team = parse("Snorlax\nEVs: 252 HP", ImportMode::Full);
        assert_eq!(
            team[0].spread.resolved().map(|spread| spread.nature),
            Some(Nature::Serious)
        );
    }

    #[test]
    fn unknown_nature_is_ignored() {
        let team = parse("Snorlax\nAngry Nature", ImportMode::Full);
        assert_eq!(
            team[0].spread.resolved().map(|spread| spread.nature),
            Some(Nature::Serious)
        );
    }

    #[test]
    fn scouted_roster_discards_inline_spread() {
        let team = parse(
            "Incineroar @ Sitrus Berry\nEVs: 252 HP / 252 Atk\nAdamant Nature\nIVs: 0 Spe\n- Flare Blitz",
            ImportMode::Scouted,
        );
        assert_eq!(team[0].spread, SpreadState::Unresolved);
        // IVs are kept: they are part of the visible export, not the hidden spread.
        assert_eq!(team[0].ivs.spe, 0);
        assert_eq!(team[0].moves, Vec::from_iter(["Flare Blitz".to_owned()]));
    }

    #[test]
    fn skips_empty_move_lines() {
        let team = parse("Pikachu\n- Thunderbolt\n-\n- Surf", ImportMode::Full);
        assert_eq!(
            team[0].moves,
            Vec::from_iter(["Thunderbolt".to_owned(), "Surf".to_owned()])
        );
    }

    #[test]
    fn preserves_move_order() {
        let team = parse(
            "Pikachu\n- Volt Tackle\n- Fake Out\n- Protect\n- Thunderbolt",
            ImportMode::Full,
        );
        assert_eq!(
            team[0].moves,
            Vec::from_iter([
                "Volt Tackle".to_owned(),
                "Fake Out".to_owned(),
                "Protect".to_owned(),
                "Thunderbolt".to_owned(),
            ])
        );
    }

    #[test]
    fn attribute_lines_match_in_any_order() {
        let team = parse(
            "Garchomp\n- Earthquake\nJolly Nature\nLevel: 75\nAbility: Rough Skin\nEVs: 252 Atk",
            ImportMode::Full,
        );
        let member = &team[0];
        assert_eq!(member.level, 75);
        assert_eq!(member.ability, Some("Rough Skin".to_owned()));
        assert_eq!(
            member.spread.resolved().map(|spread| spread.nature),
            Some(Nature::Jolly)
        );
    }

    #[test]
    fn unrecognized_lines_are_ignored() {
        let team = parse(
            "Snorlax\nShiny: Yes\nHappiness: 160\n- Body Slam",
            ImportMode::Full,
        );
        assert_eq!(team[0].moves, Vec::from_iter(["Body Slam".to_owned()]));
    }

    #[test]
    fn empty_item_is_absent() {
        let team = parse("Snorlax @", ImportMode::Full);
        assert_eq!(team[0].item, None);
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "Blaze (Incineroar) @ Safety Goggles\nAbility: Intimidate\nEVs: 252 HP / 4 Atk\nCareful Nature\n- Fake Out\n\nFlutter Mane\n- Moonblast";
        assert_eq!(parse(text, ImportMode::Full), parse(text, ImportMode::Full));
        assert_eq!(
            parse(text, ImportMode::Scouted),
            parse(text, ImportMode::Scouted)
        );
    }

    #[test]
    fn configured_defaults_apply() {
        let options = ImportOptions {
            default_level: 100,
            fallback_nature: Nature::Hardy,
        };
        let team = parse_roster("Mewtwo\n- Psystrike", ImportMode::Full, &options);
        assert_eq!(team[0].level, 100);
        assert_eq!(
            team[0].spread.resolved().map(|spread| spread.nature),
            Some(Nature::Hardy)
        );
    }
}
