use hashbrown::HashMap;
use serde::{
    Deserialize,
    Serialize,
};
use serde_string_enum::{
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
};

/// A single stat value.
///
/// Labels match the abbreviations used by exported team text, so stat lines
/// can be parsed with [`Stat::from_str`](core::str::FromStr). Matching is
/// case-insensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum Stat {
    #[string = "HP"]
    HP,
    #[string = "Atk"]
    #[alias = "Attack"]
    Atk,
    #[string = "Def"]
    #[alias = "Defense"]
    Def,
    #[string = "SpA"]
    #[alias = "SpAtk"]
    #[alias = "Sp.Atk"]
    #[alias = "Special Attack"]
    SpAtk,
    #[string = "SpD"]
    #[alias = "SpDef"]
    #[alias = "Sp.Def"]
    #[alias = "Special Defense"]
    SpDef,
    #[string = "Spe"]
    #[alias = "Speed"]
    Spe,
}

impl Stat {
    /// All stats, in canonical order.
    pub const ALL: [Stat; 6] = [
        Stat::HP,
        Stat::Atk,
        Stat::Def,
        Stat::SpAtk,
        Stat::SpDef,
        Stat::Spe,
    ];
}

/// A map of values for each stat.
pub type StatMap<T> = HashMap<Stat, T>;

/// A table of stat values where some stats may be missing.
pub type PartialStatTable = StatMap<u16>;

/// A full stat table.
///
/// Similar to [`PartialStatTable`], but all values must be defined.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatTable {
    #[serde(default)]
    pub hp: u16,
    #[serde(default)]
    pub atk: u16,
    #[serde(default)]
    pub def: u16,
    #[serde(default)]
    pub spa: u16,
    #[serde(default)]
    pub spd: u16,
    #[serde(default)]
    pub spe: u16,
}

impl StatTable {
    /// Creates a stat table with every value set to the same number.
    pub fn uniform(value: u16) -> Self {
        Self {
            hp: value,
            atk: value,
            def: value,
            spa: value,
            spd: value,
            spe: value,
        }
    }

    /// Returns the value for the given stat.
    pub fn get(&self, stat: Stat) -> u16 {
        match stat {
            Stat::HP => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::SpAtk => self.spa,
            Stat::SpDef => self.spd,
            Stat::Spe => self.spe,
        }
    }

    /// Sets the given value in the stat table.
    pub fn set(&mut self, stat: Stat, value: u16) {
        let stat = match stat {
            Stat::HP => &mut self.hp,
            Stat::Atk => &mut self.atk,
            Stat::Def => &mut self.def,
            Stat::SpAtk => &mut self.spa,
            Stat::SpDef => &mut self.spd,
            Stat::Spe => &mut self.spe,
        };
        *stat = value;
    }

    /// Creates an iterator over all stat entries, in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (Stat, u16)> + '_ {
        Stat::ALL.into_iter().map(|stat| (stat, self.get(stat)))
    }
}

impl From<&PartialStatTable> for StatTable {
    fn from(value: &PartialStatTable) -> Self {
        Self {
            hp: *value.get(&Stat::HP).unwrap_or(&0),
            atk: *value.get(&Stat::Atk).unwrap_or(&0),
            def: *value.get(&Stat::Def).unwrap_or(&0),
            spa: *value.get(&Stat::SpAtk).unwrap_or(&0),
            spd: *value.get(&Stat::SpDef).unwrap_or(&0),
            spe: *value.get(&Stat::Spe).unwrap_or(&0),
        }
    }
}

impl FromIterator<(Stat, u16)> for StatTable {
    fn from_iter<T: IntoIterator<Item = (Stat, u16)>>(iter: T) -> Self {
        let mut out = StatTable::default();
        for (stat, value) in iter {
            out.set(stat, value);
        }
        out
    }
}


#[cfg(test)]
mod stat_table_test {
    use crate::{
        PartialStatTable,
        Stat,
        StatTable,
    };

    #[test]
    fn converts_from_partial_stat_table() {
        let mut table = PartialStatTable::default();
        table.insert(Stat::Atk, 252);
        table.insert(Stat::SpDef, 4);
        let table = StatTable::from(&table);
        assert_eq!(
            table,
            StatTable {
                hp: 0,
                atk: 252,
                def: 0,
                spa: 0,
                spd: 4,
                spe: 0,
            }
        )
    }

    #[test]
    fn uniform_fills_every_stat() {
        let table = StatTable::uniform(31);
        assert_eq!(
            table,
            StatTable {
                hp: 31,
                atk: 31,
                def: 31,
                spa: 31,
                spd: 31,
                spe: 31,
            }
        )
    }

    #[test]
    fn gets_associated_value() {
        let st = StatTable {
            hp: 1,
            atk: 2,
            def: 3,
            spa: 4,
            spd: 5,
            spe: 6,
        };
        assert_eq!(st.get(Stat::HP), 1);
        assert_eq!(st.get(Stat::Atk), 2);
        assert_eq!(st.get(Stat::Def), 3);
        assert_eq!(st.get(Stat::SpAtk), 4);
        assert_eq!(st.get(Stat::SpDef), 5);
        assert_eq!(st.get(Stat::Spe), 6);
    }

    #[test]
    fn sets_associated_value() {
        let mut st = StatTable::default();
        st.set(Stat::HP, 2);
        st.set(Stat::Atk, 4);
        st.set(Stat::Def, 6);
        st.set(Stat::SpAtk, 8);
        st.set(Stat::SpDef, 10);
        st.set(Stat::Spe, 12);
        assert_eq!(st.get(Stat::HP), 2);
        assert_eq!(st.get(Stat::Atk), 4);
        assert_eq!(st.get(Stat::Def), 6);
        assert_eq!(st.get(Stat::SpAtk), 8);
        assert_eq!(st.get(Stat::SpDef), 10);
        assert_eq!(st.get(Stat::Spe), 12);
    }

    #[test]
    fn entries_iterates_in_canonical_order() {
        let st = StatTable {
            hp: 108,
            atk: 130,
            def: 95,
            spa: 80,
            spd: 85,
            spe: 102,
        };
        assert_eq!(
            st.entries().collect::<Vec<_>>(),
            Vec::from_iter([
                (Stat::HP, 108),
                (Stat::Atk, 130),
                (Stat::Def, 95),
                (Stat::SpAtk, 80),
                (Stat::SpDef, 85),
                (Stat::Spe, 102),
            ])
        )
    }

    #[test]
    fn from_iter_constructs_table() {
        let st = StatTable::from_iter([(Stat::HP, 4), (Stat::Atk, 252), (Stat::Spe, 252)]);
        assert_eq!(
            st,
            StatTable {
                hp: 4,
                atk: 252,
                def: 0,
                spa: 0,
                spd: 0,
                spe: 252,
            }
        )
    }
}
