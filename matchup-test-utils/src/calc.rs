use ahash::{
    HashMap,
    HashSet,
};
use anyhow::{
    Error,
    Result,
};
use matchup::{
    DamageCalc,
    DamageSummary,
    Field,
    Mon,
    Range,
};
use matchup_data::{
    Stat,
    StatTable,
};

fn calculate_stats(base_stats: &StatTable, mon: &Mon) -> StatTable {
    let mut stats = StatTable::default();
    for (stat, value) in base_stats.entries() {
        let value = value as u64;
        let value = value * 2;
        let value = value + mon.ivs.get(stat) as u64;
        let value = value + mon.evs.get(stat) as u64 / 4;
        let value = value * mon.level / 100;
        let value = if stat == Stat::HP {
            value + mon.level + 10
        } else {
            value + 5
        };
        stats.set(stat, value as u16);
    }

    let boosts = mon.nature.boosts();
    let drops = mon.nature.drops();
    if boosts != drops {
        let boosted = stats.get(boosts) as u64;
        let boosted = boosted + boosted * 10 / 100;
        stats.set(boosts, boosted as u16);

        let dropped = stats.get(drops) as u64;
        let dropped = dropped - (dropped * 10).div_ceil(100);
        stats.set(drops, dropped as u16);
    }

    stats
}

/// A combatant constructed by [`TestCalc`].
pub struct TestCombatant {
    mon: Mon,
    stats: StatTable,
}

/// A scriptable damage calculator for tests.
///
/// Damage values are looked up from preprogrammed entries by attacker, defender, and move.
/// Stats are computed from registered base stats with the standard formula, so maximum HP
/// reacts to levels, spreads, and natures the way a real backend's would.
#[derive(Default)]
pub struct TestCalc {
    species: HashMap<String, StatTable>,
    damage: HashMap<(String, String, String), Range>,
    tera_damage: HashMap<(String, String, String), Range>,
    status_moves: HashSet<String>,
}

impl TestCalc {
    /// Registers a species with the given base stats.
    pub fn add_species(&mut self, name: &str, base_stats: StatTable) {
        self.species.insert(name.to_owned(), base_stats);
    }

    /// Programs the damage dealt by one attacker's move against one defender.
    pub fn add_damage(&mut self, attacker: &str, defender: &str, mov: &str, damage: Range) {
        self.damage.insert(
            (attacker.to_owned(), defender.to_owned(), mov.to_owned()),
            damage,
        );
    }

    /// Programs the damage dealt when the attacker is Terastallized.
    pub fn add_tera_damage(&mut self, attacker: &str, defender: &str, mov: &str, damage: Range) {
        self.tera_damage.insert(
            (attacker.to_owned(), defender.to_owned(), mov.to_owned()),
            damage,
        );
    }

    /// Registers a move that deals no direct damage.
    pub fn add_status_move(&mut self, mov: &str) {
        self.status_moves.insert(mov.to_owned());
    }
}

impl DamageCalc for TestCalc {
    type Combatant = TestCombatant;

    fn construct(&self, mon: &Mon) -> Result<TestCombatant> {
        let base_stats = self
            .species
            .get(&mon.name)
            .ok_or_else(|| Error::msg(format!("mon {} does not exist", mon.name)))?;
        Ok(TestCombatant {
            mon: mon.clone(),
            stats: calculate_stats(base_stats, mon),
        })
    }

    fn max_hp(&self, combatant: &TestCombatant) -> u64 {
        combatant.stats.hp as u64
    }

    fn is_status_move(&self, mov: &str) -> bool {
        self.status_moves.contains(mov)
    }

    fn damage(
        &self,
        attacker: &TestCombatant,
        defender: &TestCombatant,
        mov: &str,
        _: &Field,
    ) -> Result<DamageSummary> {
        let key = (
            attacker.mon.name.clone(),
            defender.mon.name.clone(),
            mov.to_owned(),
        );
        let damage = if attacker.mon.tera_type.is_some() {
            self.tera_damage.get(&key).or_else(|| self.damage.get(&key))
        } else {
            self.damage.get(&key)
        };
        let damage = *damage.ok_or_else(|| Error::msg(format!("move {mov} does not exist")))?;
        Ok(DamageSummary {
            damage,
            description: Vec::from_iter([format!(
                "{} used {mov} against {}",
                attacker.mon.name, defender.mon.name
            )]),
        })
    }
}
