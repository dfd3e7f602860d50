use std::{
    sync::Arc,
    time::Duration,
};

use ahash::HashSet;
use anyhow::Result;
use matchup_data::{
    StatTable,
    UsageSpread,
    UsageStore,
};
use thiserror::Error;
use tokio::{
    sync::{
        Mutex,
        mpsc,
        watch,
    },
    task::JoinHandle,
};

use crate::{
    calc::{
        DamageCalc,
        Field,
    },
    import::{
        ImportMode,
        ImportOptions,
        parse_roster,
    },
    matrix::{
        MatchupInput,
        MatchupMatrix,
        calculate_matchups,
    },
    spread::{
        self,
        SpreadSelection,
    },
    team::{
        Combatant,
        ResolvedSpread,
        SpreadState,
    },
};

/// Which side of the battle a roster belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Ours,
    Theirs,
}

/// Options for a matchup session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Options for roster import.
    pub import: ImportOptions,
    /// Battlefield conditions for every calculation.
    pub field: Field,
}

/// Error produced by an operation on a [`MatchupSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("both rosters must be imported before calculating")]
    InputIncomplete,
    #[error("no roster member at index {index}")]
    MemberOutOfRange { index: usize },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A roster member that can Terastallize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeraCandidate {
    pub index: usize,
    pub name: String,
    pub tera_type: String,
}

/// Matchup matrices for both directions of a battle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchupReport {
    /// Our roster attacking their roster.
    pub attacking: MatchupMatrix,
    /// Their roster attacking our roster.
    pub defending: MatchupMatrix,
}

/// An interactive matchup session between our roster and a scouted opposing roster.
///
/// The session owns both rosters and the per-member state layered on top of them, such as
/// spread selections and Terastallization. Rosters can be reimported at any time. Calculations
/// never modify session state, so a report can be generated repeatedly while selections change
/// between runs.
pub struct MatchupSession {
    usage: Arc<dyn UsageStore>,
    options: SessionOptions,
    ours: Vec<Combatant>,
    theirs: Vec<Combatant>,
    our_tera: HashSet<usize>,
    their_tera: HashSet<usize>,
}

impl MatchupSession {
    /// Creates a new session backed by the given usage statistics store.
    pub fn new(usage: Arc<dyn UsageStore>, options: SessionOptions) -> Self {
        Self {
            usage,
            options,
            ours: Vec::new(),
            theirs: Vec::new(),
            our_tera: HashSet::default(),
            their_tera: HashSet::default(),
        }
    }

    /// Imports our roster from exported team text.
    ///
    /// Our roster is fully specified, so inline spread lines are trusted. Reimporting replaces
    /// the previous roster and clears Terastallization selections for the side.
    pub fn import_ours(&mut self, text: &str) -> &[Combatant] {
        self.ours = parse_roster(text, ImportMode::Full, &self.options.import);
        self.our_tera.clear();
        &self.ours
    }

    /// Imports the opposing roster from scouted team text.
    ///
    /// Scouted rosters carry no trustworthy spread information, so every member starts
    /// unresolved. Reimporting replaces the previous roster and clears Terastallization
    /// selections for the side.
    pub fn import_theirs(&mut self, text: &str) -> &[Combatant] {
        self.theirs = parse_roster(text, ImportMode::Scouted, &self.options.import);
        self.their_tera.clear();
        &self.theirs
    }

    pub fn ours(&self) -> &[Combatant] {
        &self.ours
    }

    pub fn theirs(&self) -> &[Combatant] {
        &self.theirs
    }

    /// Candidate spreads for an opposing roster member, most common first.
    pub fn spread_candidates(
        &self,
        index: usize,
    ) -> Result<Option<Vec<UsageSpread>>, SessionError> {
        let member = self
            .theirs
            .get(index)
            .ok_or(SessionError::MemberOutOfRange { index })?;
        Ok(spread::spread_candidates(self.usage.as_ref(), &member.name)?)
    }

    /// Resolves the spread of an opposing roster member.
    pub fn resolve_spread(
        &mut self,
        index: usize,
        selection: SpreadSelection,
    ) -> Result<(), SessionError> {
        let usage = self.usage.clone();
        let member = self
            .theirs
            .get_mut(index)
            .ok_or(SessionError::MemberOutOfRange { index })?;
        spread::resolve_spread(usage.as_ref(), member, selection)?;
        Ok(())
    }

    /// Marks a roster member as Terastallized (or not) for future calculations.
    pub fn set_tera(&mut self, side: Side, index: usize, active: bool) -> Result<(), SessionError> {
        let (roster, tera) = match side {
            Side::Ours => (&self.ours, &mut self.our_tera),
            Side::Theirs => (&self.theirs, &mut self.their_tera),
        };
        if index >= roster.len() {
            return Err(SessionError::MemberOutOfRange { index });
        }
        if active {
            tera.insert(index);
        } else {
            tera.remove(&index);
        }
        Ok(())
    }

    /// Roster members on a side that have a Tera type to Terastallize into.
    pub fn tera_candidates(&self, side: Side) -> Vec<TeraCandidate> {
        let roster = match side {
            Side::Ours => &self.ours,
            Side::Theirs => &self.theirs,
        };
        roster
            .iter()
            .enumerate()
            .filter_map(|(index, member)| {
                member.tera_type.as_ref().map(|tera_type| TeraCandidate {
                    index,
                    name: member.name.clone(),
                    tera_type: tera_type.clone(),
                })
            })
            .collect()
    }

    /// Calculates matchup matrices for both directions of the battle.
    ///
    /// Opposing members whose spreads are still unresolved are calculated with the fallback
    /// nature and no EVs. The fallback applies only to the calculation itself: the session
    /// still reports those members as unresolved afterwards.
    pub fn calculate<C>(&self, calc: &C) -> Result<MatchupReport, SessionError>
    where
        C: DamageCalc,
    {
        if self.ours.is_empty() || self.theirs.is_empty() {
            return Err(SessionError::InputIncomplete);
        }
        let mut theirs = self.theirs.clone();
        for member in &mut theirs {
            if !member.spread.is_resolved() {
                member.spread = SpreadState::Resolved(ResolvedSpread {
                    nature: self.options.import.fallback_nature,
                    evs: StatTable::default(),
                });
            }
        }
        let attacking = calculate_matchups(
            calc,
            MatchupInput {
                attackers: &self.ours,
                defenders: &theirs,
                attacker_tera: &self.our_tera,
                defender_tera: &self.their_tera,
                field: &self.options.field,
            },
        );
        let defending = calculate_matchups(
            calc,
            MatchupInput {
                attackers: &theirs,
                defenders: &self.ours,
                attacker_tera: &self.their_tera,
                defender_tera: &self.our_tera,
                field: &self.options.field,
            },
        );
        Ok(MatchupReport {
            attacking,
            defending,
        })
    }
}

#[derive(Debug)]
struct RosterEdit {
    side: Side,
    text: String,
}

/// Parsed rosters published by a [`LiveSession`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterSnapshot {
    pub ours: Vec<Combatant>,
    pub theirs: Vec<Combatant>,
}

fn apply_edit(ours: &mut String, theirs: &mut String, edit: RosterEdit) {
    match edit.side {
        Side::Ours => *ours = edit.text,
        Side::Theirs => *theirs = edit.text,
    }
}

async fn run_live_session(
    mut edit_rx: mpsc::UnboundedReceiver<RosterEdit>,
    snapshot_tx: watch::Sender<RosterSnapshot>,
    options: ImportOptions,
    debounce: Duration,
) {
    let mut ours = String::new();
    let mut theirs = String::new();
    let mut closed = false;
    while !closed {
        match edit_rx.recv().await {
            Some(edit) => apply_edit(&mut ours, &mut theirs, edit),
            None => break,
        }
        loop {
            tokio::select! {
                edit = edit_rx.recv() => match edit {
                    // Every new edit restarts the quiet period.
                    Some(edit) => apply_edit(&mut ours, &mut theirs, edit),
                    None => {
                        closed = true;
                        break;
                    }
                },
                _ = tokio::time::sleep(debounce) => break,
            }
        }
        let snapshot = RosterSnapshot {
            ours: parse_roster(&ours, ImportMode::Full, &options),
            theirs: parse_roster(&theirs, ImportMode::Scouted, &options),
        };
        snapshot_tx.send(snapshot).ok();
    }
}

/// A background task that reparses rosters as their text is edited.
///
/// Edits are debounced: a snapshot is published only after the text has been quiet for the
/// configured duration, so a burst of keystrokes produces a single reparse of the final text.
pub struct LiveSession {
    edit_tx: mpsc::UnboundedSender<RosterEdit>,
    snapshot_rx: watch::Receiver<RosterSnapshot>,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl LiveSession {
    /// Default quiet period before edited roster text is reparsed.
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

    /// Starts a new live session.
    pub fn new(options: ImportOptions, debounce: Duration) -> Self {
        let (edit_tx, edit_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(RosterSnapshot::default());
        let task_handle = tokio::spawn(run_live_session(edit_rx, snapshot_tx, options, debounce));
        Self {
            edit_tx,
            snapshot_rx,
            task_handle: Mutex::new(Some(task_handle)),
        }
    }

    /// Replaces the text of one side's roster.
    pub fn edit<S>(&self, side: Side, text: S) -> Result<()>
    where
        S: Into<String>,
    {
        self.edit_tx
            .send(RosterEdit {
                side,
                text: text.into(),
            })
            .map_err(|_| anyhow::Error::msg("live session task is not running"))
    }

    /// Receiver for published roster snapshots.
    pub fn snapshot_rx(&self) -> watch::Receiver<RosterSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Cancels the background task.
    pub async fn cancel(&self) {
        if let Some(task_handle) = self.task_handle.lock().await.take() {
            task_handle.abort();
            task_handle.await.ok();
        }
    }
}
