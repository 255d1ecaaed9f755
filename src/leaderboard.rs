//! Victory score hand-off.
//!
//! On victory the pilot's initials and score go to a [`ScoreService`]. The
//! outcome never blocks play: it becomes a short-lived [`Notice`] and, on
//! success, a refreshed top-ten list.

use bevy::prelude::*;
use thiserror::Error;

use crate::simulation::FlightLog;
use crate::types::FlightSystemSet;

/// Entries shown on the board.
pub const TOP_SCORES: usize = 10;

/// How long a notice stays up (seconds).
pub const NOTICE_SECS: f32 = 2.5;

/// Errors from a score service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaderboardError {
    #[error("score service rejected the request (status {status})")]
    Rejected { status: u16 },

    #[error("score service unavailable: {0}")]
    Unavailable(String),

    #[error("initials must be 1 to 3 letters A-Z")]
    InvalidInitials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub player: String,
    pub score: u32,
}

/// Uppercase `raw`, drop everything outside A-Z and keep the first three
/// letters. `None` when nothing is left.
pub fn sanitize_initials(raw: &str) -> Option<String> {
    let initials: String = raw
        .chars()
        .flat_map(char::to_uppercase)
        .filter(char::is_ascii_uppercase)
        .take(3)
        .collect();
    (!initials.is_empty()).then_some(initials)
}

/// Where scores go. Implementations must answer promptly; slow backends
/// should queue and report through a later [`ScoreService::top_scores`].
pub trait ScoreService: Send + Sync {
    fn submit(&mut self, entry: ScoreEntry) -> Result<(), LeaderboardError>;

    /// Best scores first, at most [`TOP_SCORES`].
    fn top_scores(&self) -> Result<Vec<ScoreEntry>, LeaderboardError>;
}

/// In-memory scores for the current session.
#[derive(Debug, Clone, Default)]
pub struct LocalScores {
    entries: Vec<ScoreEntry>,
}

impl ScoreService for LocalScores {
    fn submit(&mut self, entry: ScoreEntry) -> Result<(), LeaderboardError> {
        if sanitize_initials(&entry.player).as_deref() != Some(entry.player.as_str()) {
            return Err(LeaderboardError::InvalidInitials);
        }
        // Stable sort keeps earlier entries ahead on ties.
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(TOP_SCORES);
        Ok(())
    }

    fn top_scores(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Ok(self.entries.clone())
    }
}

/// Transient message for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Submitted,
    SubmitFailed,
    NoInitials,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Submitted => "Score submitted!",
            Notice::SubmitFailed => "Submit failed.",
            Notice::NoInitials => "No initials entered.",
        }
    }
}

/// Render the board: `" 1. ABC  9000"` per line, or `"(no scores yet)"`.
pub fn format_scores(scores: &[ScoreEntry]) -> String {
    if scores.is_empty() {
        return "(no scores yet)".to_string();
    }
    scores
        .iter()
        .take(TOP_SCORES)
        .enumerate()
        .map(|(i, entry)| {
            let tag: String = entry.player.to_uppercase().chars().take(3).collect();
            format!("{:>2}. {:<3}  {}", i + 1, tag, entry.score)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Score service plus what the player currently sees of it.
#[derive(Resource)]
pub struct Leaderboard {
    service: Box<dyn ScoreService>,
    top: Vec<ScoreEntry>,
    notice: Option<Notice>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(Box::new(LocalScores::default()))
    }
}

impl Leaderboard {
    pub fn new(service: Box<dyn ScoreService>) -> Self {
        Self {
            service,
            top: Vec::new(),
            notice: None,
        }
    }

    /// Hand a victory to the service under `raw_initials`.
    pub fn submit_victory(&mut self, raw_initials: &str, score: u32) -> Notice {
        let notice = match sanitize_initials(raw_initials) {
            None => Notice::NoInitials,
            Some(player) => match self.service.submit(ScoreEntry { player, score }) {
                Ok(()) => {
                    if let Err(err) = self.refresh() {
                        warn!("Could not refresh scores: {err}");
                    }
                    Notice::Submitted
                }
                Err(err) => {
                    warn!("Score submit failed: {err}");
                    Notice::SubmitFailed
                }
            },
        };
        self.notice = Some(notice);
        notice
    }

    /// Replace the shown list with the service's current one. On failure the
    /// old list stays.
    pub fn refresh(&mut self) -> Result<(), LeaderboardError> {
        let mut top = self.service.top_scores()?;
        top.truncate(TOP_SCORES);
        self.top = top;
        Ok(())
    }

    pub fn top_scores(&self) -> &[ScoreEntry] {
        &self.top
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

/// Initials the pilot flies under.
#[derive(Resource, Debug, Clone, Default)]
pub struct PilotTag(pub String);

#[derive(Resource, Debug)]
struct NoticeTimer(Timer);

impl Default for NoticeTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(NOTICE_SECS, TimerMode::Once))
    }
}

/// Plugin submitting victories to the [`Leaderboard`].
pub struct LeaderboardPlugin;

impl Plugin for LeaderboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Leaderboard>()
            .init_resource::<PilotTag>()
            .init_resource::<NoticeTimer>()
            .add_systems(
                Update,
                (submit_victories, expire_notice)
                    .chain()
                    .in_set(FlightSystemSet::React),
            );
    }
}

fn submit_victories(
    log: Res<FlightLog>,
    tag: Res<PilotTag>,
    mut board: ResMut<Leaderboard>,
    mut timer: ResMut<NoticeTimer>,
) {
    let Some((_, score)) = log.last.victory() else {
        return;
    };
    let notice = board.submit_victory(&tag.0, score);
    info!("{}", notice.message());
    if notice == Notice::Submitted {
        info!("Top scores:\n{}", format_scores(board.top_scores()));
    }
    timer.0.reset();
}

fn expire_notice(time: Res<Time>, mut board: ResMut<Leaderboard>, mut timer: ResMut<NoticeTimer>) {
    if board.notice().is_none() {
        return;
    }
    if timer.0.tick(time.delta()).just_finished() {
        board.dismiss_notice();
    }
}
