//! Locally recorded leaderboard with filtering and paging.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::question::Difficulty;

/// Entries shown per leaderboard page.
pub const PAGE_SIZE: usize = 10;

/// Which game produced a leaderboard entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Infinity,
    Classic,
}

impl GameMode {
    pub fn toggle(self) -> Self {
        match self {
            GameMode::Infinity => GameMode::Classic,
            GameMode::Classic => GameMode::Infinity,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::Infinity => "Infinity Mode",
            GameMode::Classic => "Classic Mode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub username: String,
    pub score: u32,
    pub category: String,
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub date: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn new(
        username: impl Into<String>,
        score: u32,
        category: impl Into<String>,
        difficulty: Difficulty,
        mode: GameMode,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            score,
            category: category.into(),
            difficulty,
            mode,
            date,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timeframe {
    #[default]
    AllTime,
    Today,
    ThisWeek,
    ThisMonth,
}

impl Timeframe {
    pub fn cycle(self) -> Self {
        match self {
            Timeframe::AllTime => Timeframe::Today,
            Timeframe::Today => Timeframe::ThisWeek,
            Timeframe::ThisWeek => Timeframe::ThisMonth,
            Timeframe::ThisMonth => Timeframe::AllTime,
        }
    }

    /// Local wall-clock instant the timeframe starts at, `None` for all-time.
    ///
    /// Weeks start on Sunday.
    pub fn start<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<NaiveDateTime> {
        let today = now.date_naive();
        let day = match self {
            Timeframe::AllTime => return None,
            Timeframe::Today => Some(today),
            Timeframe::ThisWeek => {
                today.checked_sub_days(Days::new(u64::from(now.weekday().num_days_from_sunday())))
            }
            Timeframe::ThisMonth => today.with_day(1),
        };
        day.and_then(|day| day.and_hms_opt(0, 0, 0))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Timeframe::AllTime => "all-time",
            Timeframe::Today => "today",
            Timeframe::ThisWeek => "this-week",
            Timeframe::ThisMonth => "this-month",
        })
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all-time" | "all" => Ok(Timeframe::AllTime),
            "today" => Ok(Timeframe::Today),
            "this-week" | "week" => Ok(Timeframe::ThisWeek),
            "this-month" | "month" => Ok(Timeframe::ThisMonth),
            other => Err(format!("unknown timeframe '{}'", other)),
        }
    }
}

/// Filters applied before paging. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardFilter {
    pub timeframe: Timeframe,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub search: String,
}

impl LeaderboardFilter {
    pub fn matches<Tz: TimeZone>(&self, entry: &LeaderboardEntry, now: &DateTime<Tz>) -> bool {
        if self.category.as_ref().is_some_and(|cat| *cat != entry.category) {
            return false;
        }

        if self.difficulty.is_some_and(|diff| diff != entry.difficulty) {
            return false;
        }

        if let Some(start) = self.timeframe.start(now) {
            let local = entry.date.with_timezone(&now.timezone()).naive_local();
            if local < start {
                return false;
            }
        }

        let query = self.search.trim().to_lowercase();
        query.is_empty() || entry.username.to_lowercase().contains(&query)
    }
}

/// A ranked row on a leaderboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub entry: &'a LeaderboardEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// 1-based page number after clamping.
    pub number: usize,
    pub total_pages: usize,
    pub total_entries: usize,
    pub rows: Vec<RankedEntry<'a>>,
}

/// Entries kept in descending score order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(mut entries: Vec<LeaderboardEntry>) -> Self {
        sort_entries(&mut entries);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry and keeps only the best `limit` scores.
    pub fn insert(&mut self, entry: LeaderboardEntry, limit: usize) {
        self.entries.push(entry);
        sort_entries(&mut self.entries);
        self.entries.truncate(limit);
    }

    pub fn top_score(&self) -> u32 {
        self.entries.first().map(|entry| entry.score).unwrap_or(0)
    }

    /// Distinct categories in alphabetical order.
    pub fn categories(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn filtered<Tz: TimeZone>(
        &self,
        filter: &LeaderboardFilter,
        now: &DateTime<Tz>,
    ) -> Vec<&LeaderboardEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.matches(entry, now))
            .collect()
    }

    /// Returns page `number` (1-based, clamped) of the filtered entries.
    pub fn page<Tz: TimeZone>(
        &self,
        filter: &LeaderboardFilter,
        now: &DateTime<Tz>,
        number: usize,
    ) -> Page<'_> {
        let filtered = self.filtered(filter, now);
        let total_entries = filtered.len();
        let total_pages = total_entries.div_ceil(PAGE_SIZE);
        let number = number.clamp(1, total_pages.max(1));
        let offset = (number - 1) * PAGE_SIZE;

        let rows = filtered
            .into_iter()
            .enumerate()
            .skip(offset)
            .take(PAGE_SIZE)
            .map(|(index, entry)| RankedEntry {
                rank: index + 1,
                entry,
            })
            .collect();

        Page {
            number,
            total_pages,
            total_entries,
            rows,
        }
    }
}

fn sort_entries(entries: &mut [LeaderboardEntry]) {
    // Stable: ties keep the older entry first.
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.date.cmp(&b.date)));
}
