//! Scheduling policy constants.
//!
//! Defaults reproduce the stock ranking behavior: an 80-point prioritize
//! threshold, +10 morning / +12 midday boosts, an 8-point admin penalty and
//! a flat +5 for goal-critical tasks.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::rules::{HOUR_MAX, NUMBER_MAX};

/// Time-of-day context a suggestion can be boosted or penalized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusWindow {
    MorningFocus,
    MiddayDeep,
    AdminWindow,
}

impl FocusWindow {
    pub const ALL: [FocusWindow; 3] = [
        FocusWindow::MorningFocus,
        FocusWindow::MiddayDeep,
        FocusWindow::AdminWindow,
    ];

    /// Symbol used in `context(...)` facts and as a suggestion tag.
    pub fn tag(&self) -> &'static str {
        match self {
            FocusWindow::MorningFocus => "morning-focus",
            FocusWindow::MiddayDeep => "midday-deep",
            FocusWindow::AdminWindow => "admin-window",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FocusWindow::MorningFocus => "Morning focus window",
            FocusWindow::MiddayDeep => "Midday deep-work window",
            FocusWindow::AdminWindow => "Admin/meetings window",
        }
    }
}

/// Closed hour interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }

    fn overlaps(&self, other: &HourWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Thresholds, deltas and windows used by the policy rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Minimum alignment score for `prioritize`.
    #[serde(default = "default_prioritize_threshold")]
    pub prioritize_threshold: i64,
    #[serde(default = "default_morning_boost")]
    pub morning_boost: i64,
    #[serde(default = "default_midday_boost")]
    pub midday_boost: i64,
    #[serde(default = "default_admin_penalty")]
    pub admin_penalty: i64,
    /// Flat bonus for every goal-critical task, on top of any boost.
    #[serde(default = "default_goal_critical_bonus")]
    pub goal_critical_bonus: i64,
    #[serde(default = "default_morning_focus")]
    pub morning_focus: HourWindow,
    #[serde(default = "default_midday_deep")]
    pub midday_deep: HourWindow,
    #[serde(default = "default_admin_window")]
    pub admin_window: HourWindow,
}

fn default_prioritize_threshold() -> i64 {
    80
}
fn default_morning_boost() -> i64 {
    10
}
fn default_midday_boost() -> i64 {
    12
}
fn default_admin_penalty() -> i64 {
    8
}
fn default_goal_critical_bonus() -> i64 {
    5
}
fn default_morning_focus() -> HourWindow {
    HourWindow::new(6, 11)
}
fn default_midday_deep() -> HourWindow {
    HourWindow::new(12, 15)
}
fn default_admin_window() -> HourWindow {
    HourWindow::new(16, 19)
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            prioritize_threshold: default_prioritize_threshold(),
            morning_boost: default_morning_boost(),
            midday_boost: default_midday_boost(),
            admin_penalty: default_admin_penalty(),
            goal_critical_bonus: default_goal_critical_bonus(),
            morning_focus: default_morning_focus(),
            midday_deep: default_midday_deep(),
            admin_window: default_admin_window(),
        }
    }
}

impl PolicyConfig {
    pub fn window(&self, window: FocusWindow) -> HourWindow {
        match window {
            FocusWindow::MorningFocus => self.morning_focus,
            FocusWindow::MiddayDeep => self.midday_deep,
            FocusWindow::AdminWindow => self.admin_window,
        }
    }

    /// Window active at `hour`, if any. Hours outside every window get none.
    pub fn active_window(&self, hour: u32) -> Option<FocusWindow> {
        FocusWindow::ALL
            .into_iter()
            .find(|w| self.window(*w).contains(hour))
    }

    /// Check that windows are well-formed and disjoint and that the
    /// threshold lies inside the comparable numeric domain.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for w in FocusWindow::ALL {
            let hours = self.window(w);
            for hour in [hours.start, hours.end] {
                if i64::from(hour) > HOUR_MAX {
                    return Err(ValidationError::HourOutOfRange {
                        field: w.tag().to_string(),
                        hour,
                    });
                }
            }
            if hours.start > hours.end {
                return Err(ValidationError::InvalidWindow {
                    field: w.tag().to_string(),
                    start: hours.start,
                    end: hours.end,
                });
            }
        }

        for (i, a) in FocusWindow::ALL.iter().enumerate() {
            for b in &FocusWindow::ALL[i + 1..] {
                if self.window(*a).overlaps(&self.window(*b)) {
                    return Err(ValidationError::OverlappingWindows {
                        first: a.tag().to_string(),
                        second: b.tag().to_string(),
                    });
                }
            }
        }

        if !(0..=NUMBER_MAX).contains(&self.prioritize_threshold) {
            return Err(ValidationError::InvalidValue {
                field: "prioritize_threshold".to_string(),
                message: format!("must be between 0 and {NUMBER_MAX}"),
            });
        }
        Ok(())
    }
}
