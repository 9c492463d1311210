//! Application modes
//!
//! A [`Mode`] is the personality the application runs with. Every mode carries
//! exactly one [`Capability`]; `Mode::capability` is a total match, so the
//! "one tag per variant" rule holds by construction.

use crate::errors::{ParameterError, ParameterResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability implied by a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    FswDownlink,
    Uplink,
    SseDownlink,
    Integrated,
    Monitor,
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    FswDownlink,
    SseDownlink,
    Uplink,
    Monitor,
    /// Undifferentiated integrated mode, resolved from the enable flags
    Integrated,
    IntegratedFswOnly,
    IntegratedFswSse,
    IntegratedFswUp,
    IntegratedFswSseUp,
}

impl Mode {
    /// All modes in declaration order
    pub const ALL: [Mode; 9] = [
        Mode::FswDownlink,
        Mode::SseDownlink,
        Mode::Uplink,
        Mode::Monitor,
        Mode::Integrated,
        Mode::IntegratedFswOnly,
        Mode::IntegratedFswSse,
        Mode::IntegratedFswUp,
        Mode::IntegratedFswSseUp,
    ];

    pub const fn capability(self) -> Capability {
        match self {
            Mode::FswDownlink => Capability::FswDownlink,
            Mode::SseDownlink => Capability::SseDownlink,
            Mode::Uplink => Capability::Uplink,
            Mode::Monitor => Capability::Monitor,
            Mode::Integrated
            | Mode::IntegratedFswOnly
            | Mode::IntegratedFswSse
            | Mode::IntegratedFswUp
            | Mode::IntegratedFswSseUp => Capability::Integrated,
        }
    }

    pub const fn is_fsw_downlink(self) -> bool {
        matches!(self.capability(), Capability::FswDownlink)
    }

    pub const fn is_uplink(self) -> bool {
        matches!(self.capability(), Capability::Uplink)
    }

    pub const fn is_sse_downlink(self) -> bool {
        matches!(self.capability(), Capability::SseDownlink)
    }

    pub const fn is_integrated(self) -> bool {
        matches!(self.capability(), Capability::Integrated)
    }

    pub const fn is_monitor(self) -> bool {
        matches!(self.capability(), Capability::Monitor)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::FswDownlink => "FSW_DOWNLINK",
            Mode::SseDownlink => "SSE_DOWNLINK",
            Mode::Uplink => "UPLINK",
            Mode::Monitor => "MONITOR",
            Mode::Integrated => "INTEGRATED",
            Mode::IntegratedFswOnly => "INTEGRATED_FSW_ONLY",
            Mode::IntegratedFswSse => "INTEGRATED_FSW_SSE",
            Mode::IntegratedFswUp => "INTEGRATED_FSW_UP",
            Mode::IntegratedFswSseUp => "INTEGRATED_FSW_SSE_UP",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParameterError;

    /// Case-insensitive; `-` and spaces fold to `_`
    fn from_str(s: &str) -> ParameterResult<Self> {
        let folded: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == folded)
            .ok_or_else(|| ParameterError::UnknownMode {
                found: s.to_string(),
                valid: Mode::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ModeSet
// ═══════════════════════════════════════════════════════════════════════════

/// Set of modes, iterated in declaration order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Mode>", into = "Vec<Mode>")]
pub struct ModeSet(u16);

impl ModeSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self::of(&Mode::ALL)
    }

    pub fn of(modes: &[Mode]) -> Self {
        modes.iter().fold(Self::empty(), |set, m| set.with(*m))
    }

    /// Modes that receive flight or SSE telemetry
    pub fn downlink() -> Self {
        Self::all().without(Mode::Uplink).without(Mode::Monitor)
    }

    /// Modes that may send commands
    pub fn uplink_capable() -> Self {
        Self::of(&[
            Mode::Uplink,
            Mode::Integrated,
            Mode::IntegratedFswUp,
            Mode::IntegratedFswSseUp,
        ])
    }

    /// Every integrated variant
    pub fn integrated() -> Self {
        Self::all()
            .iter()
            .filter(|m| m.is_integrated())
            .fold(Self::empty(), |set, m| set.with(m))
    }

    pub const fn with(self, mode: Mode) -> Self {
        Self(self.0 | mode.bit())
    }

    pub const fn without(self, mode: Mode) -> Self {
        Self(self.0 & !mode.bit())
    }

    pub fn insert(&mut self, mode: Mode) {
        self.0 |= mode.bit();
    }

    pub const fn contains(self, mode: Mode) -> bool {
        self.0 & mode.bit() != 0
    }

    pub const fn union(self, other: ModeSet) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Mode> {
        Mode::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl From<Vec<Mode>> for ModeSet {
    fn from(modes: Vec<Mode>) -> Self {
        Self::of(&modes)
    }
}

impl From<ModeSet> for Vec<Mode> {
    fn from(set: ModeSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Mode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, m| set.with(m))
    }
}

impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Mode::as_str).collect();
        write!(f, "[{}]", names.join(","))
    }
}
