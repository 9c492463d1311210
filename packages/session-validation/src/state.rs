//! Validation state
//!
//! Resolves the requested mode against the uplink/SSE enable flags once per
//! run. This is the only fail-fast step of the engine: an inconsistent request
//! is rejected before any parameter is looked at.

use crate::errors::{ParameterError, ParameterResult};
use crate::flags::{Autorun, EnableSse, EnableUplink, Gui};
use crate::mode::Mode;
use serde::Serialize;
use tracing::warn;

/// Immutable per-run session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationState {
    mission: String,
    enable_uplink: EnableUplink,
    enable_sse: EnableSse,
    mode: Mode,
    gui: Gui,
    autorun: Autorun,
    allowed_for_fsw_downlink: bool,
    allowed_for_sse_downlink: bool,
    allowed_for_uplink: bool,
    allowed_for_monitor: bool,
}

impl ValidationState {
    pub fn new(
        mission: impl Into<String>,
        enable_uplink: EnableUplink,
        enable_sse: EnableSse,
        requested: Mode,
        gui: Gui,
        autorun: Autorun,
    ) -> ParameterResult<Self> {
        let mode = resolve_mode(requested, enable_uplink, enable_sse).map_err(|e| {
            warn!(mode = %requested, error = %e, "mode resolution failed");
            e
        })?;

        let integrated = mode.is_integrated();

        Ok(Self {
            mission: mission.into(),
            enable_uplink,
            enable_sse,
            mode,
            gui,
            autorun,
            allowed_for_fsw_downlink: mode.is_fsw_downlink() || integrated,
            allowed_for_sse_downlink: mode.is_sse_downlink() || (integrated && enable_sse.get()),
            allowed_for_uplink: mode.is_uplink() || (integrated && enable_uplink.get()),
            allowed_for_monitor: mode.is_monitor() || integrated,
        })
    }

    pub fn mission(&self) -> &str {
        &self.mission
    }

    /// The resolved mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn enable_uplink(&self) -> EnableUplink {
        self.enable_uplink
    }

    pub fn enable_sse(&self) -> EnableSse {
        self.enable_sse
    }

    pub fn gui(&self) -> Gui {
        self.gui
    }

    pub fn autorun(&self) -> Autorun {
        self.autorun
    }

    pub fn allowed_for_fsw_downlink(&self) -> bool {
        self.allowed_for_fsw_downlink
    }

    pub fn allowed_for_sse_downlink(&self) -> bool {
        self.allowed_for_sse_downlink
    }

    pub fn allowed_for_uplink(&self) -> bool {
        self.allowed_for_uplink
    }

    pub fn allowed_for_monitor(&self) -> bool {
        self.allowed_for_monitor
    }
}

/// Resolve a requested mode into a concrete, consistent one.
///
/// `Integrated` is mapped through the enable flags and never fails; the
/// explicit integrated variants must agree with the flags exactly.
pub fn resolve_mode(
    requested: Mode,
    enable_uplink: EnableUplink,
    enable_sse: EnableSse,
) -> ParameterResult<Mode> {
    let up = enable_uplink.get();
    let sse = enable_sse.get();

    if !sse && requested.is_sse_downlink() {
        return Err(ParameterError::mode_conflict(requested, "SSE is not enabled"));
    }

    if !up && requested.is_uplink() {
        return Err(ParameterError::mode_conflict(requested, "uplink is not enabled"));
    }

    match requested {
        Mode::IntegratedFswOnly if up || sse => Err(ParameterError::mode_conflict(
            requested,
            "neither uplink nor SSE may be enabled",
        )),
        Mode::IntegratedFswSse if !sse || up => Err(ParameterError::mode_conflict(
            requested,
            "SSE must be enabled and uplink must not be",
        )),
        Mode::IntegratedFswUp if !up || sse => Err(ParameterError::mode_conflict(
            requested,
            "uplink must be enabled and SSE must not be",
        )),
        Mode::IntegratedFswSseUp if !(up && sse) => Err(ParameterError::mode_conflict(
            requested,
            "both uplink and SSE must be enabled",
        )),
        Mode::Integrated => Ok(match (up, sse) {
            (false, false) => Mode::IntegratedFswOnly,
            (false, true) => Mode::IntegratedFswSse,
            (true, false) => Mode::IntegratedFswUp,
            (true, true) => Mode::IntegratedFswSseUp,
        }),
        other => Ok(other),
    }
}
