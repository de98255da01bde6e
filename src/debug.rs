/*
 * Debug Information Module
 *
 * Per-frame counters shown in the debug overlay and the control panel:
 * frame timing, ticks run this frame, the last click and the last tick's
 * captures.
 */

use std::time::Duration;

use crate::click::ClickOutcome;

pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub ticks_this_frame: usize,
    pub captures_last_tick: usize,
    pub last_click: Option<ClickOutcome>,
    pub water_fraction: f32,
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            ticks_this_frame: 0,
            captures_last_tick: 0,
            last_click: None,
            water_fraction: 0.0,
        }
    }
}

impl DebugInfo {
    pub fn last_click_summary(&self) -> String {
        match &self.last_click {
            None => "none".to_string(),
            Some(ClickOutcome::Rejected) => "off board".to_string(),
            Some(ClickOutcome::Resolved { kills, placement, score_delta }) => {
                format!("{:?}, {} killed, {:+}", placement, kills.len(), score_delta)
            }
        }
    }
}
