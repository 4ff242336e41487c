use std::time::{Duration, Instant};

use iced::{Point, Size};

/// A release within this long after the press can count as a tap.
pub(crate) const TAP_MAX_ELAPSED: Duration = Duration::from_millis(200);
/// Per-axis movement a tap may not reach.
pub(crate) const TAP_MAX_MOVEMENT: f32 = 5.0;

pub(crate) const EXPANDED_SIZE: Size = Size::new(380.0, 500.0);
pub(crate) const COLLAPSED_SIZE: Size = Size::new(220.0, 70.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HudMode {
    Collapsed,
    Expanded,
}

impl HudMode {
    pub(crate) fn window_size(self) -> Size {
        match self {
            HudMode::Collapsed => COLLAPSED_SIZE,
            HudMode::Expanded => EXPANDED_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gesture {
    Tap,
    Drag,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    at: Instant,
    origin: Point,
    max_dx: f32,
    max_dy: f32,
}

/// Tells a click apart from a window drag on the collapsed panel.
///
/// The drag is started on press regardless; the release decides whether the
/// press was really a tap.
#[derive(Debug, Default)]
pub(crate) struct TapTracker {
    press: Option<Press>,
}

impl TapTracker {
    pub(crate) fn press(&mut self, at: Instant, position: Point) {
        self.press = Some(Press {
            at,
            origin: position,
            max_dx: 0.0,
            max_dy: 0.0,
        });
    }

    pub(crate) fn track(&mut self, position: Point) {
        if let Some(press) = &mut self.press {
            press.max_dx = press.max_dx.max((position.x - press.origin.x).abs());
            press.max_dy = press.max_dy.max((position.y - press.origin.y).abs());
        }
    }

    /// Classify the release. A release with no matching press is a drag.
    pub(crate) fn release(&mut self, at: Instant, position: Point) -> Gesture {
        self.track(position);
        let Some(press) = self.press.take() else {
            return Gesture::Drag;
        };
        let elapsed = at.saturating_duration_since(press.at);
        if elapsed < TAP_MAX_ELAPSED
            && press.max_dx < TAP_MAX_MOVEMENT
            && press.max_dy < TAP_MAX_MOVEMENT
        {
            Gesture::Tap
        } else {
            Gesture::Drag
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pressed(&self) -> bool {
        self.press.is_some()
    }
}
