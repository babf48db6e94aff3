// Time-domain calculator - Visible window, zoom and pan
use crate::domain::window::TimeWindow;

/// Span used when nothing is loaded.
pub const DEFAULT_SPAN_MS: i64 = 24 * 60 * 60 * 1000;

const PADDING_RATIO: f64 = 0.05;
const ZOOM_IN_RATIO: f64 = 0.5;
const ZOOM_OUT_RATIO: f64 = 2.0;
const WHEEL_OUT_FACTOR: f64 = 1.2;
const WHEEL_IN_FACTOR: f64 = 0.8;

/// Padded extent of every loaded timestamp, or the last day when empty.
pub fn full_extent(event_times: &[i64], sample_times: &[i64], now_ms: i64) -> TimeWindow {
    let all = event_times.iter().chain(sample_times);
    let (Some(min), Some(max)) = (all.clone().min(), all.max()) else {
        return TimeWindow::spanning(now_ms.saturating_sub(DEFAULT_SPAN_MS), now_ms);
    };

    // At least 1ms so a single timestamp is still strictly inside
    let span = max.saturating_sub(*min);
    let pad = ((span as f64) * PADDING_RATIO).ceil().max(1.0) as i64;
    TimeWindow::spanning(min.saturating_sub(pad), max.saturating_add(pad))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    In,
    Out,
}

impl WheelDirection {
    /// Positive wheel delta scrolls out, as browsers report it.
    pub fn from_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            WheelDirection::Out
        } else {
            WheelDirection::In
        }
    }

    fn factor(self) -> f64 {
        match self {
            WheelDirection::In => WHEEL_IN_FACTOR,
            WheelDirection::Out => WHEEL_OUT_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    x_px: f64,
    window: TimeWindow,
}

/// Zoom and pan state over a full extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    full: TimeWindow,
    zoom: Option<TimeWindow>,
    drag: Option<DragOrigin>,
}

impl Viewport {
    pub fn new(full: TimeWindow) -> Self {
        Self {
            full,
            zoom: None,
            drag: None,
        }
    }

    pub fn full_extent(&self) -> TimeWindow {
        self.full
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The zoom window wins over the full extent.
    pub fn current(&self) -> TimeWindow {
        self.zoom.unwrap_or(self.full)
    }

    /// Replace the full extent after new data arrives. A zoom that no longer
    /// fits inside is dropped.
    pub fn set_full_extent(&mut self, full: TimeWindow) {
        self.full = full;
        if let Some(zoom) = self.zoom {
            if zoom.start_ms() < full.start_ms() || zoom.end_ms() > full.end_ms() {
                self.reset();
            }
        }
    }

    pub fn reset(&mut self) {
        self.zoom = None;
        self.drag = None;
    }

    pub fn zoom_in(&mut self) {
        let current = self.current();
        let width = current.width_ms() as f64 * ZOOM_IN_RATIO;
        let start = current.midpoint_ms() as f64 - width / 2.0;
        self.zoom = Some(self.clamp_span(start, width));
    }

    pub fn zoom_out(&mut self) {
        let current = self.current();
        let width = current.width_ms() as f64 * ZOOM_OUT_RATIO;
        if width >= self.full.width_ms() as f64 {
            self.zoom = None;
            return;
        }
        let start = current.midpoint_ms() as f64 - width / 2.0;
        self.zoom = Some(self.clamp_span(start, width));
    }

    /// Zoom straight to a selected range, shifted inside the full extent.
    pub fn zoom_to(&mut self, window: TimeWindow) {
        self.drag = None;
        if window.width_ms() >= self.full.width_ms() {
            self.zoom = None;
            return;
        }
        self.zoom = Some(self.clamp_span(window.start_ms() as f64, window.width_ms() as f64));
    }

    /// Zoom around the cursor; `cursor_fraction` is its horizontal position
    /// within the chart, 0.0 at the left edge.
    pub fn wheel(&mut self, direction: WheelDirection, cursor_fraction: f64) {
        let fraction = if cursor_fraction.is_finite() {
            cursor_fraction.clamp(0.0, 1.0)
        } else {
            0.5
        };
        let current = self.current();
        let range = current.width_ms() as f64;
        let anchor = current.start_ms() as f64 + range * fraction;
        let width = range * direction.factor();

        if width >= self.full.width_ms() as f64 {
            self.zoom = None;
            return;
        }
        self.zoom = Some(self.clamp_span(anchor - width * fraction, width));
    }

    /// Begin a drag. Ignored unless zoomed.
    pub fn start_drag(&mut self, x_px: f64) {
        if let Some(window) = self.zoom {
            self.drag = Some(DragOrigin { x_px, window });
        }
    }

    /// Translate the zoom window by the pointer delta since `start_drag`.
    pub fn drag_to(&mut self, x_px: f64, chart_width_px: f64) {
        let Some(origin) = self.drag else {
            return;
        };
        if self.zoom.is_none() || chart_width_px.is_nan() || chart_width_px <= 0.0 {
            return;
        }

        let width = origin.window.width_ms() as f64;
        let delta = (x_px - origin.x_px) / chart_width_px * width;
        let start = origin.window.start_ms() as f64 - delta;
        self.zoom = Some(self.clamp_span(start, width));
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Place a window of `width` starting near `start`, shifted to lie inside the full extent.
    fn clamp_span(&self, start: f64, width: f64) -> TimeWindow {
        let width = width.round().clamp(0.0, self.full.width_ms() as f64) as i64;
        let latest_start = self.full.end_ms() - width;
        let start = (start.round() as i64).clamp(self.full.start_ms(), latest_start);
        TimeWindow::spanning(start, start + width)
    }
}
