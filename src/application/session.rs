// Dashboard session - The single owner of view, filter and zoom state
use crate::application::daily::{aggregate_daily, total_cost, total_solar_value, EnergyTariff};
use crate::application::filter::{filter_events, filter_solar, VisibilityState};
use crate::application::normalizer::{
    all_device_names, devices_by_category, event_counts, normalize_events, solar_points,
};
use crate::application::request_gate::{RequestGate, RequestTicket};
use crate::application::ticks::labelled_ticks;
use crate::application::time_domain::{full_extent, Viewport, WheelDirection};
use crate::application::view_state::{Tab, ViewState};
use crate::domain::dashboard::{DashboardSnapshot, EnergyReport, Overview, Timeline};
use crate::domain::error::TimelineResult;
use crate::domain::event::{EventCategory, EventKind, NormalizedChartEvent};
use crate::domain::telemetry::{EnvironmentCard, SolarSeries};
use crate::domain::window::TimeWindow;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewportAction {
    ZoomIn,
    ZoomOut,
    Reset,
    Wheel { delta_y: f64, cursor_fraction: f64 },
    DragStart { x_px: f64 },
    DragMove { x_px: f64, chart_width_px: f64 },
    DragEnd,
    /// Zoom to a brushed range
    SetWindow { window: TimeWindow },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum VisibilityAction {
    ToggleState { kind: EventKind },
    SetState { kind: EventKind, visible: bool },
    ToggleDevice { name: String },
    SelectDevices { names: Vec<String> },
    SelectAllDevices,
    ClearDevices,
    SelectCategory { category: EventCategory },
    ClearCategory { category: EventCategory },
    ToggleSeries { series: SolarSeries },
    SetSeries { series: SolarSeries, visible: bool },
}

/// Data and UI state behind one dashboard.
#[derive(Debug)]
pub struct DashboardSession {
    view: ViewState,
    visibility: VisibilityState,
    viewport: Option<Viewport>,
    snapshot: RequestGate<Arc<DashboardSnapshot>>,
    timezone: Tz,
    tariff: EnergyTariff,
}

impl DashboardSession {
    pub fn new(view: ViewState, timezone: Tz, tariff: EnergyTariff) -> Self {
        Self {
            view,
            visibility: VisibilityState::default(),
            viewport: None,
            snapshot: RequestGate::default(),
            timezone,
            tariff,
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.current().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.is_pending()
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.view.tab = tab;
    }

    /// Change the lookback. Returns true when it changed, which resets the
    /// filters and zoom and calls for a refetch.
    pub fn set_hours(&mut self, hours: u32) -> bool {
        if hours == self.view.hours || !self.view.set_hours(hours) {
            return false;
        }
        self.visibility.reset();
        self.viewport = None;
        true
    }

    /// Start a fetch. The caller runs the query without holding the session.
    pub fn begin_refresh(&mut self, now: DateTime<Utc>) -> (RequestTicket, DateTime<Utc>) {
        (self.snapshot.begin(), self.view.since(now))
    }

    pub fn finish_refresh(&mut self, ticket: RequestTicket, snapshot: DashboardSnapshot) -> bool {
        self.snapshot.apply(ticket, Arc::new(snapshot))
    }

    /// The fetch for `ticket` failed; the last good snapshot stays.
    pub fn fail_refresh(&mut self, ticket: RequestTicket) -> bool {
        self.snapshot.fail(ticket)
    }

    fn current_snapshot(&self) -> Arc<DashboardSnapshot> {
        self.snapshot.current().cloned().unwrap_or_default()
    }

    fn normalized(&self, snapshot: &DashboardSnapshot) -> TimelineResult<Vec<NormalizedChartEvent>> {
        normalize_events(
            &snapshot.doors,
            &snapshot.appliances,
            &snapshot.wifi,
            self.timezone,
        )
    }

    /// Bring the viewport in line with the loaded data and hand it out.
    fn sync_viewport(
        &mut self,
        events: &[NormalizedChartEvent],
        snapshot: &DashboardSnapshot,
        now_ms: i64,
    ) -> &mut Viewport {
        let event_times: Vec<i64> = events.iter().map(|e| e.timestamp_ms).collect();
        let sample_times: Vec<i64> = snapshot.solar_history.iter().map(|s| s.timestamp_ms).collect();
        let full = full_extent(&event_times, &sample_times, now_ms);

        let viewport = self.viewport.get_or_insert_with(|| Viewport::new(full));
        viewport.set_full_extent(full);
        viewport
    }

    pub fn timeline(&mut self, now: DateTime<Utc>) -> TimelineResult<Timeline> {
        let snapshot = self.current_snapshot();
        let events = self.normalized(&snapshot)?;
        self.sync_viewport(&events, &snapshot, now.timestamp_millis());
        Ok(self.render(&events, &snapshot))
    }

    pub fn apply_viewport(
        &mut self,
        action: &ViewportAction,
        now: DateTime<Utc>,
    ) -> TimelineResult<Timeline> {
        let snapshot = self.current_snapshot();
        let events = self.normalized(&snapshot)?;
        let viewport = self.sync_viewport(&events, &snapshot, now.timestamp_millis());

        match action {
            ViewportAction::ZoomIn => viewport.zoom_in(),
            ViewportAction::ZoomOut => viewport.zoom_out(),
            ViewportAction::Reset => viewport.reset(),
            ViewportAction::Wheel {
                delta_y,
                cursor_fraction,
            } => viewport.wheel(WheelDirection::from_delta(*delta_y), *cursor_fraction),
            ViewportAction::DragStart { x_px } => viewport.start_drag(*x_px),
            ViewportAction::DragMove {
                x_px,
                chart_width_px,
            } => viewport.drag_to(*x_px, *chart_width_px),
            ViewportAction::DragEnd => viewport.end_drag(),
            ViewportAction::SetWindow { window } => viewport.zoom_to(*window),
        }

        Ok(self.render(&events, &snapshot))
    }

    pub fn apply_visibility(
        &mut self,
        action: &VisibilityAction,
        now: DateTime<Utc>,
    ) -> TimelineResult<Timeline> {
        let snapshot = self.current_snapshot();
        let events = self.normalized(&snapshot)?;

        match action {
            VisibilityAction::ToggleState { kind } => self.visibility.states.toggle(*kind),
            VisibilityAction::SetState { kind, visible } => {
                self.visibility.states.set(*kind, *visible)
            }
            VisibilityAction::ToggleDevice { name } => self.visibility.toggle_device(name),
            VisibilityAction::SelectDevices { names } => {
                self.visibility.select_devices(names.iter().cloned())
            }
            VisibilityAction::SelectAllDevices => {
                self.visibility.select_devices(all_device_names(&events))
            }
            VisibilityAction::ClearDevices => self.visibility.clear_devices(),
            VisibilityAction::SelectCategory { category } => {
                let devices = devices_by_category(&events);
                self.visibility.select_category(devices.for_category(*category));
            }
            VisibilityAction::ClearCategory { category } => {
                let devices = devices_by_category(&events);
                self.visibility.clear_category(devices.for_category(*category));
            }
            VisibilityAction::ToggleSeries { series } => self.visibility.series.toggle(*series),
            VisibilityAction::SetSeries { series, visible } => {
                self.visibility.series.set(*series, *visible)
            }
        }

        self.sync_viewport(&events, &snapshot, now.timestamp_millis());
        Ok(self.render(&events, &snapshot))
    }

    fn render(&self, events: &[NormalizedChartEvent], snapshot: &DashboardSnapshot) -> Timeline {
        let viewport = self
            .viewport
            .clone()
            .unwrap_or_else(|| Viewport::new(TimeWindow::spanning(0, 0)));
        let window = viewport.current();

        let solar = filter_solar(
            solar_points(&snapshot.solar_history, self.timezone),
            &self.visibility,
            &window,
        );

        Timeline {
            window,
            full_extent: viewport.full_extent(),
            zoomed: viewport.is_zoomed(),
            dragging: viewport.is_dragging(),
            loading: self.is_loading(),
            ticks: labelled_ticks(&window, self.timezone),
            events: filter_events(events, &self.visibility, &window),
            solar,
            series: self.visibility.series,
            event_counts: event_counts(events),
            devices: devices_by_category(events),
            selected_devices: self
                .visibility
                .selected_devices()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn energy(&self) -> TimelineResult<EnergyReport> {
        let snapshot = self.current_snapshot();
        let history = &snapshot.energy_history;
        Ok(EnergyReport {
            days: aggregate_daily(history, self.timezone)?,
            total_cost: total_cost(history, &self.tariff),
            total_solar_value: total_solar_value(history, &self.tariff, self.timezone)?,
            solar_current: snapshot.solar_current.clone(),
        })
    }

    pub fn overview(&self) -> Overview {
        let snapshot = self.current_snapshot();
        Overview {
            environment: snapshot
                .environment
                .iter()
                .map(|(key, reading)| EnvironmentCard::from_reading(key, reading.as_ref()))
                .collect(),
        }
    }
}
