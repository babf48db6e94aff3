// Application state for HTTP handlers
use crate::application::alarm_service::AlarmService;
use crate::application::dashboard_service::DashboardService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub alarm_service: AlarmService,
    /// Default location code for the e-ink display
    pub eink_location: String,
}
