// Dashboard service - Use cases over the session and the repository
use crate::application::normalizer::solar_points;
use crate::application::session::{DashboardSession, ViewportAction, VisibilityAction};
use crate::application::telemetry_repository::TelemetryRepository;
use crate::application::view_state::{Tab, ViewState};
use crate::domain::dashboard::{EinkSummary, EnergyReport, Overview, Timeline};
use anyhow::Context;
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn TelemetryRepository>,
    session: Arc<Mutex<DashboardSession>>,
    timezone: Tz,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn TelemetryRepository>, session: DashboardSession, timezone: Tz) -> Self {
        Self {
            repository,
            session: Arc::new(Mutex::new(session)),
            timezone,
        }
    }

    pub async fn view(&self) -> ViewState {
        self.session.lock().await.view()
    }

    /// Fetch with the current view. The session is unlocked while the query
    /// runs; a response that was overtaken by a newer fetch is dropped.
    pub async fn refresh(&self) -> anyhow::Result<bool> {
        let (ticket, since) = self.session.lock().await.begin_refresh(Utc::now());
        tracing::debug!("Fetching dashboard since {} (request {})", since, ticket.generation());

        let snapshot = match self.repository.fetch_dashboard(since).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.session.lock().await.fail_refresh(ticket);
                return Err(e.context("Failed to fetch dashboard data"));
            }
        };

        let applied = self.session.lock().await.finish_refresh(ticket, snapshot);
        if applied {
            tracing::info!("Dashboard data refreshed (request {})", ticket.generation());
        }
        Ok(applied)
    }

    async fn ensure_loaded(&self) -> anyhow::Result<()> {
        let loaded = self.session.lock().await.has_snapshot();
        if !loaded {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Apply tab/hours changes; a new lookback triggers a refetch.
    pub async fn set_view(&self, tab: Option<Tab>, hours: Option<u32>) -> anyhow::Result<ViewState> {
        let (changed, view) = {
            let mut session = self.session.lock().await;
            if let Some(tab) = tab {
                session.set_tab(tab);
            }
            let changed = hours.is_some_and(|h| session.set_hours(h));
            (changed, session.view())
        };

        if changed {
            tracing::info!("Lookback changed to {}h", view.hours);
            self.refresh().await?;
        }
        Ok(view)
    }

    pub async fn timeline(&self) -> anyhow::Result<Timeline> {
        self.ensure_loaded().await?;
        Ok(self.session.lock().await.timeline(Utc::now())?)
    }

    pub async fn apply_viewport(&self, action: &ViewportAction) -> anyhow::Result<Timeline> {
        self.ensure_loaded().await?;
        Ok(self.session.lock().await.apply_viewport(action, Utc::now())?)
    }

    pub async fn apply_visibility(&self, action: &VisibilityAction) -> anyhow::Result<Timeline> {
        self.ensure_loaded().await?;
        Ok(self.session.lock().await.apply_visibility(action, Utc::now())?)
    }

    pub async fn energy(&self) -> anyhow::Result<EnergyReport> {
        self.ensure_loaded().await?;
        Ok(self.session.lock().await.energy()?)
    }

    pub async fn overview(&self) -> anyhow::Result<Overview> {
        self.ensure_loaded().await?;
        Ok(self.session.lock().await.overview())
    }

    /// One-shot query for the e-ink display; does not touch the session.
    pub async fn eink(&self, location: &str, hours: u32) -> anyhow::Result<EinkSummary> {
        let view = ViewState {
            tab: Tab::Solar,
            hours,
        };
        let snapshot = self
            .repository
            .fetch_eink(view.since(Utc::now()), location)
            .await
            .with_context(|| format!("Failed to fetch e-ink data for {}", location))?;

        Ok(EinkSummary {
            location: location.to_string(),
            solar: solar_points(&snapshot.solar_history, self.timezone),
            solar_current: snapshot.solar_current,
            forecast: snapshot.forecast,
            products: snapshot.products,
        })
    }
}
