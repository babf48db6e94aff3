// View state - Tab and lookback hours, synchronized with a URL query string
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const VALID_HOURS: [u32; 8] = [1, 3, 6, 12, 24, 72, 168, 336];
pub const DEFAULT_HOURS: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Solar,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Solar => "solar",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "overview" => Some(Tab::Overview),
            "solar" => Some(Tab::Solar),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub tab: Tab,
    pub hours: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            hours: DEFAULT_HOURS,
        }
    }
}

fn query_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

fn valid_hours(value: &str) -> Option<u32> {
    value.parse().ok().filter(|h| VALID_HOURS.contains(h))
}

/// The view parameters a request actually carries. Invalid values count as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ViewChange {
    pub tab: Option<Tab>,
    pub hours: Option<u32>,
}

impl ViewChange {
    pub fn from_query(query: &str) -> Self {
        let mut change = Self::default();
        for (key, value) in query_pairs(query) {
            match key.as_str() {
                "tab" => change.tab = Tab::parse(&value),
                "hours" => change.hours = valid_hours(&value),
                _ => {}
            }
        }
        change
    }
}

impl ViewState {
    /// Read `tab` and `hours` from a query string; anything missing or invalid
    /// falls back to the defaults.
    pub fn hydrate(query: &str) -> Self {
        let change = ViewChange::from_query(query);
        Self {
            tab: change.tab.unwrap_or_default(),
            hours: change.hours.unwrap_or(DEFAULT_HOURS),
        }
    }

    /// Write `tab` and `hours` into `query`, keeping every other parameter in place.
    pub fn persist(&self, query: &str) -> String {
        let mut pairs: Vec<(String, String)> = query_pairs(query)
            .filter(|(key, _)| key != "tab" && key != "hours")
            .collect();
        pairs.push(("tab".to_string(), self.tab.as_str().to_string()));
        pairs.push(("hours".to_string(), self.hours.to_string()));

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Returns false, leaving hours untouched, for a value outside the menu.
    pub fn set_hours(&mut self, hours: u32) -> bool {
        if !VALID_HOURS.contains(&hours) {
            return false;
        }
        self.hours = hours;
        true
    }

    /// Cutoff for the lookback query.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::hours(i64::from(self.hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydrate_reads_valid_values() {
        let state = ViewState::hydrate("?tab=solar&hours=72");
        assert_eq!(state, ViewState { tab: Tab::Solar, hours: 72 });
    }

    #[test]
    fn test_change_carries_only_present_parameters() {
        assert_eq!(
            ViewChange::from_query("tab=solar"),
            ViewChange { tab: Some(Tab::Solar), hours: None }
        );
        assert_eq!(
            ViewChange::from_query("?from=menu&hours=24"),
            ViewChange { tab: None, hours: Some(24) }
        );
        assert_eq!(ViewChange::from_query("tab=energy&hours=5"), ViewChange::default());
    }

    #[test]
    fn test_hydrate_falls_back_on_invalid() {
        assert_eq!(ViewState::hydrate(""), ViewState::default());
        let state = ViewState::hydrate("tab=energy&hours=5");
        assert_eq!(state.tab, Tab::Overview);
        assert_eq!(state.hours, 12);
        assert_eq!(ViewState::hydrate("hours=abc").hours, 12);
    }

    #[test]
    fn test_persist_keeps_other_params() {
        let state = ViewState { tab: Tab::Solar, hours: 24 };
        let query = state.persist("?debug=1&hours=3&name=living%20room");
        assert_eq!(query, "debug=1&name=living%20room&tab=solar&hours=24");
        assert_eq!(ViewState::hydrate(&query), state);
    }

    #[test]
    fn test_set_hours_rejects_unknown() {
        let mut state = ViewState::default();
        assert!(!state.set_hours(5));
        assert_eq!(state.hours, 12);
        assert!(state.set_hours(336));
        assert_eq!(state.hours, 336);
    }

    #[test]
    fn test_since() {
        let now = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z").unwrap().with_timezone(&Utc);
        let state = ViewState { tab: Tab::Overview, hours: 3 };
        assert_eq!(state.since(now).to_rfc3339(), "2025-06-01T09:00:00+00:00");
    }
}
