use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of days a forecast presents, regardless of how many the service sends.
pub const MAX_VISIBLE_DAYS: usize = 3;

/// Provenance of a forecast result.
///
/// This is where the data came from, not the mode the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    Live,
    OfflineCache,
    #[default]
    #[serde(other)]
    None,
}

impl Source {
    /// Parse a provenance string. Unknown or missing values map to `None`.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("live") => Source::Live,
            Some("offline-cache") => Source::OfflineCache,
            _ => Source::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Live => "live",
            Source::OfflineCache => "offline-cache",
            Source::None => "none",
        }
    }
}

/// Whether a retrieval may contact the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    #[default]
    Online,
    Offline,
}

impl RequestMode {
    pub fn from_offline_flag(offline: bool) -> Self {
        if offline {
            RequestMode::Offline
        } else {
            RequestMode::Online
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, RequestMode::Offline)
    }

    pub fn toggle(&self) -> Self {
        match self {
            RequestMode::Online => RequestMode::Offline,
            RequestMode::Offline => RequestMode::Online,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RequestMode::Online => "Online Mode",
            RequestMode::Offline => "Offline Mode",
        }
    }
}

/// One calendar day of forecast data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advice: Vec<String>,
}

/// Outcome of one retrieval, and the payload shape of the forecast service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Source,
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: Vec<ForecastDay>,
}

impl ForecastResult {
    /// A result with no days and no provenance.
    pub fn empty(city: &str) -> Self {
        Self {
            city: city.to_string(),
            source: Source::None,
            days: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// The days that get presented (at most `MAX_VISIBLE_DAYS`).
    pub fn visible_days(&self) -> &[ForecastDay] {
        let end = self.days.len().min(MAX_VISIBLE_DAYS);
        &self.days[..end]
    }

    pub fn has_days(&self) -> bool {
        !self.days.is_empty()
    }

    /// Check that day dates are distinct and in chronological order.
    pub fn validate(&self) -> Result<(), String> {
        for pair in self.days.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(format!(
                    "forecast days out of order: {} followed by {}",
                    pair[0].date, pair[1].date
                ));
            }
        }
        Ok(())
    }
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
