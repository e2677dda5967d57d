//! The request pipeline behind every weather operation.
//!
//! All three operations run the same path: resolve the city, fetch one
//! provider block, normalize it for the requested [`ReportKind`] and
//! render it. Every failure is turned into a [`ToolOutcome`] here, so
//! callers only ever see text plus an error flag.

use chrono::{Local, NaiveDate};
use rand::{SeedableRng, rngs::StdRng};
use std::fmt;
use tracing::{error, info};

use crate::{
    city::{CityTable, UnsupportedCity},
    config::Config,
    error::WeatherError,
    format, normalize,
    provider::{WeatherProvider, provider_from_config},
};

/// Which report an operation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Current,
    Daily,
    Hourly,
}

impl ReportKind {
    pub const fn all() -> &'static [ReportKind] {
        &[ReportKind::Current, ReportKind::Daily, ReportKind::Hourly]
    }

    /// Name of the externally callable operation.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ReportKind::Current => "query_weather",
            ReportKind::Daily => "query_forecast",
            ReportKind::Hourly => "query_hourly_forecast",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportKind::Current => "查询城市的实时天气、今日温度、空气质量和生活指数",
            ReportKind::Daily => "查询城市未来几天的天气预报",
            ReportKind::Hourly => "查询城市未来逐3小时的精细天气预报",
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            ReportKind::Current => "天气信息",
            ReportKind::Daily => "天气预报",
            ReportKind::Hourly => "精细天气预报",
        }
    }

    fn action(&self) -> &'static str {
        match self {
            ReportKind::Current => "查询天气",
            ReportKind::Daily => "查询天气预报",
            ReportKind::Hourly => "查询精细天气预报",
        }
    }

    pub fn unsupported_message(&self, unsupported: &UnsupportedCity) -> String {
        format!(
            "暂不支持查询\"{}\"的{}。目前支持的城市有：{}",
            unsupported.city,
            self.subject(),
            unsupported.supported_list()
        )
    }

    pub fn failure_message(&self, err: &WeatherError) -> String {
        format!("{}时出错: {err}", self.action())
    }

    pub fn no_data_message(&self, city: &str) -> String {
        format!("暂无{city}未来几小时的精细天气预报数据")
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// Response of one operation: exactly one text block, possibly flagged as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Runs weather operations against a city table and a provider.
///
/// Holds no mutable state; concurrent calls are independent.
#[derive(Debug)]
pub struct Dispatcher {
    cities: CityTable,
    provider: Box<dyn WeatherProvider>,
    today: Option<NaiveDate>,
    tip_seed: Option<u64>,
}

impl Dispatcher {
    pub fn new(cities: CityTable, provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            cities,
            provider,
            today: None,
            tip_seed: None,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(&config.provider)?;
        Ok(Self::new(config.city_table(), provider))
    }

    /// Evaluate "today" as `date` instead of the local calendar date.
    pub fn with_today(mut self, date: NaiveDate) -> Self {
        self.today = Some(date);
        self
    }

    /// Seed the per-call generator that picks the forecast tip.
    pub fn with_tip_seed(mut self, seed: u64) -> Self {
        self.tip_seed = Some(seed);
        self
    }

    pub fn cities(&self) -> &CityTable {
        &self.cities
    }

    pub async fn dispatch(&self, kind: ReportKind, city: &str) -> ToolOutcome {
        let provider_id = match self.cities.resolve(city) {
            Ok(id) => id,
            Err(unsupported) => {
                info!(tool = %kind, city, "unsupported city requested");
                return ToolOutcome::text(kind.unsupported_message(&unsupported));
            }
        };

        match self.run(kind, city, provider_id).await {
            Ok(text) => ToolOutcome::text(text),
            Err(err) => {
                error!(tool = %kind, city, error = %err, "weather lookup failed");
                ToolOutcome::error(kind.failure_message(&err))
            }
        }
    }

    async fn run(&self, kind: ReportKind, city: &str, provider_id: &str) -> Result<String, WeatherError> {
        let block = self.provider.fetch(provider_id).await?;
        let today = self.today();

        let text = match kind {
            ReportKind::Current => format::current(&normalize::current(block, today)?),
            ReportKind::Daily => {
                let forecast = normalize::daily(block, today);
                format::daily(&forecast, &mut self.tip_rng())
            }
            ReportKind::Hourly => match normalize::intervals(block)? {
                Some(outlook) => format::intervals(&outlook),
                None => {
                    info!(city, "provider sent no interval forecast");
                    kind.no_data_message(city)
                }
            },
        };

        Ok(text)
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn tip_rng(&self) -> StdRng {
        match self.tip_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
