//! Selection, ordering and filtering of a provider block per report kind.
//!
//! All three modes take the first block of a validated envelope and the
//! calendar date the request is evaluated against.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{AirQuality, DayForecast, IntervalForecast, LifeIndex, RealtimeSnapshot, WeatherBlock},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

const INTERVAL_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentConditions {
    pub city: String,
    pub province: String,
    pub realtime: RealtimeSnapshot,
    pub today: DayForecast,
    pub air_quality: Option<AirQuality>,
    pub indexes: Vec<LifeIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayLabel {
    Today,
    Date { month: u32, day: u32, week: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledDay {
    pub label: DayLabel,
    pub date: NaiveDate,
    pub forecast: DayForecast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyForecast {
    pub city: String,
    pub days: Vec<LabeledDay>,
    pub indexes: Vec<LifeIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub start_hour: u32,
    pub end_hour: u32,
    pub forecast: IntervalForecast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalOutlook {
    pub city: String,
    pub intervals: Vec<Interval>,
}

/// Realtime snapshot plus the forecast entry for `today`.
///
/// When no entry carries today's date the first entry is used whatever
/// its date is, so a stale payload can be reported as today's.
pub fn current(block: WeatherBlock, today: NaiveDate) -> Result<CurrentConditions, WeatherError> {
    let realtime = block
        .realtime
        .ok_or_else(|| WeatherError::data("缺少实时天气数据"))?;

    let mut weathers = block.weathers;
    if weathers.is_empty() {
        return Err(WeatherError::data("缺少每日天气预报数据"));
    }

    let today_str = today.format(DATE_FORMAT).to_string();
    let pos = weathers
        .iter()
        .position(|w| w.date == today_str)
        .unwrap_or_else(|| {
            debug!(%today, "no forecast entry for today, using the first one");
            0
        });
    let today_forecast = weathers.swap_remove(pos);

    Ok(CurrentConditions {
        city: block.city,
        province: block.province_name,
        realtime,
        today: today_forecast,
        air_quality: block.pm25,
        indexes: block.indexes,
    })
}

/// Forecast days from `today` onwards, ascending by date.
///
/// Entries whose date does not parse are dropped along with past days.
/// The first retained entry is labeled as today regardless of its date.
pub fn daily(block: WeatherBlock, today: NaiveDate) -> DailyForecast {
    let mut dated: Vec<(NaiveDate, DayForecast)> = block
        .weathers
        .into_iter()
        .filter_map(|w| match NaiveDate::parse_from_str(w.date.trim(), DATE_FORMAT) {
            Ok(date) => Some((date, w)),
            Err(e) => {
                debug!(date = %w.date, error = %e, "skipping forecast entry with invalid date");
                None
            }
        })
        .collect();

    // stable: equal dates keep provider order
    dated.sort_by_key(|(date, _)| *date);

    let days = dated
        .into_iter()
        .filter(|(date, _)| *date >= today)
        .enumerate()
        .map(|(i, (date, forecast))| {
            let label = if i == 0 {
                DayLabel::Today
            } else {
                DayLabel::Date {
                    month: date.month(),
                    day: date.day(),
                    week: forecast.week.clone(),
                }
            };
            LabeledDay {
                label,
                date,
                forecast,
            }
        })
        .collect();

    DailyForecast {
        city: block.city,
        days,
        indexes: block.indexes,
    }
}

/// 3-hour slots exactly as the provider lists them.
///
/// `Ok(None)` means the provider sent no interval data at all, which is
/// reported to the user as an informational message.
pub fn intervals(block: WeatherBlock) -> Result<Option<IntervalOutlook>, WeatherError> {
    let slots = block
        .weather_details_info
        .map(|info| info.intervals)
        .unwrap_or_default();

    if slots.is_empty() {
        return Ok(None);
    }

    let intervals = slots
        .into_iter()
        .map(|forecast| {
            Ok(Interval {
                start_hour: interval_hour(&forecast.start_time)?,
                end_hour: interval_hour(&forecast.end_time)?,
                forecast,
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    Ok(Some(IntervalOutlook {
        city: block.city,
        intervals,
    }))
}

fn interval_hour(raw: &str) -> Result<u32, WeatherError> {
    let raw = raw.trim();
    INTERVAL_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.hour())
        .ok_or_else(|| WeatherError::data(format!("无法解析的时间: {raw}")))
}
