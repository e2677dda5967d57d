//! Text rendering of normalized weather data.
//!
//! Sections are emitted in a fixed order and optional ones are left out
//! entirely when the provider did not send them. Output never ends with
//! whitespace.

use rand::{Rng, seq::SliceRandom};

use crate::{
    icon::{condition_icon, life_index_icon},
    normalize::{CurrentConditions, DailyForecast, DayLabel, IntervalOutlook},
};

pub fn current(report: &CurrentConditions) -> String {
    let rt = &report.realtime;
    let today = &report.today;

    let mut out = format!("📍 {}（{}）实时天气\n", report.city, report.province);
    out.push_str(&format!("🕒 {}\n\n", rt.time));

    out.push_str(&format!(
        "🌡️ 当前温度: {}°C (体感温度: {}°C)\n",
        rt.temp, rt.feels_like
    ));
    out.push_str(&format!("☁️ 天气状况: {}\n", rt.weather));
    out.push_str(&format!("💧 湿度: {}%\n", rt.humidity));
    out.push_str(&format!("🌬️ 风向风力: {} {}\n\n", rt.wind_direction, rt.wind_scale));

    out.push_str(&format!(
        "📅 今日温度: {}°C / {}°C\n",
        today.temp_day, today.temp_night
    ));
    out.push_str(&format!("🌞 日出/日落: {} / {}\n\n", today.sunrise, today.sunset));

    if let Some(aq) = &report.air_quality {
        out.push_str(&format!("🌫️ 空气质量: {} (AQI: {})\n", aq.quality, aq.aqi));
        out.push_str(&format!("💨 PM2.5: {}, PM10: {}\n\n", aq.pm25, aq.pm10));
    }

    if !report.indexes.is_empty() {
        out.push_str("🔍 生活指数参考:\n");
        for index in &report.indexes {
            out.push_str(&format!(
                "{} {}({}): {}\n",
                life_index_icon(index.kind()),
                index.name,
                index.level,
                index.content
            ));
        }
    }

    finish(out)
}

/// Multi-day forecast, closed by one life-index tip drawn from `rng`.
pub fn daily<R: Rng + ?Sized>(report: &DailyForecast, rng: &mut R) -> String {
    let mut out = format!("📅 {}未来天气预报:\n\n", report.city);

    for day in &report.days {
        let f = &day.forecast;
        match &day.label {
            DayLabel::Today => out.push_str("📆 今天:\n"),
            DayLabel::Date { month, day, week } => {
                out.push_str(&format!("📆 {month}月{day}日 {week}:\n"));
            }
        }
        out.push_str(&format!("{} {}\n", condition_icon(&f.weather), f.weather));
        out.push_str(&format!("🌡️ {}°C / {}°C\n", f.temp_day, f.temp_night));
        out.push_str(&format!("🌞 {} - {}\n\n", f.sunrise, f.sunset));
    }

    if let Some(tip) = report.indexes.choose(rng) {
        out.push_str(&format!("💡 今日小贴士: {}\n", tip.content));
    }

    finish(out)
}

pub fn intervals(report: &IntervalOutlook) -> String {
    let mut out = format!("⏱️ {}未来逐3小时天气预报:\n\n", report.city);

    for slot in &report.intervals {
        let f = &slot.forecast;
        out.push_str(&format!("🕒 {}:00-{}:00:\n", slot.start_hour, slot.end_hour));
        out.push_str(&format!("{} {}\n", condition_icon(&f.weather), f.weather));
        out.push_str(&format!("🌡️ {}°C - {}°C\n", f.min_temp, f.max_temp));
        if f.has_precipitation() {
            out.push_str(&format!("💧 降水量: {}mm\n", f.precipitation.trim()));
        }
        out.push('\n');
    }

    finish(out)
}

fn finish(mut out: String) -> String {
    out.truncate(out.trim_end().len());
    out
}
