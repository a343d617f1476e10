//! Weather tools: current conditions and multi-day forecasts.

use super::arguments::{count, optional_str, required_str};
use super::{FnToolHandler, SampleRng};
use crate::tool_registry::domain::{
    InputSchema, PropertySchema, ToolDescriptor, ToolRegistryDomainError,
};
use crate::tool_registry::ports::ToolHandlerResult;
use chrono::{Days, NaiveDate};
use mockable::Clock;
use serde_json::{Map, Value, json};
use std::sync::Arc;

const CONDITIONS: [&str; 4] = ["Sunny", "Partly Cloudy", "Cloudy", "Rainy"];
const DEFAULT_FORECAST_DAYS: u64 = 7;

pub(super) fn descriptors(
    clock: &Arc<dyn Clock + Send + Sync>,
) -> Result<Vec<ToolDescriptor>, ToolRegistryDomainError> {
    let location = || PropertySchema::string().with_description("City name or coordinates");

    let weather_clock = Arc::clone(clock);
    let get_weather = ToolDescriptor::new(
        "get_weather",
        "Get current weather for a location",
        InputSchema::new()
            .with_required("location", location())?
            .with_optional(
                "date",
                PropertySchema::string()
                    .with_format("date")
                    .with_description("Date in YYYY-MM-DD format (optional)"),
            )?,
        Arc::new(FnToolHandler::new(move |arguments| {
            current_weather(&arguments, weather_clock.utc().date_naive())
        })),
    )?;

    let forecast_clock = Arc::clone(clock);
    let get_forecast = ToolDescriptor::new(
        "get_forecast",
        "Get weather forecast for next 7 days",
        InputSchema::new()
            .with_required("location", location())?
            .with_optional(
                "days",
                PropertySchema::integer()
                    .with_range(Some(1), Some(14))
                    .with_default(DEFAULT_FORECAST_DAYS)
                    .with_description("Number of days for forecast (default: 7)"),
            )?,
        Arc::new(FnToolHandler::new(move |arguments| {
            forecast(&arguments, forecast_clock.utc().date_naive())
        })),
    )?;

    Ok(vec![get_weather, get_forecast])
}

fn current_weather(arguments: &Map<String, Value>, today: NaiveDate) -> ToolHandlerResult<Value> {
    let location = required_str(arguments, "location")?;
    let date = optional_str(arguments, "date")
        .map_or_else(|| today.format("%Y-%m-%d").to_string(), str::to_owned);

    let mut rng = SampleRng::seeded(&["get_weather", location, &date]);
    Ok(json!({
        "location": location,
        "date": date,
        "temperature": rng.between(15, 20),
        "conditions": rng.pick(&CONDITIONS),
        "humidity": rng.between(40, 40),
        "windSpeed": rng.between(5, 20),
        "unit": "celsius",
    }))
}

fn forecast(arguments: &Map<String, Value>, today: NaiveDate) -> ToolHandlerResult<Value> {
    let location = required_str(arguments, "location")?;
    let days = count(arguments, "days", DEFAULT_FORECAST_DAYS);

    let mut rng = SampleRng::seeded(&["get_forecast", location, &today.to_string()]);
    let entries: Vec<Value> = (0..days)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| {
            json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "high": rng.between(20, 10),
                "low": rng.between(10, 10),
                "conditions": rng.pick(&CONDITIONS),
                "precipitationChance": rng.below(100),
            })
        })
        .collect();

    Ok(json!({
        "location": location,
        "forecast": entries,
        "unit": "celsius",
    }))
}
