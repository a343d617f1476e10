//! Flight tools: itinerary search and seasonal price estimates.

use super::arguments::{count, optional_str, required_str};
use super::{FnToolHandler, SampleRng};
use crate::tool_registry::domain::{
    InputSchema, PropertySchema, ToolDescriptor, ToolRegistryDomainError,
};
use crate::tool_registry::ports::ToolHandlerResult;
use mockable::Clock;
use serde_json::{Map, Value, json};
use std::sync::Arc;

const AIRLINES: [&str; 5] = ["United", "Delta", "American", "JetBlue", "Southwest"];
const CLASSES: [&str; 3] = ["economy", "business", "first"];

pub(super) fn descriptors(
    clock: &Arc<dyn Clock + Send + Sync>,
) -> Result<Vec<ToolDescriptor>, ToolRegistryDomainError> {
    let search_flights = ToolDescriptor::new(
        "search_flights",
        "Search for flights between origin and destination",
        InputSchema::new()
            .with_required(
                "origin",
                PropertySchema::string().with_description("Origin airport or city code"),
            )?
            .with_required(
                "destination",
                PropertySchema::string().with_description("Destination airport or city code"),
            )?
            .with_required(
                "departureDate",
                PropertySchema::string()
                    .with_format("date")
                    .with_description("Departure date in YYYY-MM-DD format"),
            )?
            .with_optional(
                "returnDate",
                PropertySchema::string()
                    .with_format("date")
                    .with_description("Return date in YYYY-MM-DD format"),
            )?
            .with_optional(
                "passengers",
                PropertySchema::integer()
                    .with_range(Some(1), None)
                    .with_default(1)
                    .with_description("Number of passengers"),
            )?
            .with_optional(
                "class",
                PropertySchema::string()
                    .with_enum(CLASSES)
                    .with_default("economy")
                    .with_description("Flight class"),
            )?,
        Arc::new(FnToolHandler::new(|arguments| search(&arguments))),
    )?;

    let prices_clock = Arc::clone(clock);
    let get_flight_prices = ToolDescriptor::new(
        "get_flight_prices",
        "Get price estimates for flights",
        InputSchema::new()
            .with_required(
                "origin",
                PropertySchema::string().with_description("Origin airport or city code"),
            )?
            .with_required(
                "destination",
                PropertySchema::string().with_description("Destination airport or city code"),
            )?
            .with_optional(
                "month",
                PropertySchema::string().with_description("Month in YYYY-MM format"),
            )?,
        Arc::new(FnToolHandler::new(move |arguments| {
            prices(&arguments, &prices_clock.utc().format("%Y-%m").to_string())
        })),
    )?;

    Ok(vec![search_flights, get_flight_prices])
}

fn base_price(class: &str) -> u64 {
    match class {
        "business" => 1500,
        "first" => 3500,
        _ => 400,
    }
}

fn clock_time(rng: &mut SampleRng) -> String {
    format!("{:02}:{:02}", rng.below(24), rng.below(60))
}

fn search(arguments: &Map<String, Value>) -> ToolHandlerResult<Value> {
    let origin = required_str(arguments, "origin")?;
    let destination = required_str(arguments, "destination")?;
    let departure_date = required_str(arguments, "departureDate")?;
    let return_date = optional_str(arguments, "returnDate");
    let passengers = count(arguments, "passengers", 1);
    let class = optional_str(arguments, "class").unwrap_or("economy");

    let mut rng = SampleRng::seeded(&[
        "search_flights",
        origin,
        destination,
        departure_date,
        class,
    ]);
    let mut flights: Vec<(u64, Value)> = AIRLINES
        .iter()
        .map(|airline| {
            let prefix: String = airline.chars().take(2).collect::<String>().to_uppercase();
            let price = base_price(class).saturating_add(rng.below(500));
            let flight = json!({
                "flightNumber": format!("{prefix}{}", rng.between(1000, 9000)),
                "airline": airline,
                "departure": {"airport": origin, "time": clock_time(&mut rng)},
                "arrival": {"airport": destination, "time": clock_time(&mut rng)},
                "duration": format!("{}h {}m", rng.between(2, 10), rng.below(60)),
                "price": price,
                "stops": u8::from(rng.chance(30)),
                "class": class,
            });
            (price, flight)
        })
        .collect();
    flights.sort_by_key(|(price, _)| *price);

    let cheapest = flights.first().map_or(0, |(price, _)| *price);
    let total: u64 = flights.iter().map(|(price, _)| *price).sum();
    let average = u64::try_from(flights.len())
        .ok()
        .and_then(|length| total.checked_div(length))
        .unwrap_or(0);

    Ok(json!({
        "search": {
            "origin": origin,
            "destination": destination,
            "departureDate": departure_date,
            "returnDate": return_date,
            "passengers": passengers,
            "class": class,
        },
        "flights": flights.into_iter().map(|(_, flight)| flight).collect::<Vec<_>>(),
        "cheapestPrice": cheapest,
        "averagePrice": average,
    }))
}

fn prices(arguments: &Map<String, Value>, current_month: &str) -> ToolHandlerResult<Value> {
    let origin = required_str(arguments, "origin")?;
    let destination = required_str(arguments, "destination")?;
    let month = optional_str(arguments, "month").unwrap_or(current_month);

    Ok(json!({
        "origin": origin,
        "destination": destination,
        "month": month,
        "priceRange": {
            "economy": {"min": 300, "max": 800, "average": 550},
            "business": {"min": 1200, "max": 2500, "average": 1850},
            "first": {"min": 3000, "max": 6000, "average": 4500},
        },
        "recommendation": "Book 3-4 weeks in advance for best prices",
    }))
}
