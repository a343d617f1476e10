//! Places tools: attractions, place details and restaurants.

use super::arguments::{count, optional_str, required_str};
use super::{FnToolHandler, SampleRng};
use crate::tool_registry::domain::{
    InputSchema, PropertySchema, ToolDescriptor, ToolRegistryDomainError,
};
use crate::tool_registry::ports::{ToolHandlerError, ToolHandlerResult};
use serde_json::{Map, Value, json};
use std::sync::Arc;

const ATTRACTION_TYPES: [&str; 4] = ["cultural", "landmark", "museum", "food"];
const GENERATED_ATTRACTIONS: u64 = 10;
const GENERATED_RESTAURANTS: u64 = 5;
const DEFAULT_ATTRACTION_LIMIT: u64 = 5;

struct KnownPlace {
    name: &'static str,
    kind: &'static str,
    rating: f64,
    cost: u64,
}

const fn place(name: &'static str, kind: &'static str, rating: f64, cost: u64) -> KnownPlace {
    KnownPlace {
        name,
        kind,
        rating,
        cost,
    }
}

const KNOWN_DESTINATIONS: [(&str, [KnownPlace; 5]); 2] = [
    (
        "Tokyo, Japan",
        [
            place("Senso-ji Temple", "cultural", 4.8, 0),
            place("Tokyo Skytree", "landmark", 4.7, 20),
            place("Tsukiji Outer Market", "food", 4.6, 15),
            place("Meiji Shrine", "cultural", 4.7, 0),
            place("Shibuya Crossing", "landmark", 4.5, 0),
        ],
    ),
    (
        "Paris, France",
        [
            place("Eiffel Tower", "landmark", 4.9, 25),
            place("Louvre Museum", "museum", 4.8, 20),
            place("Notre-Dame", "cultural", 4.7, 10),
            place("Arc de Triomphe", "landmark", 4.6, 12),
            place("Versailles Palace", "cultural", 4.8, 30),
        ],
    ),
];

pub(super) fn descriptors() -> Result<Vec<ToolDescriptor>, ToolRegistryDomainError> {
    let destination =
        || PropertySchema::string().with_description("Destination city or location");

    let search_attractions = ToolDescriptor::new(
        "search_attractions",
        "Search for tourist attractions in a destination",
        InputSchema::new()
            .with_required("destination", destination())?
            .with_optional(
                "type",
                PropertySchema::string()
                    .with_enum(["cultural", "landmark", "museum", "food", "all"])
                    .with_description("Type of attraction"),
            )?
            .with_optional(
                "limit",
                PropertySchema::integer()
                    .with_range(Some(1), None)
                    .with_default(DEFAULT_ATTRACTION_LIMIT)
                    .with_description("Maximum number of results"),
            )?,
        Arc::new(FnToolHandler::new(|arguments| attractions(&arguments))),
    )?;

    let get_place_details = ToolDescriptor::new(
        "get_place_details",
        "Get detailed information about a specific place",
        InputSchema::new()
            .with_required(
                "placeName",
                PropertySchema::string().with_description("Name of the place to get details for"),
            )?
            .with_required("destination", destination())?,
        Arc::new(FnToolHandler::new(|arguments| details(&arguments))),
    )?;

    let get_restaurants = ToolDescriptor::new(
        "get_restaurants",
        "Find restaurants in a destination",
        InputSchema::new()
            .with_required("destination", destination())?
            .with_optional(
                "cuisine",
                PropertySchema::string().with_description("Type of cuisine"),
            )?
            .with_optional(
                "priceRange",
                PropertySchema::string()
                    .with_enum(["budget", "moderate", "expensive"])
                    .with_description("Price range preference"),
            )?,
        Arc::new(FnToolHandler::new(|arguments| restaurants(&arguments))),
    )?;

    Ok(vec![search_attractions, get_place_details, get_restaurants])
}

/// Known destinations match on the full key or on the city alone.
fn known_places(destination: &str) -> Option<&'static [KnownPlace; 5]> {
    let wanted = destination.trim().to_lowercase();
    KNOWN_DESTINATIONS
        .iter()
        .find(|(key, _)| {
            let full = key.to_lowercase();
            full == wanted || full.split(',').next().is_some_and(|city| city == wanted)
        })
        .map(|(_, places)| places)
}

fn places_for(destination: &str) -> Vec<Value> {
    known_places(destination).map_or_else(
        || generated_places(destination),
        |known| {
            known
                .iter()
                .map(|entry| {
                    json!({
                        "name": entry.name,
                        "type": entry.kind,
                        "rating": entry.rating,
                        "cost": entry.cost,
                    })
                })
                .collect()
        },
    )
}

fn generated_places(destination: &str) -> Vec<Value> {
    let mut rng = SampleRng::seeded(&["attractions", destination]);
    (1..=GENERATED_ATTRACTIONS)
        .map(|index| {
            json!({
                "name": format!("{destination} Attraction {index}"),
                "type": rng.pick(&ATTRACTION_TYPES),
                "rating": rng.rating(),
                "cost": rng.below(50),
            })
        })
        .collect()
}

fn attractions(arguments: &Map<String, Value>) -> ToolHandlerResult<Value> {
    let destination = required_str(arguments, "destination")?;
    let kind = optional_str(arguments, "type").filter(|kind| *kind != "all");
    let limit = usize::try_from(count(arguments, "limit", DEFAULT_ATTRACTION_LIMIT))
        .unwrap_or(usize::MAX);

    let filtered: Vec<Value> = places_for(destination)
        .into_iter()
        .filter(|entry| {
            kind.is_none_or(|wanted| entry.get("type").and_then(Value::as_str) == Some(wanted))
        })
        .collect();
    let total_found = filtered.len();

    Ok(json!({
        "destination": destination,
        "attractions": filtered.into_iter().take(limit).collect::<Vec<_>>(),
        "totalFound": total_found,
    }))
}

fn details(arguments: &Map<String, Value>) -> ToolHandlerResult<Value> {
    let place_name = required_str(arguments, "placeName")?;
    let destination = required_str(arguments, "destination")?;
    let needle = place_name.to_lowercase();

    places_for(destination)
        .into_iter()
        .find(|entry| {
            entry
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .map(|found| json!({"place": found, "destination": destination}))
        .ok_or_else(|| {
            ToolHandlerError::rejected(format!(
                "Place '{place_name}' not found in {destination}"
            ))
        })
}

fn restaurants(arguments: &Map<String, Value>) -> ToolHandlerResult<Value> {
    let destination = required_str(arguments, "destination")?;
    let cuisine = optional_str(arguments, "cuisine").unwrap_or("Local");
    let price_range = optional_str(arguments, "priceRange").unwrap_or("moderate");

    let mut rng = SampleRng::seeded(&["restaurants", destination, cuisine, price_range]);
    let listing: Vec<Value> = (1..=GENERATED_RESTAURANTS)
        .map(|index| {
            json!({
                "name": format!("{cuisine} Restaurant {index}"),
                "cuisine": cuisine,
                "priceRange": price_range,
                "rating": rng.rating(),
                "address": format!("{index} Main Street, {destination}"),
            })
        })
        .collect();

    Ok(json!({
        "destination": destination,
        "restaurants": listing,
    }))
}
