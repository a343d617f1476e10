//! Selectable groups of sample travel tools.

use super::{flights, places, weather};
use crate::tool_registry::services::{ToolRegistry, ToolRegistryResult};
use mockable::Clock;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Which tool group a server instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Catalog {
    /// `get_weather`, `get_forecast`.
    Weather,
    /// `search_flights`, `get_flight_prices`.
    Flights,
    /// `search_attractions`, `get_place_details`, `get_restaurants`.
    Places,
    /// Every tool above in one registry.
    #[default]
    All,
}

impl Catalog {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Flights => "flights",
            Self::Places => "places",
            Self::All => "all",
        }
    }

    /// Returns the service name reported by `/health` and `initialize`.
    #[must_use]
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::Weather => "weather-mcp-server",
            Self::Flights => "flight-mcp-server",
            Self::Places => "places-mcp-server",
            Self::All => "travel-mcp-server",
        }
    }

    /// Returns the conventional HTTP port for this catalog.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Weather | Self::All => 3000,
            Self::Places => 3001,
            Self::Flights => 3002,
        }
    }

    /// Builds a registry holding this catalog's tools.
    ///
    /// # Errors
    ///
    /// Returns [`crate::tool_registry::services::ToolRegistryError`] if a
    /// tool descriptor is malformed or two tools share a name.
    pub fn build_registry(
        self,
        clock: &Arc<dyn Clock + Send + Sync>,
    ) -> ToolRegistryResult<ToolRegistry> {
        let mut descriptors = Vec::new();
        if matches!(self, Self::Weather | Self::All) {
            descriptors.extend(weather::descriptors(clock)?);
        }
        if matches!(self, Self::Flights | Self::All) {
            descriptors.extend(flights::descriptors(clock)?);
        }
        if matches!(self, Self::Places | Self::All) {
            descriptors.extend(places::descriptors()?);
        }

        let mut registry = ToolRegistry::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown catalog name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown catalog '{0}' (expected weather, flights, places or all)")]
pub struct ParseCatalogError(String);

impl FromStr for Catalog {
    type Err = ParseCatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weather" => Ok(Self::Weather),
            "flights" | "flight" => Ok(Self::Flights),
            "places" => Ok(Self::Places),
            "all" | "travel" => Ok(Self::All),
            _ => Err(ParseCatalogError(value.to_owned())),
        }
    }
}
