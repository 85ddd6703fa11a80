//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::handlers::{GetFlightInfoHandler, GetTrainInfoHandler};
use crate::sources::SourceRegistry;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "getFlightInfo")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a new tool registry and register the trip search tools from the
    /// source registry.
    pub fn from_sources(sources: &SourceRegistry) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        let sources_arc = Arc::new(sources.all().cloned().collect::<Vec<_>>());
        registry.register_trip_tools(&sources_arc);

        registry
    }

    fn register_trip_tools(&mut self, sources: &Arc<Vec<Arc<dyn crate::sources::TripSource>>>) {
        let flight_count = sources.iter().filter(|s| s.supports_flight_search()).count();

        self.register(Tool {
            name: "getFlightInfo".to_string(),
            description: format!(
                "Search one-way flights between two cities on a given date across {} travel sites. \
                 Returns a Markdown table per site with airline, times, airports, route and price.",
                flight_count
            ),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "from": {
                        "type": "string",
                        "description": "Departure city name, e.g. '上海'"
                    },
                    "to": {
                        "type": "string",
                        "description": "Arrival city name, e.g. '北京'"
                    },
                    "date": {
                        "type": "string",
                        "description": "Departure date in YYYY-MM-DD format"
                    }
                },
                "required": ["from", "to", "date"]
            }),
            handler: Arc::new(GetFlightInfoHandler {
                sources: sources.clone(),
            }),
        });

        self.register(Tool {
            name: "getTrainInfo".to_string(),
            description: "Search train tickets between two stations on a given date. \
                 Returns a Markdown table with train number, stations, times, duration \
                 and per-class fares with remaining-ticket counts."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "depStation": {
                        "type": "string",
                        "description": "Departure station or city name, e.g. '北京'"
                    },
                    "arrStation": {
                        "type": "string",
                        "description": "Arrival station or city name, e.g. '上海'"
                    },
                    "depDate": {
                        "type": "string",
                        "description": "Departure date in YYYY-MM-DD format"
                    }
                },
                "required": ["depStation", "arrStation", "depDate"]
            }),
            handler: Arc::new(GetTrainInfoHandler {
                sources: sources.clone(),
            }),
        });
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn registry_exposes_the_two_trip_tools() {
        let sources = SourceRegistry::new(&Config::default());
        let tools = ToolRegistry::from_sources(&sources);

        assert_eq!(tools.all().len(), 2);
        assert!(tools.get("getFlightInfo").is_some());
        assert!(tools.get("getTrainInfo").is_some());
        assert!(tools.get("bookFlight").is_none());
    }

    #[test]
    fn tool_schemas_mark_all_parameters_required() {
        let sources = SourceRegistry::new(&Config::default());
        let tools = ToolRegistry::from_sources(&sources);

        let flight = tools.get("getFlightInfo").unwrap();
        assert_eq!(
            flight.input_schema["required"],
            serde_json::json!(["from", "to", "date"])
        );

        let train = tools.get("getTrainInfo").unwrap();
        assert_eq!(
            train.input_schema["required"],
            serde_json::json!(["depStation", "arrStation", "depDate"])
        );
    }

    #[tokio::test]
    async fn executing_an_unknown_tool_is_an_error() {
        let sources = SourceRegistry::new(&Config::default());
        let tools = ToolRegistry::from_sources(&sources);

        let result = tools.execute("getHotelInfo", serde_json::json!({})).await;
        assert_eq!(result.unwrap_err(), "Tool 'getHotelInfo' not found");
    }
}
