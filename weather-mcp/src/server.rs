//! MCP server exposing the three weather tools.
//!
//! Framing, the initialize handshake and argument validation are handled by
//! `rmcp`; its service loop runs each request on its own task, so a slow
//! upstream fetch does not hold back other calls.

use std::sync::Arc;

use anyhow::Context;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};
use weather_core::{Dispatcher, ReportKind, ToolOutcome};

pub const SERVER_NAME: &str = "weather-mcp";

/// Input shared by all three tools.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CityArgs {
    #[schemars(description = "要查询的城市名称，如北京、上海、武汉、郑州")]
    pub city: String,
}

#[derive(Clone)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            tool_router: Self::tool_router(),
        }
    }

    /// Serve on stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .context("Failed to start MCP service on stdio")?;

        let reason = service.waiting().await.context("MCP service task failed")?;
        info!(?reason, "MCP service finished");

        Ok(())
    }

    async fn run(&self, kind: ReportKind, args: CityArgs) -> CallToolResult {
        debug!(tool = %kind, city = %args.city, "tool called");
        into_call_result(self.dispatcher.dispatch(kind, &args.city).await)
    }
}

#[tool_router]
impl McpServer {
    #[tool(description = "查询城市的实时天气、今日温度、空气质量和生活指数")]
    async fn query_weather(
        &self,
        Parameters(args): Parameters<CityArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(ReportKind::Current, args).await)
    }

    #[tool(description = "查询城市未来几天的天气预报")]
    async fn query_forecast(
        &self,
        Parameters(args): Parameters<CityArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(ReportKind::Daily, args).await)
    }

    #[tool(description = "查询城市未来逐3小时的精细天气预报")]
    async fn query_hourly_forecast(
        &self,
        Parameters(args): Parameters<CityArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run(ReportKind::Hourly, args).await)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(instructions()),
        }
    }
}

fn instructions() -> String {
    ReportKind::all()
        .iter()
        .map(|kind| format!("{}: {}", kind.tool_name(), kind.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Exactly one text item; `isError` only for upstream or data failures.
fn into_call_result(outcome: ToolOutcome) -> CallToolResult {
    let content = vec![Content::text(outcome.text)];
    if outcome.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rmcp::model::CallToolRequestParam;
    use serde_json::{Value, json};
    use weather_core::{
        CityTable, WeatherBlock, WeatherError, WeatherProvider,
        model::{DayForecast, RealtimeSnapshot},
    };

    #[derive(Debug)]
    struct FixedProvider {
        fail: bool,
    }

    #[async_trait]
    impl WeatherProvider for FixedProvider {
        async fn fetch(&self, _provider_id: &str) -> Result<WeatherBlock, WeatherError> {
            if self.fail {
                return Err(WeatherError::UpstreamTransport {
                    status: 500,
                    reason: "Internal Server Error".into(),
                });
            }
            Ok(WeatherBlock {
                city: "上海".into(),
                province_name: "上海".into(),
                realtime: Some(RealtimeSnapshot {
                    temp: "25".into(),
                    ..Default::default()
                }),
                weathers: vec![DayForecast {
                    date: "2026-10-15".into(),
                    ..Default::default()
                }],
                ..Default::default()
            })
        }
    }

    fn server(fail: bool) -> McpServer {
        let dispatcher = Dispatcher::new(CityTable::builtin(), Box::new(FixedProvider { fail }))
            .with_today(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        McpServer::new(dispatcher)
    }

    fn city(name: &str) -> Parameters<CityArgs> {
        Parameters(CityArgs { city: name.into() })
    }

    fn as_json(result: CallToolResult) -> Value {
        serde_json::to_value(result).unwrap()
    }

    fn args(value: Value) -> Option<serde_json::Map<String, Value>> {
        value.as_object().cloned()
    }

    #[test]
    fn server_info_advertises_tools() {
        let info = server(false).get_info();

        assert_eq!(info.server_info.name, SERVER_NAME);
        assert_eq!(info.protocol_version, ProtocolVersion::V_2024_11_05);
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("query_hourly_forecast"));
    }

    #[test]
    fn registers_one_tool_per_report_kind() {
        let tools = server(false).tool_router.list_all();
        assert_eq!(tools.len(), ReportKind::all().len());

        for kind in ReportKind::all() {
            let tool = tools
                .iter()
                .find(|t| t.name == kind.tool_name())
                .unwrap_or_else(|| panic!("{kind} is not registered"));

            assert_eq!(tool.description.as_deref(), Some(kind.description()));

            let schema = Value::Object((*tool.input_schema).clone());
            assert_eq!(schema["required"], json!(["city"]));
            assert_eq!(schema["properties"]["city"]["type"], "string");
        }
    }

    #[tokio::test]
    async fn successful_call_returns_single_text_item() {
        let result = as_json(server(false).query_weather(city("上海")).await.unwrap());

        let content = result["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
        assert!(content[0]["text"].as_str().unwrap().starts_with("📍 上海（上海）实时天气"));
        assert_ne!(result["isError"], true);
    }

    #[tokio::test]
    async fn unsupported_city_is_not_error_flagged() {
        let result = as_json(server(false).query_forecast(city("广州")).await.unwrap());

        assert_ne!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("北京、上海、武汉、郑州"));
    }

    #[tokio::test]
    async fn upstream_failure_sets_is_error() {
        let result = as_json(server(true).query_hourly_forecast(city("北京")).await.unwrap());

        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("查询精细天气预报时出错: "));
        assert!(text.contains("500"));
    }

    #[tokio::test]
    async fn serves_tools_to_a_client_over_a_stream() {
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        tokio::spawn(async move {
            if let Ok(service) = server(false).serve(server_io).await {
                let _ = service.waiting().await;
            }
        });

        let client = ().serve(client_io).await.unwrap();

        let tools = client.list_all_tools().await.unwrap();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["query_forecast", "query_hourly_forecast", "query_weather"]
        );

        let result = client
            .call_tool(CallToolRequestParam {
                name: "query_weather".into(),
                arguments: args(json!({ "city": "上海" })),
            })
            .await
            .unwrap();
        assert!(as_json(result)["content"][0]["text"].as_str().unwrap().contains("上海"));

        let missing_city = client
            .call_tool(CallToolRequestParam {
                name: "query_weather".into(),
                arguments: args(json!({ "town": "上海" })),
            })
            .await;
        assert!(missing_city.is_err());

        let unknown_tool = client
            .call_tool(CallToolRequestParam {
                name: "query_tides".into(),
                arguments: args(json!({ "city": "上海" })),
            })
            .await;
        assert!(unknown_tool.is_err());

        client.cancel().await.unwrap();
    }
}
