/// A full MCP session over in-memory pipes
use habit_streaks::mcp::McpServer;
use habit_streaks::*;
use serde_json::{json, Value};

fn call(id: u32, tool: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string()
}

fn tracker(today: &str) -> HabitTrackerServer {
    HabitTrackerServer::in_memory()
        .expect("in-memory tracker")
        .with_clock(FixedClock(LogDate::parse(today).unwrap()))
}

#[cfg(test)]
mod mcp_session_tests {
    use super::*;

    #[tokio::test]
    async fn test_session_over_pipes() {
        let mut server = McpServer::new(tracker("2024-06-05"));
        let input = [
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#.to_string(),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#.to_string(),
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#.to_string(),
            String::new(),
            r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#.to_string(),
        ]
        .join("\n");

        let mut output: Vec<u8> = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        // The notification and the blank line get no reply
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["capabilities"]["tools"]["listChanged"], false);
        let names: Vec<&str> = responses[1]["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"habit_toggle"));
        assert!(names.contains(&"habit_heatmap"));
        assert_eq!(responses[2]["result"], json!({}));
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_create_toggle_and_report() {
        let mut server = McpServer::new(tracker("2024-06-05"));

        let created = server
            .handle_line(&call(1, "habit_create", json!({"name": "Meditate", "category": "mindfulness"})))
            .await
            .unwrap();
        let result = created.result.unwrap();
        assert_eq!(result["isError"], false);
        let habit_id = result["structuredContent"]["habit"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        for day in ["2024-06-03", "2024-06-04"] {
            let toggled = server
                .handle_line(&call(2, "habit_toggle", json!({"habit_id": habit_id, "date": day})))
                .await
                .unwrap();
            assert_eq!(toggled.result.unwrap()["isError"], false);
        }

        // Today is still open, yesterday carries the streak
        let detail = server
            .handle_line(&call(3, "habit_detail", json!({"habit_id": habit_id})))
            .await
            .unwrap()
            .result
            .unwrap();
        assert_eq!(detail["structuredContent"]["detail"]["streak"]["current_streak"], 2);
        assert!(detail["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Don't break your 2-day streak!"));

        let today = server
            .handle_line(&call(4, "habit_toggle", json!({"habit_id": habit_id})))
            .await
            .unwrap()
            .result
            .unwrap();
        assert_eq!(today["structuredContent"]["streak"]["current_streak"], 3);
        assert_eq!(today["structuredContent"]["log"]["date"], "2024-06-05");

        let stats = server
            .handle_line(&call(5, "habit_stats", json!({})))
            .await
            .unwrap()
            .result
            .unwrap();
        assert_eq!(stats["structuredContent"]["stats"]["completed_today"], 1);
        assert_eq!(stats["structuredContent"]["stats"]["best_streak"], 3);

        let heatmap = server
            .handle_line(&call(6, "habit_heatmap", json!({"days": 7})))
            .await
            .unwrap()
            .result
            .unwrap();
        let levels: Vec<u64> = heatmap["structuredContent"]["days"]
            .as_array()
            .unwrap()
            .iter()
            .map(|day| day["level"].as_u64().unwrap())
            .collect();
        assert_eq!(levels, vec![0, 0, 0, 0, 4, 4, 4]);
    }

    #[tokio::test]
    async fn test_tool_failures_are_reported_not_fatal() {
        let mut server = McpServer::new(tracker("2024-06-05"));

        let invalid = server
            .handle_line(&call(1, "habit_create", json!({"name": ""})))
            .await
            .unwrap()
            .result
            .unwrap();
        assert_eq!(invalid["isError"], true);
        assert_eq!(invalid["structuredContent"]["code"], -32003);

        let missing = server
            .handle_line(&call(
                2,
                "habit_toggle",
                json!({"habit_id": HabitId::new().to_string()}),
            ))
            .await
            .unwrap()
            .result
            .unwrap();
        assert_eq!(missing["isError"], true);
        assert_eq!(missing["structuredContent"]["code"], -32001);

        let bad_date = server
            .handle_line(&call(
                3,
                "habit_status",
                json!({"date": "2024-13-01"}),
            ))
            .await
            .unwrap()
            .result
            .unwrap();
        assert_eq!(bad_date["isError"], true);

        let wrong_version = server
            .handle_line(r#"{"jsonrpc":"1.0","id":9,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(wrong_version.error.unwrap().code, -32600);
    }
}
