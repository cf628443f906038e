mod checkin_workflow;
mod mcp_session;
