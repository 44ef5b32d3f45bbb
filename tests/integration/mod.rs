/// Integration test target: habit store on SQLite and the MCP server
mod server_tests;
mod store_tests;
