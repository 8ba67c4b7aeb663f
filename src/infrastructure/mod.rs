// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod json_rpc_backend;
pub mod state_stream;
pub mod svg_renderer;
pub mod web_client_dispatcher;
