pub mod http;

pub use http::{AppState, build_router, run_http_server};
