//! Beacon - minimal HTTP/1.0 origin server
//!
//! Serves files and directory listings from a document root plus the
//! synthetic `/time` and `/date` endpoints, one request per connection.

pub mod config;
pub mod http;
pub mod server;
pub mod site;
