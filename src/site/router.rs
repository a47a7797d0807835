//! Turns a parsed request into a response.
//!
//! Policies are checked in a fixed order and the first one that matches
//! produces the response:
//!
//! 1. User-Agent allow list (406)
//! 2. GET only (400)
//! 3. `/time` and `/date`
//! 4. Files and directories under the document root (200, 404, 500)
//!
//! `Date` and `Server` are stamped on whatever comes out.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::http::mime::{ContentError, content_type_for};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::site::clock::{self, Clock, SystemClock};
use crate::site::resolver::{self, Resource};

/// Failures that abort a request without any response being sent.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("cannot serve {path}: {source}")]
    Content {
        path: String,
        #[source]
        source: ContentError,
    },
}

pub struct Router {
    site: SiteConfig,
    clock: Arc<dyn Clock>,
}

impl Router {
    pub fn new(site: SiteConfig) -> Self {
        Self::with_clock(site, Arc::new(SystemClock))
    }

    pub fn with_clock(site: SiteConfig, clock: Arc<dyn Clock>) -> Self {
        Self { site, clock }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub async fn route(&self, req: &Request) -> Result<Response, RouteError> {
        let response = self.dispatch(req).await?;

        Ok(response.with_standard_headers(
            clock::format_instant(self.clock.now()),
            &self.site.server_name,
        ))
    }

    async fn dispatch(&self, req: &Request) -> Result<Response, RouteError> {
        if !self.agent_allowed(req.user_agent()) {
            tracing::debug!(agent = ?req.user_agent(), "User agent rejected");
            return Ok(Response::not_acceptable());
        }

        if req.method != Method::GET {
            return Ok(Response::method_not_supported());
        }

        match req.path.as_str() {
            "/time" => return Ok(self.synthetic(clock::format_time(self.clock.now()))),
            "/date" => return Ok(self.synthetic(clock::format_date(self.clock.now()))),
            _ => {}
        }

        self.serve_static(req).await
    }

    /// Missing agents are treated like agents that are not on the list.
    fn agent_allowed(&self, agent: Option<&str>) -> bool {
        agent.is_some_and(|agent| {
            self.site
                .allowed_agents
                .iter()
                .any(|allowed| agent.contains(allowed.as_str()))
        })
    }

    fn synthetic(&self, body: String) -> Response {
        Response::plain_text(StatusCode::Ok, body)
    }

    async fn serve_static(&self, req: &Request) -> Result<Response, RouteError> {
        let resource = match resolver::resolve(&self.site.document_root, &req.path).await {
            Ok(resource) => resource,
            Err(e) => {
                tracing::error!(path = %req.path, error = %e, "Failed to load resource");
                return Ok(Response::internal_error());
            }
        };

        match resource {
            Resource::Missing => Ok(Response::not_found()),

            Resource::Directory(entries) => {
                Ok(Response::html(resolver::directory_listing(&req.path, &entries)))
            }

            Resource::File { name, path } => {
                let content_type =
                    content_type_for(&name).map_err(|source| RouteError::Content {
                        path: req.path.clone(),
                        source,
                    })?;

                let bytes = match resolver::read_file(&path).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::error!(path = %req.path, error = %e, "Failed to read file");
                        return Ok(Response::internal_error());
                    }
                };

                Ok(ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", content_type)
                    .header("Content-Length", bytes.len().to_string())
                    .bytes(bytes)
                    .build())
            }
        }
    }
}
