use crate::http::message::{Body, HTTP_VERSION, Headers};

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): Request successful
/// - `BadRequest` (400): Method other than GET
/// - `NotFound` (404): Resource not found under the document root
/// - `NotAcceptable` (406): User agent not on the allow list
/// - `InternalServerError` (500): Resource exists but could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 406 Not Acceptable
    NotAcceptable,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotAcceptable.as_u16(), 406);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::NotAcceptable => 406,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotAcceptable => "Not Acceptable",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug, Clone)]
pub struct Response {
    /// Protocol version of the status line
    pub version: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in serialization order
    pub headers: Headers,
    /// Response payload
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use beacon::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .text("hello")
///     .build();
/// assert_eq!(response.headers.get("Content-Length"), Some("5"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Headers,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Body::Empty,
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Sets a text body.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = Body::Text(text.into());
        self
    }

    /// Sets a raw byte body.
    pub fn bytes(mut self, bytes: Vec<u8>) -> Self {
        self.body = Body::Bytes(bytes);
        self
    }

    /// Builds the final Response.
    ///
    /// Adds a Content-Length header from the body size unless one is already set.
    pub fn build(mut self) -> Response {
        if !self.headers.contains_key("Content-Length") {
            self.headers
                .insert("Content-Length", self.body.len().to_string());
        }

        Response {
            version: HTTP_VERSION.to_string(),
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// A `text/plain` response with the given status.
    pub fn plain_text(status: StatusCode, body: impl Into<String>) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", "text/plain")
            .text(body)
            .build()
    }

    /// A `text/html` 200 OK response.
    pub fn html(body: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/html")
            .text(body)
            .build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::plain_text(StatusCode::NotFound, "404 - File not found!")
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::plain_text(
            StatusCode::InternalServerError,
            "500 - Internal Server Error!",
        )
    }

    /// Creates a 406 Not Acceptable response.
    pub fn not_acceptable() -> Self {
        Self::plain_text(StatusCode::NotAcceptable, "User-agent is not accepted!")
    }

    /// Creates a 400 Bad Request response for methods other than GET.
    pub fn method_not_supported() -> Self {
        Self::plain_text(StatusCode::BadRequest, "Method not supported!")
    }

    /// Stamps the `Date` and `Server` headers every response carries.
    pub fn with_standard_headers(mut self, date: impl Into<String>, server: &str) -> Self {
        self.headers.insert("Date", date);
        self.headers.insert("Server", server);
        self
    }
}
