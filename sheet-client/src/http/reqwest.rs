//! reqwest-backed HTTP transport.
//!
//! Authentication is cookie based: the login endpoint sets a session
//! cookie and every later request must carry it. The transport owns a
//! cookie jar that reqwest consults on each request, and exposes it so a
//! CLI can persist the session between runs.

use std::sync::Arc;

use ::reqwest::cookie::{CookieStore, Jar};
use ::reqwest::multipart::{Form, Part};
use ::reqwest::{Client, Url};
use async_trait::async_trait;
use sheet_core::{CallBody, Method, MultipartForm};

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// HTTP transport over reqwest with a shared cookie jar.
///
/// No timeout is configured; requests rely on the OS and server defaults.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    /// Create a transport with an empty cookie jar.
    pub fn new() -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;
        Ok(Self { client, jar })
    }

    /// Cookies the jar would send to `url`, as a `Cookie` header value.
    pub fn session_cookies(&self, url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let header = self.jar.cookies(&url)?;
        header.to_str().ok().map(str::to_string)
    }

    /// Load cookies previously returned by [`session_cookies`](Self::session_cookies).
    pub fn restore_session(&self, url: &str, cookies: &str) -> Result<(), TransportError> {
        let url = Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        for cookie in cookies.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, &url);
        }
        Ok(())
    }
}

fn to_method(method: Method) -> ::reqwest::Method {
    match method {
        Method::Get => ::reqwest::Method::GET,
        Method::Post => ::reqwest::Method::POST,
        Method::Patch => ::reqwest::Method::PATCH,
        Method::Delete => ::reqwest::Method::DELETE,
    }
}

fn to_form(form: MultipartForm) -> Result<Form, TransportError> {
    let mut part = Part::bytes(form.file.bytes).file_name(form.file.file_name);
    if let Some(content_type) = form.file.content_type {
        part = part
            .mime_str(&content_type)
            .map_err(|e| TransportError::InvalidBody(e.to_string()))?;
    }

    let mut out = Form::new().part(form.file_field, part);
    for (name, value) in form.fields {
        out = out.text(name, value);
    }
    Ok(out)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = self
            .client
            .request(to_method(request.method), request.url.as_str());

        let builder = match request.body {
            CallBody::Empty => builder,
            CallBody::Json(body) => builder.json(&body),
            CallBody::Multipart(form) => builder.multipart(to_form(form)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::ReadFailed(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
