//! REST requests issued by the plugin.
//!
//! Requests leave the plugin through Zellij's `web_request` host call, which
//! hands back an opaque string map with the response. Everything needed to
//! route the response (request kind, resource, originating form, trace
//! context) travels in that map; see [`ApiRequest::context`].

use crate::domain::{GardeniaError, ResourceKind, Result};
use crate::layers::LayerId;
use std::collections::BTreeMap;

/// Context key naming the request kind.
pub const CONTEXT_REQUEST: &str = "request";
/// Context key naming the resource collection.
pub const CONTEXT_RESOURCE: &str = "resource";
/// Context key naming the form that issued the request.
pub const CONTEXT_ORIGIN: &str = "origin";
/// Context key carrying the trace id.
pub const CONTEXT_TRACE_ID: &str = "trace_id";
/// Context key carrying the parent span id.
pub const CONTEXT_PARENT_SPAN: &str = "parent_span_id";

/// Distributed tracing context carried across the host round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking the response span to the request span.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span ids of the current tracing span.
    ///
    /// Returns `None` when no valid OpenTelemetry context is active, which is
    /// the case whenever tracing was not initialized.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        let trace_id = format!("{:032x}", span_context.trace_id());
        let parent_span_id = format!("{:016x}", span_context.span_id());
        tracing::trace!(%trace_id, %parent_span_id, "capturing trace context");

        Some(Self {
            trace_id,
            parent_span_id,
        })
    }

    /// Reads a trace context back out of a response context map.
    #[must_use]
    pub fn from_context(context: &BTreeMap<String, String>) -> Option<Self> {
        Some(Self {
            trace_id: context.get(CONTEXT_TRACE_ID)?.clone(),
            parent_span_id: context.get(CONTEXT_PARENT_SPAN)?.clone(),
        })
    }

    /// Makes this context the parent of spans created while the guard lives.
    #[must_use]
    pub fn attach(&self) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;
        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }
}

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read a collection.
    Get,
    /// Create a record.
    Post,
}

/// Generates constructors that attach the current trace context.
macro_rules! api_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl ApiRequest {
            $(
                #[doc = concat!("Creates a `", stringify!($variant), "` request with the current trace context.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

api_request_builders! {
    list_locations(ListLocations {}),
    create(Create { resource: ResourceKind, origin: LayerId, body: serde_json::Value }),
}

/// A request to the garden REST API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    /// Fetch every location, for the location picker.
    ListLocations {
        /// Trace context of the span that issued the request.
        trace_context: Option<TraceContext>,
    },

    /// Create a record from a submitted form.
    Create {
        /// Collection the record belongs to.
        resource: ResourceKind,
        /// Form that submitted the record.
        origin: LayerId,
        /// Field values keyed by their JSON names.
        body: serde_json::Value,
        /// Trace context of the span that issued the request.
        trace_context: Option<TraceContext>,
    },
}

impl ApiRequest {
    /// Request kind as written into the context map.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListLocations { .. } => "list_locations",
            Self::Create { .. } => "create",
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::ListLocations { .. } => Method::Get,
            Self::Create { .. } => Method::Post,
        }
    }

    /// Collection addressed by the request.
    #[must_use]
    pub const fn resource(&self) -> ResourceKind {
        match self {
            Self::ListLocations { .. } => ResourceKind::Location,
            Self::Create { resource, .. } => *resource,
        }
    }

    /// Form the response should be routed to.
    #[must_use]
    pub const fn origin(&self) -> Option<&LayerId> {
        match self {
            Self::ListLocations { .. } => None,
            Self::Create { origin, .. } => Some(origin),
        }
    }

    const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::ListLocations { trace_context } | Self::Create { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Full URL below `api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GardeniaError::Config`] when `api_url` is empty.
    pub fn url(&self, api_url: &str) -> Result<String> {
        let base = api_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(GardeniaError::Config("api_url is not set".to_string()));
        }
        Ok(format!("{base}/{}", self.resource().endpoint()))
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if self.method() == Method::Post {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        headers
    }

    /// Encoded request body; empty for reads.
    ///
    /// # Errors
    ///
    /// Returns [`GardeniaError::Serialization`] if the body cannot be encoded.
    pub fn body_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::ListLocations { .. } => Ok(vec![]),
            Self::Create { body, .. } => Ok(serde_json::to_vec(body)?),
        }
    }

    /// Routing context returned untouched alongside the response.
    #[must_use]
    pub fn context(&self) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        context.insert(CONTEXT_REQUEST.to_string(), self.name().to_string());
        context.insert(CONTEXT_RESOURCE.to_string(), self.resource().endpoint().to_string());
        if let Some(origin) = self.origin() {
            context.insert(CONTEXT_ORIGIN.to_string(), origin.to_string());
        }
        if let Some(trace) = self.trace_context() {
            context.insert(CONTEXT_TRACE_ID.to_string(), trace.trace_id.clone());
            context.insert(CONTEXT_PARENT_SPAN.to_string(), trace.parent_span_id.clone());
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_carries_routing_context() {
        let request = ApiRequest::Create {
            resource: ResourceKind::Zone,
            origin: LayerId::from("zones-2"),
            body: serde_json::json!({ "name": "Beds" }),
            trace_context: Some(TraceContext {
                trace_id: "0af7651916cd43dd8448eb211c80319c".into(),
                parent_span_id: "b7ad6b7169203331".into(),
            }),
        };

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.url("http://garden.local/api/").unwrap(), "http://garden.local/api/zones");
        assert_eq!(request.body_bytes().unwrap(), br#"{"name":"Beds"}"#.to_vec());

        let context = request.context();
        assert_eq!(context[CONTEXT_REQUEST], "create");
        assert_eq!(context[CONTEXT_RESOURCE], "zones");
        assert_eq!(context[CONTEXT_ORIGIN], "zones-2");
        assert_eq!(
            TraceContext::from_context(&context).map(|t| t.parent_span_id),
            Some("b7ad6b7169203331".to_string())
        );
        assert_eq!(request.headers()["Content-Type"], "application/json");
    }

    #[test]
    fn listing_needs_an_api_url() {
        let request = ApiRequest::list_locations();
        assert_eq!(request.method(), Method::Get);
        assert!(request.body_bytes().unwrap().is_empty());
        assert!(!request.context().contains_key(CONTEXT_ORIGIN));
        assert!(matches!(request.url("  "), Err(GardeniaError::Config(_))));
    }
}
