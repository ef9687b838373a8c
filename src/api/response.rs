//! Decoding of REST responses.

use super::request::{TraceContext, CONTEXT_ORIGIN, CONTEXT_REQUEST, CONTEXT_RESOURCE};
use crate::domain::{GardeniaError, NamedRecord, ResourceKind};
use crate::layers::LayerId;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Outcome of a request, routed back to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Locations for the location picker.
    LocationsLoaded {
        /// Every location with a name, in server order.
        locations: Vec<NamedRecord>,
    },

    /// A form's record was created.
    Created {
        /// Collection the record was added to.
        resource: ResourceKind,
        /// Form that submitted it.
        origin: LayerId,
        /// Record echoed by the server, when it sent one back.
        record: Option<NamedRecord>,
    },

    /// The request failed.
    Failed {
        /// Form that issued the request, if any.
        origin: Option<LayerId>,
        /// Human-readable failure.
        message: String,
    },
}

/// Collection payloads are either a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Bare(Vec<serde_json::Value>),
    Items { items: Vec<serde_json::Value> },
    Data { data: Vec<serde_json::Value> },
}

impl Listing {
    fn into_records(self) -> Vec<NamedRecord> {
        let (Self::Bare(values) | Self::Items { items: values } | Self::Data { data: values }) = self;
        values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect()
    }
}

impl ApiResponse {
    /// Decodes a `web_request` result using the context map it came back with.
    ///
    /// The trace context in `context`, if any, becomes the parent of the
    /// decoding span.
    #[must_use]
    pub fn decode(status: u16, body: &[u8], context: &BTreeMap<String, String>) -> Self {
        let _trace_guard = TraceContext::from_context(context).and_then(|trace| trace.attach());
        let request = context.get(CONTEXT_REQUEST).map_or("", String::as_str);
        let _span = tracing::debug_span!("api_response", status, request, body_len = body.len()).entered();

        let origin = context.get(CONTEXT_ORIGIN).map(|origin| LayerId::from(origin.as_str()));

        if !(200..300).contains(&status) {
            let error = GardeniaError::Api {
                status,
                message: error_message(body),
            };
            tracing::warn!(error = %error, origin = ?origin, "request failed");
            return Self::Failed {
                origin,
                message: error.to_string(),
            };
        }

        match request {
            "list_locations" => match serde_json::from_slice::<Listing>(body) {
                Ok(listing) => {
                    let locations = listing.into_records();
                    tracing::debug!(count = locations.len(), "locations decoded");
                    Self::LocationsLoaded { locations }
                }
                Err(e) => Self::Failed {
                    origin,
                    message: GardeniaError::from(e).to_string(),
                },
            },
            "create" => {
                let resource = context
                    .get(CONTEXT_RESOURCE)
                    .and_then(|endpoint| ResourceKind::ALL.into_iter().find(|kind| kind.endpoint() == endpoint));
                match (resource, origin) {
                    (Some(resource), Some(origin)) => Self::Created {
                        resource,
                        origin,
                        record: serde_json::from_slice(body).ok(),
                    },
                    (_, origin) => Self::Failed {
                        origin,
                        message: "Response without routing context".to_string(),
                    },
                }
            }
            other => {
                tracing::warn!(request = other, "response for an unknown request kind");
                Self::Failed {
                    origin,
                    message: format!("Unexpected response to '{other}'"),
                }
            }
        }
    }
}

fn error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(alias = "message", alias = "detail")]
        error: String,
    }

    serde_json::from_slice::<ErrorBody>(body).map_or_else(
        |_| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                "no response body".to_string()
            } else {
                text
            }
        },
        |parsed| parsed.error,
    )
}
