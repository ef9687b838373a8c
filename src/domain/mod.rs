//! Domain layer for the Gardenia plugin.
//!
//! Core types independent of Zellij APIs: the error type and the garden
//! resources edited by the forms.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`resource`]: Resource kinds, form fields and field values
//!
//! # Examples
//!
//! ```
//! use gardenia::domain::{FieldKind, ResourceKind};
//!
//! let fields = ResourceKind::Zone.fields();
//! assert!(fields.iter().any(|f| f.kind == FieldKind::Time));
//! assert_eq!(ResourceKind::Zone.endpoint(), "zones");
//! ```

pub mod error;
pub mod resource;

pub use error::{GardeniaError, Result};
pub use resource::{FieldKind, FieldSpec, FieldValue, NamedRecord, ResourceKind, RunDuration};
