//! Layer-stack coordination for modal forms and nested pickers.
//!
//! Several forms and pickers can be open at once. This module decides which of
//! them is interactive, which are dimmed into the background, what z-order
//! each renders at, and which one an outside click dismisses.
//!
//! # Architecture
//!
//! ```text
//! LayerProvider ──owns──> LayerRegistry (ordered entries)
//!      │
//!      └─ scope() ──> LayerScope ──bind()──> LayerBinding (drop = unregister)
//!                         │
//!                         └─ add_layer()/remove_layer() (injected pickers)
//!
//! OutsideClickGate ── sync(snapshot) ── pointer_down(point) ──> Dismissal
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Insertion-ordered collection of active layers
//! - [`provider`]: Owner of the registry, scopes, and stack snapshots
//! - [`binding`]: Per-layer registration released on drop
//! - [`gate`]: Outside-click routing to the top layer
//! - [`injector`]: Picker layers mounted above their owning form
//!
//! # Example
//!
//! ```rust
//! use gardenia::layers::{LayerKind, LayerProvider, RenderMode};
//!
//! let provider: LayerProvider = LayerProvider::new();
//! let scope = provider.scope();
//!
//! let plant = scope.bind("plant-form", LayerKind::Form)?;
//! let location = scope.bind("location-form", LayerKind::Form)?;
//! assert_eq!(plant.render_mode(), RenderMode::Background);
//! assert!(location.z_index() > plant.z_index());
//!
//! drop(location);
//! assert!(plant.is_top());
//! # Ok::<(), gardenia::GardeniaError>(())
//! ```

pub mod binding;
pub mod gate;
pub mod injector;
pub mod provider;
pub mod registry;

pub use binding::{LayerBinding, RenderMode};
pub use gate::{Dismissal, OutsideClickGate, Point, Rect, Surface};
pub use injector::PickerOutcome;
pub use provider::{LayerProvider, LayerScope, StackSnapshot, DEFAULT_BASE_Z, MAX_BASE_Z};
pub use registry::{Layer, LayerId, LayerKind, LayerRegistry};
