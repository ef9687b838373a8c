//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` from one stack
//! snapshot and consumed by the renderer. They carry no behaviour, only
//! display-ready data: every layer with its rectangle, z-index and whether it
//! is drawn active or dimmed.
//!
//! # Example
//!
//! ```rust
//! use gardenia::layers::{Rect, RenderMode};
//! use gardenia::ui::viewmodel::{LayerBody, LayerView};
//!
//! let picker = LayerView {
//!     id: "zones-1/start_time".to_string(),
//!     title: "Time".to_string(),
//!     z_index: 1001,
//!     rect: Rect::new(44, 6, 14, 5),
//!     mode: RenderMode::Active,
//!     body: LayerBody::Picker(vec![]),
//! };
//! assert_eq!(picker.mode, RenderMode::Active);
//! ```

use crate::layers::{Rect, RenderMode};
use crate::pickers::PickerLine;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Header information (title, stack summary).
    pub header: HeaderInfo,

    /// Footer information (keybindings, status).
    pub footer: FooterInfo,

    /// Shown when no layer is open.
    pub empty_state: Option<EmptyState>,

    /// Open layers, bottom to top.
    pub layers: Vec<LayerView>,
}

/// One layer of the stack, ready to draw.
#[derive(Debug, Clone)]
pub struct LayerView {
    /// Layer id.
    pub id: String,

    /// Text in the top border.
    pub title: String,

    /// `base_z + depth`; layers are drawn in increasing order.
    pub z_index: u32,

    /// Box to draw, border included.
    pub rect: Rect,

    /// Active on top, dimmed otherwise.
    pub mode: RenderMode,

    /// Content inside the border.
    pub body: LayerBody,
}

/// Content of a layer box.
#[derive(Debug, Clone)]
pub enum LayerBody {
    /// A resource form.
    Form(FormView),
    /// An injected picker's lines.
    Picker(Vec<PickerLine>),
}

/// Fields and status of a form.
#[derive(Debug, Clone)]
pub struct FormView {
    /// One row per field.
    pub fields: Vec<FieldView>,

    /// Status line under the fields.
    pub status: Option<StatusLine>,
}

/// One field row of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Field label.
    pub label: String,

    /// Displayed value.
    pub value: String,

    /// Whether the field has focus.
    pub is_focused: bool,

    /// Whether the field must be filled before submit.
    pub is_required: bool,

    /// Whether Enter opens a picker for the field.
    pub has_picker: bool,
}

/// A one-line message, either informational or an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Message text.
    pub text: String,

    /// Whether the message reports a failure.
    pub is_error: bool,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    /// Title text to display in the header.
    pub title: String,
    /// Labels of the open layers, bottom to top.
    pub trail: Vec<String>,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help for whatever is on top.
    pub keybindings: String,

    /// Application-wide status (request progress, API errors).
    pub status: Option<StatusLine>,
}

/// Message shown while no form is open.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message.
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}
