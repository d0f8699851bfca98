//! # Match Results
//!
//! Aggregation of matched findings into a [`Matches`] value, the list-or-table
//! decision made on it, and the text/JSON renderers that consume it.
//!
//! ## Core Types
//! - [`Matches`] - Deduplicated plugin summary plus the matched sub-collection
//! - [`RenderMode`] - Outcome of the port-uniformity check
//! - [`RenderInput`] - Renderer-facing rows derived from a sorted [`Matches`]
//! - [`OutputFormat`] - Requested built-in output shape
//! - [`CustomTemplate`] - User-supplied list/table templates
//! - [`Renderer`] - Either of the two

pub mod content;
pub mod error;
pub mod matches;
pub mod render;
pub mod template;

pub use content::{resolve_render_mode, RenderMode};
pub use error::{MatchError, OutputError};
pub use matches::{Header, MatchedPlugin, Matches};
pub use render::{render, FindingLine, OutputFormat, RenderInput, Renderer};
pub use template::{render_custom, CustomTemplate, TemplateFile};
