//! Diagram rendering backends for mermit.
//!
//! Two interchangeable backends implement [`DiagramRenderer`]:
//! - [`MmdcRenderer`]: local rendering via the `mmdc` tool
//!   (`@mermaid-js/mermaid-cli`, run through `npx`)
//! - [`InkRenderer`]: remote rendering via the mermaid.ink HTTP API,
//!   requiring no Node.js installation
//!
//! [`render_all`] renders a batch in parallel with partial-failure
//! semantics: successfully rendered diagrams are kept even when others in
//! the same batch fail.

mod error;
mod format;
mod ink;
mod mmdc;
mod renderer;

pub use error::RenderError;
pub use format::OutputFormat;
pub use ink::{DEFAULT_INK_URL, InkRenderer, encode_diagram};
pub use mmdc::MmdcRenderer;
pub use renderer::{
    DiagramRenderer, PartialRenderResult, RenderJob, RenderJobError, RenderedArtifact, render_all,
};
