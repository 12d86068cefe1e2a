//! Renderings of a Fleetgraph [`AbstractGraph`](fleetgraph_ontology::AbstractGraph).
//!
//! - [`static_render`]: seeded spring layout drawn to SVG and rasterized to PNG.
//! - [`interactive`]: standalone vis-network HTML page with tag colors.
//! - [`export`]: DOT and JSON text for other tools.
//!
//! Renderers only read the graph and write their own artifact, so any subset
//! can run in any order.

pub mod export;
pub mod interactive;
pub mod layout;
pub mod static_render;

pub use export::{render_dot, render_json};
pub use interactive::{pick_color, render_html, render_interactive, InteractiveReport};
pub use layout::{spring_layout, Layout, LayoutConfig, Point, LAYOUT_SEED};
pub use static_render::{rasterize, render_static, render_static_with, render_svg, StaticReport, StaticStyle};

pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
