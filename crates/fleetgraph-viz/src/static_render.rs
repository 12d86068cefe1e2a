//! Static ontology picture: seeded layout → SVG → PNG.
//!
//! Every node shares one fill and every edge one stroke; per-tag coloring
//! lives in the interactive renderer. Edges carry their join key as
//! a label.

use crate::layout::{spring_layout, Layout, LayoutConfig, Point};
use crate::xml_escape;
use anyhow::{anyhow, Context, Result};
use fleetgraph_ontology::{write_artifact, AbstractGraph};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct StaticStyle {
    pub width: u32,
    pub height: u32,
    pub margin: f64,
    pub node_radius: f64,
    pub node_fill: String,
    pub node_stroke: String,
    pub edge_color: String,
    pub background: String,
    pub font_family: String,
    pub node_font_size: f64,
    pub edge_font_size: f64,
    pub layout: LayoutConfig,
}

impl Default for StaticStyle {
    fn default() -> Self {
        // 9x7in at 180dpi.
        Self {
            width: 1620,
            height: 1260,
            margin: 140.0,
            node_radius: 58.0,
            node_fill: "#d9e8ff".to_string(),
            node_stroke: "#9db8e0".to_string(),
            edge_color: "#555555".to_string(),
            background: "#ffffff".to_string(),
            font_family: "DejaVu Sans, Arial, Helvetica, sans-serif".to_string(),
            node_font_size: 30.0,
            edge_font_size: 25.0,
            layout: LayoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaticReport {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub nodes: usize,
    pub edges: usize,
    pub layout: Layout,
}

pub fn render_static(graph: &AbstractGraph, out: &Path) -> Result<StaticReport> {
    render_static_with(graph, out, &StaticStyle::default())
}

pub fn render_static_with(
    graph: &AbstractGraph,
    out: &Path,
    style: &StaticStyle,
) -> Result<StaticReport> {
    let layout = spring_layout(graph, &style.layout);
    let svg = render_svg_with_layout(graph, &layout, style);
    let png = rasterize(&svg)?;
    write_artifact(out, png).with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), nodes = layout.positions.len(), edges = graph.edges.len(), "wrote static graph");

    Ok(StaticReport {
        path: out.to_path_buf(),
        width: style.width,
        height: style.height,
        nodes: layout.positions.len(),
        edges: graph.edges.len(),
        layout,
    })
}

pub fn render_svg(graph: &AbstractGraph, style: &StaticStyle) -> String {
    let layout = spring_layout(graph, &style.layout);
    render_svg_with_layout(graph, &layout, style)
}

/// Rasterizes an SVG document to PNG bytes at its intrinsic size.
pub fn rasterize(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|err| anyhow!("failed to parse generated SVG: {err}"))?;
    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow!("failed to allocate {}x{} pixmap", size.width(), size.height()))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|err| anyhow!("failed to encode PNG: {err}"))
}

fn render_svg_with_layout(graph: &AbstractGraph, layout: &Layout, style: &StaticStyle) -> String {
    let (w, h) = (f64::from(style.width), f64::from(style.height));
    let to_canvas = |p: Point| Point {
        x: style.margin + (p.x + 1.0) / 2.0 * (w - 2.0 * style.margin),
        y: style.margin + (1.0 - p.y) / 2.0 * (h - 2.0 * style.margin),
    };
    let canvas: HashMap<&str, Point> = layout
        .positions
        .iter()
        .map(|(id, p)| (id.as_str(), to_canvas(*p)))
        .collect();

    let mut svg: Vec<String> = Vec::new();
    svg.push(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    ));
    svg.push(format!(
        r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="9" markerHeight="9" orient="auto-start-reverse"><path d="M0,0 L10,5 L0,10 z" fill="{}"/></marker></defs>"#,
        style.edge_color
    ));
    svg.push(format!(
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
        style.background
    ));

    // Parallel edges between the same pair fan out instead of overlapping.
    let mut lanes: HashMap<(&str, &str), usize> = HashMap::new();
    let mut lane_totals: HashMap<(&str, &str), usize> = HashMap::new();
    for e in &graph.edges {
        *lane_totals.entry(pair(&e.source, &e.target)).or_default() += 1;
    }

    let mut labels: Vec<String> = Vec::new();
    for e in &graph.edges {
        let (Some(&a), Some(&b)) = (canvas.get(e.source.as_str()), canvas.get(e.target.as_str())) else {
            continue;
        };
        let key = pair(&e.source, &e.target);
        let slot = lanes.entry(key).or_default();
        let lane = *slot;
        *slot += 1;
        let mut offset = (lane as f64 - (lane_totals[&key] as f64 - 1.0) / 2.0) * 70.0;
        // Offsets are measured against the sorted pair, so reversed edges flip.
        if e.source > e.target {
            offset = -offset;
        }

        let label_at = if e.source == e.target {
            self_loop(&mut svg, a, lane, style)
        } else {
            edge_path(&mut svg, a, b, offset, style)
        };
        edge_label(&mut labels, label_at, &e.key, style);
    }
    svg.extend(labels);

    for (id, _) in &layout.positions {
        let p = canvas[id.as_str()];
        svg.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="{}" stroke-width="2"/>"#,
            p.x, p.y, style.node_radius, style.node_fill, style.node_stroke
        ));
    }
    for (id, _) in &layout.positions {
        let p = canvas[id.as_str()];
        svg.push(format!(
            r##"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}" font-weight="bold" text-anchor="middle" dominant-baseline="central" fill="#111111">{}</text>"##,
            p.x,
            p.y,
            style.font_family,
            style.node_font_size,
            xml_escape(id)
        ));
    }

    svg.push("</svg>\n".to_string());
    svg.join("\n")
}

fn pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Draws a straight or bowed edge that stops at the target's rim; returns the label anchor.
fn edge_path(svg: &mut Vec<String>, a: Point, b: Point, offset: f64, style: &StaticStyle) -> Point {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = (dx * dx + dy * dy).sqrt().max(1e-6);
    let (nx, ny) = (-dy / len, dx / len);

    let control = Point {
        x: (a.x + b.x) / 2.0 + nx * offset * 2.0,
        y: (a.y + b.y) / 2.0 + ny * offset * 2.0,
    };
    let (cx, cy) = (b.x - control.x, b.y - control.y);
    let clen = (cx * cx + cy * cy).sqrt().max(1e-6);
    let end = Point {
        x: b.x - cx / clen * style.node_radius,
        y: b.y - cy / clen * style.node_radius,
    };

    svg.push(format!(
        r#"<path d="M{:.2},{:.2} Q{:.2},{:.2} {:.2},{:.2}" fill="none" stroke="{}" stroke-width="2.5" marker-end="url(#arrow)"/>"#,
        a.x, a.y, control.x, control.y, end.x, end.y, style.edge_color
    ));
    Point {
        x: 0.25 * a.x + 0.5 * control.x + 0.25 * b.x,
        y: 0.25 * a.y + 0.5 * control.y + 0.25 * b.y,
    }
}

fn self_loop(svg: &mut Vec<String>, p: Point, lane: usize, style: &StaticStyle) -> Point {
    let r = style.node_radius;
    // Each further loop on the same node reaches one step higher.
    let reach = r * (1.0 + 0.45 * lane as f64);
    svg.push(format!(
        r#"<path d="M{:.2},{:.2} C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="none" stroke="{}" stroke-width="2.5" marker-end="url(#arrow)"/>"#,
        p.x - r * 0.5,
        p.y - r * 0.85,
        p.x - reach * 1.4,
        p.y - reach * 2.6,
        p.x + reach * 1.4,
        p.y - reach * 2.6,
        p.x + r * 0.5,
        p.y - r * 0.85,
        style.edge_color
    ));
    Point {
        x: p.x,
        y: p.y - reach * 2.2,
    }
}

fn edge_label(out: &mut Vec<String>, at: Point, text: &str, style: &StaticStyle) {
    if text.is_empty() {
        return;
    }
    let width = text.chars().count() as f64 * style.edge_font_size * 0.6 + 12.0;
    let height = style.edge_font_size + 8.0;
    out.push(format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="4" fill="{}" fill-opacity="0.85"/>"#,
        at.x - width / 2.0,
        at.y - height / 2.0,
        width,
        height,
        style.background
    ));
    out.push(format!(
        r##"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}" text-anchor="middle" dominant-baseline="central" fill="#333333">{}</text>"##,
        at.x,
        at.y,
        style.font_family,
        style.edge_font_size,
        xml_escape(text)
    ));
}
