//! Static SVG export of a document.
//!
//! Connectors are emitted before shapes so that shapes paint on top, then
//! text labels above everything. Arrowheads are shared `<marker>` defs, one
//! per distinct connector stroke color.

use crate::document::Document;
use crate::shapes::{Color, ShapeKind};
use crate::symbols::{Primitive, symbol_primitives};
use kurbo::Point;

/// Whitespace added around the content bounding box.
pub const EXPORT_MARGIN: f64 = 20.0;

/// Render the whole document to an SVG string.
pub fn export(document: &Document) -> String {
    let mut max_x: f64 = 0.0;
    let mut max_y: f64 = 0.0;
    for shape in document.shapes() {
        max_x = max_x.max(shape.x + shape.w);
        max_y = max_y.max(shape.y + shape.h);
    }
    let width = max_x + EXPORT_MARGIN;
    let height = max_y + EXPORT_MARGIN;

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">\n"
    ));

    out.push_str("<defs>\n");
    out.push_str(
        "<style>.label { font: 12px Arial, sans-serif; dominant-baseline: middle; \
         text-anchor: middle; }</style>\n",
    );
    let mut marker_colors: Vec<Color> = Vec::new();
    for connector in document.connectors() {
        if connector.arrow.has_end() || connector.arrow.has_start() {
            if !marker_colors.contains(&connector.stroke) {
                marker_colors.push(connector.stroke);
            }
        }
    }
    for color in marker_colors {
        out.push_str(&format!(
            "<marker id=\"{id}\" markerWidth=\"10\" markerHeight=\"10\" refX=\"10\" \
             refY=\"3\" orient=\"auto-start-reverse\" markerUnits=\"strokeWidth\">\
             <path d=\"M0,0 L10,3 L0,6 Z\" fill=\"{fill}\"/></marker>\n",
            id = marker_id(color),
            fill = color.to_hex(),
        ));
    }
    out.push_str("</defs>\n");

    for connector in document.connectors() {
        let Some((a, b)) = document.connector_path(connector) else {
            continue;
        };
        let mut markers = String::new();
        if connector.arrow.has_end() {
            markers.push_str(&format!(
                " marker-end=\"url(#{})\"",
                marker_id(connector.stroke)
            ));
        }
        if connector.arrow.has_start() {
            markers.push_str(&format!(
                " marker-start=\"url(#{})\"",
                marker_id(connector.stroke)
            ));
        }
        out.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" \
             stroke-width=\"{}\"{markers}/>\n",
            a.x,
            a.y,
            b.x,
            b.y,
            connector.stroke.to_hex(),
            connector.width,
        ));
    }

    for shape in document.shapes() {
        match shape.kind {
            ShapeKind::Rect => out.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" \
                 stroke=\"{}\" stroke-width=\"{}\"/>\n",
                shape.x,
                shape.y,
                shape.w,
                shape.h,
                shape.fill.to_hex(),
                shape.outline.to_hex(),
                shape.width,
            )),
            ShapeKind::Ellipse => {
                let c = shape.center();
                out.push_str(&format!(
                    "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" \
                     stroke=\"{}\" stroke-width=\"{}\"/>\n",
                    c.x,
                    c.y,
                    shape.w / 2.0,
                    shape.h / 2.0,
                    shape.fill.to_hex(),
                    shape.outline.to_hex(),
                    shape.width,
                ));
            }
            ShapeKind::Symbol => {
                for primitive in symbol_primitives(shape) {
                    push_primitive(&mut out, &primitive);
                }
            }
        }
    }

    for shape in document.shapes() {
        if shape.text.is_empty() {
            continue;
        }
        let c = shape.center();
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" class=\"label\">{}</text>\n",
            c.x,
            c.y,
            escape_xml(&shape.text),
        ));
    }

    out.push_str("</svg>\n");
    out
}

fn push_primitive(out: &mut String, primitive: &Primitive) {
    match primitive {
        Primitive::Line {
            points,
            width,
            stroke,
        } => out.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" \
             stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
            point_list(points),
            stroke.to_hex(),
            width,
        )),
        Primitive::Polygon {
            points,
            width,
            stroke,
            fill,
        } => out.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" \
             stroke-linejoin=\"round\"/>\n",
            point_list(points),
            fill.to_hex(),
            stroke.to_hex(),
            width,
        )),
        Primitive::Oval {
            rect,
            width,
            stroke,
            fill,
        } => out.push_str(&format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" \
             stroke-width=\"{}\"/>\n",
            (rect.x0 + rect.x1) / 2.0,
            (rect.y0 + rect.y1) / 2.0,
            rect.width() / 2.0,
            rect.height() / 2.0,
            fill.to_hex(),
            stroke.to_hex(),
            width,
        )),
    }
}

fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn marker_id(color: Color) -> String {
    format!("arrow-{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
