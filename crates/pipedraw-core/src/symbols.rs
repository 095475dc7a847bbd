//! Parametric piping symbol library.
//!
//! Maps a symbol shape's bounding box to a list of primitive draw commands.
//! Both the host renderer and the SVG exporter consume this function, so the
//! two always agree on symbol geometry.

use crate::shapes::{Color, Shape, SymbolKind};
use kurbo::{Point, Rect};

/// A primitive draw command with its own computed stroke width.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Open polyline through `points`.
    Line {
        points: Vec<Point>,
        width: f64,
        stroke: Color,
    },
    /// Closed filled polygon.
    Polygon {
        points: Vec<Point>,
        width: f64,
        stroke: Color,
        fill: Color,
    },
    /// Filled ellipse inscribed in `rect`.
    Oval {
        rect: Rect,
        width: f64,
        stroke: Color,
        fill: Color,
    },
}

/// Generate the primitive list for a symbol shape.
///
/// A missing or unrecognized symbol kind renders as a plain pipe.
pub fn symbol_primitives(shape: &Shape) -> Vec<Primitive> {
    let (x, y, w, h) = (shape.x, shape.y, shape.w, shape.h);
    let cx = x + w / 2.0;
    let cy = y + h / 2.0;
    let stroke = shape.outline;
    let fill = shape.fill;
    // Stroke weights scale with the symbol's smaller dimension.
    let thick = (w.min(h) * 0.25).round().max(1.0);
    let thin = (w.min(h) * 0.08).round().max(1.0);

    match shape.symbol.unwrap_or_default() {
        SymbolKind::Pipe => vec![Primitive::Line {
            points: vec![Point::new(x, cy), Point::new(x + w, cy)],
            width: thick,
            stroke,
        }],
        SymbolKind::Elbow => vec![Primitive::Line {
            points: vec![Point::new(x, cy), Point::new(x, y), Point::new(cx, y)],
            width: thick,
            stroke,
        }],
        SymbolKind::Tee => vec![
            Primitive::Line {
                points: vec![Point::new(cx, y + h), Point::new(cx, y)],
                width: thick,
                stroke,
            },
            Primitive::Line {
                points: vec![Point::new(x, cy), Point::new(x + w, cy)],
                width: thick,
                stroke,
            },
        ],
        SymbolKind::Valve => vec![
            Primitive::Line {
                points: vec![Point::new(x, y), Point::new(x + w, y + h)],
                width: thin,
                stroke,
            },
            Primitive::Line {
                points: vec![Point::new(x + w, y), Point::new(x, y + h)],
                width: thin,
                stroke,
            },
        ],
        SymbolKind::Reducer => {
            let top = y + h * 0.2;
            let bottom = y + h * 0.8;
            let small = x + w * 0.75;
            vec![Primitive::Polygon {
                points: vec![
                    Point::new(x, top),
                    Point::new(x, bottom),
                    Point::new(small, cy),
                ],
                width: thin,
                stroke,
                fill,
            }]
        }
        SymbolKind::Flange => {
            let lf = x + w * 0.25;
            let rf = x + w * 0.75;
            vec![
                Primitive::Line {
                    points: vec![Point::new(x, cy), Point::new(x + w, cy)],
                    width: thin,
                    stroke,
                },
                Primitive::Line {
                    points: vec![Point::new(lf, y), Point::new(lf, y + h)],
                    width: thin,
                    stroke,
                },
                Primitive::Line {
                    points: vec![Point::new(rf, y), Point::new(rf, y + h)],
                    width: thin,
                    stroke,
                },
            ]
        }
        SymbolKind::Instrument => {
            let r = w.min(h) / 2.0;
            vec![Primitive::Oval {
                rect: Rect::new(cx - r, cy - r, cx + r, cy + r),
                width: thin,
                stroke,
                fill,
            }]
        }
    }
}
