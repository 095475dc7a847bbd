//! Document model: entity tables, id allocation, and wire (de)serialization.

use crate::geometry::{anchor_point, dist_point_to_segment, point_in_shape};
use crate::selection::SceneRef;
use crate::shapes::{
    clamp_stroke_width, ArrowMode, Color, Connector, ConnectorId, Settings, Shape, ShapeId,
    ShapeKind, SymbolKind,
};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Minimum shape extent after any edit. Zero-area shapes are disallowed.
pub const MIN_SHAPE_SIZE: f64 = 1.0;

/// Refusals from [`Document::create_connector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectorError {
    #[error("connector endpoints must be two different shapes")]
    SelfLoop,
    #[error("connector endpoint references missing shape {0}")]
    DanglingEndpoint(ShapeId),
}

/// Root aggregate: owns all shapes, connectors, the id allocator, and the
/// global settings. Entity tables are ordered by id, which doubles as the
/// creation (and thus z-) order.
#[derive(Debug, Clone)]
pub struct Document {
    shapes: BTreeMap<ShapeId, Shape>,
    connectors: BTreeMap<ConnectorId, Connector>,
    next_id: u64,
    pub settings: Settings,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            shapes: BTreeMap::new(),
            connectors: BTreeMap::new(),
            next_id: 1,
            settings: Settings::default(),
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a shape styled from the current defaults. Width and height are
    /// clamped to the minimum size.
    pub fn create_shape(
        &mut self,
        kind: ShapeKind,
        symbol: Option<SymbolKind>,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> ShapeId {
        let id = self.alloc_id();
        let shape = Shape {
            id,
            kind,
            symbol: if kind == ShapeKind::Symbol {
                Some(symbol.unwrap_or_default())
            } else {
                None
            },
            x,
            y,
            w: w.max(MIN_SHAPE_SIZE),
            h: h.max(MIN_SHAPE_SIZE),
            fill: self.settings.default_fill,
            outline: self.settings.default_outline,
            width: clamp_stroke_width(self.settings.default_width),
            text: String::new(),
        };
        self.shapes.insert(id, shape);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Shapes in z-order, back to front.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.values()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.connectors.is_empty()
    }

    /// Set a shape's bounds, clamping to the minimum size.
    pub fn update_shape_geometry(&mut self, id: ShapeId, x: f64, y: f64, w: f64, h: f64) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.x = x;
            shape.y = y;
            shape.w = w.max(MIN_SHAPE_SIZE);
            shape.h = h.max(MIN_SHAPE_SIZE);
        }
    }

    /// Apply a partial style update to a shape.
    pub fn update_shape_style(
        &mut self,
        id: ShapeId,
        fill: Option<Color>,
        outline: Option<Color>,
        width: Option<u8>,
    ) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            if let Some(fill) = fill {
                shape.fill = fill;
            }
            if let Some(outline) = outline {
                shape.outline = outline;
            }
            if let Some(width) = width {
                shape.width = clamp_stroke_width(width);
            }
        }
    }

    pub fn update_connector_style(
        &mut self,
        id: ConnectorId,
        stroke: Option<Color>,
        width: Option<u8>,
    ) {
        if let Some(connector) = self.connectors.get_mut(&id) {
            if let Some(stroke) = stroke {
                connector.stroke = stroke;
            }
            if let Some(width) = width {
                connector.width = clamp_stroke_width(width);
            }
        }
    }

    pub fn set_connector_arrow(&mut self, id: ConnectorId, arrow: ArrowMode) {
        if let Some(connector) = self.connectors.get_mut(&id) {
            connector.arrow = arrow;
        }
    }

    pub fn set_text(&mut self, id: ShapeId, text: String) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.text = text;
        }
    }

    /// Delete shapes, cascading to every connector that references one of
    /// them as src or dst.
    pub fn delete_shapes(&mut self, ids: &[ShapeId]) {
        for id in ids {
            self.shapes.remove(id);
        }
        self.connectors
            .retain(|_, c| !ids.contains(&c.src) && !ids.contains(&c.dst));
    }

    /// Create a connector styled from the current defaults.
    pub fn create_connector(
        &mut self,
        src: ShapeId,
        dst: ShapeId,
    ) -> Result<ConnectorId, ConnectorError> {
        if src == dst {
            return Err(ConnectorError::SelfLoop);
        }
        for endpoint in [src, dst] {
            if !self.shapes.contains_key(&endpoint) {
                return Err(ConnectorError::DanglingEndpoint(endpoint));
            }
        }
        let id = self.alloc_id();
        self.connectors.insert(
            id,
            Connector {
                id,
                src,
                dst,
                arrow: ArrowMode::Forward,
                stroke: self.settings.default_outline,
                width: clamp_stroke_width(self.settings.default_width),
            },
        );
        Ok(id)
    }

    pub fn delete_connectors(&mut self, ids: &[ConnectorId]) {
        for id in ids {
            self.connectors.remove(id);
        }
    }

    /// Reset to an empty document. The id allocator restarts at 1; settings
    /// are kept.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.connectors.clear();
        self.next_id = 1;
    }

    /// Derived endpoints of a connector: each shape's anchor toward the
    /// other's center. `None` when either endpoint shape is missing.
    pub fn connector_path(&self, connector: &Connector) -> Option<(Point, Point)> {
        let src = self.shapes.get(&connector.src)?;
        let dst = self.shapes.get(&connector.dst)?;
        Some((
            anchor_point(src, dst.center()),
            anchor_point(dst, src.center()),
        ))
    }

    /// Topmost shape containing `point`, if any.
    pub fn shape_at(&self, point: Point) -> Option<ShapeId> {
        self.shapes
            .values()
            .rev()
            .find(|s| point_in_shape(point, s))
            .map(|s| s.id)
    }

    /// Topmost connector whose derived segment passes within `tolerance` of
    /// `point`.
    pub fn connector_at(&self, point: Point, tolerance: f64) -> Option<ConnectorId> {
        self.connectors
            .values()
            .rev()
            .find(|c| {
                self.connector_path(c)
                    .is_some_and(|(a, b)| dist_point_to_segment(point, a, b) <= tolerance)
            })
            .map(|c| c.id)
    }

    /// Entities fully contained in `rect`: shapes by bounding box, connectors
    /// by both derived anchor endpoints.
    pub fn refs_within(&self, rect: Rect) -> Vec<SceneRef> {
        let contains = |p: Point| {
            p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
        };
        let mut refs = Vec::new();
        for shape in self.shapes.values() {
            let b = shape.bounds();
            if contains(Point::new(b.x0, b.y0)) && contains(Point::new(b.x1, b.y1)) {
                refs.push(SceneRef::Shape(shape.id));
            }
        }
        for connector in self.connectors.values() {
            if let Some((a, b)) = self.connector_path(connector) {
                if contains(a) && contains(b) {
                    refs.push(SceneRef::Connector(connector.id));
                }
            }
        }
        refs
    }

    /// Bounding box of all shapes, or `None` for an empty document.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .values()
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    // ---- wire format ----

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.as_wire())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.as_wire())
    }

    fn as_wire(&self) -> DocumentWire<'_> {
        DocumentWire {
            shapes: self.shapes.values().collect(),
            connectors: self.connectors.values().collect(),
            next_id: self.next_id,
            settings: &self.settings,
        }
    }

    /// Parse a document from its JSON wire form.
    ///
    /// Repairs what it can: shape extents and stroke widths are clamped,
    /// connectors with dangling endpoints or self-loops are dropped with a
    /// warning, and `next_id` is corrected upward past every existing id.
    /// Schema violations beyond repair fail the parse.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let wire: DocumentWireOwned = serde_json::from_str(json)?;
        let mut shapes = BTreeMap::new();
        for mut shape in wire.shapes {
            shape.w = shape.w.max(MIN_SHAPE_SIZE);
            shape.h = shape.h.max(MIN_SHAPE_SIZE);
            shape.width = clamp_stroke_width(shape.width);
            if shape.kind == ShapeKind::Symbol && shape.symbol.is_none() {
                shape.symbol = Some(SymbolKind::default());
            }
            shapes.insert(shape.id, shape);
        }
        let mut connectors = BTreeMap::new();
        for mut connector in wire.connectors {
            if connector.src == connector.dst {
                log::warn!("dropping self-loop connector {}", connector.id);
                continue;
            }
            if !shapes.contains_key(&connector.src) || !shapes.contains_key(&connector.dst) {
                log::warn!("dropping connector {} with dangling endpoint", connector.id);
                continue;
            }
            connector.width = clamp_stroke_width(connector.width);
            connectors.insert(connector.id, connector);
        }
        let max_id = shapes
            .keys()
            .chain(connectors.keys())
            .copied()
            .max()
            .unwrap_or(0);
        let next_id = wire.next_id.max(max_id + 1);
        Ok(Self {
            shapes,
            connectors,
            next_id,
            settings: wire.settings,
        })
    }
}

#[derive(Serialize)]
struct DocumentWire<'a> {
    shapes: Vec<&'a Shape>,
    connectors: Vec<&'a Connector>,
    next_id: u64,
    settings: &'a Settings,
}

#[derive(Deserialize)]
struct DocumentWireOwned {
    #[serde(default)]
    shapes: Vec<Shape>,
    #[serde(default)]
    connectors: Vec<Connector>,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    settings: Settings,
}
