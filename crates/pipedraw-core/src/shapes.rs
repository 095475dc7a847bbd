//! Plain-data scene entities: shapes, connectors, and styling.
//!
//! Nothing here holds rendering handles; everything a renderer needs is
//! derived per frame from these structs.

use kurbo::{Point, Rect};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unique identifier for shapes.
pub type ShapeId = u64;
/// Unique identifier for connectors.
pub type ConnectorId = u64;

/// RGB color, serialized as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Parse a `#RRGGBB` or `#RGB` hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?.trim();
        // Length checks below count bytes; multi-byte input must not reach
        // the fixed-offset slices.
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| D::Error::custom(format!("invalid color {s:?}")))
    }
}

/// Geometric class of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Symbol,
}

/// Parametric piping symbol kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolKind {
    #[default]
    Pipe,
    Elbow,
    Tee,
    Valve,
    Reducer,
    Flange,
    Instrument,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 7] = [
        SymbolKind::Pipe,
        SymbolKind::Elbow,
        SymbolKind::Tee,
        SymbolKind::Valve,
        SymbolKind::Reducer,
        SymbolKind::Flange,
        SymbolKind::Instrument,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SymbolKind::Pipe => "pipe",
            SymbolKind::Elbow => "elbow",
            SymbolKind::Tee => "tee",
            SymbolKind::Valve => "valve",
            SymbolKind::Reducer => "reducer",
            SymbolKind::Flange => "flange",
            SymbolKind::Instrument => "instrument",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl Serialize for SymbolKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SymbolKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        // Unknown symbol names degrade to the plain pipe rendering.
        Ok(SymbolKind::from_name(&s).unwrap_or_default())
    }
}

/// Allowed stroke width range for shapes and connectors.
pub const MIN_STROKE_WIDTH: u8 = 1;
pub const MAX_STROKE_WIDTH: u8 = 10;

pub(crate) fn clamp_stroke_width(w: u8) -> u8 {
    w.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

/// A positioned, sized, styled drawable node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Present iff `kind == Symbol`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolKind>,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub fill: Color,
    pub outline: Color,
    pub width: u8,
    #[serde(default)]
    pub text: String,
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Arrowhead placement for a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArrowMode {
    /// Arrowhead at the destination end.
    #[default]
    #[serde(rename = "last")]
    Forward,
    #[serde(rename = "both")]
    Both,
    #[serde(rename = "none")]
    None,
}

impl ArrowMode {
    pub fn has_end(self) -> bool {
        matches!(self, ArrowMode::Forward | ArrowMode::Both)
    }

    pub fn has_start(self) -> bool {
        matches!(self, ArrowMode::Both)
    }
}

/// A directed edge between two shapes.
///
/// The rendered path is never stored; it is re-derived from the endpoint
/// shapes via [`crate::geometry::anchor_point`] on every use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: ConnectorId,
    pub src: ShapeId,
    pub dst: ShapeId,
    #[serde(default)]
    pub arrow: ArrowMode,
    pub stroke: Color,
    pub width: u8,
}

/// Global document settings: style defaults and grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_fill: Color,
    pub default_outline: Color,
    pub default_width: u8,
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub show_grid: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_fill: Color::white(),
            default_outline: Color::new(0x33, 0x33, 0x33),
            default_width: 2,
            grid_size: 20.0,
            snap_to_grid: true,
            show_grid: true,
        }
    }
}
