//! PipeDraw Core Library
//!
//! Render-agnostic scene model and interaction engine for the PipeDraw
//! diagram editor: shapes, connectors, pointer-driven editing, snapshot
//! undo/redo, JSON persistence, and SVG export.

pub mod document;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod svg;
pub mod symbols;

pub use document::{ConnectorError, Document};
pub use editor::{Drag, Editor, Handle, HostPrompts, Tool};
pub use history::History;
pub use selection::{SceneRef, Selection};
pub use shapes::{
    ArrowMode, Color, Connector, ConnectorId, Settings, Shape, ShapeId, ShapeKind, SymbolKind,
};
pub use storage::StorageError;
pub use symbols::{Primitive, symbol_primitives};
