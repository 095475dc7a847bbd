//! Pointer-driven editing engine.
//!
//! The [`Editor`] owns the document, the selection, and the undo history,
//! and turns pointer events into document mutations. It knows nothing about
//! windowing or rendering; hosts feed it pointer positions in document
//! coordinates and draw from the entity tables afterwards.

use crate::document::Document;
use crate::geometry::snap_point;
use crate::history::History;
use crate::selection::{SceneRef, Selection};
use crate::shapes::{Color, ConnectorId, ShapeId, ShapeKind, SymbolKind};
use crate::storage::{self, StorageError};
use crate::svg;
use kurbo::{Point, Rect};
use std::path::Path;

/// Half-size of the square hit area around a resize handle.
pub const HANDLE_HIT_RADIUS: f64 = 6.0;

/// Hit tolerance around a connector's line segment.
pub const CONNECTOR_HIT_TOLERANCE: f64 = 4.0;

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Rect,
    Ellipse,
    Symbol(SymbolKind),
    Connector,
    Text,
}

/// One of the eight compass resize handles on a selected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::West,
        Handle::East,
        Handle::SouthWest,
        Handle::South,
        Handle::SouthEast,
    ];

    fn west(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::West | Handle::SouthWest)
    }

    fn east(self) -> bool {
        matches!(self, Handle::NorthEast | Handle::East | Handle::SouthEast)
    }

    fn north(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::North | Handle::NorthEast)
    }

    fn south(self) -> bool {
        matches!(self, Handle::SouthWest | Handle::South | Handle::SouthEast)
    }

    /// Position of this handle on the boundary of `bounds`.
    pub fn position(self, bounds: Rect) -> Point {
        let x = if self.west() {
            bounds.x0
        } else if self.east() {
            bounds.x1
        } else {
            (bounds.x0 + bounds.x1) / 2.0
        };
        let y = if self.north() {
            bounds.y0
        } else if self.south() {
            bounds.y1
        } else {
            (bounds.y0 + bounds.y1) / 2.0
        };
        Point::new(x, y)
    }
}

/// In-flight pointer gesture state.
#[derive(Debug, Clone, PartialEq)]
pub enum Drag {
    /// Dragging out a new shape from its snapped origin corner.
    Creating { id: ShapeId, start: Point },
    /// Translating the selected shapes; `last` is the previous snapped
    /// pointer position.
    Moving { ids: Vec<ShapeId>, last: Point },
    /// Resizing one shape from `orig` via a handle.
    Resizing {
        id: ShapeId,
        handle: Handle,
        orig: Rect,
    },
    /// Rubber-banding a connector from a source shape.
    Connecting { src: ShapeId, current: Point },
    /// Rubber-band selection rectangle.
    Marquee { start: Point, current: Point },
}

/// Host-provided modal input. The engine never blocks on input itself; it
/// asks the host and treats `None` as cancel.
pub trait HostPrompts {
    fn prompt_text(&mut self, current: &str) -> Option<String>;
    fn prompt_color(&mut self, current: Color) -> Option<Color>;
    fn prompt_width(&mut self, current: u8) -> Option<u8>;
}

/// Editing session: document, selection, history, and gesture state.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    selection: Selection,
    history: History,
    tool: Tool,
    drag: Option<Drag>,
    viewport: Option<Rect>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        let document = Document::new();
        let baseline = document.to_json().unwrap_or_else(|_| String::from("{}"));
        Self {
            document,
            selection: Selection::new(),
            history: History::new(baseline),
            tool: Tool::Select,
            drag: None,
            viewport: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. Abandons any gesture in flight.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.drag = None;
    }

    /// Restrict pointer input to a rectangle in document coordinates.
    /// Pointer-down events outside it are ignored.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    // ---- pointer state machine ----

    pub fn pointer_down(&mut self, p: Point, additive: bool, host: &mut dyn HostPrompts) {
        if let Some(v) = self.viewport {
            let inside = p.x >= v.x0 && p.x <= v.x1 && p.y >= v.y0 && p.y <= v.y1;
            if !inside {
                return;
            }
        }
        match self.tool {
            Tool::Select => self.pointer_down_select(p, additive),
            Tool::Rect => self.start_create(ShapeKind::Rect, None, p),
            Tool::Ellipse => self.start_create(ShapeKind::Ellipse, None, p),
            Tool::Symbol(kind) => self.start_create(ShapeKind::Symbol, Some(kind), p),
            Tool::Connector => {
                if let Some(src) = self.document.shape_at(p) {
                    self.drag = Some(Drag::Connecting { src, current: p });
                }
            }
            Tool::Text => {
                if let Some(id) = self.document.shape_at(p) {
                    self.selection.select(SceneRef::Shape(id));
                    self.edit_text(id, host);
                }
            }
        }
    }

    fn pointer_down_select(&mut self, p: Point, additive: bool) {
        // Resize handles win over everything, but only with a single
        // selected shape.
        if let Some(id) = self.selection.only_shape() {
            if let Some(shape) = self.document.shape(id) {
                let bounds = shape.bounds();
                for handle in Handle::ALL {
                    let pos = handle.position(bounds);
                    if (p.x - pos.x).abs() <= HANDLE_HIT_RADIUS
                        && (p.y - pos.y).abs() <= HANDLE_HIT_RADIUS
                    {
                        self.drag = Some(Drag::Resizing {
                            id,
                            handle,
                            orig: bounds,
                        });
                        return;
                    }
                }
            }
        }
        if let Some(id) = self.document.shape_at(p) {
            let item = SceneRef::Shape(id);
            if additive {
                self.selection.toggle(item);
            } else if !self.selection.contains(item) {
                self.selection.select(item);
            }
            if self.selection.contains(item) {
                self.drag = Some(Drag::Moving {
                    ids: self.selection.shape_ids(),
                    last: self.snap(p),
                });
            }
            return;
        }
        if let Some(id) = self.document.connector_at(p, CONNECTOR_HIT_TOLERANCE) {
            let item = SceneRef::Connector(id);
            if additive {
                self.selection.toggle(item);
            } else {
                self.selection.select(item);
            }
            return;
        }
        if !additive {
            self.selection.clear();
        }
        self.drag = Some(Drag::Marquee {
            start: p,
            current: p,
        });
    }

    fn start_create(&mut self, kind: ShapeKind, symbol: Option<SymbolKind>, p: Point) {
        let sp = self.snap(p);
        let id = self.document.create_shape(kind, symbol, sp.x, sp.y, 1.0, 1.0);
        self.selection.select(SceneRef::Shape(id));
        self.drag = Some(Drag::Creating { id, start: sp });
    }

    pub fn pointer_move(&mut self, p: Point) {
        match &mut self.drag {
            Some(Drag::Creating { id, start }) => {
                let (id, start) = (*id, *start);
                let sp = self.snap(p);
                let x = start.x.min(sp.x);
                let y = start.y.min(sp.y);
                let w = (sp.x - start.x).abs();
                let h = (sp.y - start.y).abs();
                self.document.update_shape_geometry(id, x, y, w, h);
            }
            Some(Drag::Moving { ids, last }) => {
                let sp = snap_point(
                    p,
                    self.document.settings.grid_size,
                    self.document.settings.snap_to_grid,
                );
                let dx = sp.x - last.x;
                let dy = sp.y - last.y;
                *last = sp;
                let ids = ids.clone();
                for id in ids {
                    if let Some(s) = self.document.shape(id) {
                        let (x, y, w, h) = (s.x + dx, s.y + dy, s.w, s.h);
                        self.document.update_shape_geometry(id, x, y, w, h);
                    }
                }
            }
            Some(Drag::Resizing { id, handle, orig }) => {
                let (id, handle, orig) = (*id, *handle, *orig);
                let sp = self.snap(p);
                let mut x = orig.x0;
                let mut w = orig.width();
                if handle.east() {
                    w = sp.x - orig.x0;
                } else if handle.west() {
                    x = sp.x.min(orig.x1 - 1.0);
                    w = orig.x1 - x;
                }
                let mut y = orig.y0;
                let mut h = orig.height();
                if handle.south() {
                    h = sp.y - orig.y0;
                } else if handle.north() {
                    y = sp.y.min(orig.y1 - 1.0);
                    h = orig.y1 - y;
                }
                self.document.update_shape_geometry(id, x, y, w, h);
            }
            Some(Drag::Connecting { current, .. }) => *current = p,
            Some(Drag::Marquee { current, .. }) => *current = p,
            None => {}
        }
    }

    pub fn pointer_up(&mut self, p: Point, additive: bool) {
        match self.drag.take() {
            Some(Drag::Creating { .. } | Drag::Moving { .. } | Drag::Resizing { .. }) => {
                self.record();
            }
            Some(Drag::Connecting { src, .. }) => {
                if let Some(dst) = self.document.shape_at(p) {
                    match self.document.create_connector(src, dst) {
                        Ok(id) => {
                            self.selection.select(SceneRef::Connector(id));
                            self.record();
                        }
                        Err(err) => log::debug!("connector not created: {err}"),
                    }
                }
            }
            Some(Drag::Marquee { start, .. }) => {
                let rect = Rect::from_points(start, p);
                if !additive {
                    self.selection.clear();
                }
                for item in self.document.refs_within(rect) {
                    self.selection.add(item);
                }
            }
            None => {}
        }
    }

    /// Double-click edits the text of the shape under the pointer,
    /// regardless of the active tool.
    pub fn double_click(&mut self, p: Point, host: &mut dyn HostPrompts) {
        if let Some(id) = self.document.shape_at(p) {
            self.selection.select(SceneRef::Shape(id));
            self.edit_text(id, host);
        }
    }

    fn edit_text(&mut self, id: ShapeId, host: &mut dyn HostPrompts) {
        let current = self
            .document
            .shape(id)
            .map(|s| s.text.clone())
            .unwrap_or_default();
        if let Some(text) = host.prompt_text(&current) {
            self.document.set_text(id, text);
            self.record();
        }
    }

    // ---- style commands ----

    /// Prompt for a fill color, then apply it to the default and every
    /// selected shape.
    pub fn apply_fill(&mut self, host: &mut dyn HostPrompts) {
        let Some(color) = host.prompt_color(self.document.settings.default_fill) else {
            return;
        };
        self.document.settings.default_fill = color;
        for id in self.selection.shape_ids() {
            self.document.update_shape_style(id, Some(color), None, None);
        }
        self.record();
    }

    /// Prompt for an outline color, applied to the default, selected shapes,
    /// and selected connectors.
    pub fn apply_outline(&mut self, host: &mut dyn HostPrompts) {
        let Some(color) = host.prompt_color(self.document.settings.default_outline) else {
            return;
        };
        self.document.settings.default_outline = color;
        for id in self.selection.shape_ids() {
            self.document.update_shape_style(id, None, Some(color), None);
        }
        for id in self.selection.connector_ids() {
            self.document.update_connector_style(id, Some(color), None);
        }
        self.record();
    }

    /// Prompt for a stroke width, applied to the default, selected shapes,
    /// and selected connectors.
    pub fn apply_width(&mut self, host: &mut dyn HostPrompts) {
        let Some(width) = host.prompt_width(self.document.settings.default_width) else {
            return;
        };
        self.document.settings.default_width = width.clamp(
            crate::shapes::MIN_STROKE_WIDTH,
            crate::shapes::MAX_STROKE_WIDTH,
        );
        let width = self.document.settings.default_width;
        for id in self.selection.shape_ids() {
            self.document.update_shape_style(id, None, None, Some(width));
        }
        for id in self.selection.connector_ids() {
            self.document.update_connector_style(id, None, Some(width));
        }
        self.record();
    }

    /// Cycle the arrow mode of the selected connectors.
    pub fn cycle_arrows(&mut self) {
        use crate::shapes::ArrowMode;
        let ids: Vec<ConnectorId> = self.selection.connector_ids();
        if ids.is_empty() {
            return;
        }
        for id in ids {
            if let Some(c) = self.document.connector(id) {
                let next = match c.arrow {
                    ArrowMode::Forward => ArrowMode::Both,
                    ArrowMode::Both => ArrowMode::None,
                    ArrowMode::None => ArrowMode::Forward,
                };
                self.document.set_connector_arrow(id, next);
            }
        }
        self.record();
    }

    /// Delete everything selected. Connectors attached to deleted shapes go
    /// with them. No-op (and no history entry) for an empty selection.
    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.document
            .delete_connectors(&self.selection.connector_ids());
        self.document.delete_shapes(&self.selection.shape_ids());
        self.selection.clear();
        self.record();
    }

    // ---- history ----

    fn record(&mut self) {
        match self.document.to_json() {
            Ok(json) => self.history.record(json),
            Err(err) => log::error!("failed to snapshot document: {err}"),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().map(str::to_owned) else {
            return false;
        };
        self.restore(&snapshot)
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().map(str::to_owned) else {
            return false;
        };
        self.restore(&snapshot)
    }

    fn restore(&mut self, snapshot: &str) -> bool {
        match Document::from_json(snapshot) {
            Ok(doc) => {
                self.document = doc;
                self.selection.clear();
                self.drag = None;
                true
            }
            Err(err) => {
                log::error!("failed to restore snapshot: {err}");
                false
            }
        }
    }

    // ---- document lifecycle ----

    /// Discard all content and start over with a fresh history baseline.
    /// Style defaults and grid settings survive.
    pub fn new_document(&mut self) {
        self.document.clear();
        self.selection.clear();
        self.drag = None;
        let baseline = self.document.to_json().unwrap_or_else(|_| String::from("{}"));
        self.history = History::new(baseline);
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StorageError> {
        storage::save(&self.document, path)
    }

    /// Replace the document with one loaded from disk. The load lands as a
    /// history entry, so it can be undone back to the previous state.
    pub fn load_from(&mut self, path: &Path) -> Result<(), StorageError> {
        let document = storage::load(path)?;
        self.document = document;
        self.selection.clear();
        self.drag = None;
        self.record();
        Ok(())
    }

    pub fn export_svg(&self) -> String {
        svg::export(&self.document)
    }

    // ---- grid ----

    pub fn toggle_snap(&mut self) {
        self.document.settings.snap_to_grid = !self.document.settings.snap_to_grid;
    }

    pub fn toggle_grid(&mut self) {
        self.document.settings.show_grid = !self.document.settings.show_grid;
    }

    pub fn set_grid_size(&mut self, size: f64) {
        if size > 0.0 {
            self.document.settings.grid_size = size;
        }
    }

    fn snap(&self, p: Point) -> Point {
        snap_point(
            p,
            self.document.settings.grid_size,
            self.document.settings.snap_to_grid,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ArrowMode;

    struct FakeHost {
        text: Option<String>,
        color: Option<Color>,
        width: Option<u8>,
    }

    impl FakeHost {
        fn cancel_all() -> Self {
            Self {
                text: None,
                color: None,
                width: None,
            }
        }
    }

    impl HostPrompts for FakeHost {
        fn prompt_text(&mut self, _current: &str) -> Option<String> {
            self.text.clone()
        }

        fn prompt_color(&mut self, _current: Color) -> Option<Color> {
            self.color
        }

        fn prompt_width(&mut self, _current: u8) -> Option<u8> {
            self.width
        }
    }

    fn drag_rect(editor: &mut Editor, from: Point, to: Point) {
        let mut host = FakeHost::cancel_all();
        editor.set_tool(Tool::Rect);
        editor.pointer_down(from, false, &mut host);
        editor.pointer_move(to);
        editor.pointer_up(to, false);
        editor.set_tool(Tool::Select);
    }

    #[test]
    fn create_drag_snaps_to_grid() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(23.0, 18.0), Point::new(101.0, 61.0));
        assert_eq!(editor.document().shape_count(), 1);
        let shape = editor.document().shapes().next().unwrap();
        assert_eq!((shape.x, shape.y, shape.w, shape.h), (20.0, 20.0, 80.0, 40.0));
        // New shape is selected.
        assert!(editor.selection().contains(SceneRef::Shape(shape.id)));
    }

    #[test]
    fn zero_extent_create_clamps_to_one() {
        let mut editor = Editor::new();
        let mut host = FakeHost::cancel_all();
        editor.set_tool(Tool::Rect);
        editor.pointer_down(Point::new(40.0, 40.0), false, &mut host);
        editor.pointer_up(Point::new(40.0, 40.0), false);
        let shape = editor.document().shapes().next().unwrap();
        assert_eq!((shape.w, shape.h), (1.0, 1.0));
    }

    #[test]
    fn move_translates_selected_shapes() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let id = editor.document().shapes().next().unwrap().id;
        let mut host = FakeHost::cancel_all();
        editor.pointer_down(Point::new(20.0, 20.0), false, &mut host);
        editor.pointer_move(Point::new(60.0, 20.0));
        editor.pointer_up(Point::new(60.0, 20.0), false);
        let shape = editor.document().shape(id).unwrap();
        assert_eq!((shape.x, shape.y), (40.0, 0.0));
    }

    #[test]
    fn resize_from_east_handle() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let id = editor.document().shapes().next().unwrap().id;
        let mut host = FakeHost::cancel_all();
        // East handle sits at (40, 20).
        editor.pointer_down(Point::new(41.0, 21.0), false, &mut host);
        assert!(matches!(editor.drag(), Some(Drag::Resizing { .. })));
        editor.pointer_move(Point::new(100.0, 20.0));
        editor.pointer_up(Point::new(100.0, 20.0), false);
        let shape = editor.document().shape(id).unwrap();
        assert_eq!((shape.x, shape.w, shape.h), (0.0, 100.0, 40.0));
    }

    #[test]
    fn resize_never_inverts() {
        let mut editor = Editor::new();
        editor.toggle_snap();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let id = editor.document().shapes().next().unwrap().id;
        let mut host = FakeHost::cancel_all();
        editor.pointer_down(Point::new(0.0, 20.0), false, &mut host);
        // Drag the west handle far past the east edge.
        editor.pointer_move(Point::new(500.0, 20.0));
        editor.pointer_up(Point::new(500.0, 20.0), false);
        let shape = editor.document().shape(id).unwrap();
        assert!(shape.w >= 1.0);
        assert!(shape.h >= 1.0);
    }

    #[test]
    fn connector_tool_links_two_shapes() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        drag_rect(&mut editor, Point::new(200.0, 0.0), Point::new(240.0, 40.0));
        let mut host = FakeHost::cancel_all();
        editor.set_tool(Tool::Connector);
        editor.pointer_down(Point::new(20.0, 20.0), false, &mut host);
        editor.pointer_up(Point::new(220.0, 20.0), false);
        assert_eq!(editor.document().connector_count(), 1);
        let conn = editor.document().connectors().next().unwrap();
        assert_eq!(conn.arrow, ArrowMode::Forward);
        assert!(editor.selection().contains(SceneRef::Connector(conn.id)));
    }

    #[test]
    fn connector_to_same_shape_is_rejected() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let mut host = FakeHost::cancel_all();
        editor.set_tool(Tool::Connector);
        editor.pointer_down(Point::new(10.0, 10.0), false, &mut host);
        editor.pointer_up(Point::new(30.0, 30.0), false);
        assert_eq!(editor.document().connector_count(), 0);
    }

    #[test]
    fn marquee_selects_contained_entities() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(20.0, 20.0), Point::new(60.0, 60.0));
        drag_rect(&mut editor, Point::new(300.0, 20.0), Point::new(340.0, 60.0));
        let inside = editor.document().shapes().next().unwrap().id;
        let mut host = FakeHost::cancel_all();
        editor.pointer_down(Point::new(500.0, 500.0), false, &mut host);
        assert!(matches!(editor.drag(), Some(Drag::Marquee { .. })));
        editor.pointer_up(Point::new(400.0, 400.0), false);
        assert!(editor.selection().is_empty());

        // Now a marquee over the first shape only.
        editor.pointer_down(Point::new(0.0, 0.0), false, &mut host);
        editor.pointer_up(Point::new(200.0, 200.0), false);
        assert_eq!(editor.selection().shape_ids(), vec![inside]);
    }

    #[test]
    fn additive_marquee_extends_selection() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(20.0, 20.0), Point::new(60.0, 60.0));
        drag_rect(&mut editor, Point::new(300.0, 300.0), Point::new(340.0, 340.0));
        let ids: Vec<ShapeId> = editor.document().shapes().map(|s| s.id).collect();
        let mut host = FakeHost::cancel_all();
        editor.pointer_down(Point::new(0.0, 0.0), false, &mut host);
        editor.pointer_up(Point::new(100.0, 100.0), false);
        editor.pointer_down(Point::new(280.0, 280.0), true, &mut host);
        editor.pointer_up(Point::new(360.0, 360.0), true);
        assert_eq!(editor.selection().shape_ids(), ids);
    }

    #[test]
    fn undo_redo_create() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        assert!(editor.can_undo());
        assert!(editor.undo());
        assert_eq!(editor.document().shape_count(), 0);
        assert!(editor.selection().is_empty());
        assert!(editor.redo());
        assert_eq!(editor.document().shape_count(), 1);
    }

    #[test]
    fn new_edit_after_undo_drops_redo() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        editor.undo();
        drag_rect(&mut editor, Point::new(100.0, 100.0), Point::new(140.0, 140.0));
        assert!(!editor.can_redo());
        assert!(!editor.redo());
    }

    #[test]
    fn delete_selection_cascades() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        drag_rect(&mut editor, Point::new(200.0, 0.0), Point::new(240.0, 40.0));
        let mut host = FakeHost::cancel_all();
        editor.set_tool(Tool::Connector);
        editor.pointer_down(Point::new(20.0, 20.0), false, &mut host);
        editor.pointer_up(Point::new(220.0, 20.0), false);
        editor.set_tool(Tool::Select);
        editor.pointer_down(Point::new(20.0, 20.0), false, &mut host);
        editor.pointer_up(Point::new(20.0, 20.0), false);
        editor.delete_selection();
        assert_eq!(editor.document().shape_count(), 1);
        assert_eq!(editor.document().connector_count(), 0);

        // Deleting nothing records nothing.
        let undos_before = editor.can_undo();
        editor.delete_selection();
        assert_eq!(editor.can_undo(), undos_before);
    }

    #[test]
    fn apply_fill_updates_default_and_selection() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let id = editor.document().shapes().next().unwrap().id;
        let red = Color::new(0xFF, 0x00, 0x00);
        let mut host = FakeHost {
            text: None,
            color: Some(red),
            width: None,
        };
        editor.apply_fill(&mut host);
        assert_eq!(editor.document().settings.default_fill, red);
        assert_eq!(editor.document().shape(id).unwrap().fill, red);
        // Cancelled prompt changes nothing.
        let mut cancel = FakeHost::cancel_all();
        editor.apply_fill(&mut cancel);
        assert_eq!(editor.document().settings.default_fill, red);
    }

    #[test]
    fn text_prompt_sets_label() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let id = editor.document().shapes().next().unwrap().id;
        let mut host = FakeHost {
            text: Some("P-101".into()),
            color: None,
            width: None,
        };
        editor.double_click(Point::new(20.0, 20.0), &mut host);
        assert_eq!(editor.document().shape(id).unwrap().text, "P-101");
        assert!(editor.undo());
        assert_eq!(editor.document().shape(id).unwrap().text, "");
    }

    #[test]
    fn pointer_down_outside_viewport_is_ignored() {
        let mut editor = Editor::new();
        editor.set_viewport(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let mut host = FakeHost::cancel_all();
        editor.set_tool(Tool::Rect);
        editor.pointer_down(Point::new(150.0, 50.0), false, &mut host);
        assert!(editor.drag().is_none());
        assert_eq!(editor.document().shape_count(), 0);
    }

    #[test]
    fn cycle_arrows_walks_modes() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        drag_rect(&mut editor, Point::new(200.0, 0.0), Point::new(240.0, 40.0));
        let mut host = FakeHost::cancel_all();
        editor.set_tool(Tool::Connector);
        editor.pointer_down(Point::new(20.0, 20.0), false, &mut host);
        editor.pointer_up(Point::new(220.0, 20.0), false);
        let id = editor.document().connectors().next().unwrap().id;
        editor.cycle_arrows();
        assert_eq!(editor.document().connector(id).unwrap().arrow, ArrowMode::Both);
        editor.cycle_arrows();
        assert_eq!(editor.document().connector(id).unwrap().arrow, ArrowMode::None);
        editor.cycle_arrows();
        assert_eq!(editor.document().connector(id).unwrap().arrow, ArrowMode::Forward);
    }

    #[test]
    fn new_document_keeps_settings_and_resets_history() {
        let mut editor = Editor::new();
        drag_rect(&mut editor, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        editor.toggle_snap();
        editor.new_document();
        assert!(editor.document().is_empty());
        assert!(!editor.document().settings.snap_to_grid);
        assert!(!editor.can_undo());
    }
}
