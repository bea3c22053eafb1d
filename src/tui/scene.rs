//! World-to-terminal projection and diff rendering.
//!
//! The scene owns a character-cell picture of the graph: edges rasterized
//! with box-drawing glyphs, node glyphs and labels on top, resolved by
//! z-order. It keeps the previous frame's cell buffer and reports only the
//! cells that changed, so an idle session emits nothing.

use ratatui::style::Color;

use crate::graph::model::{Graph, Node, NodeId, Point};

pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 4.0;
pub const DEFAULT_ZOOM: f32 = 1.0;

const EDGE_COLOR: Color = Color::DarkGray;
const EDGE_SELECTED_COLOR: Color = Color::Yellow;
const NODE_COLOR: Color = Color::White;
const NODE_HIGHLIGHTED_COLOR: Color = Color::Cyan;
const NODE_SELECTED_COLOR: Color = Color::Yellow;
const PREVIEW_COLOR: Color = Color::Green;
const LABEL_COLOR: Color = Color::Gray;

/// The window from world space onto the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// World position projected onto cell (0, 0).
    pub origin: Point,
    /// Cells per world unit (> 0).
    pub scale: f32,
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    /// A viewport of the given grid size with the world origin at its center.
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut vp = Self {
            origin: Point::default(),
            scale: DEFAULT_ZOOM,
            cols,
            rows,
        };
        vp.center_on(Point::default());
        vp
    }

    pub fn center(&self) -> Point {
        self.unproject(self.cols as i32 / 2, self.rows as i32 / 2)
    }

    pub fn center_on(&mut self, world: Point) {
        self.origin = Point::new(
            world.x - (self.cols as f32 / 2.0) / self.scale,
            world.y - (self.rows as f32 / 2.0) / self.scale,
        );
    }

    /// Project a world position to a grid cell, unclipped. May be negative
    /// or past the grid for off-screen positions.
    pub fn project_raw(&self, p: Point) -> (i32, i32) {
        (
            ((p.x - self.origin.x) * self.scale).round() as i32,
            ((p.y - self.origin.y) * self.scale).round() as i32,
        )
    }

    /// Project a world position, clipped to the grid bounds.
    pub fn project(&self, p: Point) -> Option<(u16, u16)> {
        let (col, row) = self.project_raw(p);
        self.in_bounds(col, row).then_some((col as u16, row as u16))
    }

    /// The world position of a cell's center.
    pub fn unproject(&self, col: i32, row: i32) -> Point {
        Point::new(
            self.origin.x + col as f32 / self.scale,
            self.origin.y + row as f32 / self.scale,
        )
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32
    }

    /// Pan by whole cells (converted to world units at the current zoom).
    pub fn pan_cells(&mut self, dx: i32, dy: i32) {
        self.origin.x += dx as f32 / self.scale;
        self.origin.y += dy as f32 / self.scale;
    }

    /// Multiply the zoom scale, clamped, keeping the view center fixed.
    pub fn zoom_by(&mut self, factor: f32) {
        let center = self.center();
        self.scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.center_on(center);
    }

    /// Replace the grid dimensions (terminal resize), keeping the view
    /// center fixed.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let center = self.center();
        self.cols = cols;
        self.rows = rows;
        self.center_on(center);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        color: Color::Reset,
    };
}

/// One changed cell between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub col: u16,
    pub row: u16,
    pub cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBuffer {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn get(&self, col: u16, row: u16) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols as usize + col as usize])
    }

    /// Write a cell; out-of-bounds writes are dropped.
    pub fn set(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.cols as usize + col as usize] = Cell { ch, color };
    }

    /// Cells in `self` that differ from `prev`. A dimension change is a full
    /// emit, as is `prev = None`.
    pub fn diff(&self, prev: Option<&CellBuffer>) -> Vec<CellUpdate> {
        let mut updates = Vec::new();
        let comparable = prev.filter(|p| p.cols == self.cols && p.rows == self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.cells[row as usize * self.cols as usize + col as usize];
                let same = comparable
                    .map(|p| p.cells[row as usize * p.cols as usize + col as usize] == cell)
                    .unwrap_or(false);
                if !same {
                    updates.push(CellUpdate { col, row, cell });
                }
            }
        }
        updates
    }
}

/// An in-progress edge drag: preview line from the source node to the
/// pointer cell.
#[derive(Debug, Clone, Copy)]
pub struct DragPreview {
    pub source: NodeId,
    pub pointer: (u16, u16),
}

#[derive(Debug, Default)]
pub struct Scene {
    prev: Option<CellBuffer>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame so the next render emits every cell.
    /// Called on terminal resize.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn buffer(&self) -> Option<&CellBuffer> {
        self.prev.as_ref()
    }

    /// Rasterize the graph and return the cells that changed since the last
    /// render. An unchanged scene yields an empty diff.
    pub fn render(
        &mut self,
        graph: &Graph,
        viewport: &Viewport,
        preview: Option<DragPreview>,
    ) -> Vec<CellUpdate> {
        let mut buf = CellBuffer::new(viewport.cols, viewport.rows);

        let mut edges: Vec<_> = graph.edges().collect();
        edges.sort_by_key(|e| e.id);
        for edge in edges {
            let (Some(a), Some(b)) = (graph.node(edge.a), graph.node(edge.b)) else {
                continue;
            };
            let from = viewport.project_raw(a.pos);
            let to = viewport.project_raw(b.pos);
            let color = if edge.selected {
                EDGE_SELECTED_COLOR
            } else {
                EDGE_COLOR
            };
            draw_line(&mut buf, from, to, color);
            if graph.directed() {
                draw_arrow_head(&mut buf, from, to, color);
            }
        }

        if let Some(p) = preview
            && let Some(source) = graph.node(p.source)
        {
            let from = viewport.project_raw(source.pos);
            let to = (p.pointer.0 as i32, p.pointer.1 as i32);
            draw_line(&mut buf, from, to, PREVIEW_COLOR);
        }

        // Node glyph cells, used to elide labels that would collide.
        let glyph_cells: Vec<(i32, i32)> = graph
            .nodes()
            .map(|n| viewport.project_raw(n.pos))
            .collect();

        // Z-order: selected > highlighted > default. Higher z draws last
        // and wins overlaps.
        let mut nodes: Vec<&Node> = graph.nodes().collect();
        nodes.sort_by_key(|n| (node_z(n), n.id));
        for node in nodes {
            draw_node(&mut buf, viewport, node, &glyph_cells);
        }

        let updates = buf.diff(self.prev.as_ref());
        self.prev = Some(buf);
        updates
    }
}

fn node_z(node: &Node) -> u8 {
    if node.selected {
        2
    } else if node.highlighted {
        1
    } else {
        0
    }
}

fn node_glyph(node: &Node) -> char {
    if node.pinned { '■' } else { '●' }
}

fn node_color(node: &Node) -> Color {
    if node.selected {
        NODE_SELECTED_COLOR
    } else if node.highlighted {
        NODE_HIGHLIGHTED_COLOR
    } else {
        NODE_COLOR
    }
}

fn draw_node(buf: &mut CellBuffer, viewport: &Viewport, node: &Node, glyph_cells: &[(i32, i32)]) {
    let (col, row) = viewport.project_raw(node.pos);
    let color = node_color(node);
    buf.set(col, row, node_glyph(node), color);

    if node.label.is_empty() {
        return;
    }
    // Label centered under the node, elided where it would run into another
    // node's glyph cell.
    let label_row = row + 1;
    let len = node.label.chars().count() as i32;
    let start = col - len / 2;
    let mut written = 0;
    for (i, ch) in node.label.chars().enumerate() {
        let at = start + i as i32;
        let collides = glyph_cells
            .iter()
            .any(|&(gc, gr)| gr == label_row && gc == at && (gc, gr) != (col, row));
        if collides {
            if written > 0 {
                buf.set(at - 1, label_row, '…', LABEL_COLOR);
            }
            return;
        }
        buf.set(at, label_row, ch, LABEL_COLOR);
        written += 1;
    }
}

/// Bresenham walk from `from` to `to`, choosing a box-drawing glyph from
/// each step's direction. Node glyphs are drawn afterwards, so the line may
/// pass under them.
fn draw_line(buf: &mut CellBuffer, from: (i32, i32), to: (i32, i32), color: Color) {
    let (x1, y1) = from;
    let (x2, y2) = to;
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (x1, y1);

    loop {
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        let mut stepped_x = false;
        let mut stepped_y = false;
        if e2 > -dy {
            err -= dy;
            x += sx;
            stepped_x = true;
        }
        if e2 < dx {
            err += dx;
            y += sy;
            stepped_y = true;
        }
        if x == x2 && y == y2 {
            break;
        }
        let ch = match (stepped_x, stepped_y) {
            (true, false) => '─',
            (false, true) => '│',
            // Terminal rows grow downward, so equal signs slope like '╲'.
            _ => {
                if sx == sy {
                    '╲'
                } else {
                    '╱'
                }
            }
        };
        buf.set(x, y, ch, color);
    }
}

/// Head marker one raster step before the target of a directed edge.
fn draw_arrow_head(buf: &mut CellBuffer, from: (i32, i32), to: (i32, i32), color: Color) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    if dx == 0 && dy == 0 {
        return;
    }
    let (col, row, ch) = if dx.abs() >= dy.abs() {
        (to.0 - dx.signum(), to.1, if dx > 0 { '▶' } else { '◀' })
    } else {
        (to.0, to.1 - dy.signum(), if dy > 0 { '▼' } else { '▲' })
    };
    buf.set(col, row, ch, color);
}

/// The node whose glyph sits at (or immediately around) the given cell.
/// Exact hits win; otherwise the nearest node within one cell.
pub fn node_at(graph: &Graph, viewport: &Viewport, col: u16, row: u16) -> Option<NodeId> {
    let target = (col as i32, row as i32);
    let mut near: Option<(i32, NodeId)> = None;
    for node in graph.nodes() {
        let cell = viewport.project_raw(node.pos);
        if cell == target {
            return Some(node.id);
        }
        let dist = (cell.0 - target.0).abs().max((cell.1 - target.1).abs());
        if dist <= 1 {
            let better = match near {
                Some((best, _)) => dist < best,
                None => true,
            };
            if better {
                near = Some((dist, node.id));
            }
        }
    }
    near.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_graph() -> (Graph, NodeId, NodeId) {
        let mut g = Graph::new(false);
        let a = g.add_node("A");
        let b = g.add_node("B");
        g.node_mut(a).unwrap().pos = Point::new(-5.0, 0.0);
        g.node_mut(b).unwrap().pos = Point::new(5.0, 0.0);
        g.add_edge(a, b, None).unwrap();
        (g, a, b)
    }

    #[test]
    fn projection_round_trip_stays_within_one_cell() {
        let cases = [
            (Point::new(0.0, 0.0), 1.0),
            (Point::new(13.7, -4.2), 0.5),
            (Point::new(-100.25, 33.33), 2.0),
            (Point::new(7.01, 7.99), 4.0),
        ];
        for (origin, scale) in cases {
            let vp = Viewport {
                origin,
                scale,
                cols: 80,
                rows: 24,
            };
            for world in [
                Point::new(origin.x + 3.3, origin.y + 5.7),
                Point::new(origin.x + 20.0 / scale, origin.y + 10.0 / scale),
            ] {
                let (col, row) = vp.project_raw(world);
                let back = vp.unproject(col, row);
                let cell_width = 1.0 / scale;
                assert!(
                    (back.x - world.x).abs() <= cell_width && (back.y - world.y).abs() <= cell_width,
                    "round trip drifted: {world:?} -> ({col},{row}) -> {back:?} at scale {scale}"
                );
            }
        }
    }

    #[test]
    fn project_clips_to_grid_bounds() {
        let vp = Viewport::new(20, 10);
        assert!(vp.project(vp.center()).is_some());
        let far = Point::new(vp.origin.x - 50.0, vp.origin.y);
        assert_eq!(vp.project(far), None);
    }

    #[test]
    fn unchanged_scene_produces_empty_diff() {
        let (g, _, _) = fixed_graph();
        let vp = Viewport::new(60, 20);
        let mut scene = Scene::new();

        let first = scene.render(&g, &vp, None);
        assert!(!first.is_empty(), "first frame emits the full scene");
        let second = scene.render(&g, &vp, None);
        assert!(second.is_empty(), "no change must mean no emitted cells");
    }

    #[test]
    fn selection_change_produces_nonempty_diff() {
        let (mut g, a, _) = fixed_graph();
        let vp = Viewport::new(60, 20);
        let mut scene = Scene::new();
        scene.render(&g, &vp, None);

        g.select_only(a).unwrap();
        let updates = scene.render(&g, &vp, None);
        assert!(!updates.is_empty());
    }

    #[test]
    fn viewport_pan_produces_nonempty_diff() {
        let (g, _, _) = fixed_graph();
        let mut vp = Viewport::new(60, 20);
        let mut scene = Scene::new();
        scene.render(&g, &vp, None);

        vp.pan_cells(2, 0);
        let updates = scene.render(&g, &vp, None);
        assert!(!updates.is_empty());
    }

    #[test]
    fn invalidate_forces_full_emit() {
        let (g, _, _) = fixed_graph();
        let vp = Viewport::new(30, 10);
        let mut scene = Scene::new();
        scene.render(&g, &vp, None);

        scene.invalidate();
        let updates = scene.render(&g, &vp, None);
        assert_eq!(updates.len(), 30 * 10, "resize redraws every cell");
    }

    #[test]
    fn horizontal_edge_rasterizes_with_horizontal_glyphs() {
        let (g, a, b) = fixed_graph();
        let vp = Viewport::new(60, 20);
        let mut scene = Scene::new();
        scene.render(&g, &vp, None);
        let buf = scene.buffer().unwrap();

        let (ca, row) = vp.project_raw(g.node(a).unwrap().pos);
        let (cb, _) = vp.project_raw(g.node(b).unwrap().pos);
        let mut dashes = 0;
        for col in (ca + 1)..cb {
            if buf.get(col as u16, row as u16).map(|c| c.ch) == Some('─') {
                dashes += 1;
            }
        }
        assert!(dashes > 0, "expected box-drawing dashes between endpoints");
    }

    #[test]
    fn label_elides_at_another_nodes_glyph() {
        let mut g = Graph::new(false);
        let a = g.add_node("stretchy-label");
        let b = g.add_node("");
        g.node_mut(a).unwrap().pos = Point::new(0.0, 0.0);
        // Directly in the label row of `a`, a few cells right of center.
        g.node_mut(b).unwrap().pos = Point::new(4.0, 1.0);

        let mut vp = Viewport::new(40, 12);
        vp.center_on(Point::new(0.0, 0.0));
        let mut scene = Scene::new();
        scene.render(&g, &vp, None);
        let buf = scene.buffer().unwrap();

        let found_ellipsis = (0..buf.rows())
            .any(|r| (0..buf.cols()).any(|c| buf.get(c, r).map(|x| x.ch) == Some('…')));
        assert!(found_ellipsis, "label should elide at the blocking node");
    }

    #[test]
    fn node_at_hits_exact_and_adjacent_cells() {
        let (g, a, _) = fixed_graph();
        let vp = Viewport::new(60, 20);
        let (col, row) = vp.project_raw(g.node(a).unwrap().pos);
        let (col, row) = (col as u16, row as u16);

        assert_eq!(node_at(&g, &vp, col, row), Some(a));
        assert_eq!(node_at(&g, &vp, col + 1, row), Some(a));
        assert_eq!(node_at(&g, &vp, col + 10, row + 5), None);
    }

    #[test]
    fn zoom_is_clamped_and_keeps_center() {
        let mut vp = Viewport::new(60, 20);
        let center = vp.center();
        for _ in 0..40 {
            vp.zoom_by(1.5);
        }
        assert_eq!(vp.scale, MAX_ZOOM);
        assert!(vp.center().distance(&center) < 1.0);
        for _ in 0..80 {
            vp.zoom_by(0.5);
        }
        assert_eq!(vp.scale, MIN_ZOOM);
    }
}
