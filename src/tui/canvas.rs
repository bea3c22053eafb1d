use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tracing::{info, warn};

use crate::graph::model::{Graph, NodeId};
use crate::layout::{LayoutConfig, LayoutEngine};
use crate::parser::edgelist;
use crate::tui::input::{self, Action, Direction, Pointer};
use crate::tui::render::{self, ChromeData};
use crate::tui::scene::{self, CellUpdate, DragPreview, Scene, Viewport};

/// Render loop cap; also the layout tick cadence while input is idle.
const TICK: Duration = Duration::from_millis(33);
const PAN_STEP: i32 = 2;
const ZOOM_STEP: f32 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    NodeSelected,
    EdgeDrawing,
    Panning,
    Editing,
}

#[derive(Debug, Clone)]
enum PendingEdit {
    NewNode,
    RenameNode(NodeId),
}

#[derive(Debug, Clone)]
struct TextPrompt {
    title: String,
    buffer: String,
    cursor: usize,
    kind: PendingEdit,
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub file: Option<PathBuf>,
    pub demo: bool,
    pub directed: bool,
}

#[derive(Debug)]
struct AppState {
    graph: Graph,
    layout: LayoutEngine,
    viewport: Viewport,
    scene: Scene,
    mode: Mode,
    selected: Option<NodeId>,
    /// The press that began on the selected node; a drag from here starts
    /// edge drawing.
    pressed_on_selected: bool,
    pan_moved: bool,
    drag_last: (u16, u16),
    pointer: (u16, u16),
    prompt: Option<TextPrompt>,
    status_message: Option<String>,
    show_help: bool,
    scene_dirty: bool,
    chrome_dirty: bool,
    save_path: Option<PathBuf>,
}

impl AppState {
    fn load(opts: &SessionOptions) -> Result<Self> {
        let (graph, status) = if opts.demo {
            (
                demo_graph(opts.directed),
                "demo graph: changes are in-memory only".to_string(),
            )
        } else if let Some(path) = &opts.file {
            if path.exists() {
                let (graph, warnings) = edgelist::load(path, opts.directed)?;
                for w in &warnings {
                    warn!("{}: {w}", path.display());
                }
                let mut status = format!(
                    "loaded {} nodes, {} edges",
                    graph.node_count(),
                    graph.edge_count()
                );
                if !warnings.is_empty() {
                    status.push_str(&format!(" ({} lines skipped)", warnings.len()));
                }
                (graph, status)
            } else {
                (
                    Graph::new(opts.directed),
                    format!("new graph; [w] writes {}", path.display()),
                )
            }
        } else {
            (
                Graph::new(opts.directed),
                "empty graph; [n] adds a node".to_string(),
            )
        };

        let save_path = if opts.demo { None } else { opts.file.clone() };
        let mut app = Self::with_graph(graph, 80, 22);
        app.save_path = save_path;
        app.status_message = Some(status);
        app.layout.sync(&mut app.graph);
        Ok(app)
    }

    fn with_graph(graph: Graph, cols: u16, rows: u16) -> Self {
        Self {
            graph,
            layout: LayoutEngine::new(LayoutConfig::default()),
            viewport: Viewport::new(cols, rows),
            scene: Scene::new(),
            mode: Mode::Idle,
            selected: None,
            pressed_on_selected: false,
            pan_moved: false,
            drag_last: (0, 0),
            pointer: (0, 0),
            prompt: None,
            status_message: None,
            show_help: false,
            scene_dirty: true,
            chrome_dirty: true,
            save_path: None,
        }
    }

    fn mark_scene(&mut self) {
        self.scene_dirty = true;
    }

    fn mark_all(&mut self) {
        self.scene_dirty = true;
        self.chrome_dirty = true;
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.chrome_dirty = true;
    }

    fn clear_status(&mut self) {
        if self.status_message.take().is_some() {
            self.chrome_dirty = true;
        }
    }

    /// One bounded layout step per loop pass. A converged engine is free.
    fn layout_step(&mut self) {
        self.layout.sync(&mut self.graph);
        if !self.layout.converged() {
            self.layout.tick(&mut self.graph);
            self.mark_all();
        }
    }

    /// Match the viewport to the canvas region; a changed size is a resize
    /// and forces a full redraw.
    fn sync_viewport(&mut self, canvas: Rect) {
        if self.viewport.cols != canvas.width || self.viewport.rows != canvas.height {
            self.viewport.resize(canvas.width, canvas.height);
            self.scene.invalidate();
            self.mark_all();
        }
    }

    fn render_scene(&mut self) -> Vec<CellUpdate> {
        let preview = (self.mode == Mode::EdgeDrawing)
            .then(|| {
                self.selected.map(|source| DragPreview {
                    source,
                    pointer: self.pointer,
                })
            })
            .flatten();
        self.scene.render(&self.graph, &self.viewport, preview)
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.clear_status();
        let action = input::action_for_key(key, self.prompt.is_some());

        // The quit command is honored from every state, Editing included.
        if action == Action::Quit {
            return true;
        }

        if self.prompt.is_some() {
            self.handle_text_action(action);
            return false;
        }

        match action {
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                self.chrome_dirty = true;
                self.mark_scene();
            }
            Action::Pan(direction) => {
                let (dx, dy) = match direction {
                    Direction::Up => (0, -PAN_STEP),
                    Direction::Down => (0, PAN_STEP),
                    Direction::Left => (-PAN_STEP, 0),
                    Direction::Right => (PAN_STEP, 0),
                };
                self.viewport.pan_cells(dx, dy);
                self.mark_all();
            }
            Action::ZoomIn => {
                self.viewport.zoom_by(ZOOM_STEP);
                self.mark_all();
            }
            Action::ZoomOut => {
                self.viewport.zoom_by(1.0 / ZOOM_STEP);
                self.mark_all();
            }
            Action::CycleSelection => self.cycle_selection(),
            Action::AddNode => {
                self.prompt = Some(TextPrompt {
                    title: "New node label:".to_string(),
                    buffer: String::new(),
                    cursor: 0,
                    kind: PendingEdit::NewNode,
                });
                self.mode = Mode::Editing;
                self.mark_all();
            }
            Action::EditLabel => self.start_edit_label(),
            Action::DeleteNode => self.delete_selected_node(),
            Action::DeleteEdge => self.delete_edge_under_pointer(),
            Action::TogglePin => self.toggle_pin(),
            Action::Save => self.save(),
            Action::Cancel => {
                if self.selected.take().is_some() {
                    self.graph.clear_selection();
                    self.mark_scene();
                }
                if self.mode != Mode::Idle {
                    self.mode = Mode::Idle;
                    self.chrome_dirty = true;
                }
            }
            Action::Quit
            | Action::Noop
            | Action::SubmitText
            | Action::Backspace
            | Action::InputChar(_) => {}
        }
        false
    }

    fn handle_text_action(&mut self, action: Action) {
        match action {
            Action::SubmitText => {
                if let Some(prompt) = self.prompt.take() {
                    self.apply_text_prompt(prompt);
                }
            }
            Action::Cancel => {
                self.prompt = None;
                self.restore_mode_after_prompt();
                self.mark_all();
            }
            Action::Backspace => {
                if let Some(prompt) = &mut self.prompt
                    && prompt.cursor > 0
                {
                    let from = render::byte_index_for_cursor(&prompt.buffer, prompt.cursor - 1);
                    let to = render::byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                    prompt.buffer.replace_range(from..to, "");
                    prompt.cursor -= 1;
                    self.chrome_dirty = true;
                }
            }
            Action::InputChar(c) => {
                if let Some(prompt) = &mut self.prompt {
                    let at = render::byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                    prompt.buffer.insert(at, c);
                    prompt.cursor += 1;
                    self.chrome_dirty = true;
                }
            }
            Action::Pan(Direction::Left) => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.cursor = prompt.cursor.saturating_sub(1);
                    self.chrome_dirty = true;
                }
            }
            Action::Pan(Direction::Right) => {
                if let Some(prompt) = &mut self.prompt {
                    let max = prompt.buffer.chars().count();
                    prompt.cursor = (prompt.cursor + 1).min(max);
                    self.chrome_dirty = true;
                }
            }
            _ => {}
        }
    }

    fn apply_text_prompt(&mut self, prompt: TextPrompt) {
        match prompt.kind {
            PendingEdit::NewNode => {
                let label = prompt.buffer.trim().to_string();
                if label.is_empty() {
                    self.set_status("empty label; nothing added");
                } else {
                    let id = self.graph.add_node(label.clone());
                    self.layout.place(&mut self.graph, id, self.viewport.center());
                    let _ = self.graph.select_only(id);
                    self.selected = Some(id);
                    info!(node = %id, label = %label, "node added");
                    self.set_status(format!("added {label}"));
                }
            }
            PendingEdit::RenameNode(id) => {
                let label = prompt.buffer.trim().to_string();
                match self.graph.set_label(id, label.clone()) {
                    Ok(()) => {
                        info!(node = %id, label = %label, "label updated");
                        self.set_status("label updated");
                    }
                    Err(err) => {
                        warn!("label edit failed: {err}");
                        self.set_status(err.to_string());
                    }
                }
            }
        }
        self.restore_mode_after_prompt();
        self.mark_all();
    }

    fn restore_mode_after_prompt(&mut self) {
        self.mode = if self.selected.is_some() {
            Mode::NodeSelected
        } else {
            Mode::Idle
        };
    }

    fn cycle_selection(&mut self) {
        if self.graph.is_empty() {
            self.set_status("no nodes to select");
            return;
        }
        let ids = self.graph.node_ids();
        let next = match self.selected {
            Some(current) => {
                let at = ids.iter().position(|id| *id == current).unwrap_or(0);
                ids[(at + 1) % ids.len()]
            }
            None => ids[0],
        };
        let _ = self.graph.select_only(next);
        self.selected = Some(next);
        self.mode = Mode::NodeSelected;
        self.mark_all();
    }

    fn start_edit_label(&mut self) {
        let Some(id) = self.selected else {
            self.set_status("select a node to edit its label");
            return;
        };
        let Some(node) = self.graph.node(id) else {
            return;
        };
        let buffer = node.label.clone();
        let cursor = buffer.chars().count();
        self.prompt = Some(TextPrompt {
            title: format!("Label for {id}:"),
            buffer,
            cursor,
            kind: PendingEdit::RenameNode(id),
        });
        self.mode = Mode::Editing;
        self.mark_all();
    }

    fn delete_selected_node(&mut self) {
        let Some(id) = self.selected else {
            self.set_status("select a node to delete");
            return;
        };
        let label = self
            .graph
            .node(id)
            .map(|n| n.label.clone())
            .unwrap_or_default();
        let cascaded = self.graph.incident_edges(id).len();
        match self.graph.remove_node(id) {
            Ok(()) => {
                info!(node = %id, label = %label, cascaded, "node removed");
                self.set_status(format!("deleted {label} (+{cascaded} edges)"));
                self.selected = None;
                self.mode = Mode::Idle;
                self.mark_all();
            }
            Err(err) => {
                warn!("delete failed: {err}");
                self.set_status(err.to_string());
            }
        }
    }

    fn delete_edge_under_pointer(&mut self) {
        let Some(selected) = self.selected else {
            self.set_status("select a node, point at a neighbor, then [x]");
            return;
        };
        let (col, row) = self.pointer;
        let Some(other) = scene::node_at(&self.graph, &self.viewport, col, row) else {
            self.set_status("point at a neighbor to delete an edge");
            return;
        };
        let Some(edge_id) = self.graph.edge_between(selected, other) else {
            self.set_status("no edge between those nodes");
            return;
        };
        let endpoints = self
            .graph
            .edge(edge_id)
            .map(|e| (self.node_label(e.a), self.node_label(e.b)));
        match self.graph.remove_edge(edge_id) {
            Ok(()) => {
                info!(edge = %edge_id, "edge removed");
                if let Some((a, b)) = endpoints {
                    self.set_status(format!("deleted edge {a} - {b}"));
                }
                let _ = self.graph.select_only(selected);
                self.mark_all();
            }
            Err(err) => {
                warn!("edge delete failed: {err}");
                self.set_status(err.to_string());
            }
        }
    }

    fn node_label(&self, id: NodeId) -> String {
        self.graph
            .node(id)
            .map(|n| n.label.clone())
            .unwrap_or_default()
    }

    fn toggle_pin(&mut self) {
        let Some(id) = self.selected else {
            self.set_status("select a node to pin");
            return;
        };
        let pinned = self.graph.node(id).map(|n| n.pinned).unwrap_or(false);
        if self.graph.set_pinned(id, !pinned).is_ok() {
            // Pin flips change the force balance without touching topology.
            self.layout.invalidate();
            self.set_status(if pinned { "unpinned" } else { "pinned" });
            self.mark_all();
        }
    }

    fn save(&mut self) {
        let Some(path) = self.save_path.clone() else {
            self.set_status("no save path (launch with a file argument)");
            return;
        };
        match edgelist::save(&path, &self.graph) {
            Ok(()) => {
                info!(
                    nodes = self.graph.node_count(),
                    edges = self.graph.edge_count(),
                    path = %path.display(),
                    "graph saved"
                );
                self.set_status(format!("saved to {}", path.display()));
            }
            Err(err) => {
                warn!("save failed: {err:#}");
                self.set_status(format!("save failed: {err}"));
            }
        }
    }

    fn handle_pointer(&mut self, pointer: Pointer) {
        if self.prompt.is_some() {
            // Editing captures everything until confirm or cancel.
            return;
        }
        match pointer {
            Pointer::Down(col, row) => {
                self.pointer = (col, row);
                if let Some(id) = scene::node_at(&self.graph, &self.viewport, col, row) {
                    if self.selected != Some(id) {
                        let _ = self.graph.select_only(id);
                        self.selected = Some(id);
                        self.mark_all();
                    }
                    self.mode = Mode::NodeSelected;
                    self.pressed_on_selected = true;
                } else {
                    self.mode = Mode::Panning;
                    self.pan_moved = false;
                    self.drag_last = (col, row);
                    self.chrome_dirty = true;
                }
            }
            Pointer::Drag(col, row) => match self.mode {
                Mode::Panning => {
                    let dx = self.drag_last.0 as i32 - col as i32;
                    let dy = self.drag_last.1 as i32 - row as i32;
                    if dx != 0 || dy != 0 {
                        self.viewport.pan_cells(dx, dy);
                        self.pan_moved = true;
                        self.mark_all();
                    }
                    self.drag_last = (col, row);
                }
                Mode::NodeSelected if self.pressed_on_selected => {
                    self.mode = Mode::EdgeDrawing;
                    self.pointer = (col, row);
                    self.mark_all();
                }
                Mode::EdgeDrawing => {
                    if self.pointer != (col, row) {
                        self.pointer = (col, row);
                        self.mark_scene();
                    }
                }
                _ => {}
            },
            Pointer::Up(col, row) => {
                self.pointer = (col, row);
                self.finish_press(Some((col, row)));
            }
            Pointer::Move(col, row) => {
                if self.pointer != (col, row) {
                    self.pointer = (col, row);
                    self.chrome_dirty = true;
                }
            }
            Pointer::ScrollUp => {
                self.viewport.zoom_by(ZOOM_STEP);
                self.mark_all();
            }
            Pointer::ScrollDown => {
                self.viewport.zoom_by(1.0 / ZOOM_STEP);
                self.mark_all();
            }
            Pointer::Other => {}
        }
    }

    /// Complete a press. `at = None` means the button was released outside
    /// the canvas, which counts as empty space.
    fn finish_press(&mut self, at: Option<(u16, u16)>) {
        match self.mode {
            Mode::EdgeDrawing => {
                let target =
                    at.and_then(|(c, r)| scene::node_at(&self.graph, &self.viewport, c, r));
                match (self.selected, target) {
                    (Some(source), Some(target)) if source != target => {
                        match self.graph.add_edge(source, target, None) {
                            Ok(edge_id) => {
                                let status = format!(
                                    "connected {} and {}",
                                    self.node_label(source),
                                    self.node_label(target)
                                );
                                info!(edge = %edge_id, "edge created");
                                self.set_status(status);
                                // Refresh highlights for the new incidence.
                                let _ = self.graph.select_only(source);
                            }
                            Err(err) => {
                                warn!("edge create failed: {err}");
                                self.set_status(err.to_string());
                            }
                        }
                        self.mode = Mode::NodeSelected;
                    }
                    (Some(_), Some(_)) => {
                        self.set_status("release on a different node to connect");
                        self.mode = Mode::NodeSelected;
                    }
                    _ => {
                        // Released over empty space: no edge, back to Idle.
                        self.graph.clear_selection();
                        self.selected = None;
                        self.mode = Mode::Idle;
                    }
                }
                self.mark_all();
            }
            Mode::Panning => {
                if !self.pan_moved && at.is_some() {
                    if self.selected.take().is_some() {
                        self.graph.clear_selection();
                        self.mark_scene();
                    }
                    self.mode = Mode::Idle;
                } else {
                    self.mode = if self.selected.is_some() {
                        Mode::NodeSelected
                    } else {
                        Mode::Idle
                    };
                }
                self.chrome_dirty = true;
            }
            _ => {}
        }
        self.pressed_on_selected = false;
    }

    fn mode_label(&self) -> &'static str {
        match self.mode {
            Mode::Idle => "Idle",
            Mode::NodeSelected => "Selected",
            Mode::EdgeDrawing => "EdgeDrawing",
            Mode::Panning => "Panning",
            Mode::Editing => "Editing",
        }
    }

    fn hints(&self) -> &'static str {
        match self.mode {
            Mode::Idle => {
                "[click] select  [n] add  [Tab] cycle  [arrows] pan  [+/-] zoom  [w] save  [?] help  [q] quit"
            }
            Mode::NodeSelected => {
                "[drag] draw edge  [e] label  [p] pin  [d] delete  [x] delete edge at pointer  [Esc] deselect"
            }
            Mode::EdgeDrawing => "release on a node to connect; empty space cancels",
            Mode::Panning => "drag to pan, release to stop",
            Mode::Editing => "type label  [Enter] apply  [Esc] cancel",
        }
    }

    fn hud_line(&self) -> String {
        format!(
            "pan:({:.0},{:.0}) zoom:{:.2} ptr:({},{}) nodes:{} edges:{} [{}]",
            self.viewport.origin.x,
            self.viewport.origin.y,
            self.viewport.scale,
            self.pointer.0,
            self.pointer.1,
            self.graph.node_count(),
            self.graph.edge_count(),
            if self.layout.converged() {
                "settled"
            } else {
                "settling"
            },
        )
    }

    fn draw(&self, frame: &mut Frame) {
        let hud = self.hud_line();
        let data = ChromeData {
            mode_label: self.mode_label(),
            hints: self.hints(),
            message: self.status_message.as_deref(),
            hud: &hud,
            show_help: self.show_help,
        };
        render::draw(frame, self.scene.buffer(), &data);

        if let Some(prompt) = &self.prompt {
            draw_text_prompt(frame, prompt);
        }
    }
}

fn draw_text_prompt(frame: &mut Frame, prompt: &TextPrompt) {
    let area = render::centered_rect(frame.area(), 50, 24);
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            prompt.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        render::line_with_cursor(&prompt.buffer, prompt.cursor),
        Line::from(""),
        Line::from(Span::styled(
            "[Backspace] delete  [Enter] apply  [Esc] cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .title(" edit ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, area);
}

fn demo_graph(directed: bool) -> Graph {
    let mut g = Graph::new(directed);
    let core = g.add_node("core");
    let store = g.add_node("store");
    let layout = g.add_node("layout");
    let scene = g.add_node("scene");
    let input = g.add_node("input");
    let log = g.add_node("log");
    let edges = [
        (core, store, Some(2.0)),
        (core, layout, None),
        (core, input, None),
        (store, layout, Some(1.5)),
        (layout, scene, None),
        (store, scene, None),
        (core, log, Some(0.5)),
    ];
    for (a, b, w) in edges {
        let _ = g.add_edge(a, b, w);
    }
    g
}

/// Launch the interactive session and block until quit. The terminal guard
/// restores cooked mode on every exit path, error and panic included.
pub fn run(opts: SessionOptions) -> Result<()> {
    let mut app = AppState::load(&opts)?;

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("entering alternate screen")?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("initialising terminal backend")?;

    info!(
        nodes = app.graph.node_count(),
        edges = app.graph.edge_count(),
        "session started"
    );

    loop {
        app.layout_step();

        let size = terminal.size().context("querying terminal size")?;
        let canvas = render::canvas_area(Rect::new(0, 0, size.width, size.height));
        app.sync_viewport(canvas);

        if app.scene_dirty || app.chrome_dirty {
            let updates = if app.scene_dirty {
                app.render_scene()
            } else {
                Vec::new()
            };
            // The scene diff gates the draw: an unchanged frame costs nothing.
            if !updates.is_empty() || app.chrome_dirty {
                terminal.draw(|f| app.draw(f)).context("drawing frame")?;
            }
            app.scene_dirty = false;
            app.chrome_dirty = false;
        }

        if !event::poll(TICK).context("polling input")? {
            continue;
        }
        match event::read().context("reading input")? {
            Event::Key(key) => {
                if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                    continue;
                }
                if app.handle_key(key) {
                    break;
                }
            }
            Event::Mouse(mouse) => handle_mouse(&mut app, mouse, canvas),
            Event::Resize(..) => {
                app.scene.invalidate();
                app.mark_all();
            }
            _ => {}
        }
    }

    info!("session ended");
    Ok(())
}

/// Map terminal-global mouse coordinates into the canvas region; releases
/// outside it still complete an in-flight gesture as "empty space".
fn handle_mouse(app: &mut AppState, mouse: MouseEvent, canvas: Rect) {
    let pointer = input::pointer_for_mouse(mouse);
    let local = |col: u16, row: u16| -> Option<(u16, u16)> {
        (col >= canvas.x
            && row >= canvas.y
            && col < canvas.x + canvas.width
            && row < canvas.y + canvas.height)
            .then(|| (col - canvas.x, row - canvas.y))
    };
    match pointer {
        Pointer::Down(c, r) => {
            if let Some((c, r)) = local(c, r) {
                app.handle_pointer(Pointer::Down(c, r));
            }
        }
        Pointer::Drag(c, r) => {
            if let Some((c, r)) = local(c, r) {
                app.handle_pointer(Pointer::Drag(c, r));
            }
        }
        Pointer::Move(c, r) => {
            if let Some((c, r)) = local(c, r) {
                app.handle_pointer(Pointer::Move(c, r));
            }
        }
        Pointer::Up(c, r) => match local(c, r) {
            Some((c, r)) => app.handle_pointer(Pointer::Up(c, r)),
            None => app.finish_press(None),
        },
        other => app.handle_pointer(other),
    }
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
    }
}
