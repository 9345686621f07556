//! Main application logic
//!
//! Ties together the editor model, the toolchain and the renderer.

use std::path::{Path, PathBuf};
use std::process::Child;
use std::rc::Rc;

use arboard::Clipboard;
use ember_core::highlight::Highlighter;
use ember_core::width::col_at_cell;
use ember_core::{Editor, Position};
use ember_toolchain::{
    numbered_listing, run_in_terminal, BuildReport, BuildStage, Toolchain, ERROR_MARKER,
};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowBuilder};

use crate::config::{Config, ThemeName};
use crate::input::{key_from_winit, map_key, Command, Modifiers, Motion, INDENT};
use crate::layout::{status_text, Hit, Layout, SidebarAction};
use crate::renderer::{Frame, Renderer};

const APP_NAME: &str = "Ember";

/// Application state
pub struct App {
    config: Config,
    /// Window (created in `run`)
    window: Option<Rc<Window>>,
    renderer: Option<Renderer>,
    editor: Editor,
    highlighter: Highlighter,
    toolchain: Toolchain,
    /// Output panel contents
    output: Vec<String>,
    /// Terminal windows launched by "Run in Terminal", reaped once they exit
    terminals: Vec<Child>,
    output_scroll: usize,
    /// System clipboard, if one could be opened
    clipboard: Option<Clipboard>,
    /// Used in place of the system clipboard when it is unavailable
    local_clipboard: String,
    modifiers: ModifiersState,
    theme: ThemeName,
    /// First buffer line shown
    scroll: usize,
    mouse_pos: PhysicalPosition<f64>,
    /// Whether the left button is dragging a selection
    is_selecting: bool,
    hovered: Option<SidebarAction>,
    /// Target of Ctrl+S / Ctrl+O
    file: PathBuf,
    title: String,
    needs_redraw: bool,
}

impl App {
    /// Create a new application
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                log::warn!("Clipboard not available: {}", e);
                None
            }
        };
        let mut app = Self::with_clipboard(config, clipboard);

        if let Some(path) = app.config.open_file.clone() {
            app.open(&path);
        }

        Ok(app)
    }

    fn with_clipboard(config: Config, clipboard: Option<Clipboard>) -> Self {
        let mut editor = Editor::with_history_limit(config.editor.history_limit);
        editor.set_auto_pair(config.editor.auto_pair);

        let file = config
            .open_file
            .clone()
            .unwrap_or_else(|| config.editor.save_file.clone());

        Self {
            highlighter: Highlighter::new(config.editor.keywords.iter().cloned()),
            toolchain: Toolchain::new(config.toolchain.clone()),
            theme: config.theme,
            config,
            window: None,
            renderer: None,
            editor,
            output: Vec::new(),
            terminals: Vec::new(),
            output_scroll: 0,
            clipboard,
            local_clipboard: String::new(),
            modifiers: ModifiersState::empty(),
            scroll: 0,
            mouse_pos: PhysicalPosition::new(0.0, 0.0),
            is_selecting: false,
            hovered: None,
            file,
            title: String::new(),
            needs_redraw: true,
        }
    }

    /// Run the application
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;

        let window = WindowBuilder::new()
            .with_title(self.window_title())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .build(&event_loop)?;
        let window = Rc::new(window);

        let renderer = Renderer::new(
            window.clone(),
            &self.config.font,
            self.config.window.line_height,
            self.config.colors_for(self.theme),
        )?;
        self.renderer = Some(renderer);
        self.window = Some(window);

        event_loop.run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { event, .. } => {
                    self.handle_window_event(event, elwt);
                }
                Event::AboutToWait => {
                    self.reap_terminals();
                    if self.needs_redraw {
                        self.update_title();
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        match event {
            WindowEvent::CloseRequested => {
                if self.editor.is_modified() {
                    log::warn!("Closing with unsaved changes");
                }
                elwt.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.scroll_to_cursor();
                self.needs_redraw = true;
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key_input(&event);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_mouse_input(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_mouse_motion(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_mouse_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            _ => {}
        }
    }

    fn handle_key_input(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }

        let mods = Modifiers::from_winit(self.modifiers);
        let command = key_from_winit(&event.logical_key).and_then(|key| map_key(key, mods));

        match command {
            Some(command) => self.execute(command),
            // Composed or multi-char input carries no single key
            None if !mods.ctrl => {
                if let Some(text) = event.text.as_ref().filter(|t| t.chars().all(|c| !c.is_control())) {
                    self.editor.insert_text(text);
                    self.after_edit();
                }
            }
            None => {}
        }
    }

    /// Apply a keyboard command
    fn execute(&mut self, command: Command) {
        log::trace!("Command: {:?}", command);

        match command {
            Command::InsertChar(c) => self.editor.insert_char(c),
            Command::Indent => self.editor.insert_text(INDENT),
            Command::Newline => self.editor.newline(),
            Command::Backspace => self.editor.backspace(),
            Command::Delete => self.editor.delete_forward(),
            Command::Move { motion, extend } => match motion {
                Motion::Left => self.editor.move_left(extend),
                Motion::Right => self.editor.move_right(extend),
                Motion::Up => self.editor.move_up(extend),
                Motion::Down => self.editor.move_down(extend),
                Motion::Home => self.editor.move_home(extend),
                Motion::End => self.editor.move_end(extend),
            },
            Command::ScrollPage(direction) => {
                let rows = self.layout().visible_rows() as i32;
                self.scroll_by(direction * rows);
                self.needs_redraw = true;
                return;
            }
            Command::ClearSelection => self.editor.clear_selection(),
            Command::SelectAll => self.editor.select_all(),
            Command::Cut => {
                let text = self.editor.cut();
                self.set_clipboard(text);
            }
            Command::Copy => {
                let text = self.editor.copy_text();
                self.set_clipboard(text);
            }
            Command::Paste => {
                let text = self.clipboard_text();
                if !text.is_empty() {
                    self.editor.insert_text(&text.replace("\r\n", "\n"));
                }
            }
            Command::Undo => {
                self.editor.undo();
            }
            Command::Redo => {
                self.editor.redo();
            }
            Command::Save => {
                let path = self.file.clone();
                self.save_to(&path);
            }
            Command::Load => {
                let path = self.file.clone();
                self.open(&path);
            }
            Command::CompileAndRun => self.compile_and_run(),
            Command::NewDocument => self.new_document(),
            Command::ToggleTheme => self.toggle_theme(),
        }

        self.after_edit();
    }

    /// Apply a sidebar button
    fn run_action(&mut self, action: SidebarAction) {
        log::debug!("Sidebar: {}", action.label());

        match action {
            SidebarAction::NewProject => self.new_document(),
            SidebarAction::SaveProject => {
                let path = self.config.editor.project_file.clone();
                self.save_to(&path);
            }
            SidebarAction::Undo => {
                self.editor.undo();
            }
            SidebarAction::Redo => {
                self.editor.redo();
            }
            SidebarAction::ToggleTheme => self.toggle_theme(),
            SidebarAction::DebugCompile => {
                self.log_listing();
                self.compile_and_run();
            }
            SidebarAction::Run => self.compile_and_run(),
            SidebarAction::RunInTerminal => self.run_in_terminal(),
        }

        self.after_edit();
    }

    fn after_edit(&mut self) {
        self.scroll_to_cursor();
        self.needs_redraw = true;
    }

    fn new_document(&mut self) {
        self.editor.new_document();
        self.scroll = 0;
        log::info!("New project created");
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.next();
        if let Some(renderer) = &mut self.renderer {
            renderer.set_colors(self.config.colors_for(self.theme));
        }
        log::info!("Theme: {}", self.theme.display_name());
    }

    fn save_to(&mut self, path: &Path) {
        match self.editor.save(path) {
            Ok(()) => log::info!("Saved {}", path.display()),
            Err(e) => {
                log::error!("{}", e);
                self.show_error(&e.to_string());
            }
        }
    }

    fn open(&mut self, path: &Path) {
        match self.editor.load(path) {
            Ok(()) => {
                self.scroll = 0;
                self.file = path.to_path_buf();
                log::info!("Loaded {}", path.display());
            }
            Err(e) => {
                log::error!("{}", e);
                self.show_error(&e.to_string());
            }
        }
    }

    /// Replace the output panel with a single error line
    fn show_error(&mut self, message: &str) {
        self.output = vec![format!("{}{}", ERROR_MARKER, message)];
        self.output_scroll = 0;
    }

    fn show_report(&mut self, report: BuildReport) {
        match report.stage {
            BuildStage::Ran(code) => log::info!("Program exited with {:?}", code),
            stage => log::info!("Build stopped: {:?}", stage),
        }
        self.output = report.lines;
        self.output_scroll = 0;
    }

    /// Compile the buffer and, if that succeeds, run it. Blocks until done.
    fn compile_and_run(&mut self) {
        let report = match self.toolchain.compile_and_run(self.editor.buffer().lines()) {
            Ok(report) => report,
            Err(e) => {
                log::error!("{}", e);
                BuildReport::from_error(&e)
            }
        };
        self.show_report(report);
    }

    /// Write the source and log it with line numbers
    fn log_listing(&mut self) {
        let listing = self
            .toolchain
            .write_source(self.editor.buffer().lines())
            .and_then(|path| numbered_listing(&path));
        match listing {
            Ok(rows) => {
                for row in rows {
                    log::info!("{}", row);
                }
            }
            Err(e) => log::warn!("Listing failed: {}", e),
        }
    }

    /// Compile, then launch the binary in its own terminal window
    fn run_in_terminal(&mut self) {
        let compiled = match self.toolchain.compile(self.editor.buffer().lines()) {
            Ok(compiled) => compiled,
            Err(e) => {
                self.show_report(BuildReport::from_error(&e));
                return;
            }
        };

        if let Some(report) = BuildReport::from_compile(&compiled, &self.toolchain.config().compiler) {
            self.show_report(report);
            return;
        }

        match run_in_terminal(&self.toolchain.binary_path()) {
            Ok(child) => {
                self.terminals.push(child);
                self.output.clear();
                self.output_scroll = 0;
            }
            Err(e) => {
                log::error!("{}", e);
                self.show_error(&e.to_string());
            }
        }
    }

    /// Collect terminal launchers that have exited
    fn reap_terminals(&mut self) {
        self.terminals.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                log::debug!("Terminal {} exited with {}", child.id(), status);
                false
            }
            Ok(None) => true,
            Err(e) => {
                log::warn!("Failed to poll terminal {}: {}", child.id(), e);
                false
            }
        });
    }

    fn set_clipboard(&mut self, text: String) {
        if let Some(clipboard) = &mut self.clipboard {
            if let Err(e) = clipboard.set_text(text.as_str()) {
                log::warn!("Failed to copy to clipboard: {}", e);
            } else {
                log::debug!("Copied {} characters to clipboard", text.len());
            }
        }
        self.local_clipboard = text;
    }

    fn clipboard_text(&mut self) -> String {
        if let Some(clipboard) = &mut self.clipboard {
            match clipboard.get_text() {
                Ok(text) => return text,
                Err(e) => log::debug!("Clipboard read failed: {}", e),
            }
        }
        self.local_clipboard.clone()
    }

    fn layout(&self) -> Layout {
        let (width, height) = match &self.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => (self.config.window.width, self.config.window.height),
        };
        let cell_width = self
            .renderer
            .as_ref()
            .map(Renderer::cell_width)
            .unwrap_or(self.config.font.size * 0.6);
        Layout::new(width, height, self.config.window.line_height, cell_width)
    }

    fn scroll_to_cursor(&mut self) {
        let line = self.editor.cursor().line;
        self.scroll = self.layout().scroll_to_reveal(self.scroll, line);
    }

    fn scroll_by(&mut self, lines: i32) {
        let max = self.editor.buffer().line_count().saturating_sub(1);
        let target = self.scroll as i64 + lines as i64;
        self.scroll = target.clamp(0, max as i64) as usize;
    }

    /// Buffer position under a text-area hit
    fn position_at(&self, line: usize, cell: f64) -> Position {
        let buffer = self.editor.buffer();
        let line = line.min(buffer.line_count() - 1);
        let text = buffer.line(line).unwrap_or("");
        Position::new(line, col_at_cell(text, cell))
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }

        if state == ElementState::Released {
            self.is_selecting = false;
            if self.editor.selection().is_some_and(|s| s.is_empty()) {
                self.editor.clear_selection();
            }
            self.needs_redraw = true;
            return;
        }

        let (x, y) = (self.mouse_pos.x, self.mouse_pos.y);
        match self.layout().hit(x, y, self.scroll) {
            Hit::Button(action) => self.run_action(action),
            Hit::Text { line, cell } => {
                let pos = self.position_at(line, cell);
                self.editor.begin_selection(pos);
                self.is_selecting = true;
                self.needs_redraw = true;
            }
            Hit::Gutter { line } => {
                let pos = self.position_at(line, 0.0);
                self.editor.begin_selection(pos);
                self.is_selecting = true;
                self.needs_redraw = true;
            }
            Hit::Sidebar | Hit::Output | Hit::Status => {}
        }
    }

    fn handle_mouse_motion(&mut self, position: PhysicalPosition<f64>) {
        self.mouse_pos = position;
        let layout = self.layout();

        let hovered = layout.button_at(position.x, position.y);
        if hovered != self.hovered {
            self.hovered = hovered;
            self.needs_redraw = true;
        }

        if self.is_selecting {
            let line = layout.line_at(position.y, self.scroll);
            let pos = self.position_at(line, layout.cell_at(position.x));
            self.editor.extend_selection_to(pos);
            self.scroll_to_cursor();
            self.needs_redraw = true;
        }
    }

    fn handle_mouse_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => -(y as i32) * 3,
            MouseScrollDelta::PixelDelta(pos) => -(pos.y / self.config.window.line_height as f64) as i32,
        };
        if lines == 0 {
            return;
        }

        let layout = self.layout();
        if layout.output_panel().contains(self.mouse_pos.x, self.mouse_pos.y) {
            let max = self.output.len().saturating_sub(layout.output_rows());
            let target = self.output_scroll as i64 + lines.signum() as i64;
            self.output_scroll = target.clamp(0, max as i64) as usize;
        } else {
            self.scroll_by(lines);
        }
        self.needs_redraw = true;
    }

    fn window_title(&self) -> String {
        let name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.display().to_string());
        let marker = if self.editor.is_modified() { " *" } else { "" };
        format!("{}{} - {}", name, marker, APP_NAME)
    }

    fn update_title(&mut self) {
        let title = self.window_title();
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn status(&self) -> String {
        let cursor = self.editor.cursor();
        status_text(
            cursor.line,
            cursor.col,
            self.editor.has_selection(),
            self.editor.is_modified(),
        )
    }

    fn render(&mut self) {
        let layout = self.layout();
        let status = self.status();
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        let frame = Frame {
            editor: &self.editor,
            highlighter: &self.highlighter,
            scroll: self.scroll,
            output: &self.output,
            output_scroll: self.output_scroll,
            status: &status,
            hovered: self.hovered,
        };

        if let Err(e) = renderer.render(&layout, &frame) {
            log::warn!("Render error: {}", e);
        }

        self.needs_redraw = false;
    }
}
