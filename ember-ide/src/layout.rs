//! Window geometry
//!
//! ```text
//! +--------+--------------------------------+-----------------+
//! | gutter | text                           | sidebar buttons |
//! |        |                                |                 |
//! +--------+--------------------------------+-----------------+
//! | output panel                                              |
//! +-----------------------------------------------------------+
//! | status bar                                                |
//! +-----------------------------------------------------------+
//! ```
//!
//! All values are physical pixels. Nothing here draws; the renderer and
//! the mouse handling both ask the layout where things are.

/// Width of the line-number gutter
pub const GUTTER_WIDTH: u32 = 60;
/// Gap between the gutter and the first text column
pub const TEXT_INSET: u32 = 40;
/// Width of the command sidebar on the right
pub const SIDEBAR_WIDTH: u32 = 220;
/// Height of the output panel above the status bar
pub const OUTPUT_PANEL_HEIGHT: u32 = 100;
/// Height of the status bar along the bottom
pub const STATUS_BAR_HEIGHT: u32 = 24;

const BUTTON_RIGHT_OFFSET: u32 = 210;
const BUTTON_TOP: u32 = 50;
const BUTTON_PITCH: u32 = 50;
const BUTTON_WIDTH: u32 = 200;
const BUTTON_HEIGHT: u32 = 40;

/// Inner padding of the output panel and status bar text
pub const PANEL_PADDING: u32 = 10;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64 && x < self.right() as f64 && y >= self.y as f64 && y < self.bottom() as f64
    }
}

/// Commands on the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    NewProject,
    SaveProject,
    Undo,
    Redo,
    ToggleTheme,
    DebugCompile,
    Run,
    RunInTerminal,
}

impl SidebarAction {
    /// Top-to-bottom button order
    pub const ALL: [SidebarAction; 8] = [
        SidebarAction::NewProject,
        SidebarAction::SaveProject,
        SidebarAction::Undo,
        SidebarAction::Redo,
        SidebarAction::ToggleTheme,
        SidebarAction::DebugCompile,
        SidebarAction::Run,
        SidebarAction::RunInTerminal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SidebarAction::NewProject => "New Project",
            SidebarAction::SaveProject => "Save Project",
            SidebarAction::Undo => "Undo",
            SidebarAction::Redo => "Redo",
            SidebarAction::ToggleTheme => "Toggle Theme",
            SidebarAction::DebugCompile => "Debug & Compile",
            SidebarAction::Run => "Run",
            SidebarAction::RunInTerminal => "Run in Terminal",
        }
    }
}

/// A sidebar button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub rect: Rect,
    pub action: SidebarAction,
}

/// What lies under a mouse position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Button(SidebarAction),
    /// Buffer line (may be past the end) and the cell offset, in cells
    Text { line: usize, cell: f64 },
    Gutter { line: usize },
    Sidebar,
    Output,
    Status,
}

/// Geometry for one window size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub line_height: u32,
    pub cell_width: f32,
}

impl Layout {
    pub fn new(width: u32, height: u32, line_height: u32, cell_width: f32) -> Self {
        Self {
            width,
            height,
            line_height: line_height.max(1),
            cell_width: cell_width.max(1.0),
        }
    }

    /// Height of the region holding gutter, text and sidebar
    pub fn editor_height(&self) -> u32 {
        self.height
            .saturating_sub(OUTPUT_PANEL_HEIGHT + STATUS_BAR_HEIGHT)
    }

    pub fn gutter(&self) -> Rect {
        Rect::new(0, 0, GUTTER_WIDTH.min(self.width), self.editor_height())
    }

    pub fn sidebar(&self) -> Rect {
        let x = self.width.saturating_sub(SIDEBAR_WIDTH);
        Rect::new(x, 0, self.width - x, self.editor_height())
    }

    pub fn text_area(&self) -> Rect {
        let x = GUTTER_WIDTH.min(self.width);
        let right = self.sidebar().x.max(x);
        Rect::new(x, 0, right - x, self.editor_height())
    }

    pub fn output_panel(&self) -> Rect {
        let y = self.editor_height();
        Rect::new(0, y, self.width, OUTPUT_PANEL_HEIGHT.min(self.height - y))
    }

    pub fn status_bar(&self) -> Rect {
        let y = self.height.saturating_sub(STATUS_BAR_HEIGHT);
        Rect::new(0, y, self.width, self.height - y)
    }

    /// X of the first text column
    pub fn text_x(&self) -> u32 {
        GUTTER_WIDTH + TEXT_INSET
    }

    /// Number of whole text rows that fit
    pub fn visible_rows(&self) -> usize {
        ((self.editor_height() / self.line_height) as usize).max(1)
    }

    /// Number of output lines that fit in the panel
    pub fn output_rows(&self) -> usize {
        let usable = self.output_panel().height.saturating_sub(PANEL_PADDING);
        ((usable / self.line_height) as usize).max(1)
    }

    pub fn buttons(&self) -> Vec<Button> {
        let x = self.width.saturating_sub(BUTTON_RIGHT_OFFSET);
        SidebarAction::ALL
            .iter()
            .enumerate()
            .map(|(i, &action)| Button {
                rect: Rect::new(
                    x,
                    BUTTON_TOP + BUTTON_PITCH * i as u32,
                    BUTTON_WIDTH,
                    BUTTON_HEIGHT,
                ),
                action,
            })
            .collect()
    }

    pub fn button_at(&self, x: f64, y: f64) -> Option<SidebarAction> {
        self.buttons()
            .into_iter()
            .find(|b| b.rect.contains(x, y))
            .map(|b| b.action)
    }

    /// Buffer line shown at a y coordinate in the editor region
    pub fn line_at(&self, y: f64, scroll: usize) -> usize {
        scroll + (y.max(0.0) as u32 / self.line_height) as usize
    }

    /// Fractional cell offset of an x coordinate in the text area
    pub fn cell_at(&self, x: f64) -> f64 {
        let offset = (x - self.text_x() as f64).max(0.0);
        offset / self.cell_width as f64
    }

    /// Classify a mouse position
    pub fn hit(&self, x: f64, y: f64, scroll: usize) -> Hit {
        if let Some(action) = self.button_at(x, y) {
            return Hit::Button(action);
        }
        if self.status_bar().contains(x, y) {
            return Hit::Status;
        }
        if self.output_panel().contains(x, y) {
            return Hit::Output;
        }
        if self.sidebar().contains(x, y) {
            return Hit::Sidebar;
        }
        let line = self.line_at(y, scroll);
        if self.gutter().contains(x, y) {
            return Hit::Gutter { line };
        }
        Hit::Text {
            line,
            cell: self.cell_at(x),
        }
    }

    /// Scroll offset that keeps `line` visible, changing `scroll` as little as possible
    pub fn scroll_to_reveal(&self, scroll: usize, line: usize) -> usize {
        let rows = self.visible_rows();
        if line < scroll {
            line
        } else if line >= scroll + rows {
            line + 1 - rows
        } else {
            scroll
        }
    }
}

/// Status bar text: 1-based line, 0-based column
pub fn status_text(line: usize, col: usize, selecting: bool, modified: bool) -> String {
    let mut status = format!("Line: {}, Pos: {}", line + 1, col);
    if selecting {
        status.push_str(" [SELECTING]");
    }
    if modified {
        status.push_str(" *");
    }
    status
}
