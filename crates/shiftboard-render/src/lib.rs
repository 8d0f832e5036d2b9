//! # shiftboard-render
//!
//! Rendering backends for laid-out shiftboard boards.
//!
//! This crate provides:
//! - SVG Gantt board rendering
//! - Text timeline rendering (one ASCII track per lane)
//! - Flat table rendering with the unassigned-task table
//! - JSON export of the board geometry
//!
//! ## Example
//!
//! ```rust,ignore
//! use shiftboard_layout::{Board, BoardOptions};
//! use shiftboard_render::{Renderer, SvgRenderer, TableRenderer};
//!
//! let board = Board::layout(&result, window, &BoardOptions::new(today));
//! let svg = SvgRenderer::default().render(&board)?;
//! let table = TableRenderer.render(&board)?;
//! ```

pub mod table;
pub mod text;

pub use table::TableRenderer;
pub use text::TextTimelineRenderer;

use shiftboard_core::TaskCategory;
use shiftboard_layout::{Bar, Board, WorkerRow};
use svg::node::element::{Group, Line, Rectangle, Text, Title};
use svg::Document;
use thiserror::Error;

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a laid-out board
    fn render(&self, board: &Board) -> Result<Self::Output, RenderError>;
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SVG board renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Width of the time axis area in pixels
    pub chart_width: u32,
    /// Height of one lane in pixels
    pub lane_height: u32,
    /// Vertical gap between worker rows
    pub row_gap: u32,
    /// Width of the worker label column in pixels
    pub label_width: u32,
    /// Header height (title, legend and axis)
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    pub background_color: String,
    pub row_color: String,
    pub text_color: String,
    pub axis_color: String,
    pub next_day_color: String,
    pub midnight_color: String,
    pub now_color: String,
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            chart_width: 960,
            lane_height: 30,
            row_gap: 14,
            label_width: 220,
            header_height: 96,
            padding: 20,
            background_color: "#ffffff".into(),
            row_color: "#f5f5f5".into(),
            text_color: "#222222".into(),
            axis_color: "#1976d2".into(),
            next_day_color: "#d32f2f".into(),
            midnight_color: "#ff5722".into(),
            now_color: "#e53935".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure chart width
    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    /// Configure lane height
    pub fn lane_height(mut self, height: u32) -> Self {
        self.lane_height = height;
        self
    }

    fn chart_x(&self) -> f64 {
        (self.padding + self.label_width) as f64
    }

    fn percent_to_x(&self, percent: f64) -> f64 {
        self.chart_x() + percent / 100.0 * self.chart_width as f64
    }

    fn total_width(&self) -> u32 {
        self.padding * 2 + self.label_width + self.chart_width
    }

    /// Rows get at least one lane of height, plus room for the label block
    fn row_height(&self, row: &WorkerRow) -> u32 {
        let lanes = row.lanes.len().max(1) as u32;
        (lanes * self.lane_height).max(3 * (self.font_size + 4)) + 8
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64) -> Text {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str())
    }

    fn render_legend(&self, y: f64) -> Group {
        let mut group = Group::new().set("class", "legend");
        let mut x = self.padding as f64;
        let box_size = 12.0;

        for category in TaskCategory::LEGEND {
            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y - box_size + 2.0)
                    .set("width", box_size)
                    .set("height", box_size)
                    .set("rx", 2)
                    .set("fill", category.color())
                    .set("stroke", "#bbbbbb"),
            );
            let label = category.legend_label();
            group = group.add(
                self.text(label, x + box_size + 4.0, y)
                    .set("font-size", self.font_size - 1),
            );
            x += box_size + 16.0 + label.len() as f64 * 7.0;
        }

        group
    }

    fn render_axis(&self, board: &Board, top: f64, bottom: f64) -> Group {
        let mut group = Group::new().set("class", "axis");
        let label_y = top - 8.0;

        for tick in &board.ticks {
            let x = self.percent_to_x(tick.offset_percent);
            group = group.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", top)
                    .set("x2", x)
                    .set("y2", bottom)
                    .set("stroke", if tick.major { self.axis_color.as_str() } else { "#bbbbbb" })
                    .set("stroke-width", if tick.major { 2.5 } else { 1.0 })
                    .set("stroke-opacity", if tick.major { 0.6 } else { 0.4 }),
            );

            if let Some(label) = &tick.label {
                let color = if tick.next_day {
                    self.next_day_color.as_str()
                } else {
                    self.axis_color.as_str()
                };
                group = group.add(
                    self.text(label.as_str(), x, label_y)
                        .set("text-anchor", "middle")
                        .set("font-weight", "bold")
                        .set("fill", color),
                );
            }
        }

        if let Some(offset) = board.midnight_offset {
            let x = self.percent_to_x(offset);
            group = group.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", top)
                    .set("x2", x)
                    .set("y2", bottom)
                    .set("stroke", self.midnight_color.as_str())
                    .set("stroke-width", 3),
            );
            group = group.add(
                self.text("00:00+1", x + 5.0, top + 12.0)
                    .set("font-size", self.font_size - 2)
                    .set("font-weight", "bold")
                    .set("fill", self.midnight_color.as_str()),
            );
        }

        if let Some(offset) = board.now_offset {
            let x = self.percent_to_x(offset);
            group = group.add(
                Line::new()
                    .set("class", "now")
                    .set("x1", x)
                    .set("y1", top)
                    .set("x2", x)
                    .set("y2", bottom)
                    .set("stroke", self.now_color.as_str())
                    .set("stroke-width", 2)
                    .set("stroke-dasharray", "6,4"),
            );
        }

        group
    }

    fn render_row(&self, row: &WorkerRow, y: f64) -> Group {
        let mut group = Group::new()
            .set("class", "worker")
            .set("data-worker-id", row.worker_id.as_str());
        let height = self.row_height(row) as f64;
        let line = (self.font_size + 4) as f64;

        // Label block
        group = group.add(
            self.text(truncate(&row.label, 28), self.padding as f64 + 4.0, y + line)
                .set("font-weight", "bold"),
        );
        if let Some(shift) = &row.shift {
            group = group.add(
                self.text(format!("Shift: {}", shift.label), self.padding as f64 + 4.0, y + line * 2.0)
                    .set("font-size", self.font_size - 2)
                    .set("fill", self.axis_color.as_str()),
            );
        }
        if !row.skills.is_empty() {
            group = group.add(
                self.text(skill_badges(row), self.padding as f64 + 4.0, y + line * 3.0)
                    .set("font-size", self.font_size - 3),
            );
        }

        // Track background
        group = group.add(
            Rectangle::new()
                .set("x", self.chart_x())
                .set("y", y)
                .set("width", self.chart_width)
                .set("height", height)
                .set("rx", 4)
                .set("fill", self.row_color.as_str()),
        );

        if let Some(shift) = &row.shift {
            for (offset, color) in [
                (shift.start_offset, self.axis_color.as_str()),
                (shift.end_offset, self.next_day_color.as_str()),
            ] {
                if let Some(offset) = offset {
                    let x = self.percent_to_x(offset);
                    group = group.add(
                        Line::new()
                            .set("class", "shift-marker")
                            .set("x1", x)
                            .set("y1", y)
                            .set("x2", x)
                            .set("y2", y + height)
                            .set("stroke", color)
                            .set("stroke-width", 2)
                            .set("stroke-opacity", 0.7),
                    );
                }
            }
        }

        for (lane_idx, lane) in row.lanes.iter().enumerate() {
            let lane_y = y + 4.0 + (lane_idx as u32 * self.lane_height) as f64;
            for bar in lane.iter().filter(|b| b.placement.is_visible()) {
                group = group.add(self.render_bar(bar, lane_idx, lane_y));
            }
        }

        group
    }

    fn render_bar(&self, bar: &Bar, lane_idx: usize, y: f64) -> Group {
        let x = self.percent_to_x(bar.placement.offset_percent);
        let mut width = bar.placement.width_percent / 100.0 * self.chart_width as f64;
        if bar.abuts_next {
            width = (width - 2.0).max(1.0);
        }
        let height = self.lane_height as f64 - 6.0;

        let mut group = Group::new()
            .set("class", if bar.is_break { "bar break" } else { "bar" })
            .set("data-lane-idx", lane_idx);
        if let Some(id) = bar.assignment_id {
            group = group.set("data-assignment-id", id);
        }
        if let Some(task_id) = &bar.task_id {
            group = group.set("data-task-id", task_id.as_str());
        }

        group = group.add(Title::new(bar.tooltip.as_str()));
        group = group.add(
            Rectangle::new()
                .set("x", x)
                .set("y", y)
                .set("width", width)
                .set("height", height)
                .set("rx", 3)
                .set("fill", bar.category.color())
                .set("stroke", "rgba(255,255,255,0.5)"),
        );

        // ~6.5px per character at the default font size
        let glyph_room = if bar.is_break { 0.0 } else { 14.0 };
        let max_chars = ((width - 8.0 - glyph_room) / 6.5).floor().max(0.0) as usize;
        if max_chars >= 3 {
            group = group.add(self.text(truncate(&bar.label, max_chars), x + 4.0, y + height / 2.0 + 4.0));
        }
        if !bar.is_break && width > glyph_room + 4.0 {
            group = group.add(
                self.text(bar.skill_match.glyph().to_string(), x + width - 12.0, y + height / 2.0 + 5.0)
                    .set("font-weight", "bold")
                    .set("font-size", self.font_size + 2)
                    .set("fill", bar.skill_match.color()),
            );
        }

        group
    }

    fn render_unassigned(&self, board: &Board, y: f64) -> Group {
        let mut group = Group::new().set("class", "unassigned");
        let line = (self.font_size + 6) as f64;

        group = group.add(
            self.text("Unassigned Tasks", self.padding as f64, y)
                .set("font-weight", "bold")
                .set("font-size", self.font_size + 2)
                .set("fill", "#ef6c00"),
        );
        for (idx, task) in board.unassigned.iter().enumerate() {
            let content = format!(
                "{}. {}  {}  units unassigned: {}",
                idx + 1,
                task.id,
                task.task_name.as_deref().unwrap_or("-"),
                task.remaining_units
            );
            group = group.add(self.text(content, self.padding as f64 + 8.0, y + line * (idx + 1) as f64));
        }

        group
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, board: &Board) -> Result<String, RenderError> {
        if board.is_empty() {
            return Err(RenderError::InvalidData("No assignments to render".into()));
        }

        let rows_height: u32 = board
            .rows
            .iter()
            .map(|row| self.row_height(row) + self.row_gap)
            .sum();
        let unassigned_height = if board.unassigned.is_empty() {
            0
        } else {
            (board.unassigned.len() as u32 + 2) * (self.font_size + 6)
        };

        let width = self.total_width();
        let height = self.padding * 2 + self.header_height + rows_height + unassigned_height;

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", self.background_color.as_str()),
        );

        let title = format!(
            "Assignment Gantt Chart: {} – {}",
            board.window.start().format("%Y-%m-%d %H:%M"),
            board.window.end().format("%Y-%m-%d %H:%M")
        );
        document = document.add(
            self.text(title, self.padding as f64, (self.padding + 16) as f64)
                .set("font-size", self.font_size + 4)
                .set("font-weight", "bold"),
        );
        document = document.add(self.render_legend((self.padding + 42) as f64));

        let rows_top = (self.padding + self.header_height) as f64;
        let rows_bottom = rows_top + rows_height as f64;
        document = document.add(self.render_axis(board, rows_top, rows_bottom));

        let mut y = rows_top;
        for row in &board.rows {
            document = document.add(self.render_row(row, y));
            y += (self.row_height(row) + self.row_gap) as f64;
        }

        if !board.unassigned.is_empty() {
            document = document.add(self.render_unassigned(board, rows_bottom + 24.0));
        }

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Board geometry as pretty-printed JSON
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, board: &Board) -> Result<String, RenderError> {
        serde_json::to_string_pretty(board).map_err(|e| RenderError::Format(e.to_string()))
    }
}

/// First three skills as "Name L4" badges, then "+N"
pub(crate) fn skill_badges(row: &WorkerRow) -> String {
    let mut badges: Vec<String> = row
        .skills
        .iter()
        .take(3)
        .map(|s| format!("{} L{}", s.skill_name, s.skill_level))
        .collect();
    if row.skills.len() > 3 {
        badges.push(format!("+{}", row.skills.len() - 3));
    }
    badges.join(" · ")
}

/// Truncate a string to a maximum number of characters with ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
