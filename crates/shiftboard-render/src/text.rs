//! Text timeline renderer
//!
//! Draws the board in a terminal: one block per worker with the shift label
//! and skill badges, one ASCII track per lane scaled to a fixed width, and a
//! listing of the bars with their skill-match glyphs.
//!
//! ## Example Output
//!
//! ```text
//! 08:00           12:00           16:00           20:00           00:00+1 ...
//! +---.---.---.---+---.---.---.---+---.---.---.---+---.---.---.---+---.--- ...
//!
//! Aiko (W001)  Shift: Day: 08:00–17:00
//!   Skills: Pick Paperless L4 · Pack L2
//!   1 |    ●PPPPPPP   ~~~~                                               ...|
//!   2 |        ◐KKKKKKK                                                  ...|
//! ```

use shiftboard_core::TaskCategory;
use shiftboard_layout::{Bar, Board, WorkerRow};

use crate::{skill_badges, RenderError, Renderer};

/// Narrowest axis that still fits the hour labels
const MIN_WIDTH: usize = 24;

/// Terminal timeline renderer
#[derive(Clone, Debug)]
pub struct TextTimelineRenderer {
    /// Columns used for the 24h axis, see [`TextTimelineRenderer::width`]
    width: usize,
    /// List every bar below the lane tracks
    pub show_details: bool,
}

impl Default for TextTimelineRenderer {
    fn default() -> Self {
        Self {
            width: 96,
            show_details: true,
        }
    }
}

impl TextTimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axis width in columns
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(MIN_WIDTH);
        self
    }

    /// Axis width in columns
    pub fn columns(&self) -> usize {
        self.width.max(MIN_WIDTH)
    }

    /// Hide the per-bar listing
    pub fn compact(mut self) -> Self {
        self.show_details = false;
        self
    }

    fn column(&self, percent: f64) -> usize {
        let columns = self.columns();
        ((percent / 100.0 * columns as f64).round() as usize).min(columns)
    }

    /// Column range covered by a bar, at least one cell wide
    fn span(&self, bar: &Bar) -> (usize, usize) {
        let last = self.columns() - 1;
        let start = self.column(bar.placement.offset_percent).min(last);
        let end = self.column(bar.placement.end_percent()).max(start + 1);
        (start, end)
    }

    fn render_axis(&self, board: &Board) -> String {
        let mut labels = vec![' '; self.columns() + 8];
        let mut ruler = vec!['-'; self.columns() + 1];
        let mut next_free = 0;

        for tick in &board.ticks {
            let col = self.column(tick.offset_percent);
            ruler[col] = if tick.major { '+' } else { '.' };
            if let Some(label) = &tick.label {
                if col >= next_free {
                    for (i, c) in label.chars().enumerate() {
                        if let Some(cell) = labels.get_mut(col + i) {
                            *cell = c;
                        }
                    }
                    next_free = col + label.chars().count() + 1;
                }
            }
        }
        if let Some(offset) = board.now_offset {
            ruler[self.column(offset)] = '*';
        }

        let labels: String = labels.into_iter().collect();
        let ruler: String = ruler.into_iter().collect();
        format!("      {}\n      {}\n", labels.trim_end(), ruler)
    }

    fn render_lane(&self, lane: &[Bar]) -> String {
        let mut cells = vec![' '; self.columns()];

        for bar in lane.iter().filter(|b| b.placement.is_visible()) {
            let (start, end) = self.span(bar);
            let fill = fill_char(bar.category);
            for cell in &mut cells[start..end] {
                *cell = fill;
            }
            if !bar.is_break {
                cells[start] = bar.skill_match.glyph();
            }
        }

        cells.into_iter().collect()
    }

    fn render_row(&self, row: &WorkerRow) -> String {
        let mut output = String::new();

        output.push_str(&row.label);
        if let Some(shift) = &row.shift {
            output.push_str(&format!("  Shift: {}", shift.label));
        }
        output.push('\n');
        if !row.skills.is_empty() {
            output.push_str(&format!("  Skills: {}\n", skill_badges(row)));
        }

        if row.lanes.is_empty() {
            output.push_str("  (no assignments)\n");
            return output;
        }

        for (idx, lane) in row.lanes.iter().enumerate() {
            output.push_str(&format!("  {:>2} |{}|\n", idx + 1, self.render_lane(lane)));
        }

        if self.show_details {
            let mut bars: Vec<&Bar> = row.lanes.iter().flatten().collect();
            bars.sort_by_key(|bar| bar.start);
            for bar in bars {
                let glyph = if bar.is_break { ' ' } else { bar.skill_match.glyph() };
                output.push_str(&format!(
                    "       {} {}-{}  {}\n",
                    glyph, bar.start_label, bar.end_label, bar.label
                ));
            }
        }

        output
    }
}

impl Renderer for TextTimelineRenderer {
    type Output = String;

    fn render(&self, board: &Board) -> Result<String, RenderError> {
        if board.is_empty() {
            return Ok("No assignments\n".into());
        }

        let mut output = String::new();

        output.push_str(&format!(
            "Assignment Timeline {} – {}\n",
            board.window.start().format("%Y-%m-%d %H:%M"),
            board.window.end().format("%Y-%m-%d %H:%M")
        ));
        let legend: Vec<String> = TaskCategory::LEGEND
            .iter()
            .map(|c| format!("{} {}", fill_char(*c), c.legend_label()))
            .collect();
        output.push_str(&format!("Legend: {}\n", legend.join("  ")));
        output.push_str("Skill:  ● optimal/adequate  ◐ suboptimal  ○ none\n\n");

        output.push_str(&self.render_axis(board));

        for row in &board.rows {
            output.push('\n');
            output.push_str(&self.render_row(row));
        }

        if !board.unassigned.is_empty() {
            output.push_str("\nUnassigned Tasks\n");
            for (idx, task) in board.unassigned.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} {} ({} units)\n",
                    idx + 1,
                    task.id,
                    task.task_name.as_deref().unwrap_or("-"),
                    task.remaining_units
                ));
            }
        }

        Ok(output)
    }
}

fn fill_char(category: TaskCategory) -> char {
    match category {
        TaskCategory::In => 'I',
        TaskCategory::Out => 'O',
        TaskCategory::Sort => 'S',
        TaskCategory::Pick => 'P',
        TaskCategory::Rebin => 'R',
        TaskCategory::Pack => 'K',
        TaskCategory::Special => 'X',
        TaskCategory::Break => '~',
        TaskCategory::Other => 'M',
        TaskCategory::Default => '#',
    }
}
