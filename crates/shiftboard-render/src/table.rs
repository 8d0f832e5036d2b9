//! Plain-text table renderer
//!
//! One line per assignment (worker, task, start, end, units, type), followed
//! by the unassigned-task table when the solver left work behind.
//!
//! ## Example Output
//!
//! ```text
//! Worker       Task Name       Start Time        End Time          Units  Type
//! -----------  --------------  ----------------  ----------------  -----  -----
//! Aiko (W001)  Pick Paperless  2025-03-10 09:00  2025-03-10 11:00  120    Task
//! Aiko (W001)  Break           2025-03-10 12:00  2025-03-10 13:00  -      Break
//! ```

use shiftboard_layout::{Bar, Board};

use crate::{RenderError, Renderer};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Flat table renderer
#[derive(Clone, Debug)]
pub struct TableRenderer {
    /// Append the skill-match column
    pub show_skill_match: bool,
    /// Append the unassigned-task table
    pub show_unassigned: bool,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self {
            show_skill_match: false,
            show_unassigned: true,
        }
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skill-match column
    pub fn with_skill_match(mut self) -> Self {
        self.show_skill_match = true;
        self
    }

    /// Omit the unassigned-task table
    pub fn no_unassigned(mut self) -> Self {
        self.show_unassigned = false;
        self
    }

    fn assignment_rows(&self, board: &Board) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for worker in &board.rows {
            let mut bars: Vec<&Bar> = worker.lanes.iter().flatten().collect();
            bars.sort_by_key(|bar| bar.start);

            for bar in bars {
                let mut cells = vec![
                    worker.label.clone(),
                    bar.name.clone(),
                    bar.start.format(TIME_FORMAT).to_string(),
                    bar.end.format(TIME_FORMAT).to_string(),
                    if bar.is_break { "-".into() } else { bar.units.to_string() },
                    if bar.is_break { "Break".into() } else { "Task".into() },
                ];
                if self.show_skill_match {
                    cells.push(if bar.is_break {
                        "-".into()
                    } else {
                        format!("{} {}", bar.skill_match.glyph(), bar.skill_match)
                    });
                }
                rows.push(cells);
            }
        }
        rows
    }
}

impl Renderer for TableRenderer {
    type Output = String;

    fn render(&self, board: &Board) -> Result<String, RenderError> {
        let mut output = String::new();

        if board.is_empty() {
            output.push_str("No assignments\n");
        } else {
            let mut header = vec!["Worker", "Task Name", "Start Time", "End Time", "Units", "Type"];
            if self.show_skill_match {
                header.push("Skill");
            }
            output.push_str(&format_table(&header, &self.assignment_rows(board)));
        }

        if self.show_unassigned && !board.unassigned.is_empty() {
            let rows: Vec<Vec<String>> = board
                .unassigned
                .iter()
                .enumerate()
                .map(|(idx, task)| {
                    vec![
                        (idx + 1).to_string(),
                        task.id.clone(),
                        task.task_name.clone().unwrap_or_else(|| "-".into()),
                        task.remaining_units.to_string(),
                    ]
                })
                .collect();

            output.push_str("\nUnassigned Tasks\n");
            output.push_str(&format_table(
                &["S. No.", "Task ID", "Task Name", "Units Unassigned"],
                &rows,
            ));
        }

        Ok(output)
    }
}

/// Left-aligned columns separated by two spaces, with a dashed rule
fn format_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();

    let mut output = line(header);
    output.push_str(&line(&rule));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        output.push_str(&line(&cells));
    }
    output
}
