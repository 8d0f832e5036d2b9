//! Board output for `show`, `optimize` and `render`

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use shiftboard_core::{ClassificationRules, OperationalWindow, OptimizationResult};
use shiftboard_layout::{Board, BoardOptions};
use shiftboard_render::{JsonRenderer, Renderer, SvgRenderer, TableRenderer, TextTimelineRenderer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BoardFormat {
    Text,
    Table,
    Svg,
    Json,
}

pub struct RenderArgs {
    pub format: BoardFormat,
    pub date: Option<NaiveDate>,
    pub output: Option<PathBuf>,
    pub show_now: bool,
    pub window_start_hour: u32,
    pub label_every_hours: u32,
}

/// Explicit date, else the window holding the earliest assignment, else today
pub fn select_window(
    result: &OptimizationResult,
    date: Option<NaiveDate>,
    start_hour: u32,
    today: NaiveDate,
) -> Result<OperationalWindow> {
    let window = match (date, result.earliest_start()) {
        (Some(date), _) => OperationalWindow::starting_on(date, start_hour)?,
        (None, Some(earliest)) => OperationalWindow::containing(earliest, start_hour)?,
        (None, None) => OperationalWindow::starting_on(today, start_hour)?,
    };
    Ok(window)
}

pub fn layout(result: &OptimizationResult, args: &RenderArgs) -> Result<Board> {
    layout_at(result, args, Local::now().naive_local())
}

/// Shifts of workers without assignments are anchored on `now`'s date
pub fn layout_at(result: &OptimizationResult, args: &RenderArgs, now: NaiveDateTime) -> Result<Board> {
    let window = select_window(result, args.date, args.window_start_hour, now.date())?;

    let mut options = BoardOptions::new(now.date()).label_every_hours(args.label_every_hours);
    if args.show_now {
        options = options.now(now);
    }

    let classified = result.clone().classified(ClassificationRules::standard());
    Ok(Board::layout(&classified, window, &options))
}

/// Lay out, render and write to the output file or stdout
pub fn emit(result: &OptimizationResult, args: &RenderArgs) -> Result<()> {
    let board = layout(result, args)?;
    tracing::info!(
        window = %board.window.start(),
        workers = board.rows.len(),
        bars = board.bar_count(),
        "board laid out"
    );

    if board.is_empty() && matches!(args.format, BoardFormat::Svg) {
        println!("No assignments");
        return Ok(());
    }

    let rendered = match args.format {
        BoardFormat::Text => TextTimelineRenderer::default().render(&board)?,
        BoardFormat::Table => TableRenderer::default().render(&board)?,
        BoardFormat::Svg => SvgRenderer::default().render(&board)?,
        BoardFormat::Json => JsonRenderer.render(&board)?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
