//! Rendering a laid-out board through every backend

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use pretty_assertions::assert_eq;
use shiftboard_core::{
    Assignment, OperationalWindow, OptimizationResult, Schedule, ShiftTemplate, Skill, UnassignedTask,
    Worker,
};
use shiftboard_layout::{Board, BoardOptions};
use shiftboard_render::{JsonRenderer, Renderer, SvgRenderer, TableRenderer, TextTimelineRenderer};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    date(day).and_hms_opt(hour, 0, 0).unwrap()
}

fn board() -> Board {
    let aiko = Worker::new("W001")
        .name("Aiko")
        .skill(Skill::new(200, "Pick Paperless", 4))
        .skill(Skill::new(240, "Pack", 2))
        .skill(Skill::new(211, "Sort", 3))
        .skill(Skill::new(260, "Special", 1))
        .shift(ShiftTemplate::new(
            "Day",
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        ));

    let result = OptimizationResult {
        schedules: vec![Schedule::new(aiko)
            .assignment(Assignment::rest(at(10, 12), at(10, 13)))
            .assignment(Assignment::task("8000", "Pick Paperless", at(10, 9), at(10, 11), 120).with_id(1))],
        unassigned_tasks: vec![UnassignedTask {
            id: "8001".into(),
            task_name: Some("Rebin".into()),
            remaining_units: 40,
        }],
    };

    let window = OperationalWindow::starting_on(date(10), 8).unwrap();
    Board::layout(&result, window, &BoardOptions::new(date(10)).now(at(10, 14)))
}

#[test]
fn table_lists_assignments_then_unassigned() {
    let table = TableRenderer::default().render(&board()).unwrap();

    let expected = concat!(
        "Worker       Task Name       Start Time        End Time          Units  Type\n",
        "-----------  --------------  ----------------  ----------------  -----  -----\n",
        "Aiko (W001)  Pick Paperless  2025-03-10 09:00  2025-03-10 11:00  120    Task\n",
        "Aiko (W001)  Break           2025-03-10 12:00  2025-03-10 13:00  -      Break\n",
        "\n",
        "Unassigned Tasks\n",
        "S. No.  Task ID  Task Name  Units Unassigned\n",
        "------  -------  ---------  ----------------\n",
        "1       8001     Rebin      40\n",
    );
    assert_eq!(table, expected);
}

#[test]
fn table_skill_column_is_optional() {
    let table = TableRenderer::new().with_skill_match().no_unassigned().render(&board()).unwrap();

    assert!(table.lines().next().unwrap().ends_with("Skill"));
    assert!(table.contains("● optimal"));
    assert!(!table.contains("Unassigned Tasks"));
}

#[test]
fn timeline_shows_shift_badges_and_axis() {
    let text = TextTimelineRenderer::new().render(&board()).unwrap();

    assert!(text.contains("Aiko (W001)  Shift: Day: 08:00–17:00"));
    assert!(text.contains("Skills: Pick Paperless L4 · Pack L2 · Sort L3 · +1"));
    assert!(text.contains("00:00+1"));
    assert!(text.contains("● 09:00-11:00  Pick Paperless (120)"));
    assert!(text.contains("12:00-13:00  Break"));
    assert!(text.contains("1. 8001 Rebin (40 units)"));
    // break and pick share one lane
    assert!(text.contains("   1 |"));
    assert!(!text.contains("   2 |"));
}

#[test]
fn svg_marks_shift_now_and_break() {
    let svg = SvgRenderer::default().render(&board()).unwrap();

    assert!(svg.contains("Shift: Day: 08:00–17:00"));
    assert!(svg.contains("class=\"shift-marker\""));
    assert!(svg.contains("class=\"now\""));
    assert!(svg.contains("class=\"bar break\""));
    assert!(svg.contains("data-assignment-id=\"1\""));
    assert!(svg.contains("<title>"));
}

#[test]
fn json_carries_geometry() {
    let json = JsonRenderer.render(&board()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let bar = &value["rows"][0]["lanes"][0][0];
    assert_eq!(bar["label"], "Pick Paperless (120)");
    assert_eq!(bar["category"], "PICK");
    assert_eq!(value["now_offset"].as_f64().map(|v| v.round()), Some(25.0));
}
