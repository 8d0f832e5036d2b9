//! Task classification and skill matching
//!
//! Tasks carry no explicit type or skill requirement on the wire, so both are
//! inferred from the task id and name through an ordered rule table (first
//! match wins). The result is cached on the assignment by
//! [`OptimizationResult::classify`](crate::OptimizationResult::classify).
//!
//! Skill matches are an advisory overlay for bars and tooltips. Nothing in
//! lane assignment or window placement reads them.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Assignment, ModelError, Skill, SkillId};

// ============================================================================
// Task categories
// ============================================================================

/// Coarse task type used for bar colors and the legend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskCategory {
    In,
    Out,
    Sort,
    Pick,
    Rebin,
    Pack,
    Special,
    Break,
    Other,
    Default,
}

impl TaskCategory {
    /// Legend order
    pub const LEGEND: [TaskCategory; 9] = [
        TaskCategory::In,
        TaskCategory::Out,
        TaskCategory::Sort,
        TaskCategory::Pick,
        TaskCategory::Rebin,
        TaskCategory::Pack,
        TaskCategory::Special,
        TaskCategory::Break,
        TaskCategory::Other,
    ];

    pub fn color(self) -> &'static str {
        match self {
            TaskCategory::In => "#1976d2",
            TaskCategory::Out => "#388e3c",
            TaskCategory::Sort => "#ffd54f",
            TaskCategory::Pick => "#90caf9",
            TaskCategory::Rebin => "#ff7043",
            TaskCategory::Pack => "#a5d6a7",
            TaskCategory::Special => "#8e24aa",
            TaskCategory::Break => "#ffe082",
            TaskCategory::Other => "#ce93d8",
            TaskCategory::Default => "#b0bec5",
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            TaskCategory::In => "In",
            TaskCategory::Out => "Out",
            TaskCategory::Sort => "Sort",
            TaskCategory::Pick => "Pick",
            TaskCategory::Rebin => "Rebin / DPS",
            TaskCategory::Pack => "Pack",
            TaskCategory::Special => "Special",
            TaskCategory::Break => "Break",
            TaskCategory::Other => "Other",
            TaskCategory::Default => "Default",
        }
    }
}

/// Inferred type and required skill of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskClass {
    pub category: TaskCategory,
    pub required_skill: Option<SkillId>,
}

// ============================================================================
// Rule table
// ============================================================================

/// What a category rule is matched against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOn {
    TaskId,
    /// Lower-cased task name
    TaskName,
}

#[derive(Clone, Debug)]
pub struct CategoryRule {
    pub on: MatchOn,
    pub pattern: Regex,
    pub category: TaskCategory,
}

/// Name pattern → required skill, optionally vetoed by a second pattern
#[derive(Clone, Debug)]
pub struct SkillRule {
    pub pattern: Regex,
    pub unless: Option<Regex>,
    pub skill_id: SkillId,
}

impl SkillRule {
    fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name) && !self.unless.as_ref().is_some_and(|u| u.is_match(name))
    }
}

/// Ordered classification table
#[derive(Clone, Debug)]
pub struct ClassificationRules {
    pub categories: Vec<CategoryRule>,
    pub skills: Vec<SkillRule>,
}

const CATEGORY_TABLE: &[(MatchOn, &str, TaskCategory)] = &[
    (MatchOn::TaskId, r"^7000$", TaskCategory::In),
    (MatchOn::TaskId, r"^7001$", TaskCategory::Out),
    (MatchOn::TaskId, r"^7002$", TaskCategory::Sort),
    (MatchOn::TaskId, r"^8000$", TaskCategory::Pick),
    (MatchOn::TaskId, r"^8001$", TaskCategory::Rebin),
    (MatchOn::TaskId, r"^8002$", TaskCategory::Pack),
    (MatchOn::TaskId, r"^(3001|3002)$", TaskCategory::Special),
    (MatchOn::TaskName, r"inbound|in ", TaskCategory::In),
    (MatchOn::TaskName, r"outbound|out ", TaskCategory::Out),
    (MatchOn::TaskName, r"sort", TaskCategory::Sort),
    (MatchOn::TaskName, r"pick", TaskCategory::Pick),
    (MatchOn::TaskName, r"pack", TaskCategory::Pack),
    (MatchOn::TaskName, r"dps|rebin", TaskCategory::Rebin),
    (MatchOn::TaskName, r"special|3001|3002", TaskCategory::Special),
    (MatchOn::TaskName, r"maintenance|qa|forklift|management", TaskCategory::Other),
];

const SKILL_TABLE: &[(&str, Option<&str>, SkillId)] = &[
    (r"receive", None, 100),
    (r"stow", None, 120),
    (r"d2b", None, 121),
    (r"pick[_ ]paperless", None, 200),
    (r"pick[_ ]paper", None, 211),
    (r"induction", None, 220),
    (r"dps", None, 221),
    (r"rebin[_ ]manual", None, 230),
    (r"rebin[_ ]das", None, 231),
    (r"pack", Some(r"return|paperless"), 240),
    (r"pack[_ ]paperless", None, 241),
    (r"pack[_ ]paper", None, 242),
    (r"pack[_ ]return", None, 243),
    (r"pick to go paperless", None, 250),
    (r"pick to go paper", None, 251),
    (r"gift", None, 260),
    (r"shipsort|ship sort", None, 300),
    (r"forklift", None, 400),
    (r"maintenance", None, 500),
    (r"qa", None, 600),
    (r"management", None, 700),
];

impl ClassificationRules {
    /// Build a table from raw patterns
    pub fn from_tables(
        categories: &[(MatchOn, &str, TaskCategory)],
        skills: &[(&str, Option<&str>, SkillId)],
    ) -> Result<Self, ModelError> {
        let categories = categories
            .iter()
            .map(|&(on, pattern, category)| {
                Ok(CategoryRule {
                    on,
                    pattern: Regex::new(pattern)?,
                    category,
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        let skills = skills
            .iter()
            .map(|&(pattern, unless, skill_id)| {
                Ok(SkillRule {
                    pattern: Regex::new(pattern)?,
                    unless: unless.map(Regex::new).transpose()?,
                    skill_id,
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Self { categories, skills })
    }

    /// The warehouse rule table, compiled once
    pub fn standard() -> &'static ClassificationRules {
        static RULES: OnceLock<ClassificationRules> = OnceLock::new();
        RULES.get_or_init(|| {
            Self::from_tables(CATEGORY_TABLE, SKILL_TABLE)
                .expect("built-in classification patterns are valid")
        })
    }

    pub fn category_of(&self, assignment: &Assignment) -> TaskCategory {
        if assignment.counts_as_break() {
            return TaskCategory::Break;
        }
        if assignment.task_name.is_empty() {
            return TaskCategory::Default;
        }

        let name = assignment.task_name.to_lowercase();
        self.categories
            .iter()
            .find(|rule| match rule.on {
                MatchOn::TaskId => assignment
                    .task_id
                    .as_deref()
                    .is_some_and(|id| rule.pattern.is_match(id)),
                MatchOn::TaskName => rule.pattern.is_match(&name),
            })
            .map(|rule| rule.category)
            .unwrap_or(TaskCategory::Default)
    }

    pub fn required_skill_of(&self, assignment: &Assignment) -> Option<SkillId> {
        if assignment.counts_as_break() {
            return None;
        }
        let name = assignment.task_name.to_lowercase();
        self.skills
            .iter()
            .find(|rule| rule.matches(&name))
            .map(|rule| rule.skill_id)
    }

    pub fn classify(&self, assignment: &Assignment) -> TaskClass {
        TaskClass {
            category: self.category_of(assignment),
            required_skill: self.required_skill_of(assignment),
        }
    }
}

// ============================================================================
// Skill match
// ============================================================================

/// How well a worker's declared level meets a task's inferred requirement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillMatch {
    /// Level 4 or above
    Optimal,
    /// Level 3
    Adequate,
    /// Level 1-2
    Suboptimal,
    /// Break, no inferable requirement, or skill not held
    #[serde(rename = "none")]
    Unmatched,
}

impl SkillMatch {
    pub fn from_level(level: u8) -> Self {
        match level {
            l if l >= 4 => SkillMatch::Optimal,
            3 => SkillMatch::Adequate,
            _ => SkillMatch::Suboptimal,
        }
    }

    pub fn evaluate(skills: &[Skill], assignment: &Assignment) -> Self {
        if assignment.counts_as_break() {
            return SkillMatch::Unmatched;
        }
        assignment
            .task_class()
            .required_skill
            .and_then(|required| skills.iter().find(|s| s.skill_id == required))
            .map(|skill| Self::from_level(skill.skill_level))
            .unwrap_or(SkillMatch::Unmatched)
    }

    pub fn glyph(self) -> char {
        match self {
            SkillMatch::Optimal | SkillMatch::Adequate => '●',
            SkillMatch::Suboptimal => '◐',
            SkillMatch::Unmatched => '○',
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SkillMatch::Optimal => "#4caf50",
            SkillMatch::Adequate => "#2196f3",
            SkillMatch::Suboptimal => "#ff9800",
            SkillMatch::Unmatched => "#f44336",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            SkillMatch::Optimal => "Optimal skill match (Level 4)",
            SkillMatch::Adequate => "Adequate skill match (Level 3)",
            SkillMatch::Suboptimal => "Suboptimal skill match (Level 1-2)",
            SkillMatch::Unmatched => "No skill match or skill missing",
        }
    }
}

impl fmt::Display for SkillMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkillMatch::Optimal => "optimal",
            SkillMatch::Adequate => "adequate",
            SkillMatch::Suboptimal => "suboptimal",
            SkillMatch::Unmatched => "none",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn task(id: &str, name: &str) -> Assignment {
        Assignment::task(id, name, at(9), at(10), 10)
    }

    fn rules() -> &'static ClassificationRules {
        ClassificationRules::standard()
    }

    #[test]
    fn category_by_task_id_first() {
        assert_eq!(rules().category_of(&task("7001", "Receive")), TaskCategory::Out);
        assert_eq!(rules().category_of(&task("3002", "Whatever")), TaskCategory::Special);
    }

    #[test]
    fn category_by_name() {
        assert_eq!(rules().category_of(&task("x", "Inbound Dock")), TaskCategory::In);
        assert_eq!(rules().category_of(&task("x", "DPS Wall 3")), TaskCategory::Rebin);
        assert_eq!(rules().category_of(&task("x", "Forklift")), TaskCategory::Other);
        assert_eq!(rules().category_of(&task("x", "Cycle count")), TaskCategory::Default);
        assert_eq!(rules().category_of(&task("x", "")), TaskCategory::Default);
    }

    #[test]
    fn first_matching_rule_wins() {
        // "sort" precedes "pick" in the table
        assert_eq!(rules().category_of(&task("x", "Pick and Sort")), TaskCategory::Sort);
    }

    #[test]
    fn breaks_are_their_own_category() {
        let rest = Assignment::rest(at(12), at(13));
        assert_eq!(rules().category_of(&rest), TaskCategory::Break);
        assert_eq!(rules().required_skill_of(&rest), None);
    }

    #[test]
    fn required_skill_inference() {
        let cases = [
            ("Receive", Some(100)),
            ("Pick Paperless", Some(200)),
            ("pick_paper zone B", Some(211)),
            ("Rebin DAS", Some(231)),
            ("Pack", Some(240)),
            ("Pack Paperless", Some(241)),
            ("Pack Return", Some(243)),
            ("Ship Sort", Some(300)),
            ("Management", Some(700)),
            ("Cycle count", None),
        ];
        for (name, expected) in cases {
            assert_eq!(rules().required_skill_of(&task("x", name)), expected, "{name}");
        }
    }

    #[test]
    fn skill_match_levels() {
        let assignment = task("8000", "Pick Paperless");
        let with_level = |level| vec![Skill::new(200, "Pick Paperless", level)];

        assert_eq!(SkillMatch::evaluate(&with_level(4), &assignment), SkillMatch::Optimal);
        assert_eq!(SkillMatch::evaluate(&with_level(3), &assignment), SkillMatch::Adequate);
        assert_eq!(SkillMatch::evaluate(&with_level(2), &assignment), SkillMatch::Suboptimal);
        assert_eq!(SkillMatch::evaluate(&with_level(1), &assignment), SkillMatch::Suboptimal);
    }

    #[test]
    fn skill_match_none_cases() {
        let skills = vec![Skill::new(200, "Pick Paperless", 4)];

        // skill not held
        assert_eq!(SkillMatch::evaluate(&skills, &task("x", "Stow")), SkillMatch::Unmatched);
        // no requirement inferable
        assert_eq!(SkillMatch::evaluate(&skills, &task("x", "Cycle count")), SkillMatch::Unmatched);
        // break
        assert_eq!(
            SkillMatch::evaluate(&skills, &Assignment::rest(at(12), at(13))),
            SkillMatch::Unmatched
        );
    }

    #[test]
    fn custom_table() {
        let custom = ClassificationRules::from_tables(
            &[(MatchOn::TaskName, "^audit", TaskCategory::Special)],
            &[("audit", None, 900)],
        )
        .unwrap();
        let audit = task("x", "Audit lane 4");
        assert_eq!(
            custom.classify(&audit),
            TaskClass {
                category: TaskCategory::Special,
                required_skill: Some(900)
            }
        );

        assert!(ClassificationRules::from_tables(&[(MatchOn::TaskId, "(", TaskCategory::In)], &[]).is_err());
    }

    #[test]
    fn display_and_serde_names() {
        assert_eq!(SkillMatch::Unmatched.to_string(), "none");
        assert_eq!(serde_json::to_string(&SkillMatch::Unmatched).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&TaskCategory::Rebin).unwrap(), "\"REBIN\"");
    }
}
