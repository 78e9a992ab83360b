use serde::Serialize;

use crate::config::CurriculumConfig;
use crate::planner::{lookup, MarksTable};

#[derive(Debug, Serialize, Clone)]
pub struct ComponentLine {
    pub component: String,
    pub weight: f64,
    pub cap: f64,
    pub obtained: f64,
    pub required: f64,
}

#[derive(Debug, Serialize, Clone)]
pub struct SubjectSummary {
    pub subject: String,
    pub credits: u32,
    /// Weighted percentage earned so far from the obtained marks.
    pub current_pct: f64,
    /// Weighted percentage the subject lands on if every remaining
    /// component comes in exactly at its adjusted requirement.
    pub projected_pct: f64,
    pub components: Vec<ComponentLine>,
}

#[derive(Debug, Serialize, Clone)]
pub struct PlanSummary {
    pub subjects: Vec<SubjectSummary>,
    /// Credit-weighted aggregate on the 0-10 scale implied by the
    /// projected subject percentages.
    pub projected_sgpa: f64,
}

/// Per-subject breakdown of obtained vs required marks, plus the aggregate
/// the adjusted plan projects. Components with a zero cap cannot earn marks
/// and contribute nothing to either percentage.
pub fn plan_summary(
    config: &CurriculumConfig,
    current: &MarksTable,
    adjusted: &MarksTable,
) -> PlanSummary {
    let mut subjects = Vec::with_capacity(config.subjects.len());
    let mut weighted_points = 0.0;

    for subject in &config.subjects {
        let mut current_pct = 0.0;
        let mut projected_pct = 0.0;
        let mut components = Vec::with_capacity(subject.components.len());

        for component in &subject.components {
            let obtained = lookup(current, &subject.name, &component.name);
            let required = lookup(adjusted, &subject.name, &component.name);

            if component.cap > 0.0 {
                current_pct += component.weight * obtained / component.cap;
                projected_pct += component.weight * required / component.cap;
            }

            components.push(ComponentLine {
                component: component.name.clone(),
                weight: component.weight,
                cap: component.cap,
                obtained,
                required,
            });
        }

        weighted_points += subject.credits as f64 * projected_pct / 10.0;
        subjects.push(SubjectSummary {
            subject: subject.name.clone(),
            credits: subject.credits,
            current_pct,
            projected_pct,
            components,
        });
    }

    let total_credits = config.total_credits();
    let projected_sgpa = if total_credits > 0 {
        weighted_points / total_credits as f64
    } else {
        0.0
    };

    PlanSummary {
        subjects,
        projected_sgpa,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentSpec, SubjectSpec};
    use std::collections::HashMap;

    fn single_subject_config() -> CurriculumConfig {
        CurriculumConfig {
            subjects: vec![SubjectSpec {
                name: "CN".to_string(),
                credits: 4,
                components: vec![
                    ComponentSpec {
                        name: "M1".to_string(),
                        weight: 40.0,
                        cap: 40.0,
                    },
                    ComponentSpec {
                        name: "EndSem".to_string(),
                        weight: 60.0,
                        cap: 100.0,
                    },
                ],
            }],
        }
    }

    #[test]
    fn full_marks_project_to_sgpa_10() {
        let config = single_subject_config();
        let mut row = HashMap::new();
        row.insert("M1".to_string(), 40.0);
        row.insert("EndSem".to_string(), 100.0);
        let mut table = MarksTable::new();
        table.insert("CN".to_string(), row);

        let summary = plan_summary(&config, &table, &table);

        assert!((summary.subjects[0].current_pct - 100.0).abs() < 1e-9);
        assert!((summary.projected_sgpa - 10.0).abs() < 1e-9);
    }

    #[test]
    fn half_marks_project_to_half_percentage() {
        let config = single_subject_config();
        let mut row = HashMap::new();
        row.insert("M1".to_string(), 20.0);
        row.insert("EndSem".to_string(), 50.0);
        let mut adjusted = MarksTable::new();
        adjusted.insert("CN".to_string(), row);

        let summary = plan_summary(&config, &MarksTable::new(), &adjusted);

        assert!((summary.subjects[0].current_pct - 0.0).abs() < 1e-9);
        assert!((summary.subjects[0].projected_pct - 50.0).abs() < 1e-9);
        assert!((summary.projected_sgpa - 5.0).abs() < 1e-9);
    }
}
