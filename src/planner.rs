use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::{ConfigError, CurriculumConfig};

/// Subject -> component -> marks. The same shape carries current, required
/// and adjusted marks; missing entries read as 0.0 (not yet attempted).
pub type MarksTable = HashMap<String, HashMap<String, f64>>;

/// Subject -> names of the components the student has already sat.
pub type CompletedSet = HashMap<String, HashSet<String>>;

/// Selects what the feasibility verdict actually compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityPolicy {
    /// Entered marks compared against the adjusted table. Known quirk: a
    /// completed component's adjusted value IS its entered mark, so the
    /// comparison can only fail for marks entered against components not
    /// marked completed. Kept as the default because downstream consumers
    /// expect exactly this verdict.
    #[default]
    CompletedVsAdjusted,
    /// Feasible iff redistribution never asked a remaining component for a
    /// negative score or for more than its cap (checked before clamping).
    RemainingWithinCaps,
    /// Completed marks compared against the original, unadjusted requirement.
    CompletedVsPlanned,
}

/// Non-fatal input anomalies. The computation runs on the inputs as given;
/// correcting them is the caller's responsibility.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeWarning {
    #[error("target {target} is outside [0, 10]")]
    TargetOutOfRange { target: f64 },

    #[error("{subject}/{component}: score {score} is outside [0, {cap}]")]
    ScoreOutOfRange {
        subject: String,
        component: String,
        score: f64,
        cap: f64,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Adjustment {
    pub adjusted: MarksTable,
    pub feasible: bool,
}

pub fn lookup(table: &MarksTable, subject: &str, component: &str) -> f64 {
    table
        .get(subject)
        .and_then(|row| row.get(component))
        .copied()
        .unwrap_or(0.0)
}

/// Marks needed on each component, taken in isolation, to reach the target
/// aggregate: the component's cap scaled by the target fraction, the
/// component's share of the subject and the subject's share of total
/// credits, clamped to the cap.
pub fn compute_required(
    target: f64,
    config: &CurriculumConfig,
) -> Result<MarksTable, ConfigError> {
    let total_credits = config.total_credits();
    if total_credits == 0 {
        return Err(ConfigError::EmptyCurriculum);
    }

    let mut required = MarksTable::new();
    for subject in &config.subjects {
        if subject.credits == 0 {
            return Err(ConfigError::ZeroCredits {
                subject: subject.name.clone(),
            });
        }

        let denom = 10.0 * subject.credits as f64 * 100.0;
        let mut row = HashMap::new();
        for component in &subject.components {
            let raw = target * total_credits as f64 * component.cap * component.weight / denom;
            row.insert(component.name.clone(), raw.min(component.cap));
        }
        required.insert(subject.name.clone(), row);
    }

    Ok(required)
}

/// Fold actual scores into the requirement table: completed components keep
/// their obtained marks, and their shortfall or surplus against the original
/// requirement is spread over the remaining components in proportion to
/// weight, clamped to [0, cap].
pub fn adjust(
    config: &CurriculumConfig,
    current: &MarksTable,
    required: &MarksTable,
    completed: &CompletedSet,
    policy: FeasibilityPolicy,
) -> Result<Adjustment, ConfigError> {
    verify_known_names(config, current, completed)?;

    let empty = HashSet::new();
    let mut adjusted = required.clone();

    // Obtained marks are facts, not projections: they replace the
    // target-derived figures for every completed component.
    for (subject_name, row) in current {
        let done = completed.get(subject_name).unwrap_or(&empty);
        let adjusted_row = adjusted.entry(subject_name.clone()).or_default();
        for (component, marks) in row {
            if done.contains(component) {
                adjusted_row.insert(component.clone(), *marks);
            }
        }
    }

    let mut within_bounds = true;
    for subject in &config.subjects {
        let done = completed.get(&subject.name).unwrap_or(&empty);

        let remaining_weight: f64 = subject
            .components
            .iter()
            .filter(|c| !done.contains(&c.name))
            .map(|c| c.weight)
            .sum();
        if remaining_weight <= 0.0 {
            // Everything already sat; nothing left to redistribute onto.
            continue;
        }

        let remaining_diff: f64 = subject
            .components
            .iter()
            .filter(|c| done.contains(&c.name))
            .map(|c| {
                lookup(required, &subject.name, &c.name) - lookup(current, &subject.name, &c.name)
            })
            .sum();

        let adjusted_row = adjusted.entry(subject.name.clone()).or_default();
        for component in &subject.components {
            if done.contains(&component.name) {
                continue;
            }
            let base = lookup(required, &subject.name, &component.name);
            let spread = base + remaining_diff * component.weight / remaining_weight;
            if spread < 0.0 || spread > component.cap {
                within_bounds = false;
            }
            adjusted_row.insert(component.name.clone(), spread.min(component.cap).max(0.0));
        }
    }

    let feasible = match policy {
        FeasibilityPolicy::CompletedVsAdjusted => current_within_adjusted(current, &adjusted),
        FeasibilityPolicy::RemainingWithinCaps => within_bounds,
        FeasibilityPolicy::CompletedVsPlanned => {
            completed_within_planned(current, required, completed)
        }
    };

    Ok(Adjustment { adjusted, feasible })
}

/// Warnings for inputs outside their documented ranges. Never blocks the
/// computation.
pub fn check_ranges(
    target: f64,
    current: &MarksTable,
    config: &CurriculumConfig,
) -> Vec<RangeWarning> {
    let mut warnings = Vec::new();

    if !(0.0..=10.0).contains(&target) {
        warnings.push(RangeWarning::TargetOutOfRange { target });
    }

    for subject in &config.subjects {
        let Some(row) = current.get(&subject.name) else {
            continue;
        };
        for component in &subject.components {
            if let Some(&score) = row.get(&component.name) {
                if score < 0.0 || score > component.cap {
                    warnings.push(RangeWarning::ScoreOutOfRange {
                        subject: subject.name.clone(),
                        component: component.name.clone(),
                        score,
                        cap: component.cap,
                    });
                }
            }
        }
    }

    warnings
}

fn verify_known_names(
    config: &CurriculumConfig,
    current: &MarksTable,
    completed: &CompletedSet,
) -> Result<(), ConfigError> {
    for (subject_name, row) in current {
        let subject = config
            .subject(subject_name)
            .ok_or_else(|| ConfigError::UnknownSubject(subject_name.clone()))?;
        for component in row.keys() {
            if subject.component(component).is_none() {
                return Err(ConfigError::UnknownComponent {
                    subject: subject_name.clone(),
                    component: component.clone(),
                });
            }
        }
    }

    for (subject_name, components) in completed {
        let subject = config
            .subject(subject_name)
            .ok_or_else(|| ConfigError::UnknownSubject(subject_name.clone()))?;
        for component in components {
            if subject.component(component).is_none() {
                return Err(ConfigError::UnknownComponent {
                    subject: subject_name.clone(),
                    component: component.clone(),
                });
            }
        }
    }

    Ok(())
}

fn current_within_adjusted(current: &MarksTable, adjusted: &MarksTable) -> bool {
    for (subject, row) in current {
        let Some(adjusted_row) = adjusted.get(subject) else {
            continue;
        };
        for (component, marks) in row {
            if let Some(budget) = adjusted_row.get(component) {
                if marks > budget {
                    return false;
                }
            }
        }
    }
    true
}

fn completed_within_planned(
    current: &MarksTable,
    required: &MarksTable,
    completed: &CompletedSet,
) -> bool {
    for (subject, components) in completed {
        for component in components {
            if lookup(current, subject, component) > lookup(required, subject, component) {
                return false;
            }
        }
    }
    true
}
