use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Weights are entered as whole percentages but kept as f64; allow for
/// rounding noise when checking the per-subject sum.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("curriculum has no subjects")]
    EmptyCurriculum,

    #[error("subject {subject}: credits must be positive")]
    ZeroCredits { subject: String },

    #[error("subject {subject}: component weights sum to {sum}, expected 100")]
    WeightSumMismatch { subject: String, sum: f64 },

    #[error("subject {subject}, component {component}: negative weight {weight}")]
    NegativeWeight {
        subject: String,
        component: String,
        weight: f64,
    },

    #[error("subject {subject}, component {component}: negative cap {cap}")]
    NegativeCap {
        subject: String,
        component: String,
        cap: f64,
    },

    #[error("duplicate subject {0}")]
    DuplicateSubject(String),

    #[error("subject {subject}: duplicate component {component}")]
    DuplicateComponent { subject: String, component: String },

    #[error("unknown subject {0}")]
    UnknownSubject(String),

    #[error("subject {subject}: unknown component {component}")]
    UnknownComponent { subject: String, component: String },

    #[error("failed to read curriculum file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse curriculum file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One assessment component of a subject: its share of the subject grade
/// (percentage) and the maximum attainable mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    pub weight: f64,
    pub cap: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSpec {
    pub name: String,
    pub credits: u32,
    pub components: Vec<ComponentSpec>,
}

impl SubjectSpec {
    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// The curriculum table: subjects with credits and their weighted, capped
/// components. Loaded once and passed by reference into every computation;
/// component order is preserved so reports come out in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumConfig {
    pub subjects: Vec<SubjectSpec>,
}

impl CurriculumConfig {
    /// Load and validate a curriculum from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: CurriculumConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn subject(&self, name: &str) -> Option<&SubjectSpec> {
        self.subjects.iter().find(|s| s.name == name)
    }

    pub fn total_credits(&self) -> u32 {
        self.subjects.iter().map(|s| s.credits).sum()
    }

    /// Reject configurations the arithmetic cannot work with: zero credits,
    /// weights not summing to 100, negative weights or caps, duplicates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subjects.is_empty() {
            return Err(ConfigError::EmptyCurriculum);
        }

        let mut seen_subjects = HashSet::new();
        for subject in &self.subjects {
            if !seen_subjects.insert(subject.name.as_str()) {
                return Err(ConfigError::DuplicateSubject(subject.name.clone()));
            }
            if subject.credits == 0 {
                return Err(ConfigError::ZeroCredits {
                    subject: subject.name.clone(),
                });
            }

            let mut seen_components = HashSet::new();
            let mut weight_sum = 0.0;
            for component in &subject.components {
                if !seen_components.insert(component.name.as_str()) {
                    return Err(ConfigError::DuplicateComponent {
                        subject: subject.name.clone(),
                        component: component.name.clone(),
                    });
                }
                if component.weight < 0.0 {
                    return Err(ConfigError::NegativeWeight {
                        subject: subject.name.clone(),
                        component: component.name.clone(),
                        weight: component.weight,
                    });
                }
                if component.cap < 0.0 {
                    return Err(ConfigError::NegativeCap {
                        subject: subject.name.clone(),
                        component: component.name.clone(),
                        cap: component.cap,
                    });
                }
                weight_sum += component.weight;
            }

            if (weight_sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(ConfigError::WeightSumMismatch {
                    subject: subject.name.clone(),
                    sum: weight_sum,
                });
            }
        }

        Ok(())
    }

    /// The built-in five-subject semester table.
    pub fn default_table() -> Self {
        fn subject(name: &str, credits: u32, components: &[(&str, f64, f64)]) -> SubjectSpec {
            SubjectSpec {
                name: name.to_string(),
                credits,
                components: components
                    .iter()
                    .map(|&(name, weight, cap)| ComponentSpec {
                        name: name.to_string(),
                        weight,
                        cap,
                    })
                    .collect(),
            }
        }

        CurriculumConfig {
            subjects: vec![
                subject(
                    "BD",
                    3,
                    &[
                        ("M1", 15.0, 30.0),
                        ("M2", 15.0, 30.0),
                        ("EndSem", 30.0, 100.0),
                        ("Others", 40.0, 40.0),
                    ],
                ),
                subject(
                    "HPC",
                    3,
                    &[
                        ("M1", 10.0, 0.0),
                        ("M2", 10.0, 100.0),
                        ("EndSem", 40.0, 100.0),
                        ("Others", 40.0, 40.0),
                    ],
                ),
                subject(
                    "SE",
                    3,
                    &[
                        ("M1", 10.0, 30.0),
                        ("M2", 10.0, 30.0),
                        ("EndSem", 30.0, 100.0),
                        ("Others", 50.0, 50.0),
                    ],
                ),
                subject(
                    "CN",
                    4,
                    &[
                        ("M1", 15.0, 40.0),
                        ("M2", 15.0, 50.0),
                        ("EndSem", 30.0, 100.0),
                        ("Others", 40.0, 40.0),
                    ],
                ),
                subject(
                    "CB",
                    3,
                    &[
                        ("M1", 10.0, 10.0),
                        ("M2", 30.0, 30.0),
                        ("EndSem", 40.0, 100.0),
                        ("Others", 20.0, 20.0),
                    ],
                ),
            ],
        }
    }
}
