use crate::config::CurriculumConfig;
use crate::planner::{lookup, MarksTable};

/// Assemble the plain-text gradesheet handed to the export renderer: target
/// header, then per subject one line per component with the obtained marks
/// and the adjusted requirement.
pub fn gradesheet(
    config: &CurriculumConfig,
    current: &MarksTable,
    adjusted: &MarksTable,
    target: f64,
) -> String {
    let mut out = String::new();
    out.push_str("Gradesheet\n");
    out.push_str(&format!("Target SGPA: {target:.2}\n"));
    out.push_str("Current Marks and Required Marks\n");

    for subject in &config.subjects {
        out.push_str(&format!("\n{}\n", subject.name));
        for component in &subject.components {
            let actual = lookup(current, &subject.name, &component.name);
            let required = lookup(adjusted, &subject.name, &component.name);
            out.push_str(&format!(
                "{} marks: {} | Required: {:.2}\n",
                component.name, actual, required
            ));
        }
    }

    out
}
