use csv::Reader;
use std::error::Error;
use std::path::Path;

use crate::planner::{CompletedSet, MarksTable};

/// Load a gradesheet CSV with header `subject,component,marks,completed`
/// into the current-marks table and the completed set. Rows with an empty
/// subject are skipped; duplicate rows overwrite earlier ones.
pub fn load_marks_csv<P: AsRef<Path>>(path: P) -> Result<(MarksTable, CompletedSet), Box<dyn Error>> {
    let mut rdr = Reader::from_path(path)?;
    let mut current = MarksTable::new();
    let mut completed = CompletedSet::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let row = index + 2; // line number in the file, after the header

        let subject = record
            .get(0)
            .ok_or_else(|| format!("row {row}: missing subject"))?
            .trim()
            .to_string();
        if subject.is_empty() {
            continue;
        }

        let component = record
            .get(1)
            .ok_or_else(|| format!("row {row}: missing component"))?
            .trim()
            .to_string();
        let marks: f64 = record
            .get(2)
            .ok_or_else(|| format!("row {row}: missing marks"))?
            .trim()
            .parse()
            .map_err(|e| format!("row {row}: bad marks value: {e}"))?;
        let done = matches!(
            record.get(3).map(str::trim),
            Some("1") | Some("true") | Some("yes")
        );

        current
            .entry(subject.clone())
            .or_default()
            .insert(component.clone(), marks);
        if done {
            completed.entry(subject).or_default().insert(component);
        }
    }

    Ok((current, completed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_marks_and_completed_set() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "subject,component,marks,completed").unwrap();
        writeln!(file, "CN,M1,32.5,1").unwrap();
        writeln!(file, "CN,M2,0,0").unwrap();
        writeln!(file, "BD,EndSem,61,true").unwrap();
        writeln!(file, ",ignored,5,1").unwrap();

        let (current, completed) = load_marks_csv(file.path()).expect("load");

        assert_eq!(current["CN"]["M1"], 32.5);
        assert_eq!(current["CN"]["M2"], 0.0);
        assert_eq!(current["BD"]["EndSem"], 61.0);
        assert!(completed["CN"].contains("M1"));
        assert!(!completed["CN"].contains("M2"));
        assert!(completed["BD"].contains("EndSem"));
        assert_eq!(current.len(), 2);
    }

    #[test]
    fn bad_marks_value_is_reported_with_row_number() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "subject,component,marks,completed").unwrap();
        writeln!(file, "CN,M1,not-a-number,0").unwrap();

        let err = load_marks_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }
}
