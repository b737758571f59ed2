//! Task file loading.
//!
//! Two formats are accepted:
//!
//! - **CSV** with a header row naming `process_id`, `arrival_time`,
//!   `cpu_time1`, `io_time` and `cpu_time2`. Columns may come in any order
//!   and extra columns are ignored. Fields are whitespace-trimmed.
//!   Integer-looking process ids become integer pids.
//! - **JSON**: an array of task objects with camelCase keys
//!   (`processId`, `arrivalTime`, `cpuBurst1`, `ioTime`, `cpuBurst2`).
//!
//! Duplicate ids are not checked here; [`crate::Scenario`] rejects them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::debug;

use crate::error::InputError;
use crate::task::TaskDef;
use crate::types::{Pid, Tick};

/// One CSV record.
#[derive(Debug, Deserialize)]
struct CsvRow {
    process_id: String,
    arrival_time: Tick,
    cpu_time1: Tick,
    io_time: Tick,
    cpu_time2: Tick,
}

impl CsvRow {
    fn into_def(self, line: u64) -> Result<TaskDef, InputError> {
        if self.process_id.is_empty() {
            return Err(InputError::InvalidValue(format!(
                "line {line}: empty process_id"
            )));
        }
        Ok(TaskDef {
            pid: Pid::parse(&self.process_id),
            arrival_time: self.arrival_time,
            cpu_burst1: self.cpu_time1,
            io_time: self.io_time,
            cpu_burst2: self.cpu_time2,
        })
    }
}

/// Parse CSV task records from a reader.
pub fn load_csv(reader: impl Read) -> Result<Vec<TaskDef>, InputError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut defs = Vec::new();
    for record in rdr.deserialize::<CsvRow>() {
        let row = record?;
        // Header is line 1.
        let line = defs.len() as u64 + 2;
        defs.push(row.into_def(line)?);
    }
    debug!(tasks = defs.len(), "loaded CSV task file");
    Ok(defs)
}

/// Parse CSV task records from a string.
pub fn load_csv_str(csv: &str) -> Result<Vec<TaskDef>, InputError> {
    load_csv(csv.as_bytes())
}

/// Parse a JSON array of task objects.
pub fn load_json(json: &str) -> Result<Vec<TaskDef>, InputError> {
    let defs: Vec<TaskDef> = serde_json::from_str(json)?;
    debug!(tasks = defs.len(), "loaded JSON task file");
    Ok(defs)
}

/// Load a task file, choosing the format by extension: `.json` is JSON,
/// anything else is CSV.
pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<TaskDef>, InputError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let mut json = String::new();
        File::open(path)?.read_to_string(&mut json)?;
        load_json(&json)
    } else {
        load_csv(File::open(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_any_column_order() {
        let csv = "\
cpu_time2, io_time ,process_id,arrival_time,cpu_time1
2, 3, 1, 0, 4
0, 0, web, 5, 1
";
        let defs = load_csv_str(csv).unwrap();
        assert_eq!(
            defs,
            vec![
                TaskDef::new(1, 0, 4, 3, 2),
                TaskDef::new("web", 5, 1, 0, 0),
            ]
        );
    }

    #[test]
    fn test_csv_rejects_bad_numbers() {
        let csv = "process_id,arrival_time,cpu_time1,io_time,cpu_time2\n1,0,-2,0,0\n";
        assert!(matches!(load_csv_str(csv), Err(InputError::Csv(_))));

        let csv = "process_id,arrival_time,cpu_time1,io_time,cpu_time2\n1,zero,2,0,0\n";
        assert!(matches!(load_csv_str(csv), Err(InputError::Csv(_))));
    }

    #[test]
    fn test_csv_rejects_missing_column() {
        let csv = "process_id,arrival_time,cpu_time1,io_time\n1,0,2,0\n";
        assert!(matches!(load_csv_str(csv), Err(InputError::Csv(_))));
    }

    #[test]
    fn test_csv_rejects_empty_pid() {
        let csv = "process_id,arrival_time,cpu_time1,io_time,cpu_time2\n ,0,2,0,0\n";
        assert!(matches!(
            load_csv_str(csv),
            Err(InputError::InvalidValue(msg)) if msg.contains("line 2")
        ));
    }

    #[test]
    fn test_json_array() {
        let json = r#"[
            {"processId": 1, "arrivalTime": 0, "cpuBurst1": 3, "ioTime": 2, "cpuBurst2": 1},
            {"processId": "db", "arrivalTime": 2, "cpuBurst1": 1, "ioTime": 0, "cpuBurst2": 0}
        ]"#;
        let defs = load_json(json).unwrap();
        assert_eq!(defs[0], TaskDef::new(1, 0, 3, 2, 1));
        assert_eq!(defs[1].pid, Pid::from("db"));
        assert!(matches!(load_json("{}"), Err(InputError::Json(_))));
    }
}
