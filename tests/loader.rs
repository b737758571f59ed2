use std::io::Write;

use ticksim::*;

mod common;

const CSV: &str = "\
process_id,arrival_time,cpu_time1,io_time,cpu_time2
1,0,3,2,1
2,1,2,0,0
3,2,1,1,1
";

#[test]
fn test_load_csv_file_and_run() {
    common::setup_test();
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(CSV.as_bytes()).unwrap();

    let defs = load_path(file.path()).unwrap();
    assert_eq!(defs.len(), 3);
    assert_eq!(defs[0], TaskDef::new(1, 0, 3, 2, 1));

    let result = common::run(PolicyConfig::Fcfs, defs.clone());
    let demand: Tick = defs.iter().map(|d| d.cpu_demand()).sum();
    assert_eq!(result.total_time - result.idle_time, demand);
}

#[test]
fn test_load_json_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    let defs = vec![TaskDef::new("web", 0, 2, 1, 1), TaskDef::new(2, 1, 1, 0, 0)];
    serde_json::to_writer(&mut file, &defs).unwrap();
    file.flush().unwrap();

    assert_eq!(load_path(file.path()).unwrap(), defs);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_path(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, InputError::Io(_)));
}

#[test]
fn test_csv_and_json_agree() {
    let from_csv = load_csv_str(CSV).unwrap();
    let json = serde_json::to_string(&from_csv).unwrap();
    assert_eq!(load_json(&json).unwrap(), from_csv);
}

#[test]
fn test_save_perfetto() {
    common::setup_test();
    let trace = common::trace(
        PolicyConfig::RoundRobin { quantum: 2 },
        load_csv_str(CSV).unwrap(),
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");
    trace.save_perfetto(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let root: serde_json::Value = serde_json::from_str(&text).unwrap();
    let events = root["traceEvents"].as_array().unwrap();
    let slices = events.iter().filter(|e| e["ph"] == "X").count();
    assert_eq!(slices, trace.timeline().len());
    let finished = events.iter().filter(|e| e["name"] == "finished").count();
    assert_eq!(finished, 3);
}
