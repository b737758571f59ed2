use ticksim::*;

mod common;

/// A task that arrives after the tick bound trips the runaway guard.
#[test]
fn test_runaway_loop_reported() {
    common::setup_test();
    let scenario = Scenario::builder()
        .task(TaskDef::new(1, 0, 2, 0, 0))
        .task(TaskDef::new(2, 500, 1, 0, 0))
        .max_ticks(100)
        .build()
        .unwrap();
    let err = Simulator::new(PolicyConfig::Fcfs)
        .run(&scenario)
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::RunawayLoop {
            max_ticks: 100,
            unfinished: 1
        }
    ));
    assert!(!err.is_input());
    assert!(err.to_string().contains("100 ticks"));
}

/// A run that finishes exactly at the bound succeeds; one tick less fails.
#[test]
fn test_bound_exactly_sufficient() {
    common::setup_test();
    let scenario = Scenario::builder()
        .task(TaskDef::new(1, 0, 5, 0, 0))
        .max_ticks(5)
        .build()
        .unwrap();
    let result = Simulator::new(PolicyConfig::Fcfs).run(&scenario).unwrap();
    assert_eq!(result.total_time, 5);

    let scenario = Scenario::builder()
        .task(TaskDef::new(1, 0, 5, 0, 0))
        .max_ticks(4)
        .build()
        .unwrap();
    assert!(Simulator::new(PolicyConfig::Fcfs).run(&scenario).is_err());
}

/// An empty workload never dispatches and reports NaN metrics.
#[test]
fn test_empty_workload_is_nan() {
    common::setup_test();
    let scenario = Scenario::builder().max_ticks(10).build().unwrap();
    let result = Simulator::new(PolicyConfig::Srtf).run(&scenario).unwrap();
    assert_eq!(result.total_time, 0);
    assert!(result.timeline.is_empty());
    assert!(result.events.is_empty());
    assert!(result.utilization.is_nan());
    assert!(result.average_response_time.is_nan());
    assert!(result.average_waiting_time.is_nan());

    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert!(value["utilization"].is_null());
    assert!(value["averageResponseTime"].is_null());
}

/// Tasks with nothing to do terminate on arrival without running.
#[test]
fn test_zero_work_tasks() {
    common::setup_test();
    let result = common::run(
        PolicyConfig::Fcfs,
        vec![TaskDef::new("z", 0, 0, 0, 0), TaskDef::new("w", 1, 1, 0, 0)],
    );
    assert_eq!(result.response_time(&Pid::from("z")), None);
    assert_eq!(result.response_time(&Pid::from("w")), Some(1));
    // Only w counts toward the averages.
    common::assert_close(result.average_response_time, 1.0);
    assert_eq!(result.total_time, 2);
    assert_eq!(result.idle_time, 1);
}

#[test]
fn test_invalid_policy_parameters() {
    let err = PolicyConfig::from_parts(PolicyKind::RoundRobin, Some(0), &[]).unwrap_err();
    assert!(matches!(err, InputError::InvalidPolicyParameter(_)));

    let err = PolicyConfig::from_parts(PolicyKind::Mlfq, None, &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "policy mlfq requires parameter level_quanta"
    );

    // A hand-built config with a zero quantum is rejected at run time too.
    let scenario = common::scenario(vec![TaskDef::new(1, 0, 1, 0, 0)]);
    let err = Simulator::new(PolicyConfig::RoundRobin { quantum: 0 })
        .run(&scenario)
        .unwrap_err();
    assert!(err.is_input());
}

#[test]
fn test_duplicate_process_ids() {
    let err = Scenario::builder()
        .task(TaskDef::new(7, 0, 1, 0, 0))
        .task(TaskDef::new("x", 0, 1, 0, 0))
        .task(TaskDef::new(7, 3, 1, 0, 0))
        .build()
        .unwrap_err();
    assert!(matches!(err, InputError::DuplicateProcess(Pid::Num(7))));
}

/// Integer and string ids never collide, and neither collides with idle.
#[test]
fn test_pid_named_idle_is_a_process() {
    common::setup_test();
    let result = common::run(
        PolicyConfig::Fcfs,
        vec![
            TaskDef::new("idle", 1, 1, 0, 0),
            TaskDef::new("1", 0, 1, 0, 0),
            TaskDef::new(1, 3, 1, 0, 0),
        ],
    );
    assert_eq!(result.idle_time, 1);
    assert_eq!(result.response_time(&Pid::from("idle")), Some(1));
    assert_eq!(result.response_time(&Pid::from("1")), Some(0));
    assert_eq!(result.response_time(&Pid::Num(1)), Some(3));
}
