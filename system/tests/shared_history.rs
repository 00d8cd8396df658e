use canvas_system::serde_json::json;
use canvas_system::{MembershipRegistry, Operation, OperationLog, PathData};

fn stroke(color: &str) -> PathData {
    PathData(json!({
        "points": [{"x": 1.0, "y": 1.0}, {"x": 2.0, "y": 3.0}],
        "color": color,
        "size": 3.0,
        "tool": "brush"
    }))
}

#[test]
fn undo_removes_latest_operation_regardless_of_author() {
    let mut members = MembershipRegistry::new();
    members.add(1);
    members.add(2);

    let mut log = OperationLog::new();
    log.append(Operation::draw(1, stroke("#111111"), 100, 0));
    log.append(Operation::draw(2, stroke("#222222"), 101, 1));

    // participant 1 undoes participant 2's stroke
    assert!(log.undo());
    let visible = log.snapshot().operations;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].author_id, 1);
}

#[test]
fn operation_ids_are_unique_within_same_millisecond() {
    let first = Operation::draw(4, stroke("#000000"), 500, 0);
    let second = Operation::draw(4, stroke("#000000"), 500, 1);
    assert_ne!(first.id, second.id);
}

#[test]
fn operation_serializes_in_wire_shape() {
    let operation = Operation::draw(4, stroke("#abcdef"), 500, 9);
    let value = canvas_system::serde_json::to_value(&operation).expect("");
    assert_eq!(value["id"], "4-500-9");
    assert_eq!(value["kind"], "draw");
    assert_eq!(value["userId"], 4);
    assert_eq!(value["timestamp"], 500);
    assert_eq!(value["pathData"]["color"], "#abcdef");
    assert_eq!(value["pathData"]["points"][1]["y"], 3.0);
}
