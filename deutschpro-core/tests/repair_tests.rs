use deutschpro_core::{parse_array_lenient, repair_json_array};

#[test]
fn truncated_mid_object_keeps_complete_ones() {
    let out = repair_json_array(r#"[{"word":"Haus"},{"word":"Bau"#);
    assert_eq!(out, r#"[{"word":"Haus"}]"#);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 1);
}

#[test]
fn no_complete_object_yields_empty_array() {
    assert_eq!(repair_json_array(r#"[{"word":"H"#), "[]");
    assert_eq!(repair_json_array(""), "[]");
    assert_eq!(repair_json_array("["), "[]");
}

#[test]
fn well_formed_array_is_unchanged() {
    let src = r#"[{"word":"Haus","type":"noun"},{"word":"gehen","type":"verb"}]"#;
    assert_eq!(repair_json_array(src), src);
    assert_eq!(repair_json_array("[]"), "[]");
}

#[test]
fn repair_is_idempotent() {
    let once = repair_json_array(r#"[{"a":1},{"b":{"c":2}},{"d":"#);
    assert_eq!(once, r#"[{"a":1},{"b":{"c":2}}]"#);
    assert_eq!(repair_json_array(&once), once);
}

#[test]
fn trailing_text_after_array_is_dropped() {
    let out = repair_json_array(r#"[{"a":1}] and some chatter"#);
    assert_eq!(out, r#"[{"a":1}]"#);
}

#[test]
fn lenient_parse_of_truncated_chunk() {
    let items = parse_array_lenient("```json\n[{\"word\":\"Haus\"},{\"word\":\"Ba");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["word"], "Haus");
}
