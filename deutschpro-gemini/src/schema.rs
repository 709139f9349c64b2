//! Response schemas in the OpenAPI subset the API accepts.

use serde_json::{json, Value};

const WORD_TYPES: [&str; 6] = ["noun", "verb", "preposition", "adjective", "adverb", "phrase"];
const GENDERS: [&str; 4] = ["der", "die", "das", "none"];
const REQUIRED: [&str; 6] = ["word", "translation", "type", "level", "example", "exampleTranslation"];

fn item_properties() -> Value {
    json!({
        "word": { "type": "STRING" },
        "translation": { "type": "STRING" },
        "type": { "type": "STRING", "enum": WORD_TYPES },
        "level": { "type": "STRING" },
        "example": { "type": "STRING" },
        "exampleTranslation": { "type": "STRING" },
        "gender": { "type": "STRING", "enum": GENDERS },
        "plural": { "type": "STRING" },
        "isIrregular": { "type": "BOOLEAN" },
        "conjugation": {
            "type": "OBJECT",
            "properties": {
                "present3rd": { "type": "STRING" },
                "past": { "type": "STRING" },
                "pastParticiple": { "type": "STRING" }
            }
        },
        "cases": { "type": "ARRAY", "items": { "type": "STRING" } }
    })
}

pub fn batch_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "required": REQUIRED,
            "properties": item_properties()
        }
    })
}

pub fn lookup_schema() -> Value {
    let mut props = item_properties();
    if let Some(map) = props.as_object_mut() {
        map.insert("exists".into(), json!({ "type": "BOOLEAN" }));
    }
    let mut required: Vec<&str> = REQUIRED.to_vec();
    required.push("exists");
    json!({
        "type": "OBJECT",
        "required": required,
        "properties": props
    })
}
