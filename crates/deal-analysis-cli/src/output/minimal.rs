use serde_json::Value;

use super::flatten;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls back
/// to the first leaf of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "current.keyMetrics.capRate",
        "monthlyPayment",
        "amount",
    ];

    let flat = flatten(result_obj);
    if !flat.is_empty() {
        for key in &priority_keys {
            if let Some((_, val)) = flat.iter().find(|(k, v)| k.as_str() == *key && !v.is_null()) {
                println!("{}", format_minimal(val));
                return;
            }
        }

        let (key, val) = &flat[0];
        println!("{}: {}", key, format_minimal(val));
        return;
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
