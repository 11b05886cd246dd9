use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// checking the payment breakdown when the result nests one, then fall
/// back to the first scalar field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "total_monthly_payment",
        "max_purchase_price",
        "principal_and_interest",
        "estimated_monthly_payment",
        "qualification_tier",
    ];

    if let Value::Object(map) = result_obj {
        let breakdown = map.get("breakdown").and_then(Value::as_object);

        for key in &priority_keys {
            let candidate = map
                .get(*key)
                .or_else(|| breakdown.and_then(|b| b.get(*key)));
            if let Some(val) = candidate {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Fall back to first scalar field
        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_object() && !v.is_array()) {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
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
