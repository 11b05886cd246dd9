use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Amortization results print the payment breakdown as a field/value table
/// followed by the schedule rows; affordability results print the scalar
/// fields with the program notes and recommendations listed underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_tables(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_tables(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            // Scalar fields first (the breakdown object is hoisted in full).
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            let mut string_lists: Vec<(&str, &Vec<Value>)> = Vec::new();
            let mut row_arrays: Vec<(&str, &Vec<Value>)> = Vec::new();

            for (key, val) in res_map {
                match val {
                    Value::Object(inner) => {
                        for (inner_key, inner_val) in inner {
                            builder.push_record([inner_key.as_str(), &format_value(inner_val)]);
                        }
                    }
                    Value::Array(items) if items.iter().all(Value::is_string) => {
                        string_lists.push((key.as_str(), items));
                    }
                    Value::Array(items) => {
                        row_arrays.push((key.as_str(), items));
                    }
                    _ => {
                        builder.push_record([key.as_str(), &format_value(val)]);
                    }
                }
            }

            let table = Table::from(builder);
            println!("{}", table);

            for (key, items) in string_lists {
                if !items.is_empty() {
                    println!("\n{}:", key);
                    for item in items {
                        if let Value::String(s) = item {
                            println!("  - {}", s);
                        }
                    }
                }
            }

            for (key, items) in row_arrays {
                println!("\n{}:", key);
                print_array_table(items);
            }
        }
        _ => {
            print_flat_object(&Value::Object(envelope.clone()));
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    } else {
        println!("{}", value);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
