use serde_json::Value;
use std::io;

use super::{headers_of, result_of, split_rows};

/// Write output as CSV to stdout. A result carrying a row set (the
/// amortization schedule) is written one row per payment; otherwise as
/// two-column field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    match result_of(value) {
        Value::Object(result) => {
            let (scalars, row_sets) = split_rows(result);
            if let Some((_, rows)) = row_sets.first() {
                write_rows(wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in scalars {
                    let _ = wtr.write_record([key, &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => write_rows(wtr, arr),
        other => {
            let _ = wtr.write_record([&format_csv_value(other)]);
        }
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let headers = headers_of(rows);
    if headers.is_empty() {
        for item in rows {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    }

    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_written_as_rows() {
        let env = json!({
            "result": {
                "monthly_payment": 100.0,
                "amortization_schedule": [
                    { "payment_number": 1, "remaining_balance": 100.0 },
                    { "payment_number": 2, "remaining_balance": 0.0 }
                ]
            },
            "warnings": []
        });
        assert_eq!(
            render(&env),
            "payment_number,remaining_balance\n1,100.0\n2,0.0\n"
        );
    }

    #[test]
    fn test_flat_result_written_as_pairs() {
        let env = json!({ "result": { "monthly_payment": 4597.35 } });
        assert_eq!(render(&env), "field,value\nmonthly_payment,4597.35\n");
    }
}
