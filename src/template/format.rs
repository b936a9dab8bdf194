use serde_json::Value;

/// Display a count: integral numbers without decimals, graded arrays as `a (b, c)`.
pub fn count_fmt(value: &Value) -> String {
    graded_fmt(value, format_number)
}

/// Display a length in inches, rounded to the nearest quarter inch: `2½"`.
pub fn length_fmt(value: &Value) -> String {
    graded_fmt(value, format_inches)
}

fn graded_fmt(value: &Value, scalar: fn(&Value) -> String) -> String {
    match value {
        Value::Array(items) if !items.is_empty() => {
            let parts: Vec<String> = items.iter().map(scalar).collect();
            if parts.iter().all(|p| p == &parts[0]) {
                return parts[0].clone();
            }
            format!("{} ({})", parts[0], parts[1..].join(", "))
        }
        other => scalar(other),
    }
}

pub(crate) fn format_number(value: &Value) -> String {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => format_float(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn format_float(f: f64) -> String {
    if (f - f.round()).abs() < 1e-9 {
        return format!("{}", f.round() as i64);
    }
    let s = format!("{f:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn format_inches(value: &Value) -> String {
    let Some(inches) = value.as_f64() else {
        return format_number(value);
    };
    let quarters = (inches * 4.0).round() as i64;
    let whole = quarters / 4;
    let frac = match quarters % 4 {
        1 => "¼",
        2 => "½",
        3 => "¾",
        _ => "",
    };
    if whole == 0 && !frac.is_empty() {
        format!("{frac}\"")
    } else {
        format!("{whole}{frac}\"")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/format.rs"]
mod tests;
