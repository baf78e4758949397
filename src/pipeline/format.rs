//! Number formatting for labels, tooltips and the data table

use crate::config::Unit;

/// Integer part with thousands separators, e.g. `1234567.8` → `1,234,568`
pub fn thousands(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// Full value for tooltips and tables
pub fn value(v: f64, unit: Unit) -> String {
    match unit {
        Unit::Count => thousands(v),
        Unit::Currency => format!("${}", thousands(v)),
    }
}

/// Short value for axis ticks, e.g. `1.2M`, `35k`
pub fn compact(v: f64, unit: Unit) -> String {
    let abs = v.abs();
    let body = if abs >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}k", v / 1e3)
    } else if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    };
    match unit {
        Unit::Count => body,
        Unit::Currency => format!("${}", body),
    }
}

/// Percentage with one decimal
pub fn percent(part: f64, total: f64) -> String {
    if total <= 0.0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part / total * 100.0)
}
