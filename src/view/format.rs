use chrono::NaiveDateTime;

/// it-IT grouping: `1234567` -> `1.234.567`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Service timestamps are naive ISO-8601 (`2024-05-01T10:20:30.123456`).
pub fn timestamp(raw: &str) -> Option<String> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.format("%d/%m/%Y %H:%M").to_string())
}

pub fn decimal(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1.000");
        assert_eq!(thousands(1234567), "1.234.567");
    }

    #[test]
    fn parses_python_isoformat() {
        assert_eq!(timestamp("2024-05-01T10:20:30.123456").as_deref(), Some("01/05/2024 10:20"));
        assert_eq!(timestamp("yesterday"), None);
    }

    #[test]
    fn decimal_uses_dash_for_missing() {
        assert_eq!(decimal(Some(2.5)), "2.50");
        assert_eq!(decimal(None), "-");
        assert_eq!(decimal(Some(f64::NAN)), "-");
    }
}
