/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{dec_part}")
}

pub fn rule(width: usize) -> String {
    "=".repeat(width)
}
