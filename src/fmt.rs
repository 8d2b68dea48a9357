/// Format an amount with thousands separators and a trailing currency
/// symbol: 1,234.56€
pub fn money(val: f64, currency: &str) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    format!("{sign}{with_commas}.{dec_part}{currency}")
}

pub fn percent(val: f64) -> String {
    format!("{val:.1}%")
}

/// Text progress bar, clamped to 0..=100 percent.
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let ratio = percentage.clamp(0.0, 100.0) / 100.0;
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(width - filled))
}
