use time::OffsetDateTime;

/// Formats a monetary amount the way the shop presents prices, for example `R$ 1.250,00`:
/// the `R$` prefix, the integer part grouped by thousands with dots and two fraction
/// digits after a comma. A missing amount stands for "not applicable" in the source
/// records and is formatted as zero.
pub fn format_currency(amount: Option<f64>) -> String {
    // Work on whole cents so that the grouping and the fraction digits cannot drift
    // apart through floating point representation
    let total_cents = (amount.unwrap_or(0.0) * 100.0).round() as i64;
    let integer_part = total_cents / 100;
    let fraction_part = total_cents % 100;

    format!(
        "R$ {},{:02}",
        group_by_thousands(integer_part),
        fraction_part
    )
}

/// Formats the emission instant with the fixed pattern `day/month/year hour:minute`
/// in 24-hour time, zero-padded.
pub fn format_date_time(instant: &OffsetDateTime) -> String {
    format!(
        "{:02}/{:02}/{:04} {:02}:{:02}",
        instant.day(),
        u8::from(instant.month()),
        instant.year(),
        instant.hour(),
        instant.minute(),
    )
}

/// Groups the digits of a non-negative integer in blocks of three, separated by dots.
fn group_by_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    grouped
}
