//! Rupee formatting for replies and documents
//!
//! Amounts in replies are whole rupees with Western thousands grouping
//! (300000 → "3,00,000" is deliberately NOT used; the chat surface and
//! the sanction letter both group by thousands: "300,000").

/// Format a whole-rupee amount with comma thousands separators.
///
/// Negative amounts keep the sign in front of the grouped digits.
pub fn format_inr(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
