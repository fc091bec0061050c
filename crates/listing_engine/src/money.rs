/// Rupee amount with Indian digit grouping and no fraction digits (`₹12,34,567`).
///
/// Missing or non-finite amounts render as `₹0`.
pub fn format_inr(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|amount| amount.is_finite()) else {
        return "₹0".to_string();
    };
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}₹{}", group_indian(&format!("{:.0}", rounded.abs())))
}

/// Last three digits, then pairs: 1234567 → 12,34,567.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
