use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

/// Day and month in the `ar-EG` style, e.g. `١٩ أكتوبر`.
pub fn short_label(date: NaiveDate) -> String {
    format!("{} {}", arabic_digits(date.day()), month_name(date))
}

/// Day, month and year in the `ar-EG` style, e.g. `١٩ أكتوبر ٢٠٢٦`.
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        arabic_digits(date.day()),
        month_name(date),
        arabic_digits(date.year())
    )
}

fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

fn arabic_digits(value: impl ToString) -> String {
    value
        .to_string()
        .chars()
        .map(|ch| match ch.to_digit(10) {
            Some(digit) => char::from_u32(0x0660 + digit).unwrap_or(ch),
            None => ch,
        })
        .collect()
}
