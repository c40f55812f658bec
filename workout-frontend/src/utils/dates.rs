use chrono::{DateTime, Datelike};

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Formats an ISO-8601 timestamp as a long pt-BR date, e.g.
/// "15 de outubro de 2026". Unparseable input is returned as is.
pub fn long_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS[date.month0() as usize],
            date.year()
        ),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_date() {
        assert_eq!(long_date("2026-10-15T09:30:00.000Z"), "15 de outubro de 2026");
        assert_eq!(long_date("2026-03-01T00:00:00-03:00"), "1 de março de 2026");
    }

    #[test]
    fn test_unparseable_date_is_kept() {
        assert_eq!(long_date("ontem"), "ontem");
        assert_eq!(long_date(""), "");
    }
}
