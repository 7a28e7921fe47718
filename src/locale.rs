//! Display names for month and day codes in the serving locale (Indonesian).

/// Month codes in calendar order with their display names
pub const MONTH_NAMES: [(&str, &str); 12] = [
    ("jan", "Januari"),
    ("feb", "Februari"),
    ("mar", "Maret"),
    ("apr", "April"),
    ("may", "Mei"),
    ("jun", "Juni"),
    ("jul", "Juli"),
    ("aug", "Agustus"),
    ("sep", "September"),
    ("oct", "Oktober"),
    ("nov", "November"),
    ("dec", "Desember"),
];

/// Day codes in week order with their display names
pub const DAY_NAMES: [(&str, &str); 7] = [
    ("mon", "Senin"),
    ("tue", "Selasa"),
    ("wed", "Rabu"),
    ("thu", "Kamis"),
    ("fri", "Jumat"),
    ("sat", "Sabtu"),
    ("sun", "Minggu"),
];

/// Unit label for hectares
pub const AREA_UNIT: &str = "hektar";

/// Display name for a month code, or the code itself if unknown
pub fn month_name(code: &str) -> &str {
    lookup(&MONTH_NAMES, code)
}

/// Display name for a day code, or the code itself if unknown
pub fn day_name(code: &str) -> &str {
    lookup(&DAY_NAMES, code)
}

fn lookup<'a>(table: &'static [(&'static str, &'static str)], code: &'a str) -> &'a str {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names() {
        assert_eq!(month_name("mar"), "Maret");
        assert_eq!(month_name("aug"), "Agustus");
        assert_eq!(month_name("dec"), "Desember");
    }

    #[test]
    fn test_day_names() {
        assert_eq!(day_name("fri"), "Jumat");
        assert_eq!(day_name("sun"), "Minggu");
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(month_name("xyz"), "xyz");
        assert_eq!(day_name(""), "");
    }
}
