//! Silent numeric coercion.
//!
//! A cell that does not parse is not an error: it becomes a missing value and
//! is picked up by imputation later. The `Coercion` result keeps "was empty"
//! and "did not parse" apart so cleaners can report malformed cells.

/// Tokens treated as an explicit null (compared case-insensitively).
const NULL_TOKENS: [&str; 7] = ["na", "n/a", "nan", "null", "none", "-", "#n/a"];

/// Outcome of coercing one text cell to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coercion {
    Value(f64),
    /// Empty cell or a null token.
    Absent,
    /// Non-empty text that is not a finite number.
    Malformed,
}

impl Coercion {
    pub fn value(self) -> Option<f64> {
        match self {
            Coercion::Value(v) => Some(v),
            Coercion::Absent | Coercion::Malformed => None,
        }
    }
}

pub fn coerce_numeric(raw: &str) -> Coercion {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t)) {
        return Coercion::Absent;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Coercion::Value(v),
        _ => Coercion::Malformed,
    }
}

/// Per-column coercion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoercionStats {
    pub absent: usize,
    pub malformed: usize,
}

/// Coerce a whole column, returning the numeric cells plus counts.
pub fn coerce_column<'a>(cells: impl Iterator<Item = &'a str>) -> (Vec<Option<f64>>, CoercionStats) {
    let mut stats = CoercionStats::default();
    let values = cells
        .map(|cell| {
            let c = coerce_numeric(cell);
            match c {
                Coercion::Absent => stats.absent += 1,
                Coercion::Malformed => stats.malformed += 1,
                Coercion::Value(_) => {}
            }
            c.value()
        })
        .collect();
    (values, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_parse() {
        assert_eq!(coerce_numeric("42"), Coercion::Value(42.0));
        assert_eq!(coerce_numeric(" 3.5 "), Coercion::Value(3.5));
        assert_eq!(coerce_numeric("-1e2"), Coercion::Value(-100.0));
    }

    #[test]
    fn empty_and_null_tokens_are_absent() {
        for raw in ["", "   ", "NA", "nan", "NULL", "None", "-", "#N/A"] {
            assert_eq!(coerce_numeric(raw), Coercion::Absent, "raw={raw:?}");
        }
    }

    #[test]
    fn garbage_is_malformed_not_an_error() {
        assert_eq!(coerce_numeric("72%"), Coercion::Malformed);
        assert_eq!(coerce_numeric("high"), Coercion::Malformed);
        assert_eq!(coerce_numeric("inf"), Coercion::Malformed);
        assert_eq!(coerce_numeric("high").value(), None);
    }

    #[test]
    fn column_counts() {
        let cells = ["1", "", "x", "2.5", "NA"];
        let (values, stats) = coerce_column(cells.iter().copied());
        assert_eq!(values, vec![Some(1.0), None, None, Some(2.5), None]);
        assert_eq!(stats, CoercionStats { absent: 2, malformed: 1 });
    }
}
