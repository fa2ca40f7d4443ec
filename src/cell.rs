use std::cmp::Ordering;
use std::fmt;

use ratatui::style::Style;

/// A single datum stored in a row.
///
/// `Styled` wraps another value with a display style. The wrapper only matters
/// for rendering, sorting and filtering always look at [`CellValue::value`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Styled(Box<CellValue>, Style),
}

impl CellValue {
    pub fn styled(value: impl Into<CellValue>, style: Style) -> Self {
        CellValue::Styled(Box::new(value.into()), style)
    }

    /// The logical value with every style wrapper removed.
    pub fn value(&self) -> &CellValue {
        match self {
            CellValue::Styled(inner, _) => inner.value(),
            other => other,
        }
    }

    /// Combined style of all wrappers, the innermost wrapper wins.
    pub fn style(&self) -> Option<Style> {
        match self {
            CellValue::Styled(inner, style) => Some(match inner.style() {
                Some(inner_style) => style.patch(inner_style),
                None => *style,
            }),
            _ => None,
        }
    }

    pub fn is_styled(&self) -> bool {
        matches!(self, CellValue::Styled(..))
    }

    // Bool < Number < Text
    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Int(_) | CellValue::Float(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Styled(inner, _) => inner.kind_rank(),
        }
    }

    /// Total order over logical values.
    ///
    /// Integers and floats compare numerically with each other, other kinds of
    /// different type fall back to the fixed kind order `Bool < Number < Text`.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self.value(), other.value()) {
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            // -0.0 equals 0.0 so floats agree with the integer order
            (CellValue::Float(a), CellValue::Float(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
            }
            (CellValue::Int(a), CellValue::Float(b)) => compare_int_float(*a, *b),
            (CellValue::Float(a), CellValue::Int(b)) => compare_int_float(*b, *a).reverse(),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }

    /// Text shown in the table and searched by the filter.
    pub fn render(&self) -> String {
        self.value().to_string()
    }
}

/// Exact comparison without rounding the integer through `f64`.
///
/// NaN sorts above every number when positive and below when negative, matching
/// `f64::total_cmp` between floats.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return if f.is_sign_negative() { Ordering::Greater } else { Ordering::Less };
    }
    let floor = f.floor();
    if floor >= TWO_POW_63 {
        return Ordering::Less;
    }
    if floor < -TWO_POW_63 {
        return Ordering::Greater;
    }
    // floor is integral and within i64 range here
    match i128::from(i).cmp(&(floor as i128)) {
        Ordering::Equal if f > floor => Ordering::Less,
        ordering => ordering,
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Styled(inner, _) => inner.fmt(f),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}
