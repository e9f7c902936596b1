use crate::csv_processor::reader::Row;
use crate::utils::{PayrollSortError, Result};
use std::cmp::Ordering;

/// Worker name in the payroll export.
pub const CATEGORY_COLUMN: usize = 4;
/// Worker id in the payroll export.
pub const NUMBER_COLUMN: usize = 2;

/// A decimal integer of any size: optional sign, then ASCII digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer<'a> {
    negative: bool,
    /// Magnitude without leading zeros; empty for zero.
    digits: &'a str,
}

impl<'a> Integer<'a> {
    pub fn parse(text: &'a str) -> Option<Self> {
        let (negative, unsigned) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = unsigned.trim_start_matches('0');
        Some(Self {
            negative: negative && !digits.is_empty(),
            digits,
        })
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(other.digits))
    }
}

impl Ord for Integer<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for Integer<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordering key of a row: name first, then id.
///
/// Field order matters: the derived `Ord` compares `category` before `number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey<'a> {
    pub category: &'a str,
    pub number: Integer<'a>,
}

impl<'a> SortKey<'a> {
    pub fn from_row(row: &'a Row) -> Result<Self> {
        let category = row
            .get(CATEGORY_COLUMN)
            .ok_or(PayrollSortError::MissingColumn {
                line: row.line,
                column: CATEGORY_COLUMN,
                found: row.len(),
            })?;
        let raw = row
            .get(NUMBER_COLUMN)
            .ok_or(PayrollSortError::MissingColumn {
                line: row.line,
                column: NUMBER_COLUMN,
                found: row.len(),
            })?;
        let number = Integer::parse(raw).ok_or_else(|| PayrollSortError::InvalidNumber {
            line: row.line,
            column: NUMBER_COLUMN,
            value: raw.to_string(),
        })?;

        Ok(Self { category, number })
    }
}

/// Stable sort by [`SortKey`]. Every key is derived before any reordering,
/// so the first bad row in input order is the one reported.
pub fn sort_rows(rows: Vec<Row>) -> Result<Vec<Row>> {
    let order = {
        let mut keyed = rows
            .iter()
            .enumerate()
            .map(|(index, row)| SortKey::from_row(row).map(|key| (key, index)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, index)| index).collect::<Vec<_>>()
    };

    let mut slots: Vec<Option<Row>> = rows.into_iter().map(Some).collect();
    let sorted: Vec<Row> = order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();

    tracing::info!("Sorted {} rows", sorted.len());
    Ok(sorted)
}
