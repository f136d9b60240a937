use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::collate::compare_text;
use crate::descriptor::{descriptor, FieldValue};
use crate::part::{Category, Part};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Column sort state of one browsing view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Sorting the active key again flips direction; any other key starts ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    /// Apply the current state; without a key the input order is kept.
    #[must_use]
    pub fn apply<'a>(&self, category: Category, records: Vec<&'a Part>) -> Vec<&'a Part> {
        match self.key.as_deref() {
            Some(key) => sort_parts(category, records, key, self.direction),
            None => records,
        }
    }
}

fn rank(value: &FieldValue<'_>) -> u8 {
    match value {
        FieldValue::Missing => 0,
        FieldValue::Flag(_) => 1,
        FieldValue::Number(_) => 2,
        FieldValue::Text(_) | FieldValue::TextList(_) => 3,
    }
}

fn compare_values(lhs: &FieldValue<'_>, rhs: &FieldValue<'_>) -> Ordering {
    match (lhs, rhs) {
        (FieldValue::Number(lhs), FieldValue::Number(rhs)) => lhs.total_cmp(rhs),
        (FieldValue::Flag(lhs), FieldValue::Flag(rhs)) => lhs.cmp(rhs),
        (FieldValue::Text(lhs), FieldValue::Text(rhs)) => compare_text(lhs, rhs),
        (FieldValue::TextList(lhs), FieldValue::TextList(rhs)) => lhs
            .iter()
            .zip(rhs.iter())
            .map(|(lhs, rhs)| compare_text(lhs, rhs))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| lhs.len().cmp(&rhs.len())),
        _ => rank(lhs).cmp(&rank(rhs)),
    }
}

/// Stable sort of `records` by `key`.
///
/// Missing values order below every present value before direction is applied,
/// so they lead an ascending sort and trail a descending one. Equal keys keep
/// their input order in both directions.
pub fn sort_parts<'a, I>(
    category: Category,
    records: I,
    key: &str,
    direction: SortDirection,
) -> Vec<&'a Part>
where
    I: IntoIterator<Item = &'a Part>,
{
    let spec = descriptor(category);
    let mut keyed: Vec<(FieldValue<'a>, &'a Part)> =
        records.into_iter().map(|part| (spec.value(part, key), part)).collect();

    keyed.sort_by(|(lhs, _), (rhs, _)| {
        let ordering = compare_values(lhs, rhs);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, part)| part).collect()
}
