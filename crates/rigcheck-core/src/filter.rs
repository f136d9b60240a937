use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::collate::{compare_text, contains_folded};
use crate::descriptor::{descriptor, CategoryDescriptor, FieldKind, FieldValue};
use crate::part::{Category, Part};

/// Accepted values for one filter dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criterion {
    OneOf { values: BTreeSet<String> },
    Range { min: f64, max: f64 },
}

impl Criterion {
    /// An empty value set leaves its dimension inactive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::OneOf { values } => !values.is_empty(),
            Self::Range { .. } => true,
        }
    }

    fn accepts(&self, value: &FieldValue<'_>) -> bool {
        match self {
            Self::OneOf { values } => {
                value.discrete_keys().iter().any(|key| values.contains(key))
            }
            Self::Range { min, max } => {
                if min.is_nan() || max.is_nan() || min > max {
                    return false;
                }
                value.as_number().is_some_and(|number| (*min..=*max).contains(&number))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterCriteria {
    #[serde(default)]
    pub dimensions: BTreeMap<String, Criterion>,
    #[serde(default)]
    pub search: Option<String>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn one_of<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions.insert(
            key.to_string(),
            Criterion::OneOf { values: values.into_iter().map(Into::into).collect() },
        );
        self
    }

    #[must_use]
    pub fn range(mut self, key: &str, min: f64, max: f64) -> Self {
        self.dimensions.insert(key.to_string(), Criterion::Range { min, max });
        self
    }

    #[must_use]
    pub fn search(mut self, text: &str) -> Self {
        self.search = Some(text.to_string());
        self
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|term| !term.is_empty())
    }

    #[must_use]
    pub fn is_inactive(&self) -> bool {
        self.search_term().is_none() && !self.dimensions.values().any(Criterion::is_active)
    }

    fn matches(&self, spec: &CategoryDescriptor, part: &Part) -> bool {
        if let Some(term) = self.search_term() {
            let in_name = contains_folded(part.name(), term);
            let in_brand = part.brand().is_some_and(|brand| contains_folded(brand, term));
            if !in_name && !in_brand {
                return false;
            }
        }

        self.dimensions
            .iter()
            .filter(|(_, criterion)| criterion.is_active())
            .all(|(key, criterion)| criterion.accepts(&spec.value(part, key)))
    }
}

/// Keep the records of `category` that satisfy every active criterion, in input order.
pub fn filter_parts<'a, I>(category: Category, records: I, criteria: &FilterCriteria) -> Vec<&'a Part>
where
    I: IntoIterator<Item = &'a Part>,
{
    let spec = descriptor(category);
    let mut seen = 0_usize;
    let kept: Vec<&'a Part> = records
        .into_iter()
        .inspect(|_| seen += 1)
        .filter(|part| criteria.matches(spec, part))
        .collect();
    tracing::debug!(%category, seen, kept = kept.len(), "filtered records");
    kept
}

/// Distinct discrete values of `key` across `records`, in display order.
pub fn facet_values<'a, I>(category: Category, records: I, key: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a Part>,
{
    let spec = descriptor(category);
    let mut values: Vec<String> = records
        .into_iter()
        .flat_map(|part| spec.value(part, key).discrete_keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    match spec.field(key).map(|field| field.kind) {
        Some(FieldKind::Number) => values.sort_by(|lhs, rhs| compare_numeric_keys(lhs, rhs)),
        _ => values.sort_by(|lhs, rhs| compare_text(lhs, rhs)),
    }
    values
}

/// Numbers in numeric order, then anything unparsable in text order.
fn compare_numeric_keys(lhs: &str, rhs: &str) -> Ordering {
    match (lhs.parse::<f64>(), rhs.parse::<f64>()) {
        (Ok(lhs), Ok(rhs)) => lhs.total_cmp(&rhs),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => compare_text(lhs, rhs),
    }
}

/// Smallest and largest numeric value of `key` across `records`.
pub fn range_extent<'a, I>(category: Category, records: I, key: &str) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a Part>,
{
    let spec = descriptor(category);
    records
        .into_iter()
        .filter_map(|part| spec.value(part, key).as_number())
        .fold(None, |extent, value| match extent {
            None => Some((value, value)),
            Some((low, high)) => Some((f64::min(low, value), f64::max(high, value))),
        })
}
