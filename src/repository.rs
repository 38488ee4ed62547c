//! Item records and their loading boundary.
//!
//! Records are validated here so the chart core never sees NaN metrics:
//! rows with unparseable numbers or no id are set aside in
//! [`ItemRepository::excluded`], duplicate ids abort the load.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use fuzzy_matcher::skim::SkimMatcherV2;
use log::{info, warn};
use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};

use crate::error::{Error, Result};
use crate::model::{Item, ItemDetails, ItemId};
use crate::util::{fuzzy_match_score, parse_metric};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    family: String,
    #[serde(default)]
    binomial: String,
    #[serde(default)]
    common_name: String,
    #[serde(default)]
    method: String,
    #[serde(default)]
    injection: String,
    #[serde(default)]
    tested_on: String,
    #[serde(default)]
    lethal_dosage: RawNumber,
    #[serde(default, rename = "yield")]
    venom_yield: RawNumber,
    #[serde(default)]
    size: RawNumber,
    #[serde(default)]
    dentition: String,
}

impl RawRecord {
    fn into_item(self) -> Item {
        let id = self.binomial.trim().to_owned();
        let common_name = self.common_name.trim();
        let display_name = if common_name.is_empty() {
            id.clone()
        } else {
            common_name.to_owned()
        };

        Item {
            category: self.family.trim().to_owned(),
            display_name,
            metric_a: self.lethal_dosage.0,
            metric_b: self.venom_yield.0,
            size_class: self.size.0,
            details: ItemDetails {
                method: self.method,
                injection: self.injection,
                tested_on: self.tested_on,
                dentition: self.dentition,
            },
            id,
        }
    }
}

/// Numeric field that accepts numbers or numeric text. Anything else is NaN.
#[derive(Clone, Copy, Debug)]
struct RawNumber(f64);

impl Default for RawNumber {
    fn default() -> Self {
        Self(f64::NAN)
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawNumberVisitor)
    }
}

struct RawNumberVisitor;

impl<'de> Visitor<'de> for RawNumberVisitor {
    type Value = RawNumber;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a number or numeric text")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber(parse_metric(value)))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber::default())
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber::default())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber::default())
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<RawNumber, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExcludedRecord {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ItemRepository {
    items: Vec<Arc<Item>>,
    index_by_id: HashMap<ItemId, usize>,
    excluded: Vec<ExcludedRecord>,
}

impl ItemRepository {
    /// Builds a repository from already-parsed items, in order.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self> {
        let mut repository = Self::default();

        for item in items {
            if item.id.is_empty() {
                repository.exclude(&item.display_name, "missing id");
                continue;
            }

            if let Some((field, reason)) = item.invalid_field() {
                repository.exclude(&item.id, &format!("{field} {reason}"));
                continue;
            }

            if repository.index_by_id.contains_key(&item.id) {
                return Err(Error::DuplicateId(item.id));
            }

            repository
                .index_by_id
                .insert(item.id.clone(), repository.items.len());
            repository.items.push(Arc::new(item));
        }

        Ok(repository)
    }

    /// Loads a `.csv` or `.json` dataset, picking the parser by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        let repository = match extension.as_deref() {
            Some("csv") => Self::from_csv_reader(std::fs::File::open(path)?)?,
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
        };

        info!(
            "event=dataset_loaded path={} items={} excluded={}",
            path.display(),
            repository.len(),
            repository.excluded.len()
        );
        Ok(repository)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut items = Vec::new();
        for record in reader.deserialize::<RawRecord>() {
            items.push(record?.into_item());
        }
        Self::from_items(items)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let records: Vec<RawRecord> = serde_json::from_str(raw)?;
        Self::from_items(records.into_iter().map(RawRecord::into_item))
    }

    fn exclude(&mut self, id: &str, reason: &str) {
        warn!("event=record_excluded id={id:?} reason={reason:?}");
        self.excluded.push(ExcludedRecord {
            id: id.to_owned(),
            reason: reason.to_owned(),
        });
    }

    pub fn all(&self) -> &[Arc<Item>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Item>> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.items.get(index))
    }

    /// Items passing `predicate`, in load order.
    pub fn matching<P>(&self, predicate: P) -> Vec<Arc<Item>>
    where
        P: Fn(&Item) -> bool,
    {
        self.items
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .collect()
    }

    pub fn excluded(&self) -> &[ExcludedRecord] {
        &self.excluded
    }

    /// Display-name suggestions for a search box, best match first.
    ///
    /// An empty query lists every item alphabetically.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<Arc<Item>> {
        let query = query.trim();
        let mut scored = if query.is_empty() {
            self.items
                .iter()
                .map(|item| (0, Arc::clone(item)))
                .collect::<Vec<_>>()
        } else {
            let matcher = SkimMatcherV2::default();
            self.items
                .iter()
                .filter_map(|item| {
                    fuzzy_match_score(&matcher, &item.display_name, query)
                        .map(|score| (score, Arc::clone(item)))
                })
                .collect::<Vec<_>>()
        };

        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| a.1.display_name.cmp(&b.1.display_name))
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        scored.truncate(limit);
        scored.into_iter().map(|(_, item)| item).collect()
    }
}
