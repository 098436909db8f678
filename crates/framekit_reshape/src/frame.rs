//! Table with a two-level column index.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame};

use crate::error::ReshapeResult;
use crate::spec::SpecColumnKey;

/// Row index, `(group, name)` column index, and one column per index entry.
///
/// Column keys may repeat; lookups by key return the first match.
#[derive(Debug, Clone)]
pub struct HierarchicalFrame {
    index: Column,
    column_index: Vec<SpecColumnKey>,
    columns: Vec<Column>,
}

impl HierarchicalFrame {
    pub(crate) fn from_parts(
        index: Column,
        column_index: Vec<SpecColumnKey>,
        columns: Vec<Column>,
    ) -> Self {
        debug_assert_eq!(column_index.len(), columns.len());
        debug_assert!(columns.iter().all(|col| col.len() == index.len()));
        Self {
            index,
            column_index,
            columns,
        }
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &Column {
        &self.index
    }

    pub fn column_index(&self) -> &[SpecColumnKey] {
        &self.column_index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// First column addressed by `key`.
    pub fn column(&self, key: &SpecColumnKey) -> Option<&Column> {
        self.column_index
            .iter()
            .position(|key_col| key_col == key)
            .map(|n_idx| &self.columns[n_idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpecColumnKey, &Column)> {
        self.column_index.iter().zip(self.columns.iter())
    }

    /// Distinct group labels in first-appearance order.
    pub fn groups(&self) -> Vec<&str> {
        let mut set_seen = BTreeSet::new();
        self.column_index
            .iter()
            .filter(|key| set_seen.insert(key.group.as_str()))
            .map(|key| key.group.as_str())
            .collect()
    }

    /// Sub-frame with the columns of one group, order kept.
    pub fn select_group(&self, group: &str) -> HierarchicalFrame {
        let (column_index, columns): (Vec<_>, Vec<_>) = self
            .iter()
            .filter(|(key, _)| key.group == group)
            .map(|(key, col)| (key.clone(), col.clone()))
            .unzip();
        Self::from_parts(self.index.clone(), column_index, columns)
    }

    /// Unique flat column names: `group.name`, then `__2`, `__3` on repeats.
    pub fn derive_flat_names(&self) -> Vec<String> {
        let mut set_used: BTreeSet<String> = BTreeSet::new();
        set_used.insert(self.index.name().to_string());

        self.column_index
            .iter()
            .map(|key| {
                let c_base = format!("{}.{}", key.group, key.name);
                let mut c_candidate = c_base.clone();
                let mut n_idx = 2usize;
                while set_used.contains(&c_candidate) {
                    c_candidate = format!("{c_base}__{n_idx}");
                    n_idx += 1;
                }
                set_used.insert(c_candidate.clone());
                c_candidate
            })
            .collect()
    }

    /// Flatten into a DataFrame with names from [`Self::derive_flat_names`].
    ///
    /// With `if_include_index`, the row index is the first column.
    pub fn to_flat_dataframe(&self, if_include_index: bool) -> ReshapeResult<DataFrame> {
        let mut l_cols = Vec::with_capacity(self.width() + 1);
        if if_include_index {
            l_cols.push(self.index.clone());
        }
        for (c_flat, col) in self.derive_flat_names().into_iter().zip(&self.columns) {
            let mut col_out = col.clone();
            col_out.rename(c_flat.into());
            l_cols.push(col_out);
        }
        Ok(DataFrame::new(l_cols)?)
    }

    /// Two-row string header (`group`, `name`) aligned with the flat frame
    /// without index.
    pub fn to_header_dataframe(&self) -> ReshapeResult<DataFrame> {
        let l_cols = self
            .derive_flat_names()
            .into_iter()
            .zip(&self.column_index)
            .map(|(c_flat, key)| {
                Column::new(c_flat.into(), &[key.group.as_str(), key.name.as_str()])
            })
            .collect();
        Ok(DataFrame::new(l_cols)?)
    }
}
