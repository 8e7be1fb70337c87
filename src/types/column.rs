use serde::{Deserialize, Serialize};

/// Minimum width (px) given to a column that declares neither a width nor a minimum.
pub const DEFAULT_MIN_WIDTH: f64 = 80.0;

/// Edge a column is pinned to while the body scrolls horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedGroup {
    /// Scrolls with the body (default)
    #[default]
    None,
    /// Pinned to the left edge
    Left,
    /// Pinned to the right edge
    Right,
}

/// A table column.
///
/// A column with `children` (even an empty list) is a group: it carries no
/// width of its own and contributes only its leaves.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Lookup key for resize/remove; may be empty for columns that are never addressed
    #[serde(default)]
    pub key: String,
    /// Declared pixel width; `None` makes the column flexible
    #[serde(default, rename = "width")]
    pub declared_width: Option<f64>,
    #[serde(default)]
    pub min_width: Option<f64>,
    #[serde(default)]
    pub fixed: FixedGroup,
    /// Width computed by the last distribution pass
    #[serde(default, rename = "realWidth", skip_deserializing)]
    pub resolved_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Column>>,
}

impl Column {
    /// Create a flexible leaf column
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Create a group column from its children
    pub fn group(key: impl Into<String>, children: Vec<Column>) -> Self {
        Self {
            key: key.into(),
            children: Some(children),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.declared_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = Some(min_width);
        self
    }

    #[must_use]
    pub fn with_fixed(mut self, fixed: FixedGroup) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    /// Child columns; empty for leaves
    pub fn children(&self) -> &[Column] {
        self.children.as_deref().unwrap_or_default()
    }

    /// True if the column has no numeric declared width
    pub fn is_flexible(&self) -> bool {
        self.declared_width.is_none()
    }

    /// `min_width`, or the 80px default
    pub fn base_min_width(&self) -> f64 {
        self.min_width.unwrap_or(DEFAULT_MIN_WIDTH)
    }

    /// Width the column needs before any slack is handed out:
    /// declared width, else minimum width, else 80px.
    pub fn min_footprint(&self) -> f64 {
        self.declared_width
            .or(self.min_width)
            .unwrap_or(DEFAULT_MIN_WIDTH)
    }
}

/// Backing store for the column tree of one table.
///
/// Leaf order (depth-first, left to right) is the order widths are
/// distributed in.
#[derive(Debug, Clone, Default)]
pub struct ColumnStore {
    columns: Vec<Column>,
}

impl ColumnStore {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Top-level columns, groups included
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
    }

    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Remove the first column (leaf or group) with the given key
    pub fn remove(&mut self, key: &str) -> Option<Column> {
        remove_in(&mut self.columns, key)
    }

    /// Find a column (leaf or group) by key
    pub fn get(&self, key: &str) -> Option<&Column> {
        find_in(&self.columns, key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Column> {
        find_in_mut(&mut self.columns, key)
    }

    /// Flattened leaf columns.
    ///
    /// Returned columns are snapshots: a leaf without its own fixed group
    /// takes the fixed group of the nearest enclosing group.
    pub fn leaves(&self) -> Vec<Column> {
        let mut out = Vec::new();
        collect_leaves(&self.columns, FixedGroup::None, &mut out);
        out
    }

    /// Mutable leaves in the same order as [`ColumnStore::leaves`]
    pub fn leaves_mut(&mut self) -> Vec<&mut Column> {
        let mut out = Vec::new();
        collect_leaves_mut(&mut self.columns, &mut out);
        out
    }

    /// Leaves pinned to the given edge
    pub fn fixed_leaves(&self, group: FixedGroup) -> Vec<Column> {
        self.leaves()
            .into_iter()
            .filter(|c| c.fixed == group)
            .collect()
    }

    /// Number of leaf columns
    pub fn len(&self) -> usize {
        count_leaves(&self.columns)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collect_leaves(columns: &[Column], inherited: FixedGroup, out: &mut Vec<Column>) {
    for column in columns {
        let fixed = match column.fixed {
            FixedGroup::None => inherited,
            own => own,
        };
        if let Some(children) = &column.children {
            collect_leaves(children, fixed, out);
        } else {
            let mut leaf = column.clone();
            leaf.fixed = fixed;
            out.push(leaf);
        }
    }
}

fn collect_leaves_mut<'a>(columns: &'a mut [Column], out: &mut Vec<&'a mut Column>) {
    for column in columns {
        if column.children.is_some() {
            if let Some(children) = column.children.as_mut() {
                collect_leaves_mut(children, out);
            }
        } else {
            out.push(column);
        }
    }
}

fn count_leaves(columns: &[Column]) -> usize {
    columns
        .iter()
        .map(|c| match &c.children {
            Some(children) => count_leaves(children),
            None => 1,
        })
        .sum()
}

fn find_in<'a>(columns: &'a [Column], key: &str) -> Option<&'a Column> {
    columns.iter().find_map(|c| {
        if c.key == key {
            Some(c)
        } else {
            find_in(c.children(), key)
        }
    })
}

fn find_in_mut<'a>(columns: &'a mut [Column], key: &str) -> Option<&'a mut Column> {
    for column in columns.iter_mut() {
        if column.key == key {
            return Some(column);
        }
        if let Some(found) = column
            .children
            .as_mut()
            .and_then(|children| find_in_mut(children, key))
        {
            return Some(found);
        }
    }
    None
}

fn remove_in(columns: &mut Vec<Column>, key: &str) -> Option<Column> {
    if let Some(pos) = columns.iter().position(|c| c.key == key) {
        return Some(columns.remove(pos));
    }
    columns
        .iter_mut()
        .filter_map(|c| c.children.as_mut())
        .find_map(|children| remove_in(children, key))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn grouped_store() -> ColumnStore {
        ColumnStore::new(vec![
            Column::new("id").with_width(60.0).with_fixed(FixedGroup::Left),
            Column::group(
                "address",
                vec![
                    Column::new("city").with_min_width(100.0),
                    Column::new("zip").with_width(70.0),
                ],
            )
            .with_fixed(FixedGroup::Right),
            Column::new("notes"),
        ])
    }

    #[test]
    fn test_leaves_flatten_groups_in_order() {
        let store = grouped_store();
        let keys: Vec<String> = store.leaves().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["id", "city", "zip", "notes"]);
        assert_eq!(store.len(), 4);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_children_inherit_group_fixed() {
        let store = grouped_store();
        let right: Vec<String> = store
            .fixed_leaves(FixedGroup::Right)
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(right, vec!["city", "zip"]);
        assert_eq!(store.fixed_leaves(FixedGroup::Left).len(), 1);
    }

    #[test]
    fn test_remove_nested_column() {
        let mut store = grouped_store();
        let removed = store.remove("zip").unwrap();
        assert_eq!(removed.key, "zip");
        assert_eq!(store.len(), 3);
        assert!(store.get("zip").is_none());
        assert!(store.remove("missing").is_none());
    }

    #[test]
    fn test_emptied_group_has_no_leaves() {
        let mut store = ColumnStore::new(vec![
            Column::new("a"),
            Column::group("g", vec![Column::new("x").with_width(50.0)]),
            Column::group("empty", vec![]),
        ]);
        store.remove("x").unwrap();

        let keys: Vec<String> = store.leaves().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["a"]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.leaves_mut().len(), 1);
        assert!(store.get("g").unwrap().is_group());
        assert!(store.get("g").unwrap().children().is_empty());
    }

    #[test]
    fn test_deserialize_group_and_keyless_columns() {
        let columns: Vec<Column> = serde_json::from_str(
            r#"[{"width":40},{"key":"g","children":[]},{"key":"h","children":[{"key":"y"}]}]"#,
        )
        .unwrap();
        assert_eq!(columns[0].key, "");
        assert!(!columns[0].is_group());
        assert!(columns[1].is_group());
        assert_eq!(columns[2].children().len(), 1);

        let store = ColumnStore::new(columns);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_min_footprint_defaults() {
        assert_eq!(Column::new("a").min_footprint(), DEFAULT_MIN_WIDTH);
        assert_eq!(Column::new("a").with_min_width(50.0).min_footprint(), 50.0);
        assert_eq!(
            Column::new("a")
                .with_min_width(50.0)
                .with_width(120.0)
                .min_footprint(),
            120.0
        );
    }

    #[test]
    fn test_deserialize_column_json() {
        let column: Column = serde_json::from_str(
            r#"{"key":"name","minWidth":120,"fixed":"left","realWidth":999}"#,
        )
        .unwrap();
        assert_eq!(column.key, "name");
        assert_eq!(column.min_width, Some(120.0));
        assert_eq!(column.fixed, FixedGroup::Left);
        assert!(column.is_flexible());
        assert_eq!(column.resolved_width, None);
    }
}
