//! Column width distribution.
//!
//! Flexible columns (no declared width) share whatever space the container
//! has beyond every column's minimum footprint. Shares are proportional to
//! each flexible column's minimum width and floored; the first flexible
//! column absorbs the rounding remainder so the row always fills the
//! container exactly.

use crate::types::{Column, FixedGroup};

/// Result of one distribution pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidthDistribution {
    /// New `resolved_width` for each leaf, in leaf order
    pub widths: Vec<Option<f64>>,
    /// Columns need more room than the container offers
    pub scroll_x: bool,
    /// Width of the column row
    pub body_width: f64,
    /// Total width of left-pinned leaves (`None` if there are none)
    pub fixed_width: Option<f64>,
    /// Total width of right-pinned leaves (`None` if there are none)
    pub right_fixed_width: Option<f64>,
}

/// Distribute `content_width` over flattened leaf columns.
///
/// With `fit` and at least one flexible column, flexible columns stretch to
/// fill the container (or fall back to their minimum widths on overflow) and
/// declared-width columns get no resolved width. Otherwise every column is
/// resolved to its minimum footprint.
pub fn distribute(leaves: &[Column], content_width: f64, fit: bool) -> WidthDistribution {
    let has_flexible = leaves.iter().any(Column::is_flexible);

    let (widths, scroll_x, body_width) = if fit && has_flexible {
        fit_widths(leaves, content_width)
    } else {
        natural_widths(leaves, content_width)
    };

    let fixed_width = group_width(leaves, &widths, FixedGroup::Left);
    let right_fixed_width = group_width(leaves, &widths, FixedGroup::Right);

    WidthDistribution {
        widths,
        scroll_x,
        body_width,
        fixed_width,
        right_fixed_width,
    }
}

fn fit_widths(leaves: &[Column], content_width: f64) -> (Vec<Option<f64>>, bool, f64) {
    let min_total: f64 = leaves.iter().map(Column::min_footprint).sum();
    let body_width = min_total.max(content_width);

    if min_total > content_width {
        // Horizontal scrollbar: flexible columns keep their minimum width
        let widths = leaves
            .iter()
            .map(|c| c.is_flexible().then(|| c.base_min_width()))
            .collect();
        return (widths, true, body_width);
    }

    let slack = content_width - min_total;
    let flex_base: f64 = leaves
        .iter()
        .filter(|c| c.is_flexible())
        .map(Column::base_min_width)
        .sum();
    let per_pixel = if flex_base > 0.0 {
        slack / flex_base
    } else {
        0.0
    };

    let share = |column: &Column| (column.base_min_width() * per_pixel).floor();
    let others: f64 = leaves
        .iter()
        .filter(|c| c.is_flexible())
        .skip(1)
        .map(share)
        .sum();

    let mut first = true;
    let widths = leaves
        .iter()
        .map(|c| {
            if !c.is_flexible() {
                return None;
            }
            let base = c.base_min_width();
            if std::mem::take(&mut first) {
                Some(base + slack - others)
            } else {
                Some(base + share(c))
            }
        })
        .collect();

    (widths, false, body_width)
}

fn natural_widths(leaves: &[Column], content_width: f64) -> (Vec<Option<f64>>, bool, f64) {
    let widths: Vec<Option<f64>> = leaves.iter().map(|c| Some(c.min_footprint())).collect();
    let total: f64 = widths.iter().flatten().sum();
    (widths, total > content_width, total)
}

fn group_width(leaves: &[Column], widths: &[Option<f64>], group: FixedGroup) -> Option<f64> {
    let mut members = leaves
        .iter()
        .zip(widths)
        .filter(|(c, _)| c.fixed == group)
        .peekable();
    members.peek()?;
    Some(
        members
            .map(|(c, w)| w.or(c.declared_width).unwrap_or(0.0))
            .sum(),
    )
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
    use crate::types::DEFAULT_MIN_WIDTH;

    fn three_columns() -> Vec<Column> {
        vec![
            Column::new("a").with_min_width(80.0),
            Column::new("b").with_width(100.0),
            Column::new("c").with_min_width(60.0),
        ]
    }

    #[test]
    fn test_slack_goes_to_flexible_columns() {
        let result = distribute(&three_columns(), 300.0, true);
        // slack 60 over base 140: "c" gets floor(60 * 60 / 140) = 25
        assert_eq!(result.widths, vec![Some(115.0), None, Some(85.0)]);
        assert!(!result.scroll_x);
        assert_eq!(result.body_width, 300.0);
    }

    #[test]
    fn test_overflow_falls_back_to_min_widths() {
        let result = distribute(&three_columns(), 200.0, true);
        assert_eq!(result.widths, vec![Some(80.0), None, Some(60.0)]);
        assert!(result.scroll_x);
        assert_eq!(result.body_width, 240.0);
    }

    #[test]
    fn test_single_flexible_column_takes_all_slack() {
        let columns = vec![
            Column::new("a").with_width(120.0),
            Column::new("b").with_min_width(90.0),
        ];
        let result = distribute(&columns, 517.0, true);
        assert_eq!(result.widths, vec![None, Some(90.0 + 517.0 - 210.0)]);
    }

    #[test]
    fn test_no_fit_uses_footprints() {
        let result = distribute(&three_columns(), 200.0, false);
        assert_eq!(result.widths, vec![Some(80.0), Some(100.0), Some(60.0)]);
        assert!(result.scroll_x);
        assert_eq!(result.body_width, 240.0);
    }

    #[test]
    fn test_no_flexible_columns_uses_footprints() {
        let columns = vec![
            Column::new("a").with_width(100.0),
            Column::new("b").with_width(50.0),
        ];
        let result = distribute(&columns, 400.0, true);
        assert_eq!(result.widths, vec![Some(100.0), Some(50.0)]);
        assert!(!result.scroll_x);
        assert_eq!(result.body_width, 150.0);
    }

    #[test]
    fn test_default_min_width() {
        let columns = vec![Column::new("a"), Column::new("b")];
        let result = distribute(&columns, 100.0, false);
        assert_eq!(
            result.widths,
            vec![Some(DEFAULT_MIN_WIDTH), Some(DEFAULT_MIN_WIDTH)]
        );
        assert!(result.scroll_x);
    }

    #[test]
    fn test_zero_columns() {
        let result = distribute(&[], 500.0, true);
        assert!(result.widths.is_empty());
        assert!(!result.scroll_x);
        assert_eq!(result.body_width, 0.0);
        assert_eq!(result.fixed_width, None);
        assert_eq!(result.right_fixed_width, None);
    }

    #[test]
    fn test_fixed_group_widths() {
        let columns = vec![
            Column::new("a")
                .with_min_width(80.0)
                .with_fixed(FixedGroup::Left),
            Column::new("b")
                .with_width(100.0)
                .with_fixed(FixedGroup::Left),
            Column::new("c")
                .with_min_width(60.0)
                .with_fixed(FixedGroup::Right),
        ];
        let result = distribute(&columns, 300.0, true);
        // Left: resolved 115 + declared 100
        assert_eq!(result.fixed_width, Some(215.0));
        assert_eq!(result.right_fixed_width, Some(85.0));
    }

    #[test]
    fn test_zero_min_widths_do_not_produce_nan() {
        let columns = vec![
            Column::new("a").with_min_width(0.0),
            Column::new("b").with_min_width(0.0),
        ];
        let result = distribute(&columns, 50.0, true);
        assert_eq!(result.widths, vec![Some(50.0), Some(0.0)]);
    }
}
