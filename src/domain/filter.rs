// Row filtering against a widget's predicate list
use super::data_source::Record;
use super::widget::{FilterCondition, FilterKind, WidgetFilter};

/// Whether the predicate part of `filter` matches `row`, ignoring include/exclude.
fn predicate_matches(filter: &WidgetFilter, row: &Record) -> bool {
    let cell = row.get(&filter.field);
    let actual = || cell.map(|c| c.as_text()).unwrap_or_default().to_lowercase();
    let expected = filter.value.to_lowercase();

    match filter.condition {
        FilterCondition::IsNull => cell.map(|c| c.is_blank()).unwrap_or(true),
        FilterCondition::Equal => actual() == expected,
        FilterCondition::Contains => actual().contains(&expected),
        FilterCondition::StartsWith => actual().starts_with(&expected),
    }
}

/// Whether a single filter keeps the row. An empty `field` always does.
pub fn passes(filter: &WidgetFilter, row: &Record) -> bool {
    if filter.field.is_empty() {
        return true;
    }
    predicate_matches(filter, row) == (filter.kind == FilterKind::Include)
}

/// A row is kept only if every filter keeps it.
pub fn row_matches(filters: &[WidgetFilter], row: &Record) -> bool {
    filters.iter().all(|f| passes(f, row))
}

pub fn apply_filters<'a>(filters: &[WidgetFilter], rows: &'a [Record]) -> Vec<&'a Record> {
    rows.iter().filter(|row| row_matches(filters, row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::data_source::record;
    use crate::domain::scalar::Scalar;

    fn include(field: &str, condition: FilterCondition, value: &str) -> WidgetFilter {
        WidgetFilter::new(FilterKind::Include, field, condition, value)
    }

    fn exclude(field: &str, condition: FilterCondition, value: &str) -> WidgetFilter {
        WidgetFilter::new(FilterKind::Exclude, field, condition, value)
    }

    #[test]
    fn test_include_and_exclude_combine() {
        let rows = vec![
            record([("a", "x"), ("b", "yes")]),
            record([("a", "x"), ("b", "no")]),
            record([("a", "z"), ("b", "no")]),
        ];
        let filters = vec![
            include("a", FilterCondition::Equal, "x"),
            exclude("b", FilterCondition::Contains, "yes"),
        ];

        let kept = apply_filters(&filters, &rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], &rows[1]);
    }

    #[test]
    fn test_conditions_are_case_insensitive() {
        let row = record([("status", "Ganho Parcial")]);

        assert!(passes(&include("status", FilterCondition::Equal, "ganho parcial"), &row));
        assert!(passes(&include("status", FilterCondition::Contains, "PARC"), &row));
        assert!(passes(&include("status", FilterCondition::StartsWith, "gan"), &row));
        assert!(!passes(&include("status", FilterCondition::StartsWith, "parcial"), &row));
    }

    #[test]
    fn test_numbers_compare_as_text() {
        let row = record([("qty", Scalar::Number(5.0))]);
        assert!(passes(&include("qty", FilterCondition::Equal, "5"), &row));
    }

    #[test]
    fn test_is_null_ignores_value() {
        let mut row = record([("email", "")]);
        row.insert("phone".to_string(), Scalar::Null);

        assert!(passes(&include("email", FilterCondition::IsNull, "ignored"), &row));
        assert!(passes(&include("phone", FilterCondition::IsNull, ""), &row));
        assert!(passes(&include("missing", FilterCondition::IsNull, ""), &row));
        assert!(!passes(&exclude("email", FilterCondition::IsNull, ""), &row));

        let filled = record([("email", "a@b.com")]);
        assert!(!passes(&include("email", FilterCondition::IsNull, ""), &filled));
    }

    #[test]
    fn test_empty_field_always_passes() {
        let row = record([("a", "x")]);
        assert!(passes(&include("", FilterCondition::Equal, "nope"), &row));
        assert!(passes(&exclude("", FilterCondition::Equal, "x"), &row));
    }

    #[test]
    fn test_missing_field_compares_as_empty() {
        let row = record([("a", "x")]);
        assert!(!passes(&include("b", FilterCondition::Equal, "x"), &row));
        assert!(passes(&exclude("b", FilterCondition::Contains, "x"), &row));
    }
}
