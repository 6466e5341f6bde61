//! Required-column validation.

use std::collections::HashSet;

use tally_model::{Mapping, SystemColumnId, ValidationResult, schema};

/// Check that every required system column has a source column.
///
/// Missing columns are reported in registry order.
pub fn validate(mappings: &[Mapping]) -> ValidationResult {
    let mapped: HashSet<SystemColumnId> =
        mappings.iter().filter_map(|m| m.system_column).collect();

    let missing = schema::all_required()
        .iter()
        .copied()
        .filter(|id| !mapped.contains(id))
        .collect();

    ValidationResult::from_missing(missing)
}

/// Missing required columns with their descriptions, for display.
pub fn missing_required_details(mappings: &[Mapping]) -> Vec<(SystemColumnId, &'static str)> {
    validate(mappings).missing_descriptions()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_columns_do_not_satisfy_required_ones() {
        let mappings = vec![
            Mapping::new("a", Some(SystemColumnId::Margin)),
            Mapping::new("b", Some(SystemColumnId::CustomerId)),
        ];
        let result = validate(&mappings);
        assert!(!result.valid);
        assert_eq!(result.missing_required, schema::all_required());
    }

    #[test]
    fn partial_mapping_lists_remaining_in_registry_order() {
        let mappings = vec![
            Mapping::new("qty", Some(SystemColumnId::Quantity)),
            Mapping::new("when", Some(SystemColumnId::TransactionDate)),
        ];
        let result = validate(&mappings);
        assert_eq!(
            result.missing_required,
            vec![
                SystemColumnId::TransactionId,
                SystemColumnId::ProductId,
                SystemColumnId::TotalPrice,
            ]
        );
        assert_eq!(
            missing_required_details(&mappings)[0],
            (
                SystemColumnId::TransactionId,
                "Unique identifier of the transaction"
            )
        );
    }
}
