//! Tests for tally-model types.

use tally_model::{DataType, Mapping, SystemColumnId, ValidationResult, schema};

#[test]
fn registry_has_five_required_and_six_inferable() {
    assert_eq!(
        schema::all_required(),
        &[
            SystemColumnId::TransactionDate,
            SystemColumnId::TransactionId,
            SystemColumnId::ProductId,
            SystemColumnId::Quantity,
            SystemColumnId::TotalPrice,
        ]
    );
    assert_eq!(schema::all_inferable().len(), 6);
    assert_eq!(schema::all_optional().len(), 12);
    assert_eq!(schema::all().len(), 17);

    for id in schema::all_inferable() {
        assert!(schema::all_optional().contains(id));
    }
}

#[test]
fn registry_declares_data_types() {
    assert_eq!(
        schema::get(SystemColumnId::TransactionDate).data_type,
        DataType::Datetime
    );
    assert_eq!(schema::get(SystemColumnId::ProductId).data_type, DataType::Text);
    assert_eq!(schema::get(SystemColumnId::Margin).data_type, DataType::Number);
    for id in schema::all() {
        assert!(!schema::get(*id).description.is_empty());
    }
}

#[test]
fn mapping_serializes_with_camel_case_keys() {
    let mapping = Mapping::new("<b>Fecha</b>", Some(SystemColumnId::TransactionDate));
    let json = serde_json::to_string(&mapping).expect("serialize mapping");
    assert_eq!(
        json,
        r#"{"sourceColumn":"<b>Fecha</b>","systemColumn":"transaction_date"}"#
    );

    let unmapped: Mapping =
        serde_json::from_str(r#"{"sourceColumn":"notes","systemColumn":null}"#)
            .expect("deserialize mapping");
    assert_eq!(unmapped, Mapping::unmapped("notes"));
    assert!(!unmapped.is_mapped());
}

#[test]
fn validation_result_describes_missing_columns() {
    let result = ValidationResult::from_missing(vec![SystemColumnId::Quantity]);
    assert!(!result.valid);
    assert_eq!(
        result.missing_descriptions(),
        vec![(
            SystemColumnId::Quantity,
            "Number of units in the transaction"
        )]
    );

    assert!(ValidationResult::from_missing(Vec::new()).valid);
}
