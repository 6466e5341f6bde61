//! Schema registry.
//!
//! The registry is a compile-time table with one [`ColumnSpec`] per
//! [`SystemColumnId`]. All lookups are total: the set of ids is closed, so a
//! caller holding a `SystemColumnId` can always get its spec. Names coming
//! from outside are turned into ids with [`SystemColumnId::parse`] first.

use crate::column::{ColumnSpec, DataType, SystemColumnId};

const fn spec(
    required: bool,
    inferable: bool,
    data_type: DataType,
    description: &'static str,
) -> ColumnSpec {
    ColumnSpec {
        required,
        inferable,
        description,
        data_type,
    }
}

/// Specs indexed by [`SystemColumnId::index`].
static SPECS: [ColumnSpec; 17] = [
    spec(true, false, DataType::Datetime, "Date and time of the transaction"),
    spec(true, false, DataType::Text, "Unique identifier of the transaction"),
    spec(true, false, DataType::Text, "Identifier of the product sold"),
    spec(true, false, DataType::Number, "Number of units in the transaction"),
    spec(true, false, DataType::Number, "Total amount charged for the transaction"),
    spec(false, false, DataType::Text, "Kind of transaction (sale, return, ...)"),
    spec(false, false, DataType::Text, "Identifier of the customer"),
    spec(false, false, DataType::Text, "Free-text description of the product"),
    spec(false, false, DataType::Text, "Product category"),
    spec(false, false, DataType::Text, "Unit of measure for the quantity"),
    spec(false, false, DataType::Number, "Units in stock after the transaction"),
    spec(false, true, DataType::Number, "Cost of a single unit"),
    spec(false, true, DataType::Number, "Total cost of the units sold"),
    spec(false, true, DataType::Number, "Price of a single unit"),
    spec(false, true, DataType::Number, "Total discount applied"),
    spec(false, true, DataType::Number, "Total commission paid"),
    spec(false, true, DataType::Number, "Margin between price and cost"),
];

const REQUIRED: [SystemColumnId; 5] = [
    SystemColumnId::TransactionDate,
    SystemColumnId::TransactionId,
    SystemColumnId::ProductId,
    SystemColumnId::Quantity,
    SystemColumnId::TotalPrice,
];

const OPTIONAL: [SystemColumnId; 12] = [
    SystemColumnId::TransactionType,
    SystemColumnId::CustomerId,
    SystemColumnId::Description,
    SystemColumnId::Category,
    SystemColumnId::UnitType,
    SystemColumnId::StockLevel,
    SystemColumnId::UnitCost,
    SystemColumnId::TotalCost,
    SystemColumnId::UnitPrice,
    SystemColumnId::TotalDiscount,
    SystemColumnId::TotalCommission,
    SystemColumnId::Margin,
];

const INFERABLE: [SystemColumnId; 6] = [
    SystemColumnId::UnitCost,
    SystemColumnId::TotalCost,
    SystemColumnId::UnitPrice,
    SystemColumnId::TotalDiscount,
    SystemColumnId::TotalCommission,
    SystemColumnId::Margin,
];

/// Spec for a system column.
pub fn get(id: SystemColumnId) -> &'static ColumnSpec {
    &SPECS[id.index()]
}

/// Every system column in registry order.
pub fn all() -> &'static [SystemColumnId] {
    &SystemColumnId::ALL
}

/// Required columns in registry order.
pub fn all_required() -> &'static [SystemColumnId] {
    &REQUIRED
}

/// Optional columns in registry order, inferable ones included.
pub fn all_optional() -> &'static [SystemColumnId] {
    &OPTIONAL
}

/// Inferable columns in registry order.
pub fn all_inferable() -> &'static [SystemColumnId] {
    &INFERABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_lists_agree_with_spec_flags() {
        let required: Vec<_> = all().iter().copied().filter(|id| get(*id).required).collect();
        let optional: Vec<_> = all().iter().copied().filter(|id| !get(*id).required).collect();
        let inferable: Vec<_> = all().iter().copied().filter(|id| get(*id).inferable).collect();

        assert_eq!(required, all_required());
        assert_eq!(optional, all_optional());
        assert_eq!(inferable, all_inferable());
    }

    #[test]
    fn inferable_columns_are_never_required() {
        for id in all_inferable() {
            assert!(!get(*id).required, "{id} is both required and inferable");
        }
    }
}
