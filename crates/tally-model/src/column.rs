//! System column identifiers and their static specifications.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Declared value type of a system column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Date or date-time values.
    Datetime,
    /// Free text or identifiers.
    Text,
    /// Numeric values.
    Number,
}

impl DataType {
    /// Returns the lower-case name used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Datetime => "datetime",
            DataType::Text => "text",
            DataType::Number => "number",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one system column.
///
/// Defined once per column in the schema registry; see [`crate::schema::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    /// A source column must be mapped here for the mapping to be valid.
    pub required: bool,
    /// The value can be derived from other mapped columns.
    pub inferable: bool,
    /// User-facing description.
    pub description: &'static str,
    /// Declared value type.
    pub data_type: DataType,
}

/// Identifier of a system column.
///
/// Variants are declared in registry order. The serialized form is the
/// snake_case wire name returned by [`SystemColumnId::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemColumnId {
    TransactionDate,
    TransactionId,
    ProductId,
    Quantity,
    TotalPrice,
    TransactionType,
    CustomerId,
    Description,
    Category,
    UnitType,
    StockLevel,
    UnitCost,
    TotalCost,
    UnitPrice,
    TotalDiscount,
    TotalCommission,
    Margin,
}

impl SystemColumnId {
    /// Every system column in registry order.
    pub const ALL: [SystemColumnId; 17] = [
        SystemColumnId::TransactionDate,
        SystemColumnId::TransactionId,
        SystemColumnId::ProductId,
        SystemColumnId::Quantity,
        SystemColumnId::TotalPrice,
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

    /// Returns the snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemColumnId::TransactionDate => "transaction_date",
            SystemColumnId::TransactionId => "transaction_id",
            SystemColumnId::ProductId => "product_id",
            SystemColumnId::Quantity => "quantity",
            SystemColumnId::TotalPrice => "total_price",
            SystemColumnId::TransactionType => "transaction_type",
            SystemColumnId::CustomerId => "customer_id",
            SystemColumnId::Description => "description",
            SystemColumnId::Category => "category",
            SystemColumnId::UnitType => "unit_type",
            SystemColumnId::StockLevel => "stock_level",
            SystemColumnId::UnitCost => "unit_cost",
            SystemColumnId::TotalCost => "total_cost",
            SystemColumnId::UnitPrice => "unit_price",
            SystemColumnId::TotalDiscount => "total_discount",
            SystemColumnId::TotalCommission => "total_commission",
            SystemColumnId::Margin => "margin",
        }
    }

    /// Position in registry order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parse a wire name.
    ///
    /// Matching ignores case and accepts `-` or spaces in place of `_`, so
    /// `"Total Price"` and `"total-price"` both parse.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL.into_iter().find(|id| id.as_str() == wanted)
    }
}

impl FromStr for SystemColumnId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::UnknownSystemColumn(s.to_string()))
    }
}

impl fmt::Display for SystemColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_separator_and_case_variants() {
        assert_eq!(
            SystemColumnId::parse("Total Price"),
            Some(SystemColumnId::TotalPrice)
        );
        assert_eq!(
            SystemColumnId::parse("transaction-date"),
            Some(SystemColumnId::TransactionDate)
        );
        assert_eq!(SystemColumnId::parse(" margin "), Some(SystemColumnId::Margin));
        assert_eq!(SystemColumnId::parse("price"), None);
    }

    #[test]
    fn from_str_reports_unknown_name() {
        let err = "bogus".parse::<SystemColumnId>().unwrap_err();
        assert_eq!(err, ModelError::UnknownSystemColumn("bogus".to_string()));
        assert_eq!(err.to_string(), "Unknown system column: bogus");
    }

    #[test]
    fn index_follows_declaration_order() {
        for (position, id) in SystemColumnId::ALL.iter().enumerate() {
            assert_eq!(id.index(), position);
        }
    }

    #[test]
    fn wire_name_round_trips_through_serde() {
        let json = serde_json::to_string(&SystemColumnId::StockLevel).unwrap();
        assert_eq!(json, "\"stock_level\"");
        let back: SystemColumnId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SystemColumnId::StockLevel);
    }
}
