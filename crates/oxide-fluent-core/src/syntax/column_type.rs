//! The typed column-value mixin.
//!
//! [`ColumnTypeSyntax`] turns a semantic type call into the column
//! definition's type fields. It is shared by every builder that types a
//! column: table columns and standalone columns both implement it and only
//! differ in the builder they move on to.

use crate::expression::ColumnDefinition;
use crate::types::DbType;

/// Type declarations for a column.
///
/// Every method overwrites the column's type, size, precision and custom
/// type as a whole, so the last call wins:
///
/// ```rust
/// use oxide_fluent_core::prelude::*;
///
/// let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
/// context.create().column("code").on_table("items").as_int32().nullable();
/// context.create().column("label").on_table("items").as_int32().as_string_sized(50);
///
/// let Some(Expression::CreateColumn(label)) = context.expressions().last() else {
///     unreachable!()
/// };
/// assert_eq!(label.column.db_type, Some(DbType::String));
/// assert_eq!(label.column.size, Some(50));
/// ```
pub trait ColumnTypeSyntax: Sized {
    /// Builder returned once a type is set. It accepts further type calls,
    /// which overwrite this one.
    type Next;

    /// The column being typed.
    #[doc(hidden)]
    fn column_definition(&mut self) -> &mut ColumnDefinition;

    /// Moves on to the builder that follows a type declaration.
    #[doc(hidden)]
    fn into_typed(self) -> Self::Next;

    /// Variable-length non-Unicode string of provider-default length.
    fn as_ansi_string(self) -> Self::Next {
        typed(self, DbType::AnsiString, None, None)
    }

    /// Variable-length non-Unicode string of at most `size` characters.
    fn as_ansi_string_sized(self, size: u32) -> Self::Next {
        typed(self, DbType::AnsiString, Some(size), None)
    }

    /// Binary data of provider-default length.
    fn as_binary(self) -> Self::Next {
        typed(self, DbType::Binary, None, None)
    }

    /// Binary data of at most `size` bytes.
    fn as_binary_sized(self, size: u32) -> Self::Next {
        typed(self, DbType::Binary, Some(size), None)
    }

    /// Boolean.
    fn as_boolean(self) -> Self::Next {
        typed(self, DbType::Boolean, None, None)
    }

    /// Unsigned 8-bit integer.
    fn as_byte(self) -> Self::Next {
        typed(self, DbType::Byte, None, None)
    }

    /// Monetary value.
    fn as_currency(self) -> Self::Next {
        typed(self, DbType::Currency, None, None)
    }

    /// Date only.
    fn as_date(self) -> Self::Next {
        typed(self, DbType::Date, None, None)
    }

    /// Date and time.
    fn as_date_time(self) -> Self::Next {
        typed(self, DbType::DateTime, None, None)
    }

    /// Decimal of provider-default size and precision.
    fn as_decimal(self) -> Self::Next {
        typed(self, DbType::Decimal, None, None)
    }

    /// Decimal with `size` total digits, `precision` of them after the point.
    fn as_decimal_sized(self, size: u32, precision: u32) -> Self::Next {
        typed(self, DbType::Decimal, Some(size), Some(precision))
    }

    /// Double-precision float.
    fn as_double(self) -> Self::Next {
        typed(self, DbType::Double, None, None)
    }

    /// Fixed-length Unicode string.
    fn as_fixed_length_string(self, size: u32) -> Self::Next {
        typed(self, DbType::StringFixedLength, Some(size), None)
    }

    /// Fixed-length non-Unicode string.
    fn as_fixed_length_ansi_string(self, size: u32) -> Self::Next {
        typed(self, DbType::AnsiStringFixedLength, Some(size), None)
    }

    /// Single-precision float.
    fn as_float(self) -> Self::Next {
        typed(self, DbType::Single, None, None)
    }

    /// Globally unique identifier.
    fn as_guid(self) -> Self::Next {
        typed(self, DbType::Guid, None, None)
    }

    /// Signed 16-bit integer.
    fn as_int16(self) -> Self::Next {
        typed(self, DbType::Int16, None, None)
    }

    /// Signed 32-bit integer.
    fn as_int32(self) -> Self::Next {
        typed(self, DbType::Int32, None, None)
    }

    /// Signed 64-bit integer.
    fn as_int64(self) -> Self::Next {
        typed(self, DbType::Int64, None, None)
    }

    /// Variable-length Unicode string of provider-default length.
    fn as_string(self) -> Self::Next {
        typed(self, DbType::String, None, None)
    }

    /// Variable-length Unicode string of at most `size` characters.
    fn as_string_sized(self, size: u32) -> Self::Next {
        typed(self, DbType::String, Some(size), None)
    }

    /// Time only.
    fn as_time(self) -> Self::Next {
        typed(self, DbType::Time, None, None)
    }

    /// XML document.
    fn as_xml(self) -> Self::Next {
        typed(self, DbType::Xml, None, None)
    }

    /// XML document of at most `size` characters.
    fn as_xml_sized(self, size: u32) -> Self::Next {
        typed(self, DbType::Xml, Some(size), None)
    }

    /// A provider-specific type, passed through verbatim.
    fn as_custom(mut self, type_name: impl Into<String>) -> Self::Next {
        self.column_definition().set_custom_type(type_name);
        self.into_typed()
    }
}

fn typed<T: ColumnTypeSyntax>(
    mut builder: T,
    db_type: DbType,
    size: Option<u32>,
    precision: Option<u32>,
) -> T::Next {
    builder
        .column_definition()
        .set_type(db_type, size, precision);
    builder.into_typed()
}
