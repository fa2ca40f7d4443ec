//! Embeddable terminal table with sorting, filtering, paging, row selection and
//! horizontal scrolling over frozen columns.
//!
//! The host owns the event loop. It forwards events to [`Table::update`], reacts to
//! the returned [`Dispatch`] and draws [`Table::view`] wherever it likes.

#[cfg(test)]
macro_rules! row {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::row::Row::new(
            [$(($key.to_string(), $crate::cell::CellValue::from($value))),*]
                .into_iter()
                .collect(),
        )
    };
}

pub mod cell;
pub mod column;
pub mod domain;
pub mod filter;
pub mod inputter;
pub mod keys;
pub mod model;
pub mod pagination;
pub mod render;
pub mod row;
pub mod scroll;
pub mod select;
pub mod sort;
pub mod update;

pub use cell::CellValue;
pub use column::{Column, SELECT_COLUMN_KEY};
pub use domain::{Dispatch, Effect, TableEvent, UserEvent};
pub use filter::FilterCase;
pub use keys::{Action, Binding, KeyMap, key_token};
pub use model::Table;
pub use render::{Border, Footer};
pub use row::{Row, RowData};
pub use scroll::{ColumnWindow, Slot};
pub use sort::{SortColumn, SortDirection};
