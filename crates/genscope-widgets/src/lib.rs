//! Widgets for genscope.
//!
//! The main widget is [`VirtualizedTable`], a row-virtualized table with
//! sortable and resizable columns and a near-bottom "load more" trigger.

pub mod data_table;

pub use data_table::{
    sorted_order, BodyRow, CellContent, CellValue, ColumnDef, ColumnResized, ColumnSet,
    ColumnSizing, HeaderCell, RenderedCell, SortDirection, SortEntry, SortState, TableError,
    TableHit, TableOptions, TableRowClicked, TableScrolled, TableSortChanged, TableStatus,
    TableView, VirtualizedTable,
};
