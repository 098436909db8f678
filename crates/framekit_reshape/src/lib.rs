//! `framekit_reshape` v1:
//! Flat table to hierarchical (two-level column index) frame.
//!
//! Modules:
//! - `spec`    : column keys, group relation, bindings, options, report
//! - `error`   : error type
//! - `frame`   : hierarchical frame and its flat/header views
//! - `reshape` : binding and reshape entry points
pub mod error;
pub mod frame;
pub mod reshape;
pub mod spec;

pub use error::{ReshapeError, ReshapeResult};
pub use frame::HierarchicalFrame;
pub use reshape::{bind_columns, create_column_index, reshape_hierarchical};
pub use spec::{
    EnumColumnBinding, EnumMissingColumnPolicy, SpecColumnKey, SpecGroupRelation,
    SpecReshapeOptions, SpecReshapeReport,
};
