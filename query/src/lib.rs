//! FILENAME: query/src/lib.rs
//! Query and aggregation over keyed tables.
//!
//! This crate provides row selection, value counting and grouping on top of
//! the `engine` table. It only uses the table's public API, so every result
//! is an independent table or collection.
//!
//! Layers:
//! - `select`: predicate and equality selection (WHICH rows)
//! - `counts`: value-occurrence tabulation
//! - `group`: partitioning and group-by-reduce (HOW rows combine)

pub mod counts;
pub mod group;
pub mod select;

pub use counts::{
    value_counts, value_counts_grouped, value_counts_many, value_counts_where, CountOrder,
    ValueCounts,
};
pub use group::{group_by, group_by_reduce, sum_columns, Aggregate, GroupKey, Reducer};
pub use select::{
    select_by_equality, select_first_by_equality, select_positions_where, select_where,
    try_select_where,
};
