//! Shared utilities.

pub mod markdown;

pub use markdown::{
    render_flight_section, render_flight_table, render_train_section, render_train_table,
};
