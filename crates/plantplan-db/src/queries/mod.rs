//! Raw query functions, one module per table.

pub mod plans;
