//! Raw SQL operations, one module per table.

pub mod events;
