//! Data layer: table loading, core types, and series arithmetic.
//!
//! Architecture:
//! ```text
//!  whitespace-delimited .txt / .dat
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table (column-major, rectangular)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  model    │  Table::series(x, y) → Series
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ transform  │  normalize / ratio against a reference
//!   └───────────┘
//! ```

pub mod loader;
pub mod model;
pub mod transform;

pub use loader::{load_table, LoadError};
pub use model::{Series, Table};
