pub use shelf_core::*;
