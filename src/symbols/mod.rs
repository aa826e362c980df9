//! Name resolution
//!
//! This module binds every variable site of a parsed program to a frame offset:
//! - [`table`]: the [`SymbolTable`] pass over the statement tree
//! - [`scope`]: per-block symbol maps
//! - [`errors`]: [`SymbolError`] (duplicate and undeclared names)
//!
//! After a successful pass every `VariableSite` in the tree carries its
//! offset and [`SymbolTable::total_frame_size`] gives the stack frame size.

pub mod errors;
pub mod scope;
pub mod table;

pub use errors::SymbolError;
pub use table::{SymbolTable, SLOT_SIZE};
