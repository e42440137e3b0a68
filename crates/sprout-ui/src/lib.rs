#![allow(non_snake_case)]
//! Element helpers and text input handlers.

pub mod elements;
pub mod input;

pub use elements::*;
pub use input::{InputHandlers, make_input_handlers};
