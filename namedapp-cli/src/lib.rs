//! Terminal front-end for the NameDapp contract.
//!
//! The binary parses flags, sets up logging, and hands a
//! [`NameDappController`](namedapp::controller::NameDappController) to the
//! interactive [`Console`].

pub mod console;

pub use console::{Command, Console};
