pub mod analysis;
pub mod ast;
pub mod registry;
pub mod scope;
pub mod token;
pub mod unit;
pub mod util;
pub mod val;
