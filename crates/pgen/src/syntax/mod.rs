pub mod kind;
pub mod line_col;
pub mod node;
pub mod pretty;
pub mod token;

pub use kind::*;
pub use line_col::*;
pub use node::*;
pub use pretty::*;
pub use token::*;
