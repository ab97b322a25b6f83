mod exercise;
pub use exercise::*;

mod catalog;
pub use catalog::*;

mod workout;
pub use workout::*;

mod set;
pub use set::*;
