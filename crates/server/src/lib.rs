pub mod cli;
pub mod db;
pub mod routes;

mod state;
pub use state::*;

mod user_state;
pub use user_state::*;
