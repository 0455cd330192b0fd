pub mod cli;
pub mod scenario;
pub mod utils;
