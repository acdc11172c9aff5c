mod agg_func;
mod config;
mod context;
mod handler;
mod kind;
mod raw_data;
mod with_limit;

pub mod incremental;


pub use agg_func::AggFunc;
pub use config::*;
pub use context::*;
pub use handler::*;
pub use kind::*;
pub use raw_data::*;
pub use with_limit::*;
