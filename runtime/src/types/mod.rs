pub use data_type::*;
pub use value::*;

mod data_type;
mod value;
