mod avg;
mod count;
mod first_value;
mod last_value;
mod sum;

pub use avg::*;
pub use count::*;
pub use first_value::*;
pub use last_value::*;
pub use sum::*;
