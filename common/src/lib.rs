pub mod sorted;
pub mod time;
