pub mod actor;
pub mod capacity;
pub mod codes;
pub mod email_list;
pub mod status;

#[cfg(feature = "database")]
mod column_value;
