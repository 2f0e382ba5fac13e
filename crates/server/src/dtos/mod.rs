pub mod catalog;
pub mod common;
pub mod notification;
pub mod semester;
