pub mod cart;
pub mod client;
pub mod quote;
pub mod service;
