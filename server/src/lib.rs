pub extern crate actix_web;

pub mod admin;
pub mod config;
pub mod connection;
pub mod connection_tx_storage;
pub mod gateway;
pub mod handlers;
mod room;
pub mod room_coordinator;
