pub mod admin;
pub mod audit;
pub mod config;
pub mod constants;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod media;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod shopping;
pub mod short_link;
pub mod state;
pub mod validation;
