pub mod config;
pub mod consts;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod img;
pub mod requests;
pub mod responses;
pub mod validation;
