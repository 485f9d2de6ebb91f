#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod rest;
mod schema;

pub use rest::{BASE_URL, REST, ReqwestSendRequest, SendRequest};
