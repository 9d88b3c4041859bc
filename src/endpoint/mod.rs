pub mod client;

pub use client::{EndpointInvoker, HttpEndpointInvoker};
