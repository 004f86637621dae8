//! Built-in microservices served by the local substrate.

pub mod echo;

pub use echo::EchoService;
