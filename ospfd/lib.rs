pub mod capture;
pub mod config;
pub mod constant;
pub mod daemon;
pub mod error;
pub mod handler;
pub mod interface;
pub mod logging;
pub mod neighbor;
pub mod router;
pub mod sender;
pub mod transport;
pub mod util;

pub use router::Router;
