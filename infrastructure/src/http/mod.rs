//! HTTP adapters for the oracle transport port.

mod proxy_transport;

pub use proxy_transport::HttpProxyTransport;
