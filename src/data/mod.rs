//! Upstream data access: key handling, HTTP transport, and the EasyData client.

pub mod credential;
pub mod easydata;
pub mod transport;

pub use credential::{Credential, Session};
pub use easydata::{ClientConfig, EasyDataClient};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
