pub mod http;
pub mod token_store;

pub use http::ReqwestTransport;
pub use token_store::{FileTokenStore, InMemoryTokenStore};
