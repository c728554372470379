pub mod backend;
pub mod http_backend;

pub use backend::ConsultantBackend;
pub use http_backend::{report_url, HttpBackend};
