pub mod http_transport;
pub mod js_executor;

pub use http_transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use js_executor::JsExecutor;
