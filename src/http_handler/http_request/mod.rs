use super::http_response::element_set;

pub mod element_set_get;
pub mod request_common;
