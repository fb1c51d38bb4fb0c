pub mod element_set;
pub mod response_common;
