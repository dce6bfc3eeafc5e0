//! Host APIs used by the quota backends.

pub mod http;
