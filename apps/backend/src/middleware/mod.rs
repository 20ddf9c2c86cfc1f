//! Request middleware: CORS, trace ids, and the pre-routing edge gate.

pub mod cors;
pub mod edge_gate;
pub mod request_trace;
