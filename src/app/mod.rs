// Application layer: HTTP and console front ends over the prediction service.

pub mod console;
pub mod dataset;
pub mod http;
