pub mod app;
pub mod poster;
pub mod serving;
