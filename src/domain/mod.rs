//! Records returned by the backend, payloads sent to it, and the session
//! context the screens run under.

pub mod blog;
pub mod cart;
pub mod category;
pub mod course;
pub mod payout;
pub mod purchase;
pub mod review;
pub mod role;
pub mod session;
pub mod subscription;
pub mod types;
pub mod user;
