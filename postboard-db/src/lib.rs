pub mod client;
mod posts;
mod record;
pub mod seed;
mod users;
