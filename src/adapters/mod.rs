pub mod memory;
pub mod postgres;
pub mod redis_channel;
