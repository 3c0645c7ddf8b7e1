pub mod app_config;
pub mod memory;
pub mod redis_store;

pub use app_config::{BusinessRules, Config, ProvidersConfig, RedisConfig};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
