pub mod trend_store;

pub use trend_store::create_redis_client;
pub use trend_store::RedisTrendStore;
pub use trend_store::TrendKey;
pub use trend_store::TrendStore;

#[cfg(test)]
pub use trend_store::MockTrendStore;
