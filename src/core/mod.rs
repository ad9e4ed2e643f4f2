pub mod subscription_manager;

pub use subscription_manager::SubscriptionManager;
