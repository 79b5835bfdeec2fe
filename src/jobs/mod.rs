mod subscription_completion;

pub use subscription_completion::start_subscription_completion_checker;
