//! Repository layer
//!
//! Repositories are thin adapters over the HTTP clients. They give the
//! poller two narrow seams, one per external service, so the polling
//! logic can be exercised without a network.

mod homeworks;
mod notifications;

// Re-export traits
pub use homeworks::HomeworkRepository;
pub use notifications::NotificationRepository;

// Re-export implementations
pub use homeworks::PracticumHomeworkRepository;
pub use notifications::TelegramNotificationRepository;
