pub mod dashboard;
pub mod notifications;
pub mod simulation;
pub mod stats;

// Re-export commonly used handlers for route wiring
pub use dashboard::{get_dashboard, get_statusbar};
pub use notifications::{list_notifications, mark_notification_read};
pub use simulation::{
    decrement_total, get_history, get_simulation, increment_total, reset_simulation, set_total,
    toggle_online, toggle_total,
};
pub use stats::get_content_stats;
