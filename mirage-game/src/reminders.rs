//! Reminder scheduling seam. Fire-and-forget; nothing here may block
//! gameplay.

/// Outcome of a notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Platform notification scheduler.
///
/// The session requests permission after the first completed game and
/// re-schedules the daily reminder after every completion so the copy can
/// reference the current streak.
pub trait ReminderScheduler {
    fn request_permission(&mut self) -> PermissionStatus;

    /// Schedule (or replace) the daily reminder for the given streak.
    fn schedule_reminder(&mut self, streak: u32);
}

/// No-op scheduler for platforms without notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScheduler;

impl ReminderScheduler for NullScheduler {
    fn request_permission(&mut self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    fn schedule_reminder(&mut self, _streak: u32) {}
}
