// notifications.rs
use crate::conversion::ConversionResult;

pub const POPUP_SIZE: [f32; 2] = [400.0, 200.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

/// Popups currently on screen. Nothing is coalesced; each push opens one more.
#[derive(Default)]
pub struct Notifications {
    next_id: u64,
    open: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, title: impl Into<String>, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.open.push(Notification {
            id,
            title: title.into(),
            message: message.into(),
            kind,
        });
        id
    }

    /// Opens a "Conversion Complete" popup for results that produced a file.
    pub fn notify_result(&mut self, result: &ConversionResult) -> Option<u64> {
        let output = result.output.as_ref()?;
        Some(self.push(
            "Conversion Complete",
            format!("Saved to {}", output.display()),
            NotificationKind::Info,
        ))
    }

    pub fn dismiss(&mut self, id: u64) {
        self.open.retain(|notification| notification.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.open.iter()
    }
}
