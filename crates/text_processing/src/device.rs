//! Phone-control commands
//!
//! The assistant does not touch hardware itself; it recognizes a fixed set of
//! phrases and answers with a confirmation the client acts on.

use serde::{Deserialize, Serialize};

use crate::accents::to_nfc_lower;

/// Simulated device action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCommand {
    FlashlightOn,
    FlashlightOff,
    VolumeUp,
    VolumeDown,
    NotificationsOn,
    NotificationsOff,
    OpenNavigationBar,
}

impl DeviceCommand {
    /// Confirmation spoken back to the user
    pub fn reply(&self) -> &'static str {
        match self {
            Self::FlashlightOn => "Đã bật đèn pin cho bạn.",
            Self::FlashlightOff => "Đã tắt đèn pin cho bạn.",
            Self::VolumeUp => "Đã tăng âm lượng.",
            Self::VolumeDown => "Đã giảm âm lượng.",
            Self::NotificationsOn => "Đã bật thông báo.",
            Self::NotificationsOff => "Đã tắt thông báo.",
            Self::OpenNavigationBar => "Đã mở thanh điều hướng.",
        }
    }

    /// Stable identifier for logs and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashlightOn => "flashlight_on",
            Self::FlashlightOff => "flashlight_off",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::NotificationsOn => "notifications_on",
            Self::NotificationsOff => "notifications_off",
            Self::OpenNavigationBar => "open_navigation_bar",
        }
    }
}

const PHRASES: &[(&str, DeviceCommand)] = &[
    ("bật đèn", DeviceCommand::FlashlightOn),
    ("bật flash", DeviceCommand::FlashlightOn),
    ("tắt đèn", DeviceCommand::FlashlightOff),
    ("tắt flash", DeviceCommand::FlashlightOff),
    ("tăng âm lượng", DeviceCommand::VolumeUp),
    ("giảm âm lượng", DeviceCommand::VolumeDown),
    ("bật thông báo", DeviceCommand::NotificationsOn),
    ("tắt thông báo", DeviceCommand::NotificationsOff),
    ("mở thanh điều hướng", DeviceCommand::OpenNavigationBar),
    ("mở điều hướng", DeviceCommand::OpenNavigationBar),
];

/// First phrase contained in the message, if any
pub fn match_device_command(message: &str) -> Option<DeviceCommand> {
    let text = to_nfc_lower(message);
    PHRASES
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|&(phrase, command)| {
            tracing::debug!(phrase, command = command.as_str(), "Device command matched");
            command
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flashlight() {
        assert_eq!(
            match_device_command("bật đèn pin giúp tôi"),
            Some(DeviceCommand::FlashlightOn)
        );
        assert_eq!(
            match_device_command("Tắt Flash đi"),
            Some(DeviceCommand::FlashlightOff)
        );
    }

    #[test]
    fn test_volume_and_notifications() {
        assert_eq!(
            match_device_command("tăng âm lượng lên"),
            Some(DeviceCommand::VolumeUp)
        );
        assert_eq!(
            match_device_command("giảm âm lượng"),
            Some(DeviceCommand::VolumeDown)
        );
        assert_eq!(
            match_device_command("bật thông báo"),
            Some(DeviceCommand::NotificationsOn)
        );
        assert_eq!(
            match_device_command("tắt thông báo"),
            Some(DeviceCommand::NotificationsOff)
        );
    }

    #[test]
    fn test_navigation() {
        assert_eq!(
            match_device_command("mở thanh điều hướng"),
            Some(DeviceCommand::OpenNavigationBar)
        );
        assert_eq!(
            match_device_command("mở điều hướng"),
            Some(DeviceCommand::OpenNavigationBar)
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(match_device_command("thời tiết hôm nay"), None);
        assert_eq!(match_device_command(""), None);
    }

    #[test]
    fn test_replies() {
        assert_eq!(DeviceCommand::FlashlightOn.reply(), "Đã bật đèn pin cho bạn.");
        assert_eq!(DeviceCommand::OpenNavigationBar.reply(), "Đã mở thanh điều hướng.");
    }
}
