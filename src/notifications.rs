/// Desktop notifications
/// Currently only implements macOS notifications

#[cfg(target_os = "macos")]
use std::process::Command;

/// Notification body for a finished batch run
pub fn batch_message(succeeded: usize, failed: usize) -> String {
    if failed == 0 {
        format!("{} stops now have details", succeeded)
    } else {
        format!("{} stops filled, {} still missing", succeeded, failed)
    }
}

/// Send a notification when a batch details run finishes
pub fn notify_batch_done(succeeded: usize, failed: usize) {
    let message = batch_message(succeeded, failed);

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Tabi - Details ready""#,
            message.replace('"', "\\\"")
        );

        if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!("notification failed: {}", e);
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        tracing::debug!(%message, "batch finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_message() {
        assert_eq!(batch_message(4, 0), "4 stops now have details");
        assert_eq!(batch_message(3, 1), "3 stops filled, 1 still missing");
    }
}
