//! Best-effort screen wake lock
//!
//! On Linux the lock is a `systemd-inhibit` child holding a logind idle
//! inhibitor; killing the child releases it.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

use crate::constants::wake_lock::{PROGRAM, WHO, WHY};

/// Held lock; released explicitly or on drop
pub trait WakeGuard {
    fn release(self: Box<Self>) -> Result<()>;
}

pub trait WakeLock {
    /// `Ok(None)` when the platform has no wake lock
    fn acquire(&self) -> Result<Option<Box<dyn WakeGuard>>>;
}

/// Wake lock that is never available
#[derive(Debug, Default)]
pub struct NoWakeLock;

impl WakeLock for NoWakeLock {
    fn acquire(&self) -> Result<Option<Box<dyn WakeGuard>>> {
        Ok(None)
    }
}

#[derive(Debug, Default)]
pub struct InhibitWakeLock;

impl WakeLock for InhibitWakeLock {
    fn acquire(&self) -> Result<Option<Box<dyn WakeGuard>>> {
        let spawned = Command::new(PROGRAM)
            .arg("--what=idle")
            .arg(format!("--who={WHO}"))
            .arg(format!("--why={WHY}"))
            .arg("--mode=block")
            .args(["sleep", "infinity"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                info!(pid = child.id(), "Acquired screen wake lock");
                Ok(Some(Box::new(InhibitGuard { child: Some(child) })))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(program = PROGRAM, "Wake lock program not installed");
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to spawn {PROGRAM}")),
        }
    }
}

struct InhibitGuard {
    child: Option<Child>,
}

impl InhibitGuard {
    fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let pid = child.id();
        // Already gone means the inhibitor was refused or killed externally
        if child.try_wait().context("Failed to query wake lock process")?.is_none() {
            child.kill().context("Failed to stop wake lock process")?;
        }
        child.wait().context("Failed to reap wake lock process")?;
        info!(pid, "Released screen wake lock");
        Ok(())
    }
}

impl WakeGuard for InhibitGuard {
    fn release(mut self: Box<Self>) -> Result<()> {
        self.stop()
    }
}

impl Drop for InhibitGuard {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = ?e, "Failed to release wake lock on drop");
        }
    }
}
