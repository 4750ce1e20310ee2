//! Readiness wait loop for newly created instances.

use std::future::Future;
use std::pin::pin;
use std::time::Instant;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::VultrError;
use crate::transport::Transport;
use crate::vultr::Instance;

use super::Provisioner;

/// Status combination an instance must reach before it counts as ready.
///
/// All three fields must match in the same snapshot. The server status may
/// match any of `server_statuses`: the API reports `installingbooting` while
/// the OS boots and `ok` afterwards, and a fast instance can skip past the
/// first between two polls. The default therefore widens a lone
/// `installingbooting` target to also accept `ok`; a snapshot with
/// `server_status == "ok"` is ready, not a partial match. Pass a target with
/// only `installingbooting` to restore the narrow check.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReadinessTarget {
    /// Required lifecycle status.
    pub status: String,
    /// Accepted server statuses.
    pub server_statuses: Vec<String>,
    /// Required power status.
    pub power_status: String,
}

impl Default for ReadinessTarget {
    fn default() -> Self {
        Self {
            status: String::from("active"),
            server_statuses: vec![String::from("installingbooting"), String::from("ok")],
            power_status: String::from("running"),
        }
    }
}

impl ReadinessTarget {
    /// Returns whether `instance` satisfies every condition at once.
    #[must_use]
    pub fn is_ready(&self, instance: &Instance) -> bool {
        instance.status == self.status
            && self
                .server_statuses
                .iter()
                .any(|status| *status == instance.server_status)
            && instance.power_status == self.power_status
    }
}

impl<T: Transport> Provisioner<T> {
    /// Polls the instance until it matches the readiness target.
    ///
    /// `initial` is checked first, so a record that is already ready costs no
    /// request. Otherwise the loop sleeps for the poll interval, re-fetches,
    /// and checks again.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError::Timeout`] once the attempt or time budget is
    /// spent, [`VultrError::Cancelled`] when `cancel` resolves first, and any
    /// error raised while fetching the instance.
    pub async fn wait_for_ready<C>(&self, initial: Instance, cancel: C) -> Result<Instance, VultrError>
    where
        C: Future<Output = ()>,
    {
        // A timeout too large to represent leaves only the attempt bound.
        let deadline = Instant::now().checked_add(self.policy.timeout);
        let instance_id = initial.id.clone();
        let mut cancellation = pin!(cancel);
        let mut current = initial;
        let mut attempts: u32 = 0;

        loop {
            if self.target.is_ready(&current) {
                info!(instance_id = %instance_id, attempts, "instance is ready");
                return Ok(current);
            }

            if attempts >= self.policy.max_attempts
                || deadline.is_some_and(|limit| Instant::now() > limit)
            {
                return Err(VultrError::Timeout {
                    instance_id,
                    attempts,
                });
            }

            debug!(
                instance_id = %instance_id,
                status = %current.status,
                server_status = %current.server_status,
                power_status = %current.power_status,
                "instance not ready yet"
            );

            tokio::select! {
                () = &mut cancellation => {
                    return Err(VultrError::Cancelled { instance_id });
                }
                () = sleep(self.policy.interval) => {}
            }

            attempts = attempts.saturating_add(1);
            current = self.client.get_instance(&instance_id).await?;
        }
    }
}
