use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

pub const SCHEDULE_REFRESH: Duration = Duration::from_secs(60);

/// Reloads the schedule once a minute so live scores reach the picker.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>) -> Self {
        Self { network_requests, period: SCHEDULE_REFRESH }
    }

    pub async fn run(self) {
        let mut schedule_interval = interval(self.period);
        // Skip the immediate first tick; the startup sign-in already loads games.
        schedule_interval.tick().await;

        loop {
            schedule_interval.tick().await;
            if self.network_requests.send(NetworkRequest::LoadGames).await.is_err() {
                break;
            }
        }
    }
}
