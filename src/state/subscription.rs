use crate::state::messages::SubscriptionEvent;
use futures_util::StreamExt;
use ticketbook_api::client::parse_snapshot;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};

pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Holds the record subscription socket open and forwards each snapshot.
/// Reconnects after [`RECONNECT_DELAY`] until the UI side hangs up.
#[derive(Debug)]
pub struct SubscriptionWorker {
    pub url: String,
    pub events: mpsc::Sender<SubscriptionEvent>,
}

impl SubscriptionWorker {
    pub async fn run(self) {
        loop {
            match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    if self.events.send(SubscriptionEvent::Connected).await.is_err() {
                        return;
                    }
                    let (_write, mut read) = stream.split();

                    loop {
                        match read.next().await {
                            Some(Ok(Message::Text(text))) => {
                                let event = match parse_snapshot(&text) {
                                    Ok(records) => SubscriptionEvent::Snapshot(records),
                                    Err(e) => SubscriptionEvent::Error(e.to_string()),
                                };
                                if self.events.send(event).await.is_err() {
                                    return;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                let _ = self.events.send(SubscriptionEvent::Disconnected).await;
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                let _ = self
                                    .events
                                    .send(SubscriptionEvent::Error(format!("subscription read failed: {e}")))
                                    .await;
                                let _ = self.events.send(SubscriptionEvent::Disconnected).await;
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = self
                        .events
                        .send(SubscriptionEvent::Error(format!("subscription connect failed: {e}")))
                        .await;
                    if self.events.send(SubscriptionEvent::Disconnected).await.is_err() {
                        return;
                    }
                }
            }

            if self.events.is_closed() {
                return;
            }
            sleep(RECONNECT_DELAY).await;
        }
    }
}
