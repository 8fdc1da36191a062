// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Network reachability signals.
//!
//! A monitor task periodically opens a TCP connection to a probe address and
//! emits [`ConnectivitySignal::Online`] / [`ConnectivitySignal::Offline`] on
//! transitions only. The status is observational; nothing reconnects based
//! on it.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

/// Platform connectivity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivitySignal {
    Online,
    Offline,
}

/// Last known reachability. Starts online.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityStatus {
    online: bool,
}

impl Default for ConnectivityStatus {
    fn default() -> Self {
        Self { online: true }
    }
}

impl ConnectivityStatus {
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Apply a signal. Returns `true` if the status changed.
    pub fn apply(&mut self, signal: ConnectivitySignal) -> bool {
        let online = signal == ConnectivitySignal::Online;
        let changed = self.online != online;
        self.online = online;
        changed
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.online {
            "Online"
        } else {
            "Offline"
        }
    }
}

/// Probe settings.
#[derive(Debug, Clone)]
pub struct ConnectivityConfig {
    /// Address in "host:port" format.
    pub probe_address: String,
    /// Delay between probes.
    pub interval: Duration,
    /// Connect timeout for a single probe.
    pub timeout: Duration,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_address: "1.1.1.1:53".to_string(),
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(3),
        }
    }
}

/// Handle to the probe task. Dropping it stops the task.
pub struct ConnectivityMonitor {
    signal_rx: mpsc::UnboundedReceiver<ConnectivitySignal>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl ConnectivityMonitor {
    /// Start probing on `handle`. `on_signal` runs after each emitted signal.
    #[must_use]
    pub fn spawn(
        handle: &Handle,
        config: ConnectivityConfig,
        on_signal: impl Fn() + Send + 'static,
    ) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();
        let task_cancel = cancel_token.clone();

        handle.spawn(async move {
            monitor_loop(config, signal_tx, task_cancel, on_signal).await;
        });

        Self {
            signal_rx,
            cancel_token,
        }
    }

    /// Next pending signal, without waiting.
    pub fn try_next(&mut self) -> Option<ConnectivitySignal> {
        self.signal_rx.try_recv().ok()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn probe(address: &str, limit: Duration) -> bool {
    match timeout(limit, TcpStream::connect(address)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!("Connectivity probe to {} failed: {}", address, e);
            false
        }
        Err(_) => {
            debug!("Connectivity probe to {} timed out", address);
            false
        }
    }
}

async fn monitor_loop(
    config: ConnectivityConfig,
    signal_tx: mpsc::UnboundedSender<ConnectivitySignal>,
    cancel_token: CancellationToken,
    on_signal: impl Fn() + Send,
) {
    let mut last: Option<bool> = None;

    loop {
        let online = tokio::select! {
            online = probe(&config.probe_address, config.timeout) => online,
            () = cancel_token.cancelled() => return,
        };

        if last != Some(online) {
            let signal = if online {
                info!("Network reachable via {}", config.probe_address);
                ConnectivitySignal::Online
            } else {
                warn!("Network unreachable ({})", config.probe_address);
                ConnectivitySignal::Offline
            };
            if signal_tx.send(signal).is_err() {
                return; // Receiver dropped
            }
            on_signal();
            last = Some(online);
        }

        tokio::select! {
            () = sleep(config.interval) => {}
            () = cancel_token.cancelled() => {
                debug!("Connectivity monitor cancelled");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_offline_then_online() {
        let mut status = ConnectivityStatus::default();
        assert!(status.is_online());

        assert!(status.apply(ConnectivitySignal::Offline));
        assert!(!status.is_online());
        assert_eq!(status.label(), "Offline");

        assert!(status.apply(ConnectivitySignal::Online));
        assert!(status.is_online());
        assert_eq!(status.label(), "Online");
    }

    #[test]
    fn test_repeated_signal_is_not_a_change() {
        let mut status = ConnectivityStatus::default();
        assert!(!status.apply(ConnectivitySignal::Online));
        assert!(status.apply(ConnectivitySignal::Offline));
        assert!(!status.apply(ConnectivitySignal::Offline));
    }

    async fn next_signal(monitor: &mut ConnectivityMonitor) -> ConnectivitySignal {
        for _ in 0..500 {
            if let Some(signal) = monitor.try_next() {
                return signal;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("no connectivity signal received");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_monitor_reports_transitions() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let mut monitor = ConnectivityMonitor::spawn(
            &Handle::current(),
            ConnectivityConfig {
                probe_address: address,
                interval: Duration::from_millis(20),
                timeout: Duration::from_millis(500),
            },
            || {},
        );

        assert_eq!(next_signal(&mut monitor).await, ConnectivitySignal::Online);

        drop(listener);
        assert_eq!(next_signal(&mut monitor).await, ConnectivitySignal::Offline);
    }
}
