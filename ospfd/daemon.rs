use std::{sync::Arc, time::Duration};

use tokio::sync::{mpsc, Mutex};

use crate::{log, log_debug, log_error, log_warning, router::Router, transport::Received};

pub trait Runnable {
    fn run(&mut self);
}

pub trait AsyncRunnable {
    fn run_async(&mut self) -> impl std::future::Future<Output = ()> + Send;
}

#[allow(async_fn_in_trait)]
pub trait Daemon {
    async fn run_forever(self);
}

impl<T: Runnable + Send> AsyncRunnable for T {
    async fn run_async(&mut self) {
        tokio::task::block_in_place(|| self.run());
    }
}

impl<T: AsyncRunnable + Send + 'static> Daemon for T {
    async fn run_forever(self) {
        let daemon = Arc::new(Mutex::new(self));
        loop {
            let daemon = daemon.clone();
            let hd = tokio::task::spawn(async move {
                let mut daemon = daemon.lock().await;
                daemon.run_async().await;
            });
            if hd.await.is_err() {
                log_error!(
                    "An error occurred while running {}",
                    std::any::type_name::<T>()
                );
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        }
    }
}

pub type SharedRouter = Arc<Mutex<Router>>;

/// Runs a discovery sweep every hello interval.
pub struct HelloDaemon {
    router: SharedRouter,
    interval: Duration,
}

impl HelloDaemon {
    pub fn new(router: SharedRouter, interval: Duration) -> Self {
        Self { router, interval }
    }
}

impl AsyncRunnable for HelloDaemon {
    async fn run_async(&mut self) {
        let result = self.router.lock().await.start_discovery();
        match result {
            Ok(0) => log_debug!("every interface already has neighbors"),
            Ok(n) => log!("sent {} hello packets", n),
            Err(e) => log_error!("discovery failed: {}", e),
        }
        tokio::time::sleep(self.interval).await;
    }
}

/// Feeds captured packets to the router, one at a time.
pub struct ReceiveDaemon {
    router: SharedRouter,
    rx: mpsc::Receiver<Received>,
}

impl ReceiveDaemon {
    pub fn new(router: SharedRouter, rx: mpsc::Receiver<Received>) -> Self {
        Self { router, rx }
    }
}

impl AsyncRunnable for ReceiveDaemon {
    async fn run_async(&mut self) {
        let Some(received) = self.rx.recv().await else {
            log_warning!("every capture daemon has stopped");
            tokio::time::sleep(Duration::from_secs(1)).await;
            return;
        };
        let mut router = self.router.lock().await;
        match router.on_packet_received(&received.payload, received.info) {
            Ok(status) => log_debug!("packet from {}: {:?}", received.info.source, status),
            Err(e) => log_warning!("packet from {} rejected: {}", received.info.source, e),
        }
    }
}
