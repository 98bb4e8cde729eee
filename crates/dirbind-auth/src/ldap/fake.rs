//! In-memory directory used by the factory tests

use crate::ldap::transport::{DirectoryConnection, DirectoryError, DirectoryTransport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    /// Connection refused
    Unreachable,
    /// Accepts the TCP handshake but never completes it
    HangOnConnect,
    /// Connects, then never answers the bind request
    HangOnBind,
    /// Connects just inside the connect timeout, then answers neither bind nor unbind
    Wedged,
}

#[derive(Debug, Default)]
pub struct Counters {
    pub attempts: AtomicUsize,
    pub opened: AtomicUsize,
    pub live: AtomicUsize,
    pub unbinds: AtomicUsize,
    pub connect_timeout_ms: AtomicU64,
    pub read_timeout_ms: AtomicU64,
}

/// Directory backend that counts every session it hands out
#[derive(Debug, Clone)]
pub struct FakeDirectory {
    accounts: HashMap<String, String>,
    behavior: Behavior,
    counters: Arc<Counters>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            behavior: Behavior::Normal,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn with_account(mut self, principal: &str, secret: &str) -> Self {
        self.accounts.insert(principal.to_string(), secret.to_string());
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn attempts(&self) -> usize {
        self.counters.attempts.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    /// Sessions opened and not yet dropped
    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    pub fn unbinds(&self) -> usize {
        self.counters.unbinds.load(Ordering::SeqCst)
    }

    /// Wait until `live()` reaches `expected`; failed binds are released on a spawned task
    pub async fn settle(&self, expected: usize) {
        for _ in 0..200 {
            if self.live() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.counters.connect_timeout_ms.load(Ordering::SeqCst))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.counters.read_timeout_ms.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl DirectoryTransport for FakeDirectory {
    type Connection = FakeConnection;

    async fn open(&self, url: &str, connect_timeout: Duration) -> Result<FakeConnection, DirectoryError> {
        self.counters.attempts.fetch_add(1, Ordering::SeqCst);
        self.counters
            .connect_timeout_ms
            .store(connect_timeout.as_millis() as u64, Ordering::SeqCst);

        match self.behavior {
            Behavior::Unreachable => {
                return Err(DirectoryError::Connect(format!("{}: connection refused", url)))
            }
            Behavior::HangOnConnect => std::future::pending::<()>().await,
            Behavior::Wedged => tokio::time::sleep(Duration::from_millis(9_999)).await,
            Behavior::Normal | Behavior::HangOnBind => {}
        }

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        self.counters.live.fetch_add(1, Ordering::SeqCst);

        Ok(FakeConnection {
            accounts: self.accounts.clone(),
            behavior: self.behavior,
            counters: self.counters.clone(),
        })
    }
}

#[derive(Debug)]
pub struct FakeConnection {
    accounts: HashMap<String, String>,
    behavior: Behavior,
    counters: Arc<Counters>,
}

#[async_trait]
impl DirectoryConnection for FakeConnection {
    async fn simple_bind(
        &mut self,
        principal: &str,
        secret: &str,
        read_timeout: Duration,
    ) -> Result<(), DirectoryError> {
        self.counters
            .read_timeout_ms
            .store(read_timeout.as_millis() as u64, Ordering::SeqCst);

        if matches!(self.behavior, Behavior::HangOnBind | Behavior::Wedged) {
            std::future::pending::<()>().await;
        }

        if principal.is_empty() {
            return Err(DirectoryError::BindRejected {
                rc: 53,
                text: "anonymous simple bind disallowed".to_string(),
            });
        }

        match self.accounts.get(principal) {
            Some(expected) if expected == secret => Ok(()),
            _ => Err(DirectoryError::BindRejected {
                rc: 49,
                text: "invalid credentials".to_string(),
            }),
        }
    }

    async fn unbind(&mut self) -> Result<(), DirectoryError> {
        if self.behavior == Behavior::Wedged {
            std::future::pending::<()>().await;
        }
        self.counters.unbinds.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}
