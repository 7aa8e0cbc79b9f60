//! Transient user notifications

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
    pub lifetime: Duration,
}

impl Toast {
    pub fn is_active_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.lifetime
    }
}

#[derive(Debug)]
pub struct Toaster {
    toasts: DashMap<u64, Toast>,
    next_id: AtomicU64,
    lifetime: Duration,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::with_lifetime(DEFAULT_TOAST_LIFETIME)
    }
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            toasts: DashMap::new(),
            next_id: AtomicU64::new(1),
            lifetime,
        }
    }

    /// Show a notification; returns its id for [`Toaster::dismiss`]
    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            kind,
            message: message.into(),
            created_at: Instant::now(),
            lifetime: self.lifetime,
        };
        tracing::debug!("Toast {:?}: {}", toast.kind, toast.message);
        self.toasts.insert(id, toast);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message)
    }

    /// Toasts still visible at `now`, oldest first. Expired ones are dropped.
    pub fn active_at(&self, now: Instant) -> Vec<Toast> {
        self.toasts.retain(|_, toast| toast.is_active_at(now));

        let mut active: Vec<Toast> = self.toasts.iter().map(|t| t.value().clone()).collect();
        active.sort_by_key(|t| t.id);
        active
    }

    pub fn active(&self) -> Vec<Toast> {
        self.active_at(Instant::now())
    }

    /// Returns false when the toast was already gone
    pub fn dismiss(&self, id: u64) -> bool {
        self.toasts.remove(&id).is_some()
    }
}
