#![allow(dead_code)]

use fibre_registry::{ConcreteType, DiagnosticsSink, RegistryEvent};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

// Abstractions must be Send + Sync for the registry to hand them out.
pub trait DirectoryHandle: Send + Sync {
  fn path(&self) -> &str;
}

#[derive(Debug, Default)]
pub struct DirectoryHandleImpl {
  pub path: String,
}

impl DirectoryHandle for DirectoryHandleImpl {
  fn path(&self) -> &str {
    &self.path
  }
}

pub trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

pub struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}

pub struct GermanGreeter;
impl Greeter for GermanGreeter {
  fn greet(&self) -> String {
    "Hallo!".to_string()
  }
}

// Implemented by nothing above; used for mismatch checks.
pub trait Clock: Send + Sync {
  fn now(&self) -> u64;
}

pub struct FixedClock(pub u64);
impl Clock for FixedClock {
  fn now(&self) -> u64 {
    self.0
  }
}

#[derive(Debug)]
pub struct DiskFullError {
  pub path: String,
}

impl fmt::Display for DiskFullError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "disk full at {}", self.path)
  }
}

impl std::error::Error for DiskFullError {}

pub fn directory_handle_type() -> Arc<ConcreteType> {
  ConcreteType::builder::<DirectoryHandleImpl>()
    .implements::<dyn DirectoryHandle>(|c| c)
    .default_constructor()
    .constructor(|(path,): (String,)| DirectoryHandleImpl { path })
    .build()
}

// Always fails to construct from a path.
pub fn failing_directory_type() -> Arc<ConcreteType> {
  ConcreteType::builder::<DirectoryHandleImpl>()
    .implements::<dyn DirectoryHandle>(|c| c)
    .try_constructor(|(path,): (String,)| Err::<DirectoryHandleImpl, _>(DiskFullError { path }))
    .build()
}

pub fn english_type() -> Arc<ConcreteType> {
  ConcreteType::builder::<EnglishGreeter>()
    .implements::<dyn Greeter>(|c| c)
    .constructor(|(): ()| EnglishGreeter)
    .build()
}

pub fn german_type() -> Arc<ConcreteType> {
  ConcreteType::builder::<GermanGreeter>()
    .implements::<dyn Greeter>(|c| c)
    .constructor(|(): ()| GermanGreeter)
    .build()
}

pub fn fixed_clock_type() -> Arc<ConcreteType> {
  ConcreteType::builder::<FixedClock>()
    .implements::<dyn Clock>(|c| c)
    .constructor(|(): ()| FixedClock(0))
    .constructor(|(at,): (u64,)| FixedClock(at))
    .build()
}

// --- Diagnostics ---

#[derive(Default)]
pub struct RecordingSink {
  pub events: Mutex<Vec<RegistryEvent>>,
  pub shutdowns: AtomicUsize,
}

impl RecordingSink {
  pub fn events(&self) -> Vec<RegistryEvent> {
    self.events.lock().clone()
  }

  pub fn shutdown_count(&self) -> usize {
    self.shutdowns.load(Ordering::SeqCst)
  }
}

impl DiagnosticsSink for RecordingSink {
  fn record(&self, event: &RegistryEvent) {
    self.events.lock().push(event.clone());
  }

  fn shutdown(&self) {
    self.shutdowns.fetch_add(1, Ordering::SeqCst);
  }
}

// Panics on every event.
pub struct PanickingSink;

impl DiagnosticsSink for PanickingSink {
  fn record(&self, event: &RegistryEvent) {
    panic!("sink failure on {:?}", event);
  }
}
