#![allow(dead_code)]

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sublat_common::Contains;

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Shared counter of predicate evaluations.
#[derive(Clone, Debug, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }

    pub fn atoms(&self, items: &[u8]) -> Atoms {
        Atoms {
            items: items.iter().copied().collect(),
            calls: self.clone(),
        }
    }
}

/// A set of atoms. One set contains another if it is a proper superset;
/// every evaluation is counted.
#[derive(Clone, Debug)]
pub struct Atoms {
    pub items: BTreeSet<u8>,
    calls: Calls,
}

impl Contains for Atoms {
    type Error = Infallible;

    fn contains(&self, other: &Self) -> Result<bool, Self::Error> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.len() > other.items.len() && self.items.is_superset(&other.items))
    }
}

/// Failure raised by [`Fragile`].
#[derive(Debug, thiserror::Error)]
#[error("cannot compare against {size} atoms")]
pub struct TooLarge {
    pub size: usize,
}

/// Atoms whose containment check fails once the other side holds at least
/// `fail_from` atoms.
#[derive(Clone, Debug)]
pub struct Fragile {
    pub items: BTreeSet<u8>,
    fail_from: Option<usize>,
}

impl Fragile {
    pub fn new(items: &[u8]) -> Self {
        Self {
            items: items.iter().copied().collect(),
            fail_from: None,
        }
    }

    pub fn failing_from(items: &[u8], size: usize) -> Self {
        Self {
            fail_from: Some(size),
            ..Self::new(items)
        }
    }
}

impl Contains for Fragile {
    type Error = TooLarge;

    fn contains(&self, other: &Self) -> Result<bool, Self::Error> {
        let size = other.items.len();
        if self.fail_from.is_some_and(|limit| size >= limit) {
            return Err(TooLarge { size });
        }
        Ok(self.items.len() > size && self.items.is_superset(&other.items))
    }
}
