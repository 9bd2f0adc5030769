//! The Weft event consumer: a long-lived, single-threaded worker per node.
//!
//! Pulls broadcast events off the node's queue with a prefetch limit of one,
//! materializes each event's payload triples into the graph store, and
//! resolves every delivery to a terminal state: acknowledged on success,
//! dead-lettered after the bounded retry budget is exhausted.
//!
//! Prefetch-one is deliberate: only one message is in flight at a time and
//! retries block that single slot, trading throughput for strict per-node
//! ordering. Nodes scale out by running one such consumer per node queue,
//! with no cross-node coordination.

pub mod config;
pub mod process;
pub mod retry;
pub mod run;

pub use config::{load_config, ConfigError, ConsumerConfig};
pub use process::{process_delivery, Outcome};
pub use retry::RetryPolicy;
pub use run::{connect_with_retry, run, ConsumerError};
