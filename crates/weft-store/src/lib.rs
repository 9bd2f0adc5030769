//! Graph store adapter for the Weft platform.
//!
//! Translates event records to and from the triple store's HTTP protocol.
//! Two backend dialects are supported behind the one [`TripleStore`]
//! capability: Apache Jena Fuseki (accepts raw Turtle document uploads) and
//! Ontotext GraphDB (requires statements wrapped in a SPARQL `INSERT DATA`
//! update). The dialect is selected once at construction via [`open_store`];
//! callers never see the difference.
//!
//! [`EventStore`] layers the event operations (store, list, point lookup)
//! on top of the capability, composing the metadata Turtle block and the
//! SPARQL queries in [`sparql`].

mod backend;
mod error;
mod events;
mod results;
pub mod sparql;

pub use backend::{open_store, Backend, FusekiStore, GraphDbStore, TripleStore};
pub use error::StoreError;
pub use events::{EventFilter, EventStore};
pub use results::{BindingValue, Head, Rows, SelectResults};
