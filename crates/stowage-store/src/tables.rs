//! redb table definitions for the Stowage slot store.

use redb::TableDefinition;

/// Raw slot text keyed by slot name (optionally `{namespace}/{key}`).
pub const SLOTS: TableDefinition<&str, &str> = TableDefinition::new("slots");
