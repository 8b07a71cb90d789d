//! Storage capability probe
//!
//! Each signal is the NEGATION of API presence: `true` means the storage
//! API is missing, which flags restricted or hardened environments.

use bp_protocol::Signal;

use super::{Probe, ProbeOutcome};
use crate::constants::keys;
use crate::env::Environment;

#[derive(Debug, Default, Clone, Copy)]
pub struct StorageProbe;

impl Probe for StorageProbe {
    fn name(&self) -> &'static str {
        "storage"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        let storage = env.storage();
        ProbeOutcome::Collected(vec![
            Signal::new(keys::SESSION_STORAGE, !storage.session_storage),
            Signal::new(keys::LOCAL_STORAGE, !storage.local_storage),
            Signal::new(keys::INDEXED_DB, !storage.indexed_db),
            Signal::new(keys::OPEN_DATABASE, !storage.open_database),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MockEnvironment, StorageAvailability};
    use bp_protocol::SignalValue;

    fn collect_with(storage: StorageAvailability) -> Vec<bool> {
        let mut env = MockEnvironment::new();
        env.expect_storage().return_const(storage);
        StorageProbe
            .collect(&env)
            .signals()
            .iter()
            .map(|s| match s.value {
                SignalValue::Bool(b) => b,
                ref other => panic!("unexpected value {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_all_present_reports_false() {
        let flags = collect_with(StorageAvailability {
            session_storage: true,
            local_storage: true,
            indexed_db: true,
            open_database: true,
        });
        assert_eq!(flags, vec![false, false, false, false]);
    }

    #[test]
    fn test_absent_reports_true() {
        let flags = collect_with(StorageAvailability {
            session_storage: false,
            local_storage: true,
            indexed_db: false,
            open_database: false,
        });
        assert_eq!(flags, vec![true, false, true, true]);
    }

    #[test]
    fn test_key_order() {
        let mut env = MockEnvironment::new();
        env.expect_storage().return_const(StorageAvailability::default());
        let outcome = StorageProbe.collect(&env);
        let order: Vec<&str> = outcome.signals().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            order,
            vec![keys::SESSION_STORAGE, keys::LOCAL_STORAGE, keys::INDEXED_DB, keys::OPEN_DATABASE]
        );
    }
}
