//! Store trigger policy
//!
//! Decides after each sensor sample whether the engine state should be
//! written out. Two triggers, checked in order:
//!
//! 1. **Interval**: `store_interval_ms` elapsed since the last store
//! 2. **Milestone**: accuracy just reached its maximum and that milestone
//!    has not been stored yet
//!
//! The trigger state lives in RAM only. After a reboot the interval is
//! measured from boot and the milestone is stored again.

use crate::config::PersistConfig;
use crate::persist::{PersistError, StatePersistence};
use crate::traits::fusion::FusionEngine;
use crate::traits::storage::NvStorage;

/// Reason a store was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreTrigger {
    /// Periodic store interval elapsed
    Interval,
    /// Accuracy reached its maximum
    Milestone,
}

/// Bookkeeping for the trigger policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistenceTriggerState {
    /// Tick of the last successful store (ms)
    pub last_store_ms: u32,
    /// Accuracy milestone covered by the last milestone store
    pub last_milestone_accuracy: u8,
}

impl PersistenceTriggerState {
    /// Fresh state, as after boot
    pub const fn new() -> Self {
        Self {
            last_store_ms: 0,
            last_milestone_accuracy: 0,
        }
    }

    /// Decide whether a sample taken at `now_ms` warrants a store
    pub fn evaluate(
        &self,
        now_ms: u32,
        accuracy: u8,
        max_accuracy: u8,
        store_interval_ms: u32,
    ) -> Option<StoreTrigger> {
        if now_ms.wrapping_sub(self.last_store_ms) >= store_interval_ms {
            Some(StoreTrigger::Interval)
        } else if accuracy == max_accuracy && self.last_milestone_accuracy != max_accuracy {
            Some(StoreTrigger::Milestone)
        } else {
            None
        }
    }

    /// Record a successful store
    pub fn record_store(&mut self, trigger: StoreTrigger, now_ms: u32, max_accuracy: u8) {
        if trigger == StoreTrigger::Milestone {
            self.last_milestone_accuracy = max_accuracy;
        }
        self.last_store_ms = now_ms;
    }
}

/// Trigger policy bound to a store interval
#[derive(Debug, Clone)]
pub struct PersistencePolicy {
    state: PersistenceTriggerState,
    store_interval_ms: u32,
}

impl PersistencePolicy {
    /// Create a policy from the persistence configuration
    pub fn new(config: &PersistConfig) -> Self {
        Self {
            state: PersistenceTriggerState::new(),
            store_interval_ms: config.store_interval_ms,
        }
    }

    /// Get the current trigger state
    pub fn state(&self) -> &PersistenceTriggerState {
        &self.state
    }

    /// Handle a successful sensor sample
    ///
    /// Stores the engine state if a trigger fires. The trigger state only
    /// advances when the store succeeds, so a failed store is retried on
    /// the next sample.
    pub fn on_sample<S: NvStorage, E: FusionEngine>(
        &mut self,
        now_ms: u32,
        engine: &mut E,
        persistence: &mut StatePersistence<S>,
    ) -> Result<Option<StoreTrigger>, PersistError> {
        let Some(trigger) = self.state.evaluate(
            now_ms,
            engine.accuracy(),
            E::MAX_ACCURACY,
            self.store_interval_ms,
        ) else {
            return Ok(None);
        };

        if let Err(e) = persistence.store(engine) {
            #[cfg(feature = "defmt")]
            defmt::warn!("State store ({:?}) failed: {:?}", trigger, e);
            return Err(e);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Stored engine state ({:?}) at {} ms", trigger, now_ms);

        self.state.record_store(trigger, now_ms, E::MAX_ACCURACY);
        Ok(Some(trigger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;
    use crate::traits::fusion::STATE_SIZE;

    const T: u32 = 10_000;

    struct Engine {
        accuracy: u8,
        snapshots: u32,
    }

    impl FusionEngine for Engine {
        fn state(&mut self, buffer: &mut [u8; STATE_SIZE]) {
            self.snapshots += 1;
            buffer.fill(self.snapshots as u8);
        }

        fn set_state(&mut self, _state: &[u8; STATE_SIZE]) {}

        fn accuracy(&self) -> u8 {
            self.accuracy
        }
    }

    fn setup() -> (
        PersistencePolicy,
        Engine,
        StatePersistence<MemoryStorage<2048>>,
    ) {
        let config = PersistConfig::new().with_store_interval_ms(T);
        (
            PersistencePolicy::new(&config),
            Engine {
                accuracy: 0,
                snapshots: 0,
            },
            StatePersistence::new(MemoryStorage::new(), config),
        )
    }

    #[test]
    fn test_milestone_fires_once() {
        let state = PersistenceTriggerState::new();
        assert_eq!(state.evaluate(10, 2, 3, T), None);
        assert_eq!(state.evaluate(10, 3, 3, T), Some(StoreTrigger::Milestone));

        let (mut policy, mut engine, mut persistence) = setup();
        let mut fired = [None; 6];
        for (i, accuracy) in [0u8, 1, 2, 3, 3, 3].into_iter().enumerate() {
            engine.accuracy = accuracy;
            fired[i] = policy
                .on_sample(100 + i as u32, &mut engine, &mut persistence)
                .unwrap();
        }

        assert_eq!(
            fired,
            [None, None, None, Some(StoreTrigger::Milestone), None, None]
        );
        assert_eq!(engine.snapshots, 1);
        assert_eq!(policy.state().last_milestone_accuracy, 3);
        assert_eq!(policy.state().last_store_ms, 103);
    }

    #[test]
    fn test_interval_fires_at_boundary() {
        let (mut policy, mut engine, mut persistence) = setup();
        let mut fired = [None; 4];
        for (i, now) in [0, T - 1, T, T + 1].into_iter().enumerate() {
            fired[i] = policy.on_sample(now, &mut engine, &mut persistence).unwrap();
        }

        assert_eq!(fired, [None, None, Some(StoreTrigger::Interval), None]);
        assert_eq!(engine.snapshots, 1);
        assert_eq!(policy.state().last_store_ms, T);
    }

    #[test]
    fn test_interval_takes_priority() {
        let (mut policy, mut engine, mut persistence) = setup();
        engine.accuracy = 3;

        let first = policy.on_sample(T, &mut engine, &mut persistence).unwrap();
        assert_eq!(first, Some(StoreTrigger::Interval));
        // Milestone is still outstanding after an interval store
        assert_eq!(policy.state().last_milestone_accuracy, 0);

        let second = policy.on_sample(T + 1, &mut engine, &mut persistence).unwrap();
        assert_eq!(second, Some(StoreTrigger::Milestone));
    }

    #[test]
    fn test_milestone_resets_interval() {
        let (mut policy, mut engine, mut persistence) = setup();
        engine.accuracy = 3;
        policy.on_sample(500, &mut engine, &mut persistence).unwrap();

        assert_eq!(
            policy.on_sample(T, &mut engine, &mut persistence).unwrap(),
            None
        );
        assert_eq!(
            policy.on_sample(500 + T, &mut engine, &mut persistence).unwrap(),
            Some(StoreTrigger::Interval)
        );
    }

    #[test]
    fn test_tick_wraparound() {
        let state = PersistenceTriggerState {
            last_store_ms: u32::MAX - 100,
            last_milestone_accuracy: 3,
        };
        assert_eq!(state.evaluate(T - 200, 0, 3, T), None);
        assert_eq!(state.evaluate(T - 101, 0, 3, T), Some(StoreTrigger::Interval));
    }

    #[test]
    fn test_failed_store_is_retried() {
        let (mut policy, mut engine, mut persistence) = setup();
        engine.accuracy = 3;
        persistence.storage_mut().set_responsive(false);

        let result = policy.on_sample(50, &mut engine, &mut persistence);
        assert!(matches!(result, Err(PersistError::Storage(_))));
        assert_eq!(*policy.state(), PersistenceTriggerState::new());

        persistence.storage_mut().set_responsive(true);
        let result = policy.on_sample(60, &mut engine, &mut persistence);
        assert_eq!(result, Ok(Some(StoreTrigger::Milestone)));
    }

    #[test]
    fn test_stored_blob_is_loadable() {
        let (mut policy, mut engine, mut persistence) = setup();
        policy.on_sample(T, &mut engine, &mut persistence).unwrap();

        let stored = &persistence.storage().contents()[..STATE_SIZE];
        assert!(stored.iter().all(|&b| b == 1));
        assert!(persistence.load(&mut engine).is_ok());
    }
}
