use tracing::debug;

use super::desc::{Desc, InstanceDesc, InstanceState};
use super::tokens::{RandomTokenGenerator, TokenGenerator, Tokens};

/// Number of tokens each alertmanager instance owns in the ring
pub const RING_NUM_TOKENS: usize = 128;

/// Hooks the ring framework calls during an instance's lifecycle
///
/// Hooks run under the framework's lock: they must not block and must not
/// call back into the ring.
pub trait RingLifecycleDelegate {
    /// Called while the instance registers. `existing` is the instance's
    /// current ring entry, if it already has one. Returns the state to adopt
    /// and the tokens to claim; the framework sorts the tokens afterwards.
    fn on_ring_instance_register(
        &self,
        ring_desc: &Desc,
        instance_id: &str,
        existing: Option<&InstanceDesc>,
    ) -> (InstanceState, Tokens);

    /// Called after tokens have been assigned to the instance
    fn on_ring_instance_tokens(&self, tokens: &Tokens);

    /// Called when the instance starts leaving the ring
    fn on_ring_instance_stopping(&self);

    /// Called on every heartbeat, before the entry is written back
    fn on_ring_instance_heartbeat(&self, ring_desc: &mut Desc, instance_desc: &mut InstanceDesc);
}

/// Ring join policy for multi-tenant alertmanager instances
///
/// Every (re)registration starts in [`InstanceState::Joining`], keeping any
/// tokens the instance already owned and topping them up to `NUM_TOKENS`
/// with fresh tokens nobody else holds.
#[derive(Debug, Clone)]
pub struct AlertmanagerRingDelegate<G = RandomTokenGenerator, const NUM_TOKENS: usize = RING_NUM_TOKENS>
{
    generator: G,
}

impl AlertmanagerRingDelegate {
    pub fn new() -> Self {
        Self {
            generator: RandomTokenGenerator,
        }
    }
}

impl Default for AlertmanagerRingDelegate {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: TokenGenerator, const NUM_TOKENS: usize> AlertmanagerRingDelegate<G, NUM_TOKENS> {
    /// Use a custom token source
    pub fn with_generator(generator: G) -> Self {
        Self { generator }
    }

    /// Tokens each instance ends up owning after registration
    pub const fn num_tokens(&self) -> usize {
        NUM_TOKENS
    }
}

impl<G: TokenGenerator, const NUM_TOKENS: usize> RingLifecycleDelegate
    for AlertmanagerRingDelegate<G, NUM_TOKENS>
{
    fn on_ring_instance_register(
        &self,
        ring_desc: &Desc,
        instance_id: &str,
        existing: Option<&InstanceDesc>,
    ) -> (InstanceState, Tokens) {
        let mut tokens = existing
            .map(|instance| instance.tokens.clone())
            .unwrap_or_default();
        let inherited = tokens.len();

        let (_, taken) = ring_desc.tokens_for(instance_id);
        let fresh = self
            .generator
            .generate(NUM_TOKENS.saturating_sub(inherited), &taken);

        debug!(
            instance_id,
            inherited,
            generated = fresh.len(),
            "Registering alertmanager instance in the ring"
        );

        tokens.extend(fresh.into_vec());

        (InstanceState::Joining, tokens)
    }

    fn on_ring_instance_tokens(&self, _tokens: &Tokens) {}

    fn on_ring_instance_stopping(&self) {}

    fn on_ring_instance_heartbeat(&self, _ring_desc: &mut Desc, _instance_desc: &mut InstanceDesc) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Hands out the smallest free tokens, for predictable assertions
    struct LowestFreeTokens;

    impl TokenGenerator for LowestFreeTokens {
        fn generate(&self, count: usize, taken: &[u32]) -> Tokens {
            (0u32..)
                .filter(|token| !taken.contains(token))
                .take(count)
                .collect()
        }
    }

    fn foreign_ring() -> Desc {
        let mut desc = Desc::new();
        desc.add_instance(
            "am-foreign",
            InstanceDesc::new("10.0.0.9:9094", InstanceState::Active, vec![0, 2, 4].into()),
        );
        desc
    }

    #[test]
    fn test_new_instance_gets_full_quota() {
        let delegate = AlertmanagerRingDelegate::new();
        let desc = foreign_ring();

        let (state, tokens) = delegate.on_ring_instance_register(&desc, "am-0", None);

        assert_eq!(state, InstanceState::Joining);
        assert_eq!(tokens.len(), RING_NUM_TOKENS);
        assert_eq!(delegate.num_tokens(), RING_NUM_TOKENS);
        assert!(tokens.iter().all(|token| ![0, 2, 4].contains(token)));
    }

    #[test]
    fn test_rejoin_keeps_existing_tokens() {
        let delegate = AlertmanagerRingDelegate::new();
        let mut desc = Desc::new();

        let foreign = RandomTokenGenerator.generate(1000, &[7, 11]);
        desc.add_instance(
            "am-foreign",
            InstanceDesc::new("10.0.0.9:9094", InstanceState::Active, foreign.clone()),
        );
        let existing = desc
            .add_instance(
                "am-0",
                InstanceDesc::new("10.0.0.1:9094", InstanceState::Active, vec![7, 11].into()),
            )
            .clone();

        let (state, tokens) = delegate.on_ring_instance_register(&desc, "am-0", Some(&existing));

        assert_eq!(state, InstanceState::Joining);
        assert_eq!(tokens.len(), 128);
        assert_eq!(&tokens[..2], &[7, 11]);

        let excluded: HashSet<u32> = foreign.iter().copied().chain([7, 11]).collect();
        assert!(tokens[2..].iter().all(|token| !excluded.contains(token)));

        let distinct: HashSet<u32> = tokens.iter().copied().collect();
        assert_eq!(distinct.len(), 128);
    }

    #[test]
    fn test_fresh_tokens_skip_taken_set() {
        let delegate = AlertmanagerRingDelegate::<_, 6>::with_generator(LowestFreeTokens);
        let mut desc = foreign_ring();
        let existing = desc
            .add_instance(
                "am-0",
                InstanceDesc::new("10.0.0.1:9094", InstanceState::Leaving, vec![1].into()),
            )
            .clone();

        let (state, tokens) = delegate.on_ring_instance_register(&desc, "am-0", Some(&existing));

        assert_eq!(state, InstanceState::Joining);
        assert_eq!(tokens.into_vec(), vec![1, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_unknown_existing_flag_ignores_ring_entry() {
        let delegate = AlertmanagerRingDelegate::<_, 4>::with_generator(LowestFreeTokens);
        let mut desc = Desc::new();
        desc.add_instance(
            "am-0",
            InstanceDesc::new("10.0.0.1:9094", InstanceState::Active, vec![0, 1].into()),
        );

        let (_, tokens) = delegate.on_ring_instance_register(&desc, "am-0", None);

        assert_eq!(tokens.into_vec(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_over_quota_generates_nothing() {
        let delegate = AlertmanagerRingDelegate::<_, 2>::with_generator(LowestFreeTokens);
        let existing = InstanceDesc::new("10.0.0.1:9094", InstanceState::Active, vec![9, 8, 7].into());

        let (state, tokens) =
            delegate.on_ring_instance_register(&Desc::new(), "am-0", Some(&existing));

        assert_eq!(state, InstanceState::Joining);
        assert_eq!(tokens.into_vec(), vec![9, 8, 7]);
    }

    #[test]
    fn test_remaining_hooks_leave_ring_untouched() {
        let delegate = AlertmanagerRingDelegate::default();
        let mut desc = foreign_ring();
        let before = desc.clone();
        let mut instance = desc.get_instance("am-foreign").cloned().unwrap();
        let instance_before = instance.clone();

        delegate.on_ring_instance_tokens(&instance.tokens.clone());
        delegate.on_ring_instance_stopping();
        delegate.on_ring_instance_heartbeat(&mut desc, &mut instance);

        assert_eq!(desc, before);
        assert_eq!(instance, instance_before);
    }
}
