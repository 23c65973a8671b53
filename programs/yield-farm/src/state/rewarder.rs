use anchor_lang::prelude::*;

use crate::constants::{ACC_PRECISION, MAX_OVERLAY_STREAMS};
use crate::errors::FarmError;
use crate::ledger::{Accumulator, Participant};
use crate::state::PoolInfo;

/// One secondary reward token emitted per second to a single chef pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct OverlayStream {
    pub reward_mint: Pubkey,

    /// Rewarder-owned token account paying this stream
    pub reward_vault: Pubkey,

    pub reward_per_second: u64,

    /// Time-based accumulator; `total_shares` mirrors `Rewarder::total_shares`
    pub accumulator: Accumulator,
}

/// Overlay rewarder attached to one pool of one chef
/// PDA: ["rewarder", chef, pid, nonce]
#[account]
#[derive(Default, InitSpace)]
pub struct Rewarder {
    pub chef: Pubkey,

    pub pid: u32,

    /// Can add streams and change their rates
    pub authority: Pubkey,

    /// Lets several rewarders exist for the same pool over time
    pub nonce: u64,

    /// Sum of `OverlayUser::amount` seen through the hooks
    pub total_shares: u64,

    #[max_len(4)]
    pub streams: Vec<OverlayStream>,

    pub bump: u8,
}

/// A user's record inside one rewarder
/// PDA: ["overlay-user", rewarder, owner]
#[account]
#[derive(Default, InitSpace)]
pub struct OverlayUser {
    pub rewarder: Pubkey,

    pub owner: Pubkey,

    /// Stake as last reported by the chef
    pub amount: u64,

    /// Signed debt per stream, indexed like `Rewarder::streams`
    pub reward_debts: [i128; 4],

    /// Settled but not yet transferred reward per stream
    pub unpaid: [u64; 4],

    pub bump: u8,
}

impl Rewarder {
    pub fn stream(&self, index: u8) -> Result<&OverlayStream> {
        self.streams
            .get(index as usize)
            .ok_or_else(|| error!(FarmError::InvalidStream))
    }

    pub fn add_stream(
        &mut self,
        reward_mint: Pubkey,
        reward_vault: Pubkey,
        reward_per_second: u64,
        now: u64,
    ) -> Result<u8> {
        require!(self.streams.len() < MAX_OVERLAY_STREAMS, FarmError::TooManyStreams);
        let mut accumulator = Accumulator::new(ACC_PRECISION, now);
        accumulator.total_shares = self.total_shares;
        self.streams.push(OverlayStream {
            reward_mint,
            reward_vault,
            reward_per_second,
            accumulator,
        });
        Ok((self.streams.len() - 1) as u8)
    }

    /// Settles every stream up to `now`.
    pub fn settle(&mut self, now: u64) -> Result<()> {
        for stream in self.streams.iter_mut() {
            let rate = stream.reward_per_second;
            stream.accumulator.settle(now, |secs| {
                secs.checked_mul(rate).ok_or_else(|| error!(FarmError::Overflow))
            })?;
        }
        Ok(())
    }

    pub fn set_rate(&mut self, index: u8, reward_per_second: u64, now: u64) -> Result<()> {
        self.stream(index)?;
        self.settle(now)?;
        self.streams[index as usize].reward_per_second = reward_per_second;
        Ok(())
    }

    /// Unclaimed reward of `position` in stream `index`, unpaid balance included.
    pub fn pending(&self, position: &OverlayUser, index: u8, now: u64) -> Result<u64> {
        let stream = self.stream(index)?;
        let rate = stream.reward_per_second;
        let mut scratch = stream.accumulator;
        scratch.settle(now, |secs| {
            secs.checked_mul(rate).ok_or_else(|| error!(FarmError::Overflow))
        })?;
        let participant = Participant {
            amount: position.amount,
            reward_debt: position.reward_debts[index as usize],
        };
        let owed = scratch.pending(&participant)?;
        position.unpaid[index as usize]
            .checked_add(owed)
            .ok_or_else(|| error!(FarmError::Overflow))
    }

    /// What a claim of stream `index` would pay at most, applying the same
    /// rules as `refresh_position`.
    pub fn claimable(&self, position: &OverlayUser, index: u8, attached: bool, stake: u64, now: u64) -> Result<u64> {
        if attached && position.amount == stake {
            return self.pending(position, index, now);
        }
        self.stream(index)?;
        Ok(position.unpaid[index as usize])
    }

    /// Credits everything earned at the old amount to `unpaid`, then moves
    /// the position to `new_amount`.
    pub fn update_position(&mut self, position: &mut OverlayUser, new_amount: u64, now: u64) -> Result<()> {
        self.settle(now)?;
        let old_amount = position.amount;

        for (i, stream) in self.streams.iter_mut().enumerate() {
            let acc = &mut stream.accumulator;
            let mut participant = Participant {
                amount: old_amount,
                reward_debt: position.reward_debts[i],
            };
            let owed = acc.harvest(&mut participant)?;
            position.unpaid[i] = position.unpaid[i]
                .checked_add(owed)
                .ok_or(FarmError::Overflow)?;
            acc.rebase_debt(&mut participant, new_amount)?;
            position.reward_debts[i] = participant.reward_debt;

            acc.remove_shares(old_amount)?;
            acc.add_shares(new_amount)?;
        }

        self.total_shares = self
            .total_shares
            .checked_sub(old_amount)
            .and_then(|t| t.checked_add(new_amount))
            .ok_or(FarmError::Overflow)?;
        position.amount = new_amount;
        Ok(())
    }

    /// Drops the position without crediting anything. Never fails; if the
    /// streams cannot be settled they simply skip accrual for this interval.
    pub fn forfeit_position(&mut self, position: &mut OverlayUser, now: u64) {
        if self.settle(now).is_err() {
            for stream in self.streams.iter_mut() {
                stream.accumulator.last_update = stream.accumulator.last_update.max(now);
            }
        }
        let amount = position.amount;
        for stream in self.streams.iter_mut() {
            stream.accumulator.total_shares = stream.accumulator.total_shares.saturating_sub(amount);
        }
        self.total_shares = self.total_shares.saturating_sub(amount);
        position.amount = 0;
        position.reward_debts = [0; 4];
    }

    /// Brings a record that no longer matches the chef stake back to zero
    /// before it is used. A mismatch comes from an emergency exit the overlay
    /// never saw, or from a stake older than the record. Accrual on the
    /// recorded amount since its last update is dropped; `unpaid` is kept.
    pub fn reconcile(&mut self, position: &mut OverlayUser, stake: u64, now: u64) {
        if position.amount != stake {
            self.forfeit_position(position, now);
        }
    }

    /// Credits what `position` has earned up to `now` at its chef stake.
    /// A rewarder its pool no longer points to is frozen: nothing accrues
    /// and only the existing `unpaid` balances can be claimed.
    pub fn refresh_position(
        &mut self,
        position: &mut OverlayUser,
        attached: bool,
        stake: u64,
        now: u64,
    ) -> Result<()> {
        if !attached {
            return Ok(());
        }
        self.reconcile(position, stake, now);
        self.update_position(position, stake, now)
    }
}

impl OverlayUser {
    /// Takes up to `available` of the unpaid balance of stream `index`.
    pub fn take_unpaid(&mut self, index: u8, available: u64) -> Result<u64> {
        let slot = self
            .unpaid
            .get_mut(index as usize)
            .ok_or_else(|| error!(FarmError::InvalidStream))?;
        let paid = (*slot).min(available);
        *slot -= paid;
        Ok(paid)
    }
}

/// Notifications a chef forwards to an overlay on every user action.
///
/// `new_amount` is the user's chef stake after the action.
pub trait RewardHook {
    fn on_deposit(&mut self, new_amount: u64, now: u64) -> Result<()>;
    fn on_withdraw(&mut self, new_amount: u64, now: u64) -> Result<()>;
    fn on_reward(&mut self, new_amount: u64, now: u64) -> Result<()>;
    fn on_emergency_exit(&mut self, now: u64);
}

/// A rewarder together with the acting user's record in it
pub struct OverlayHook<'a> {
    pub rewarder: &'a mut Rewarder,
    pub position: &'a mut OverlayUser,
}

impl<'a> OverlayHook<'a> {
    /// Pairs the pool's configured rewarder with the caller-supplied
    /// accounts and reconciles the record with `stake`, the user's chef stake
    /// before the current action. `None` when the pool has no overlay;
    /// missing or wrong accounts for a pool that has one are rejected.
    pub fn resolve<'info>(
        pool: &PoolInfo,
        owner: Pubkey,
        stake: u64,
        now: u64,
        rewarder: Option<&'a mut Account<'info, Rewarder>>,
        position: Option<&'a mut Account<'info, OverlayUser>>,
    ) -> Result<Option<Self>> {
        let mut hook = Self::bind(pool.rewarder, owner, keyed(rewarder), position.map(|p| &mut **p))?;
        if let Some(hook) = hook.as_mut() {
            hook.rewarder.reconcile(hook.position, stake, now);
        }
        Ok(hook)
    }

    /// `resolve` for emergency exits: missing or wrong overlay accounts give
    /// `None`, so the exit never depends on them. A record left behind is
    /// reconciled the next time it is used.
    pub fn resolve_for_exit<'info>(
        pool: &PoolInfo,
        owner: Pubkey,
        rewarder: Option<&'a mut Account<'info, Rewarder>>,
        position: Option<&'a mut Account<'info, OverlayUser>>,
    ) -> Option<Self> {
        Self::bind_lenient(pool.rewarder, owner, keyed(rewarder), position.map(|p| &mut **p))
    }

    fn bind(
        expected: Option<Pubkey>,
        owner: Pubkey,
        rewarder: Option<(Pubkey, &'a mut Rewarder)>,
        position: Option<&'a mut OverlayUser>,
    ) -> Result<Option<Self>> {
        let Some(expected) = expected else {
            return Ok(None);
        };
        let (rewarder_key, rewarder) = rewarder.ok_or(FarmError::InvalidRewarder)?;
        let position = position.ok_or(FarmError::InvalidRewarder)?;
        require_keys_eq!(rewarder_key, expected, FarmError::InvalidRewarder);
        require_keys_eq!(position.rewarder, expected, FarmError::InvalidRewarder);
        require_keys_eq!(position.owner, owner, FarmError::InvalidRewarder);

        Ok(Some(OverlayHook { rewarder, position }))
    }

    fn bind_lenient(
        expected: Option<Pubkey>,
        owner: Pubkey,
        rewarder: Option<(Pubkey, &'a mut Rewarder)>,
        position: Option<&'a mut OverlayUser>,
    ) -> Option<Self> {
        Self::bind(expected, owner, rewarder, position).ok().flatten()
    }
}

fn keyed<'a, 'info>(rewarder: Option<&'a mut Account<'info, Rewarder>>) -> Option<(Pubkey, &'a mut Rewarder)> {
    rewarder.map(|r| {
        let key = r.key();
        (key, &mut **r)
    })
}

impl RewardHook for OverlayHook<'_> {
    fn on_deposit(&mut self, new_amount: u64, now: u64) -> Result<()> {
        self.rewarder.update_position(self.position, new_amount, now)
    }

    fn on_withdraw(&mut self, new_amount: u64, now: u64) -> Result<()> {
        self.rewarder.update_position(self.position, new_amount, now)
    }

    fn on_reward(&mut self, new_amount: u64, now: u64) -> Result<()> {
        self.rewarder.update_position(self.position, new_amount, now)
    }

    fn on_emergency_exit(&mut self, now: u64) {
        self.rewarder.forfeit_position(self.position, now)
    }
}

/// Absent overlay: every notification is a no-op.
impl<H: RewardHook> RewardHook for Option<H> {
    fn on_deposit(&mut self, new_amount: u64, now: u64) -> Result<()> {
        match self {
            Some(hook) => hook.on_deposit(new_amount, now),
            None => Ok(()),
        }
    }

    fn on_withdraw(&mut self, new_amount: u64, now: u64) -> Result<()> {
        match self {
            Some(hook) => hook.on_withdraw(new_amount, now),
            None => Ok(()),
        }
    }

    fn on_reward(&mut self, new_amount: u64, now: u64) -> Result<()> {
        match self {
            Some(hook) => hook.on_reward(new_amount, now),
            None => Ok(()),
        }
    }

    fn on_emergency_exit(&mut self, now: u64) {
        if let Some(hook) = self {
            hook.on_emergency_exit(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(b: u8) -> Pubkey {
        Pubkey::new_from_array([b; 32])
    }

    fn rewarder_with_stream(rate: u64, now: u64) -> Rewarder {
        let mut rewarder = Rewarder::default();
        rewarder.add_stream(key(1), key(2), rate, now).unwrap();
        rewarder
    }

    fn user() -> OverlayUser {
        OverlayUser::default()
    }

    #[test]
    fn hooks_track_stake_and_accrue() {
        let mut rewarder = rewarder_with_stream(10, 0);
        let (mut a, mut b) = (user(), user());

        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_deposit(100, 0).unwrap();
        OverlayHook { rewarder: &mut rewarder, position: &mut b }.on_deposit(300, 20).unwrap();
        assert_eq!(rewarder.total_shares, 400);
        assert_eq!(rewarder.streams[0].accumulator.total_shares, 400);

        assert_eq!(rewarder.pending(&a, 0, 60).unwrap(), 200 + 100);
        assert_eq!(rewarder.pending(&b, 0, 60).unwrap(), 300);

        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_withdraw(0, 60).unwrap();
        assert_eq!(a.unpaid[0], 300);
        assert_eq!(a.amount, 0);
        assert_eq!(rewarder.total_shares, 300);
        assert_eq!(rewarder.pending(&a, 0, 100).unwrap(), 300);
    }

    #[test]
    fn on_reward_credits_without_changing_stake() {
        let mut rewarder = rewarder_with_stream(5, 0);
        let mut a = user();
        let mut hook = OverlayHook { rewarder: &mut rewarder, position: &mut a };
        hook.on_deposit(50, 0).unwrap();
        hook.on_reward(50, 10).unwrap();
        hook.on_reward(50, 10).unwrap();
        assert_eq!(a.unpaid[0], 50);
        assert_eq!(a.amount, 50);
    }

    #[test]
    fn absent_overlay_is_a_no_op() {
        let mut none: Option<OverlayHook<'_>> = None;
        none.on_deposit(10, 1).unwrap();
        none.on_withdraw(0, 2).unwrap();
        none.on_reward(0, 3).unwrap();
        none.on_emergency_exit(4);
    }

    #[test]
    fn streams_share_identical_accounting() {
        let mut rewarder = rewarder_with_stream(7, 0);
        rewarder.add_stream(key(3), key(4), 7, 0).unwrap();
        let (mut a, mut b) = (user(), user());
        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_deposit(3, 0).unwrap();
        OverlayHook { rewarder: &mut rewarder, position: &mut b }.on_deposit(11, 13).unwrap();

        for now in [29, 77, 1_000] {
            assert_eq!(rewarder.pending(&a, 0, now).unwrap(), rewarder.pending(&a, 1, now).unwrap());
            assert_eq!(rewarder.pending(&b, 0, now).unwrap(), rewarder.pending(&b, 1, now).unwrap());
        }
    }

    #[test]
    fn late_stream_only_pays_from_its_creation() {
        let mut rewarder = rewarder_with_stream(1, 0);
        let mut a = user();
        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_deposit(10, 0).unwrap();
        let index = rewarder.add_stream(key(5), key(6), 4, 100).unwrap();
        assert_eq!(rewarder.streams[index as usize].accumulator.total_shares, 10);
        assert_eq!(rewarder.pending(&a, index, 150).unwrap(), 200);
        assert_eq!(rewarder.pending(&a, 0, 150).unwrap(), 150);
    }

    #[test]
    fn rate_change_settles_first() {
        let mut rewarder = rewarder_with_stream(10, 0);
        let mut a = user();
        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_deposit(1, 0).unwrap();
        rewarder.set_rate(0, 1, 10).unwrap();
        assert_eq!(rewarder.pending(&a, 0, 20).unwrap(), 100 + 10);
        assert!(rewarder.set_rate(3, 1, 20).is_err());
    }

    #[test]
    fn emergency_exit_forfeits_uncredited_reward() {
        let mut rewarder = rewarder_with_stream(10, 0);
        let (mut a, mut b) = (user(), user());
        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_deposit(10, 0).unwrap();
        OverlayHook { rewarder: &mut rewarder, position: &mut b }.on_deposit(10, 0).unwrap();
        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_reward(10, 10).unwrap();

        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_emergency_exit(20);
        assert_eq!(a.unpaid[0], 50);
        assert_eq!(a.amount, 0);
        assert_eq!(rewarder.pending(&a, 0, 30).unwrap(), 50);
        assert_eq!(rewarder.total_shares, 10);
        assert_eq!(rewarder.pending(&b, 0, 30).unwrap(), 100 + 100);
    }

    #[test]
    fn exit_proceeds_without_overlay_record() {
        let mut rewarder = rewarder_with_stream(10, 0);
        let rewarder_key = key(7);
        let mut a = OverlayUser {
            rewarder: rewarder_key,
            owner: key(8),
            ..user()
        };

        assert!(OverlayHook::bind(Some(rewarder_key), key(8), Some((rewarder_key, &mut rewarder)), None).is_err());
        assert!(OverlayHook::bind_lenient(Some(rewarder_key), key(8), Some((rewarder_key, &mut rewarder)), None).is_none());
        assert!(OverlayHook::bind_lenient(Some(rewarder_key), key(8), None, Some(&mut a)).is_none());
        // someone else's record
        assert!(OverlayHook::bind_lenient(Some(rewarder_key), key(9), Some((rewarder_key, &mut rewarder)), Some(&mut a)).is_none());

        let mut hook = OverlayHook::bind_lenient(Some(rewarder_key), key(8), Some((rewarder_key, &mut rewarder)), Some(&mut a));
        hook.on_deposit(10, 0).unwrap();
        hook.on_emergency_exit(5);
        drop(hook);
        assert_eq!(a.amount, 0);
        assert_eq!(rewarder.total_shares, 0);
    }

    #[test]
    fn pool_without_overlay_ignores_supplied_accounts() {
        let mut rewarder = rewarder_with_stream(10, 0);
        let mut a = user();
        let hook = OverlayHook::bind(None, key(8), Some((key(7), &mut rewarder)), Some(&mut a)).unwrap();
        assert!(hook.is_none());
    }

    #[test]
    fn record_left_by_unseen_exit_is_forfeited_on_next_use() {
        let mut rewarder = rewarder_with_stream(10, 0);
        let (mut a, mut b) = (user(), user());
        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_deposit(10, 0).unwrap();
        OverlayHook { rewarder: &mut rewarder, position: &mut b }.on_deposit(10, 0).unwrap();

        // a left the chef at 10 without the overlay accounts
        rewarder.refresh_position(&mut a, true, 0, 10).unwrap();
        assert_eq!(a.amount, 0);
        assert_eq!(a.unpaid[0], 0);
        assert_eq!(rewarder.total_shares, 10);
        assert_eq!(rewarder.pending(&b, 0, 20).unwrap(), 50 + 100);
        assert_eq!(rewarder.claimable(&b, 0, true, 10, 20).unwrap(), 150);
        assert_eq!(rewarder.claimable(&a, 0, true, 30, 20).unwrap(), 0);

        // a stake older than the record starts earning once reconciled
        rewarder.refresh_position(&mut a, true, 30, 20).unwrap();
        assert_eq!(a.amount, 30);
        assert_eq!(rewarder.pending(&a, 0, 24).unwrap(), 30);
    }

    #[test]
    fn detached_rewarder_stops_accruing() {
        let mut rewarder = rewarder_with_stream(10, 0);
        let mut a = user();
        OverlayHook { rewarder: &mut rewarder, position: &mut a }.on_deposit(10, 0).unwrap();
        rewarder.refresh_position(&mut a, true, 10, 10).unwrap();
        assert_eq!(a.unpaid[0], 100);

        assert_eq!(rewarder.claimable(&a, 0, false, 10, 50).unwrap(), 100);
        for now in [50, 1_000] {
            rewarder.refresh_position(&mut a, false, 10, now).unwrap();
            assert_eq!(a.unpaid[0], 100);
        }
        assert_eq!(a.take_unpaid(0, u64::MAX).unwrap(), 100);
        rewarder.refresh_position(&mut a, false, 10, 2_000).unwrap();
        assert_eq!(a.take_unpaid(0, u64::MAX).unwrap(), 0);
    }

    #[test]
    fn claims_are_capped_by_vault_balance() {
        let mut a = OverlayUser {
            unpaid: [90, 0, 0, 0],
            ..user()
        };
        assert_eq!(a.take_unpaid(0, 60).unwrap(), 60);
        assert_eq!(a.unpaid[0], 30);
        assert_eq!(a.take_unpaid(0, 1_000).unwrap(), 30);
        assert_eq!(a.take_unpaid(0, 1_000).unwrap(), 0);
        assert!(a.take_unpaid(7, 1).is_err());
    }

    #[test]
    fn stream_capacity_is_bounded() {
        let mut rewarder = Rewarder::default();
        for i in 0..MAX_OVERLAY_STREAMS {
            rewarder.add_stream(key(i as u8), key(9), 1, 0).unwrap();
        }
        assert!(rewarder.add_stream(key(77), key(9), 1, 0).is_err());
    }
}
