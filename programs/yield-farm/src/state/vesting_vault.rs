use anchor_lang::prelude::*;

use crate::constants::{ISSUANCE_PRECISION, VAULT_ACC_PRECISION};
use crate::errors::FarmError;
use crate::ledger::{Accumulator, Participant};
use crate::math::{add_u64, convert_proportional, mul_div_floor, sub_u64, to_u64};

/// Share vault over a principal token whose holders receive a separate
/// revenue token, released linearly over an operator-set window.
/// PDA: ["vesting-vault", principal_mint, revenue_mint, vault_id]
#[account]
#[derive(Default, InitSpace)]
pub struct VestingVault {
    pub owner: Pubkey,

    /// Set by `set_pending_owner`, cleared once accepted
    pub pending_owner: Option<Pubkey>,

    /// Only signer allowed to restart the vesting schedule
    pub vesting_updater: Pubkey,

    pub vault_id: u64,

    pub principal_mint: Pubkey,
    pub principal_vault: Pubkey,
    pub revenue_mint: Pubkey,
    pub revenue_vault: Pubkey,

    /// Principal backing the outstanding shares
    pub total_assets: u64,

    /// Revenue released per second, scaled by `ISSUANCE_PRECISION`
    pub issuance_rate: u128,

    pub vesting_period_finish: u64,

    pub last_updated: u64,

    /// Revenue unlocked to holders and not yet claimed
    pub total_claimable: u64,

    /// Revenue scheduled in the current window and not yet unlocked
    pub unvested: u64,

    /// Part of the window's revenue lost to truncating `issuance_rate`;
    /// released by the settlement that reaches `vesting_period_finish`
    pub vesting_remainder: u64,

    /// Unlocked revenue per share; `total_shares` is the vault's share supply
    pub revenue: Accumulator,

    pub staker_count: u32,

    pub bump: u8,
}

/// A holder's shares in one vesting vault
/// PDA: ["vesting-position", vault, owner]
#[account]
#[derive(Default, InitSpace)]
pub struct VestingPosition {
    pub vault: Pubkey,

    pub owner: Pubkey,

    /// `amount` is the share balance
    pub position: Participant,

    /// Unlocked revenue credited to this holder, not yet transferred
    pub unpaid: u64,

    pub bump: u8,
}

impl VestingPosition {
    pub fn shares(&self) -> u64 {
        self.position.amount
    }
}

impl VestingVault {
    pub fn new_revenue_ledger(now: u64) -> Accumulator {
        Accumulator::new(VAULT_ACC_PRECISION, now)
    }

    pub fn total_shares(&self) -> u64 {
        self.revenue.total_shares
    }

    pub fn shares_for_assets(&self, assets: u64) -> Result<u64> {
        convert_proportional(assets, self.total_shares(), self.total_assets)
    }

    pub fn assets_for_shares(&self, shares: u64) -> Result<u64> {
        convert_proportional(shares, self.total_assets, self.total_shares())
    }

    /// Revenue unlocked between `last_updated` and `min(now, vesting_period_finish)`,
    /// never more than what is still scheduled. Reaching the finish also
    /// unlocks the truncation remainder.
    pub fn vested_since_update(&self, now: u64) -> Result<u64> {
        let end = now.min(self.vesting_period_finish);
        if end <= self.last_updated {
            return Ok(0);
        }
        let elapsed = (end - self.last_updated) as u128;
        let mut released = mul_div_floor(self.issuance_rate, elapsed, ISSUANCE_PRECISION)?;
        if end == self.vesting_period_finish {
            released = released.saturating_add(self.vesting_remainder as u128);
        }
        to_u64(released.min(self.unvested as u128))
    }

    /// Moves revenue unlocked since the last update into `total_claimable`.
    ///
    /// While no shares exist the unlocked part is not distributed: it stays in
    /// `unvested` and is rescheduled by the next `update_vesting_schedule`.
    pub fn settle(&mut self, now: u64) -> Result<u64> {
        if now <= self.last_updated {
            return Ok(0);
        }
        let vested = self.vested_since_update(now)?;
        let distributed = if vested > 0 && self.revenue.distribute(vested)? {
            self.unvested -= vested;
            self.total_claimable = add_u64(self.total_claimable, vested)?;
            vested
        } else {
            0
        };
        if now >= self.vesting_period_finish {
            self.vesting_remainder = 0;
        }
        self.last_updated = now;
        self.revenue.last_update = now;
        Ok(distributed)
    }

    /// Restarts the linear release over `period` seconds with everything in
    /// the revenue vault that is not already claimable, including the
    /// residual of an unfinished window.
    pub fn update_vesting_schedule(&mut self, period: u64, revenue_balance: u64, now: u64) -> Result<()> {
        require!(period > 0, FarmError::InvalidVestingPeriod);
        self.settle(now)?;

        let undistributed = revenue_balance.saturating_sub(self.total_claimable);
        self.issuance_rate = mul_div_floor(undistributed as u128, ISSUANCE_PRECISION, period as u128)?;
        let scheduled = to_u64(mul_div_floor(self.issuance_rate, period as u128, ISSUANCE_PRECISION)?)?;
        self.vesting_remainder = undistributed.saturating_sub(scheduled);
        self.unvested = undistributed;
        self.vesting_period_finish = now.checked_add(period).ok_or(FarmError::Overflow)?;
        self.last_updated = now;
        Ok(())
    }

    fn settle_position(&self, holder: &mut VestingPosition) -> Result<()> {
        let owed = self.revenue.harvest(&mut holder.position)?;
        holder.unpaid = add_u64(holder.unpaid, owed)?;
        Ok(())
    }

    fn count_holder(&mut self, before: u64, after: u64) {
        match (before, after) {
            (0, n) if n > 0 => self.staker_count = self.staker_count.saturating_add(1),
            (o, 0) if o > 0 => self.staker_count = self.staker_count.saturating_sub(1),
            _ => {}
        }
    }

    /// Books `assets` of principal already received. Returns minted shares.
    pub fn deposit(&mut self, holder: &mut VestingPosition, assets: u64, now: u64) -> Result<u64> {
        let shares = self.shares_for_assets(assets)?;
        require!(shares > 0, FarmError::ZeroAmount);

        self.settle(now)?;
        self.settle_position(holder)?;
        let before = holder.shares();
        self.revenue.rebase_debt(&mut holder.position, add_u64(before, shares)?)?;
        self.revenue.add_shares(shares)?;
        self.total_assets = add_u64(self.total_assets, assets)?;
        self.count_holder(before, holder.shares());
        Ok(shares)
    }

    /// Burns `shares`, returning the principal they redeem for.
    pub fn withdraw(&mut self, holder: &mut VestingPosition, shares: u64, now: u64) -> Result<u64> {
        require!(shares <= holder.shares(), FarmError::InsufficientBalance);
        let assets = self.assets_for_shares(shares)?;

        self.settle(now)?;
        self.settle_position(holder)?;
        let before = holder.shares();
        self.revenue.rebase_debt(&mut holder.position, before - shares)?;
        self.revenue.remove_shares(shares)?;
        self.total_assets = sub_u64(self.total_assets, assets)?;
        self.count_holder(before, holder.shares());
        Ok(assets)
    }

    /// Revenue `holder` could claim at `now`. Never mutates.
    pub fn claimable(&self, holder: &VestingPosition, now: u64) -> Result<u64> {
        let mut scratch = self.revenue;
        if now > self.last_updated {
            let vested = self.vested_since_update(now)?;
            scratch.distribute(vested)?;
        }
        add_u64(holder.unpaid, scratch.pending(&holder.position)?)
    }

    /// Settles and takes up to `available` of the holder's revenue.
    pub fn claim(&mut self, holder: &mut VestingPosition, available: u64, now: u64) -> Result<u64> {
        self.settle(now)?;
        self.settle_position(holder)?;
        let paid = holder.unpaid.min(available);
        holder.unpaid -= paid;
        self.total_claimable = self.total_claimable.saturating_sub(paid);
        Ok(paid)
    }

    pub fn set_pending_owner(&mut self, new_owner: Pubkey) {
        self.pending_owner = Some(new_owner);
    }

    /// Completes a two-step ownership transfer. Returns the previous owner.
    pub fn accept_ownership(&mut self, signer: Pubkey) -> Result<Pubkey> {
        require!(self.pending_owner == Some(signer), FarmError::NotPendingOwner);
        let previous = self.owner;
        self.owner = signer;
        self.pending_owner = None;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vault() -> VestingVault {
        VestingVault {
            revenue: VestingVault::new_revenue_ledger(0),
            ..Default::default()
        }
    }

    fn holder() -> VestingPosition {
        VestingPosition::default()
    }

    #[test]
    fn revenue_releases_linearly_and_stops_at_finish() {
        let mut v = vault();
        let mut a = holder();
        v.deposit(&mut a, 100, 0).unwrap();
        v.update_vesting_schedule(100, 1_000, 0).unwrap();

        assert_eq!(v.claimable(&a, 0).unwrap(), 0);
        assert_eq!(v.claimable(&a, 50).unwrap(), 500);
        assert_eq!(v.claimable(&a, 100).unwrap(), 1_000);
        assert_eq!(v.claimable(&a, 10_000).unwrap(), 1_000);
    }

    #[test]
    fn holders_share_pro_rata() {
        let mut v = vault();
        let (mut a, mut b) = (holder(), holder());
        v.deposit(&mut a, 100, 0).unwrap();
        v.deposit(&mut b, 300, 0).unwrap();
        v.update_vesting_schedule(40, 4_000, 0).unwrap();

        assert_eq!(v.claimable(&a, 40).unwrap(), 1_000);
        assert_eq!(v.claimable(&b, 40).unwrap(), 3_000);
        assert_eq!(v.staker_count, 2);
    }

    #[test]
    fn mid_window_update_reschedules_only_the_residual() {
        let mut v = vault();
        let mut a = holder();
        v.deposit(&mut a, 10, 0).unwrap();
        v.update_vesting_schedule(100, 1_000, 0).unwrap();

        v.update_vesting_schedule(100, 1_000, 50).unwrap();
        assert_eq!(v.total_claimable, 500);
        assert_eq!(v.unvested, 500);
        assert_eq!(v.claimable(&a, 100).unwrap(), 750);
        assert_eq!(v.claimable(&a, 150).unwrap(), 1_000);
        assert_eq!(v.claimable(&a, 500).unwrap(), 1_000);
    }

    #[test]
    fn release_while_empty_is_rescheduled() {
        let mut v = vault();
        v.update_vesting_schedule(100, 1_000, 0).unwrap();
        v.settle(40).unwrap();
        assert_eq!(v.total_claimable, 0);
        assert_eq!(v.unvested, 1_000);

        let mut a = holder();
        v.deposit(&mut a, 10, 40).unwrap();
        assert_eq!(v.claimable(&a, 100).unwrap(), 600);

        v.update_vesting_schedule(10, 1_000, 100).unwrap();
        assert_eq!(v.claimable(&a, 110).unwrap(), 1_000);
    }

    #[test]
    fn truncation_remainder_vests_at_finish() {
        let mut v = vault();
        let mut a = holder();
        v.deposit(&mut a, 1, 0).unwrap();
        v.update_vesting_schedule(3, 1_000, 0).unwrap();
        assert_eq!(v.vesting_remainder, 1);

        assert_eq!(v.claimable(&a, 2).unwrap(), 666);
        assert_eq!(v.claimable(&a, 3).unwrap(), 1_000);
        v.settle(2).unwrap();
        v.settle(7).unwrap();
        assert_eq!(v.total_claimable, 1_000);
        assert_eq!(v.unvested, 0);
        assert_eq!(v.vesting_remainder, 0);
    }

    #[test]
    fn remainder_missed_while_empty_is_rescheduled() {
        let mut v = vault();
        v.update_vesting_schedule(3, 1_000, 0).unwrap();
        v.settle(5).unwrap();
        assert_eq!(v.vesting_remainder, 0);
        assert_eq!(v.unvested, 1_000);

        let mut a = holder();
        v.deposit(&mut a, 4, 5).unwrap();
        v.update_vesting_schedule(10, 1_000, 5).unwrap();
        assert_eq!(v.claimable(&a, 15).unwrap(), 1_000);
    }

    #[test]
    fn dust_first_holder_does_not_lock_the_vault() {
        let mut v = vault();
        let (mut a, mut b) = (holder(), holder());
        v.deposit(&mut a, 1, 0).unwrap();
        v.update_vesting_schedule(10, 1_000_000_000_000, 0).unwrap();

        assert_eq!(v.deposit(&mut b, 1_000_000_000, 10).unwrap(), 1_000_000_000);
        assert_eq!(v.claimable(&a, 10).unwrap(), 1_000_000_000_000);
        assert_eq!(v.claimable(&b, 10).unwrap(), 0);
        assert_eq!(v.withdraw(&mut b, 1_000_000_000, 11).unwrap(), 1_000_000_000);
        assert_eq!(v.claim(&mut a, u64::MAX, 11).unwrap(), 1_000_000_000_000);
    }

    #[test]
    fn claim_pays_holder_once() {
        let mut v = vault();
        let mut a = holder();
        v.deposit(&mut a, 5, 0).unwrap();
        v.update_vesting_schedule(10, 100, 0).unwrap();

        assert_eq!(v.claim(&mut a, 30, 10).unwrap(), 30);
        assert_eq!(v.claimable(&a, 10).unwrap(), 70);
        assert_eq!(v.claim(&mut a, 100, 10).unwrap(), 70);
        assert_eq!(v.claim(&mut a, 100, 10).unwrap(), 0);
        assert_eq!(v.total_claimable, 0);
    }

    #[test]
    fn withdraw_keeps_earned_revenue() {
        let mut v = vault();
        let mut a = holder();
        v.deposit(&mut a, 20, 0).unwrap();
        v.update_vesting_schedule(10, 100, 0).unwrap();

        assert_eq!(v.withdraw(&mut a, 20, 5).unwrap(), 20);
        assert!(v.withdraw(&mut a, 1, 5).is_err());
        assert_eq!(a.unpaid, 50);
        assert_eq!(v.claimable(&a, 10).unwrap(), 50);
        assert_eq!(v.staker_count, 0);
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut v = vault();
        assert!(v.update_vesting_schedule(0, 1, 0).is_err());
    }

    #[test]
    fn ownership_needs_acceptance() {
        let mut v = vault();
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        v.owner = alice;
        v.set_pending_owner(bob);
        assert_eq!(v.owner, alice);
        assert!(v.accept_ownership(alice).is_err());
        assert_eq!(v.accept_ownership(bob).unwrap(), alice);
        assert_eq!(v.owner, bob);
        assert!(v.accept_ownership(bob).is_err());
    }

    proptest! {
        #[test]
        fn claimable_never_exceeds_share_of_revenue(
            steps in proptest::collection::vec((0u64..5_000, 1u64..500, 1u64..400), 1..8),
            a_assets in 1u64..10_000,
            b_assets in 1u64..10_000,
        ) {
            let mut v = vault();
            let (mut a, mut b) = (holder(), holder());
            v.deposit(&mut a, a_assets, 0).unwrap();
            v.deposit(&mut b, b_assets, 0).unwrap();

            let (mut now, mut balance, mut inflow) = (0u64, 0u64, 0u64);
            for (added, period, wait) in steps {
                balance += added;
                inflow += added;
                v.update_vesting_schedule(period, balance, now).unwrap();
                now += wait;
                let paid = v.claim(&mut a, u64::MAX, now).unwrap();
                balance -= paid;
            }

            let total_shares = (a_assets + b_assets) as u128;
            let a_cap = inflow as u128 * a_assets as u128 / total_shares;
            let b_cap = inflow as u128 * b_assets as u128 / total_shares;
            let a_total = (inflow - balance) + v.claimable(&a, now + 1_000).unwrap();
            prop_assert!(a_total as u128 <= a_cap);
            prop_assert!(v.claimable(&b, now + 1_000).unwrap() as u128 <= b_cap);
            prop_assert!(v.total_claimable <= balance);
        }
    }
}
