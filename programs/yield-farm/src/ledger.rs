//! Reward-per-share accumulator and per-participant debt.
//!
//! Every reward stream in the program (chef pools, overlay streams, fee-vault
//! reward tokens, vested revenue) is an [`Accumulator`] plus one
//! [`Participant`] record per holder. A holder's owed reward is
//! `amount * acc_reward_per_share / precision - reward_debt`; whenever the
//! holder's `amount` changes the debt is re-baselined so the next settlement
//! only sees reward earned from that instant on.
//!
//! Settlement must always happen before `total_shares` or the emission rate
//! changes, otherwise accrued reward is attributed to the new denominator.

use anchor_lang::prelude::*;

use crate::errors::FarmError;
use crate::math::{mul_div_floor, to_i128, to_u64};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct Accumulator {
    /// Cumulative reward per share, scaled by `precision`
    pub acc_reward_per_share: u128,

    /// Fixed-point scale of `acc_reward_per_share`
    pub precision: u128,

    /// Slot or unix time of the last settlement, depending on the owner
    pub last_update: u64,

    /// Sum of all participants' `amount`
    pub total_shares: u64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new(crate::constants::ACC_PRECISION, 0)
    }
}

impl Accumulator {
    pub fn new(precision: u128, now: u64) -> Self {
        Self {
            acc_reward_per_share: 0,
            precision,
            last_update: now,
            total_shares: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.total_shares > 0
    }

    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_update)
    }

    /// Accumulator increment for distributing `reward` over the current shares.
    pub fn increment_for(&self, reward: u64) -> Result<u128> {
        if self.total_shares == 0 || reward == 0 {
            return Ok(0);
        }
        mul_div_floor(reward as u128, self.precision, self.total_shares as u128)
    }

    /// Credits `reward` to the current holders. Returns false (and leaves the
    /// accumulator untouched) when nobody holds shares.
    pub fn distribute(&mut self, reward: u64) -> Result<bool> {
        if self.total_shares == 0 {
            return Ok(false);
        }
        let increment = self.increment_for(reward)?;
        self.acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(increment)
            .ok_or(FarmError::Overflow)?;
        Ok(true)
    }

    /// Advances the accumulator to `now` with `emission(elapsed)` units of reward.
    ///
    /// Emission over an interval with zero shares is dropped: the clock moves
    /// forward and the accumulator does not.
    pub fn settle<F>(&mut self, now: u64, emission: F) -> Result<u128>
    where
        F: FnOnce(u64) -> Result<u64>,
    {
        if now <= self.last_update {
            return Ok(self.acc_reward_per_share);
        }
        if self.total_shares > 0 {
            let reward = emission(self.elapsed(now))?;
            self.distribute(reward)?;
        }
        self.last_update = now;
        Ok(self.acc_reward_per_share)
    }

    /// Accumulator value `settle` would produce at `now`, without mutating.
    pub fn preview<F>(&self, now: u64, emission: F) -> Result<u128>
    where
        F: FnOnce(u64) -> Result<u64>,
    {
        let mut scratch = *self;
        scratch.settle(now, emission)
    }

    /// `floor(amount * acc / precision)` as a signed reward quantity.
    pub fn accumulated(&self, amount: u64) -> Result<i128> {
        let value = mul_div_floor(amount as u128, self.acc_reward_per_share, self.precision)?;
        to_i128(value)
    }

    /// Signed owed reward for an arbitrary (amount, debt) pair.
    pub fn owed(&self, amount: u64, reward_debt: i128) -> Result<i128> {
        self.accumulated(amount)?
            .checked_sub(reward_debt)
            .ok_or_else(|| error!(FarmError::Overflow))
    }

    /// Pure view of a participant's unclaimed reward. Rounding can leave a
    /// deferred-harvest record a unit below its debt; that reads as zero.
    pub fn pending(&self, participant: &Participant) -> Result<u64> {
        let owed = self.owed(participant.amount, participant.reward_debt)?;
        if owed <= 0 {
            return Ok(0);
        }
        to_u64(owed as u128)
    }

    /// Sets `amount = new_amount` and re-baselines the debt. Callers must have
    /// paid or recorded `pending` first.
    pub fn rebase_debt(&self, participant: &mut Participant, new_amount: u64) -> Result<()> {
        participant.reward_debt = self.accumulated(new_amount)?;
        participant.amount = new_amount;
        Ok(())
    }

    /// Takes the participant's pending reward and re-baselines at the same
    /// amount. A non-positive balance pays nothing and keeps the debt.
    pub fn harvest(&self, participant: &mut Participant) -> Result<u64> {
        let owed = self.owed(participant.amount, participant.reward_debt)?;
        if owed <= 0 {
            return Ok(0);
        }
        participant.reward_debt = self.accumulated(participant.amount)?;
        to_u64(owed as u128)
    }

    /// Adds stake without settling: the debt grows by the stake's current
    /// accumulated value so earlier reward stays claimable.
    pub fn credit(&self, participant: &mut Participant, amount: u64) -> Result<()> {
        participant.amount = participant
            .amount
            .checked_add(amount)
            .ok_or(FarmError::Overflow)?;
        participant.reward_debt = participant
            .reward_debt
            .checked_add(self.accumulated(amount)?)
            .ok_or(FarmError::Overflow)?;
        Ok(())
    }

    /// Removes stake without settling. The debt may go negative; the
    /// difference is what the participant earned on the removed stake.
    pub fn debit(&self, participant: &mut Participant, amount: u64) -> Result<()> {
        require!(amount <= participant.amount, FarmError::InsufficientBalance);
        participant.amount -= amount;
        participant.reward_debt = participant
            .reward_debt
            .checked_sub(self.accumulated(amount)?)
            .ok_or(FarmError::Overflow)?;
        Ok(())
    }

    pub fn add_shares(&mut self, amount: u64) -> Result<()> {
        self.total_shares = self
            .total_shares
            .checked_add(amount)
            .ok_or(FarmError::Overflow)?;
        Ok(())
    }

    pub fn remove_shares(&mut self, amount: u64) -> Result<()> {
        self.total_shares = self
            .total_shares
            .checked_sub(amount)
            .ok_or(FarmError::InsufficientBalance)?;
        Ok(())
    }
}

/// One holder's stake in one accumulator.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct Participant {
    pub amount: u64,

    /// Reward already charged against `amount`; signed because deferred
    /// withdrawals subtract from it.
    pub reward_debt: i128,
}

impl Participant {
    pub fn clear(&mut self) {
        self.amount = 0;
        self.reward_debt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ACC_PRECISION;

    fn per_block(rate: u64) -> impl Fn(u64) -> Result<u64> {
        move |blocks| Ok(blocks * rate)
    }

    #[test]
    fn settle_spreads_emission_over_shares() {
        let mut acc = Accumulator::new(ACC_PRECISION, 100);
        acc.add_shares(40).unwrap();
        let value = acc.settle(110, per_block(100)).unwrap();
        assert_eq!(value, 1_000 * ACC_PRECISION / 40);
        assert_eq!(acc.last_update, 110);
    }

    #[test]
    fn settle_without_shares_moves_clock_only() {
        let mut acc = Accumulator::new(ACC_PRECISION, 100);
        acc.settle(150, per_block(100)).unwrap();
        assert_eq!(acc.acc_reward_per_share, 0);
        assert_eq!(acc.last_update, 150);
    }

    #[test]
    fn settle_in_the_past_is_a_no_op() {
        let mut acc = Accumulator::new(ACC_PRECISION, 100);
        acc.add_shares(1).unwrap();
        acc.settle(120, per_block(10)).unwrap();
        let before = acc;
        acc.settle(119, per_block(10)).unwrap();
        acc.settle(120, per_block(10)).unwrap();
        assert_eq!(acc, before);
    }

    #[test]
    fn preview_matches_settle() {
        let mut acc = Accumulator::new(ACC_PRECISION, 0);
        acc.add_shares(7).unwrap();
        let previewed = acc.preview(33, per_block(13)).unwrap();
        assert_eq!(acc.acc_reward_per_share, 0);
        assert_eq!(acc.settle(33, per_block(13)).unwrap(), previewed);
    }

    #[test]
    fn harvest_twice_pays_once() {
        let mut acc = Accumulator::new(ACC_PRECISION, 0);
        let mut alice = Participant::default();
        acc.rebase_debt(&mut alice, 10).unwrap();
        acc.add_shares(10).unwrap();
        acc.settle(5, per_block(100)).unwrap();

        assert_eq!(acc.harvest(&mut alice).unwrap(), 500);
        assert_eq!(acc.harvest(&mut alice).unwrap(), 0);
        assert_eq!(acc.pending(&alice).unwrap(), 0);
    }

    #[test]
    fn deferred_withdraw_leaves_negative_debt() {
        let mut acc = Accumulator::new(ACC_PRECISION, 0);
        let mut bob = Participant::default();
        acc.credit(&mut bob, 20).unwrap();
        acc.add_shares(20).unwrap();
        acc.settle(10, per_block(50)).unwrap();

        acc.debit(&mut bob, 20).unwrap();
        acc.remove_shares(20).unwrap();
        assert_eq!(bob.amount, 0);
        assert_eq!(bob.reward_debt, -500);
        assert_eq!(acc.pending(&bob).unwrap(), 500);
        assert_eq!(acc.harvest(&mut bob).unwrap(), 500);
        assert_eq!(bob.reward_debt, 0);
    }

    #[test]
    fn debit_beyond_amount_is_rejected() {
        let acc = Accumulator::new(ACC_PRECISION, 0);
        let mut carol = Participant { amount: 3, reward_debt: 0 };
        assert!(acc.debit(&mut carol, 4).is_err());
        assert_eq!(carol.amount, 3);
    }

    #[test]
    fn rounding_deficit_reads_as_zero_and_keeps_debt() {
        let acc = Accumulator {
            acc_reward_per_share: 6 * ACC_PRECISION / 10,
            precision: ACC_PRECISION,
            last_update: 0,
            total_shares: 2,
        };
        let mut dave = Participant::default();
        acc.credit(&mut dave, 2).unwrap();
        acc.debit(&mut dave, 1).unwrap();
        assert_eq!(acc.owed(dave.amount, dave.reward_debt).unwrap(), -1);
        assert_eq!(acc.pending(&dave).unwrap(), 0);
        assert_eq!(acc.harvest(&mut dave).unwrap(), 0);
        assert_eq!(dave.reward_debt, 1);
    }
}
