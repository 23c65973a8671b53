use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MAX_DEPOSIT_FEE_BPS, MAX_REWARD_TOKENS, VAULT_ACC_PRECISION};
use crate::errors::FarmError;
use crate::ledger::{Accumulator, Participant};
use crate::math::{add_u64, convert_proportional, mul_div_u64, sub_u64};

/// A reward token distributed pro rata over vault shares
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct RewardToken {
    pub mint: Pubkey,

    /// Vault-owned token account that receives this reward
    pub vault: Pubkey,

    /// Removed tokens stop accruing but stay claimable
    pub active: bool,

    /// `total_shares` mirrors `FeeVault::total_shares`
    pub accumulator: Accumulator,

    /// Balance of `vault` already accounted for (distributed or owed)
    pub last_reward_balance: u64,
}

/// Single-pool staking vault with a deposit fee and several reward tokens
/// PDA: ["fee-vault", owner, deposit_mint]
#[account]
#[derive(Default, InitSpace)]
pub struct FeeVault {
    pub owner: Pubkey,

    pub deposit_mint: Pubkey,

    /// Vault-owned token account holding deposited principal
    pub principal_vault: Pubkey,

    /// Token account of `deposit_mint` receiving deposit fees
    pub fee_collector: Pubkey,

    pub deposit_fee_bps: u16,

    pub total_shares: u64,

    /// Principal backing `total_shares`
    pub total_assets: u64,

    /// Number of positions with non-zero shares
    pub staker_count: u32,

    #[max_len(8)]
    pub reward_tokens: Vec<RewardToken>,

    pub bump: u8,
}

/// Debt and credited balance of one reward token inside a position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct RewardDebt {
    pub mint: Pubkey,
    pub reward_debt: i128,
    pub unpaid: u64,
}

/// A holder's shares in one fee vault
/// PDA: ["fee-vault-position", vault, owner]
#[account]
#[derive(Default, InitSpace)]
pub struct VaultPosition {
    pub vault: Pubkey,

    pub owner: Pubkey,

    pub shares: u64,

    #[max_len(8)]
    pub rewards: Vec<RewardDebt>,

    pub bump: u8,
}

impl VaultPosition {
    pub fn record(&self, mint: Pubkey) -> Option<&RewardDebt> {
        self.rewards.iter().find(|r| r.mint == mint)
    }

    /// Record for `mint`, created on first use with zero debt. The token's
    /// accumulator started at zero when it was registered.
    fn record_mut(&mut self, mint: Pubkey) -> Result<&mut RewardDebt> {
        let index = match self.rewards.iter().position(|r| r.mint == mint) {
            Some(i) => i,
            None => {
                require!(self.rewards.len() < MAX_REWARD_TOKENS, FarmError::TooManyRewardTokens);
                self.rewards.push(RewardDebt {
                    mint,
                    ..Default::default()
                });
                self.rewards.len() - 1
            }
        };
        Ok(&mut self.rewards[index])
    }
}

impl FeeVault {
    pub fn token_index(&self, mint: Pubkey) -> Result<usize> {
        self.reward_tokens
            .iter()
            .position(|t| t.mint == mint)
            .ok_or_else(|| error!(FarmError::RewardTokenNotFound))
    }

    pub fn set_deposit_fee(&mut self, deposit_fee_bps: u16) -> Result<()> {
        require!(deposit_fee_bps <= MAX_DEPOSIT_FEE_BPS, FarmError::DepositFeeTooHigh);
        self.deposit_fee_bps = deposit_fee_bps;
        Ok(())
    }

    /// Fee withheld from a gross deposit of `amount`
    pub fn deposit_fee(&self, amount: u64) -> Result<u64> {
        mul_div_u64(amount, self.deposit_fee_bps as u64, BPS_DENOMINATOR)
    }

    pub fn shares_for_assets(&self, assets: u64) -> Result<u64> {
        convert_proportional(assets, self.total_shares, self.total_assets)
    }

    pub fn assets_for_shares(&self, shares: u64) -> Result<u64> {
        convert_proportional(shares, self.total_assets, self.total_shares)
    }

    /// Registers a reward token, or reactivates a removed one. Anything
    /// already sitting in a new token's vault is distributed by the first update.
    pub fn add_reward_token(&mut self, mint: Pubkey, vault: Pubkey, now: u64) -> Result<()> {
        if let Some(token) = self.reward_tokens.iter_mut().find(|t| t.mint == mint) {
            require!(!token.active, FarmError::RewardTokenExists);
            require_keys_eq!(token.vault, vault, FarmError::RewardAccountMismatch);
            token.active = true;
            return Ok(());
        }
        require!(self.reward_tokens.len() < MAX_REWARD_TOKENS, FarmError::TooManyRewardTokens);

        let mut accumulator = Accumulator::new(VAULT_ACC_PRECISION, now);
        accumulator.total_shares = self.total_shares;
        self.reward_tokens.push(RewardToken {
            mint,
            vault,
            active: true,
            accumulator,
            last_reward_balance: 0,
        });
        Ok(())
    }

    /// Stops accrual of `mint`. Its accumulator and every holder's debt for it
    /// are kept so already earned reward remains claimable.
    pub fn remove_reward_token(&mut self, mint: Pubkey) -> Result<()> {
        let index = self.token_index(mint)?;
        let token = &mut self.reward_tokens[index];
        require!(token.active, FarmError::RewardTokenNotFound);
        token.active = false;
        Ok(())
    }

    /// Distributes whatever arrived in the reward vault since the last update.
    ///
    /// With no shares outstanding nothing is distributed and
    /// `last_reward_balance` stays put, so the amount is banked for the first
    /// depositor's accumulator update. Returns the distributed amount.
    pub fn update_reward(&mut self, index: usize, current_balance: u64) -> Result<u64> {
        let token = self
            .reward_tokens
            .get_mut(index)
            .ok_or_else(|| error!(FarmError::RewardTokenNotFound))?;
        if !token.active || !token.accumulator.is_active() {
            return Ok(0);
        }
        let received = current_balance.saturating_sub(token.last_reward_balance);
        if received == 0 {
            return Ok(0);
        }
        token.accumulator.distribute(received)?;
        token.last_reward_balance = current_balance;
        Ok(received)
    }

    /// Updates every reward token. `balances` lists the current reward vault
    /// balances in registration order.
    pub fn update_rewards(&mut self, balances: &[u64]) -> Result<()> {
        require!(
            balances.len() == self.reward_tokens.len(),
            FarmError::RewardAccountMismatch
        );
        for (index, balance) in balances.iter().enumerate() {
            self.update_reward(index, *balance)?;
        }
        Ok(())
    }

    /// Credits every token's owed reward to the position's unpaid balance.
    pub fn settle_position(&self, position: &mut VaultPosition) -> Result<()> {
        let shares = position.shares;
        for token in self.reward_tokens.iter() {
            let record = position.record_mut(token.mint)?;
            let mut participant = Participant {
                amount: shares,
                reward_debt: record.reward_debt,
            };
            let owed = token.accumulator.harvest(&mut participant)?;
            record.unpaid = add_u64(record.unpaid, owed)?;
            record.reward_debt = participant.reward_debt;
        }
        Ok(())
    }

    /// Moves a settled position to `new_shares` and keeps the vault-wide
    /// share count in every accumulator.
    fn reshare(&mut self, position: &mut VaultPosition, new_shares: u64) -> Result<()> {
        let old_shares = position.shares;
        for token in self.reward_tokens.iter() {
            let debt = token.accumulator.accumulated(new_shares)?;
            position.record_mut(token.mint)?.reward_debt = debt;
        }
        position.shares = new_shares;

        self.total_shares = add_u64(sub_u64(self.total_shares, old_shares)?, new_shares)?;
        for token in self.reward_tokens.iter_mut() {
            token.accumulator.total_shares = self.total_shares;
        }

        match (old_shares, new_shares) {
            (0, n) if n > 0 => self.staker_count = self.staker_count.saturating_add(1),
            (o, 0) if o > 0 => self.staker_count = self.staker_count.saturating_sub(1),
            _ => {}
        }
        Ok(())
    }

    /// Books `net_amount` of principal already received into the vault.
    /// Rewards must be updated first. Returns the minted shares.
    pub fn deposit(&mut self, position: &mut VaultPosition, net_amount: u64) -> Result<u64> {
        let shares = self.shares_for_assets(net_amount)?;
        require!(shares > 0, FarmError::ZeroAmount);

        self.settle_position(position)?;
        let new_shares = add_u64(position.shares, shares)?;
        self.reshare(position, new_shares)?;
        self.total_assets = add_u64(self.total_assets, net_amount)?;
        Ok(shares)
    }

    /// Burns `shares` and returns the principal owed for them. Zero shares
    /// only settles rewards.
    pub fn withdraw(&mut self, position: &mut VaultPosition, shares: u64) -> Result<u64> {
        require!(shares <= position.shares, FarmError::InsufficientBalance);
        let assets = self.assets_for_shares(shares)?;

        self.settle_position(position)?;
        let new_shares = position.shares - shares;
        self.reshare(position, new_shares)?;
        self.total_assets = sub_u64(self.total_assets, assets)?;
        Ok(assets)
    }

    /// Moves shares between holders. Both sides are settled first, so each
    /// keeps exactly the reward it had earned.
    pub fn transfer_shares(
        &mut self,
        from: &mut VaultPosition,
        to: &mut VaultPosition,
        shares: u64,
    ) -> Result<()> {
        require!(shares > 0, FarmError::ZeroAmount);
        require!(shares <= from.shares, FarmError::InsufficientBalance);

        self.settle_position(from)?;
        self.settle_position(to)?;
        let from_shares = from.shares - shares;
        let to_shares = add_u64(to.shares, shares)?;
        self.reshare(from, from_shares)?;
        self.reshare(to, to_shares)?;
        Ok(())
    }

    /// Claimable amount of `mint` for `position` given the reward vault's
    /// current balance. Never mutates.
    pub fn pending(&self, position: &VaultPosition, mint: Pubkey, current_balance: u64) -> Result<u64> {
        let token = &self.reward_tokens[self.token_index(mint)?];
        let mut accumulator = token.accumulator;
        if token.active {
            accumulator.distribute(current_balance.saturating_sub(token.last_reward_balance))?;
        }
        let (reward_debt, unpaid) = position
            .record(mint)
            .map(|r| (r.reward_debt, r.unpaid))
            .unwrap_or_default();
        let owed = accumulator.pending(&Participant {
            amount: position.shares,
            reward_debt,
        })?;
        add_u64(unpaid, owed)
    }

    /// Takes up to `available` of the position's settled balance of `mint`.
    /// Call after `update_reward` and `settle_position`.
    pub fn claim(&mut self, position: &mut VaultPosition, mint: Pubkey, available: u64) -> Result<u64> {
        let index = self.token_index(mint)?;
        let record = position.record_mut(mint)?;
        let paid = record.unpaid.min(available);
        record.unpaid -= paid;

        let token = &mut self.reward_tokens[index];
        token.last_reward_balance = token.last_reward_balance.saturating_sub(paid);
        Ok(paid)
    }

    /// Takes up to `available[i]` of the settled balance of every reward
    /// token, in registration order. Returns the amounts taken.
    pub fn claim_all(&mut self, position: &mut VaultPosition, available: &[u64]) -> Result<Vec<u64>> {
        require!(
            available.len() == self.reward_tokens.len(),
            FarmError::RewardAccountMismatch
        );
        let mints: Vec<Pubkey> = self.reward_tokens.iter().map(|t| t.mint).collect();
        mints
            .into_iter()
            .zip(available)
            .map(|(mint, available)| self.claim(position, mint, *available))
            .collect()
    }

    /// Restakes the position's settled reward in the deposit token as new
    /// shares, without a deposit fee. Rewards must be updated first.
    /// Returns (restaked amount, minted shares).
    pub fn compound(&mut self, position: &mut VaultPosition, available: u64) -> Result<(u64, u64)> {
        let mint = self.deposit_mint;
        self.settle_position(position)?;
        let amount = self.claim(position, mint, available)?;
        require!(amount > 0, FarmError::ZeroAmount);

        let shares = self.shares_for_assets(amount)?;
        require!(shares > 0, FarmError::ZeroAmount);
        let new_shares = add_u64(position.shares, shares)?;
        self.reshare(position, new_shares)?;
        self.total_assets = add_u64(self.total_assets, amount)?;
        Ok((amount, shares))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(b: u8) -> Pubkey {
        Pubkey::new_from_array([b; 32])
    }

    const DEPOSIT: u8 = 1;
    const USDC: u8 = 2;

    fn vault_with_tokens() -> FeeVault {
        let mut vault = FeeVault {
            deposit_mint: key(DEPOSIT),
            ..Default::default()
        };
        vault.add_reward_token(key(USDC), key(20), 0).unwrap();
        vault.add_reward_token(key(DEPOSIT), key(21), 0).unwrap();
        vault
    }

    fn position(owner: u8) -> VaultPosition {
        VaultPosition {
            owner: key(owner),
            ..Default::default()
        }
    }

    #[test]
    fn deposit_fee_is_capped_at_half() {
        let mut vault = FeeVault::default();
        assert!(vault.set_deposit_fee(5_001).is_err());
        vault.set_deposit_fee(250).unwrap();
        assert_eq!(vault.deposit_fee(10_000).unwrap(), 250);
        assert_eq!(vault.deposit_fee(39).unwrap(), 0);
    }

    #[test]
    fn shares_dilute_with_vault_ratio() {
        let mut vault = vault_with_tokens();
        let (mut a, mut b) = (position(10), position(11));
        assert_eq!(vault.deposit(&mut a, 1_000).unwrap(), 1_000);

        // principal grows without new shares: 1 share = 2 assets
        vault.total_assets = 2_000;
        assert_eq!(vault.deposit(&mut b, 500).unwrap(), 250);
        assert_eq!(vault.withdraw(&mut b, 250).unwrap(), 500);
        assert_eq!(vault.staker_count, 1);
    }

    #[test]
    fn rewards_split_pro_rata_and_bank_while_empty() {
        let mut vault = vault_with_tokens();
        let (mut a, mut b) = (position(10), position(11));

        // arrives before any holder: banked, not lost
        vault.update_rewards(&[600, 0]).unwrap();
        assert_eq!(vault.reward_tokens[0].last_reward_balance, 0);

        vault.update_rewards(&[600, 0]).unwrap();
        vault.deposit(&mut a, 100).unwrap();
        vault.update_rewards(&[600, 0]).unwrap();
        vault.deposit(&mut b, 200).unwrap();
        assert_eq!(vault.pending(&a, key(USDC), 600).unwrap(), 600);

        vault.update_rewards(&[900, 0]).unwrap();
        assert_eq!(vault.pending(&a, key(USDC), 900).unwrap(), 700);
        assert_eq!(vault.pending(&b, key(USDC), 900).unwrap(), 200);
    }

    #[test]
    fn withdraw_settles_every_token() {
        let mut vault = vault_with_tokens();
        let mut a = position(10);
        vault.deposit(&mut a, 50).unwrap();
        vault.update_rewards(&[100, 40]).unwrap();

        assert_eq!(vault.withdraw(&mut a, 0).unwrap(), 0);
        assert_eq!(a.record(key(USDC)).unwrap().unpaid, 100);
        assert_eq!(a.record(key(DEPOSIT)).unwrap().unpaid, 40);

        assert_eq!(vault.withdraw(&mut a, 50).unwrap(), 50);
        assert!(vault.withdraw(&mut a, 1).is_err());
        assert_eq!(vault.pending(&a, key(USDC), 100).unwrap(), 100);
    }

    #[test]
    fn withdraw_pays_out_what_the_vaults_hold() {
        let mut vault = vault_with_tokens();
        let mut a = position(10);
        vault.deposit(&mut a, 50).unwrap();
        vault.update_rewards(&[100, 40]).unwrap();

        assert_eq!(vault.withdraw(&mut a, 50).unwrap(), 50);
        assert_eq!(vault.claim_all(&mut a, &[100, 10]).unwrap(), vec![100, 10]);
        assert_eq!(a.record(key(USDC)).unwrap().unpaid, 0);
        assert_eq!(a.record(key(DEPOSIT)).unwrap().unpaid, 30);
        assert_eq!(vault.reward_tokens[0].last_reward_balance, 0);
        assert_eq!(vault.reward_tokens[1].last_reward_balance, 30);

        // the short token stays claimable, nothing is redistributed
        vault.update_rewards(&[0, 30]).unwrap();
        assert_eq!(vault.pending(&a, key(DEPOSIT), 30).unwrap(), 30);
        assert!(vault.claim_all(&mut a, &[0]).is_err());
    }

    #[test]
    fn dust_first_depositor_does_not_lock_the_vault() {
        let mut vault = vault_with_tokens();
        let (mut a, mut b) = (position(10), position(11));
        vault.deposit(&mut a, 1).unwrap();
        vault.update_rewards(&[1_000_000_000_000, 0]).unwrap();

        assert_eq!(vault.deposit(&mut b, 1_000_000_000).unwrap(), 1_000_000_000);
        assert_eq!(vault.pending(&a, key(USDC), 1_000_000_000_000).unwrap(), 1_000_000_000_000);
        assert_eq!(vault.pending(&b, key(USDC), 1_000_000_000_000).unwrap(), 0);

        let balance = 1_000_000_000_000 + 1_000_000_001;
        vault.update_rewards(&[balance, 0]).unwrap();
        assert_eq!(vault.pending(&a, key(USDC), balance).unwrap(), 1_000_000_000_001);
        assert_eq!(vault.pending(&b, key(USDC), balance).unwrap(), 1_000_000_000);
        assert_eq!(vault.withdraw(&mut b, 1_000_000_000).unwrap(), 1_000_000_000);
    }

    #[test]
    fn removed_token_stays_claimable_and_others_unaffected() {
        let mut vault = vault_with_tokens();
        let mut a = position(10);
        vault.deposit(&mut a, 10).unwrap();
        vault.update_rewards(&[50, 70]).unwrap();

        vault.remove_reward_token(key(USDC)).unwrap();
        assert!(vault.remove_reward_token(key(USDC)).is_err());

        // further USDC inflow is no longer distributed
        vault.update_rewards(&[500, 90]).unwrap();
        assert_eq!(vault.pending(&a, key(USDC), 500).unwrap(), 50);
        assert_eq!(vault.pending(&a, key(DEPOSIT), 90).unwrap(), 90);

        vault.settle_position(&mut a).unwrap();
        assert_eq!(vault.claim(&mut a, key(USDC), 500).unwrap(), 50);
        assert_eq!(vault.pending(&a, key(USDC), 450).unwrap(), 0);
    }

    #[test]
    fn re_adding_a_live_token_is_rejected() {
        let mut vault = vault_with_tokens();
        assert!(vault.add_reward_token(key(USDC), key(20), 0).is_err());
        vault.remove_reward_token(key(USDC)).unwrap();
        vault.add_reward_token(key(USDC), key(20), 0).unwrap();
        assert!(vault.reward_tokens[0].active);
        assert_eq!(vault.reward_tokens.len(), 2);
    }

    #[test]
    fn claim_is_capped_by_vault_balance() {
        let mut vault = vault_with_tokens();
        let mut a = position(10);
        vault.deposit(&mut a, 10).unwrap();
        vault.update_rewards(&[80, 0]).unwrap();
        vault.settle_position(&mut a).unwrap();

        assert_eq!(vault.claim(&mut a, key(USDC), 30).unwrap(), 30);
        assert_eq!(a.record(key(USDC)).unwrap().unpaid, 50);
        assert_eq!(vault.reward_tokens[0].last_reward_balance, 50);
    }

    #[test]
    fn compound_restakes_deposit_token_reward() {
        let mut vault = vault_with_tokens();
        let mut a = position(10);
        vault.deposit(&mut a, 100).unwrap();
        vault.update_rewards(&[0, 25]).unwrap();

        assert_eq!(vault.compound(&mut a, 25).unwrap(), (25, 25));
        assert_eq!(a.shares, 125);
        assert_eq!(vault.total_assets, 125);
        assert_eq!(vault.pending(&a, key(DEPOSIT), 0).unwrap(), 0);
        assert!(vault.compound(&mut a, 0).is_err());
    }

    #[test]
    fn transfer_moves_shares_not_reward() {
        let mut vault = vault_with_tokens();
        let (mut x, mut y) = (position(10), position(11));
        vault.deposit(&mut x, 30).unwrap();
        vault.update_rewards(&[300, 0]).unwrap();

        vault.transfer_shares(&mut x, &mut y, 10).unwrap();
        assert_eq!(vault.pending(&x, key(USDC), 300).unwrap(), 300);
        assert_eq!(vault.pending(&y, key(USDC), 300).unwrap(), 0);

        vault.update_rewards(&[600, 0]).unwrap();
        assert_eq!(vault.pending(&x, key(USDC), 600).unwrap(), 500);
        assert_eq!(vault.pending(&y, key(USDC), 600).unwrap(), 100);
        assert!(vault.transfer_shares(&mut y, &mut x, 11).is_err());
    }

    proptest! {
        #[test]
        fn transfer_preserves_combined_pending(
            x_assets in 1u64..1_000_000,
            y_assets in 1u64..1_000_000,
            inflows in proptest::collection::vec(0u64..10_000_000, 1..6),
            moved_bps in 1u64..=10_000,
        ) {
            let mut vault = vault_with_tokens();
            let (mut x, mut y) = (position(10), position(11));
            vault.deposit(&mut x, x_assets).unwrap();

            let mut balance = 0u64;
            for (i, inflow) in inflows.iter().enumerate() {
                balance += inflow;
                vault.update_rewards(&[balance, 0]).unwrap();
                if i == 0 {
                    vault.deposit(&mut y, y_assets).unwrap();
                }
            }

            let before = vault.pending(&x, key(USDC), balance).unwrap()
                + vault.pending(&y, key(USDC), balance).unwrap();
            let moved = (x.shares * moved_bps / 10_000).max(1);
            vault.transfer_shares(&mut x, &mut y, moved).unwrap();
            let after = vault.pending(&x, key(USDC), balance).unwrap()
                + vault.pending(&y, key(USDC), balance).unwrap();

            prop_assert_eq!(before, after);
            prop_assert_eq!(x.shares + y.shares, vault.total_shares);
        }
    }
}
