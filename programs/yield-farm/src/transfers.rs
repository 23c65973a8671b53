use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::CHEF_SEED;
use crate::errors::FarmError;
use crate::math::sub_u64;
use crate::state::{Chef, Emission, RewardToken};

/// Net amount a vault gained across a transfer. A transfer fee shows up as a
/// gain smaller than the amount sent; a balance that shrank is rejected.
pub fn received_amount(before: u64, after: u64) -> Result<u64> {
    sub_u64(after, before)
}

/// Moves `amount` from a signer-owned account into `vault` and returns what
/// the vault actually received, so fee-on-transfer mints are booked at their
/// net value.
pub fn transfer_in<'info>(
    token_program: &Interface<'info, TokenInterface>,
    mint: &InterfaceAccount<'info, Mint>,
    from: &InterfaceAccount<'info, TokenAccount>,
    vault: &mut InterfaceAccount<'info, TokenAccount>,
    authority: &Signer<'info>,
    amount: u64,
) -> Result<u64> {
    let before = vault.amount;
    token_interface::transfer_checked(
        CpiContext::new(
            token_program.to_account_info(),
            TransferChecked {
                from: from.to_account_info(),
                mint: mint.to_account_info(),
                to: vault.to_account_info(),
                authority: authority.to_account_info(),
            },
        ),
        amount,
        mint.decimals,
    )?;
    vault.reload()?;
    received_amount(before, vault.amount)
}

/// Plain user-signed transfer, used for fee legs where nothing is booked.
pub fn transfer_from_user<'info>(
    token_program: &Interface<'info, TokenInterface>,
    mint: &InterfaceAccount<'info, Mint>,
    from: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    authority: &Signer<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new(
            token_program.to_account_info(),
            TransferChecked {
                from: from.to_account_info(),
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority: authority.to_account_info(),
            },
        ),
        amount,
        mint.decimals,
    )
}

/// Transfer out of a PDA-owned token account.
pub fn transfer_signed<'info>(
    token_program: &Interface<'info, TokenInterface>,
    mint: &InterfaceAccount<'info, Mint>,
    from: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: from.to_account_info(),
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority,
            },
            signer_seeds,
        ),
        amount,
        mint.decimals,
    )
}

pub fn mint_signed<'info>(
    token_program: &Interface<'info, TokenInterface>,
    mint: &InterfaceAccount<'info, Mint>,
    to: &InterfaceAccount<'info, TokenAccount>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority,
            },
            signer_seeds,
        ),
        amount,
    )
}

/// Pays `amount` of a chef's reward token to `to`: minted when the chef is
/// the mint authority, otherwise taken from its delegated reward vault. A
/// short vault fails the whole instruction.
pub fn pay_chef_reward<'info>(
    chef: &Account<'info, Chef>,
    token_program: &Interface<'info, TokenInterface>,
    reward_mint: &InterfaceAccount<'info, Mint>,
    reward_vault: Option<&InterfaceAccount<'info, TokenAccount>>,
    to: &InterfaceAccount<'info, TokenAccount>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    require_keys_eq!(reward_mint.key(), chef.reward_mint, FarmError::InvalidMint);

    let chef_id = chef.chef_id.to_le_bytes();
    let seeds: &[&[u8]] = &[CHEF_SEED, chef.authority.as_ref(), &chef_id, &[chef.bump]];

    match chef.emission {
        Emission::Minted => mint_signed(
            token_program,
            reward_mint,
            to,
            chef.to_account_info(),
            &[seeds],
            amount,
        ),
        Emission::Delegated { reward_vault: expected, .. } => {
            let vault = reward_vault.ok_or(FarmError::InvalidEmissionMode)?;
            require_keys_eq!(vault.key(), expected, FarmError::RewardAccountMismatch);
            require!(vault.amount >= amount, FarmError::InsufficientBalance);
            transfer_signed(
                token_program,
                reward_mint,
                vault,
                to,
                chef.to_account_info(),
                &[seeds],
                amount,
            )
        }
    }
}

/// Reads token balances from `accounts`, which must be exactly the token
/// accounts in `expected`, in order.
pub fn read_balances(expected: &[Pubkey], accounts: &[AccountInfo]) -> Result<Vec<u64>> {
    require!(
        accounts.len() == expected.len(),
        FarmError::RewardAccountMismatch
    );
    accounts
        .iter()
        .zip(expected)
        .map(|(info, key)| {
            require_keys_eq!(info.key(), *key, FarmError::RewardAccountMismatch);
            Ok(read_token_account(info)?.amount)
        })
        .collect()
}

fn is_token_program(program: &Pubkey) -> bool {
    program == &anchor_spl::token::ID || program == &anchor_spl::token_2022::ID
}

fn read_token_account(info: &AccountInfo) -> Result<TokenAccount> {
    require!(is_token_program(info.owner), FarmError::RewardAccountMismatch);
    let data = info.try_borrow_data()?;
    TokenAccount::try_deserialize(&mut &data[..])
}

/// Accounts needed to pay out one registered reward token.
pub struct RewardLeg<'info> {
    pub vault: AccountInfo<'info>,
    pub mint: AccountInfo<'info>,
    pub recipient: AccountInfo<'info>,
    pub balance: u64,
    pub decimals: u8,
}

impl<'info> RewardLeg<'info> {
    /// Balance payable through `token_program`; legs owned by the other
    /// token program pay nothing here.
    pub fn available(&self, token_program: &Pubkey) -> u64 {
        if self.vault.owner == token_program {
            self.balance
        } else {
            0
        }
    }
}

/// Resolves `[reward_vault, reward_mint, recipient]` triples, one per token in
/// `tokens` and in the same order. Every recipient must be a `holder` account
/// of the matching mint.
pub fn reward_legs<'info>(
    tokens: &[RewardToken],
    holder: Pubkey,
    accounts: &[AccountInfo<'info>],
) -> Result<Vec<RewardLeg<'info>>> {
    require!(
        accounts.len() == tokens.len() * 3,
        FarmError::RewardAccountMismatch
    );
    tokens
        .iter()
        .zip(accounts.chunks_exact(3))
        .map(|(token, leg)| {
            let (vault, mint, recipient) = (&leg[0], &leg[1], &leg[2]);
            require_keys_eq!(vault.key(), token.vault, FarmError::RewardAccountMismatch);
            require_keys_eq!(mint.key(), token.mint, FarmError::InvalidMint);
            require_keys_eq!(*mint.owner, *vault.owner, FarmError::InvalidMint);

            let balance = read_token_account(vault)?.amount;
            let to = read_token_account(recipient)?;
            require_keys_eq!(to.mint, token.mint, FarmError::InvalidMint);
            require_keys_eq!(to.owner, holder, FarmError::Unauthorized);

            let decimals = {
                let data = mint.try_borrow_data()?;
                Mint::try_deserialize(&mut &data[..])?.decimals
            };
            Ok(RewardLeg {
                vault: vault.clone(),
                mint: mint.clone(),
                recipient: recipient.clone(),
                balance,
                decimals,
            })
        })
        .collect()
}

/// Signed payout of `amount` along `leg`.
pub fn pay_reward_leg<'info>(
    token_program: &Interface<'info, TokenInterface>,
    leg: &RewardLeg<'info>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: leg.vault.clone(),
                mint: leg.mint.clone(),
                to: leg.recipient.clone(),
                authority,
            },
            signer_seeds,
        ),
        amount,
        leg.decimals,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_on_transfer_books_the_net_gain() {
        // 100 sent through a 3% transfer fee
        assert_eq!(received_amount(1_000, 1_097).unwrap(), 97);
        assert_eq!(received_amount(1_000, 1_000).unwrap(), 0);
        assert!(received_amount(1_000, 999).is_err());
    }
}
