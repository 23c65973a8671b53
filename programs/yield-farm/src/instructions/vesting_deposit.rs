use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::VESTING_POSITION_SEED;
use crate::errors::FarmError;
use crate::events::PrincipalDeposited;
use crate::state::{VestingPosition, VestingVault};
use crate::transfers;

#[derive(Accounts)]
pub struct VestingDeposit<'info> {
    #[account(mut)]
    pub vault: Box<Account<'info, VestingVault>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + VestingPosition::INIT_SPACE,
        seeds = [VESTING_POSITION_SEED, vault.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub position: Box<Account<'info, VestingPosition>>,

    #[account(address = vault.principal_mint @ FarmError::InvalidMint)]
    pub principal_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = vault.principal_vault @ FarmError::RewardAccountMismatch)]
    pub principal_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = principal_mint,
        token::authority = owner
    )]
    pub owner_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<VestingDeposit>, amount: u64) -> Result<()> {
    require!(amount > 0, FarmError::ZeroAmount);
    let now = clock::now_unix()?;

    let received = transfers::transfer_in(
        &ctx.accounts.token_program,
        &ctx.accounts.principal_mint,
        &ctx.accounts.owner_token_account,
        &mut ctx.accounts.principal_vault,
        &ctx.accounts.owner,
        amount,
    )?;

    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.vault = ctx.accounts.vault.key();
        position.owner = ctx.accounts.owner.key();
        position.bump = ctx.bumps.position;
    }

    let vault = &mut ctx.accounts.vault;
    let shares = vault.deposit(position, received, now)?;

    emit!(PrincipalDeposited {
        vault: vault.key(),
        owner: position.owner,
        amount: received,
        shares,
        user_shares: position.shares(),
        total_shares: vault.total_shares(),
        total_assets: vault.total_assets,
        timestamp: clock::timestamp()?,
    });

    msg!("Deposited {} principal for {} shares", received, shares);

    Ok(())
}
