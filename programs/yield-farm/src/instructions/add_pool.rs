use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::clock;
use crate::constants::POOL_VAULT_SEED;
use crate::errors::FarmError;
use crate::events::PoolAdded;
use crate::state::{Chef, Rewarder};

#[derive(Accounts)]
pub struct AddPool<'info> {
    #[account(
        mut,
        has_one = authority @ FarmError::Unauthorized
    )]
    pub chef: Box<Account<'info, Chef>>,

    pub deposit_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        seeds = [POOL_VAULT_SEED, chef.key().as_ref(), &chef.pool_count().to_le_bytes()],
        bump,
        token::mint = deposit_mint,
        token::authority = chef,
        token::token_program = token_program,
    )]
    pub pool_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Overlay to attach, created beforehand for this chef and pool id
    pub rewarder: Option<Account<'info, Rewarder>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AddPool>, alloc_point: u64) -> Result<()> {
    let now = clock::now_slot()?;
    let chef_key = ctx.accounts.chef.key();
    let chef = &mut ctx.accounts.chef;
    let pid = chef.pool_count();

    let rewarder = match &ctx.accounts.rewarder {
        Some(rewarder) => {
            require_keys_eq!(rewarder.chef, chef_key, FarmError::InvalidRewarder);
            require!(rewarder.pid == pid, FarmError::InvalidRewarder);
            Some(rewarder.key())
        }
        None => None,
    };

    let added = chef.add_pool(
        alloc_point,
        ctx.accounts.deposit_mint.key(),
        ctx.accounts.pool_vault.key(),
        rewarder,
        now,
    )?;

    emit!(PoolAdded {
        chef: chef_key,
        pid: added,
        deposit_mint: ctx.accounts.deposit_mint.key(),
        alloc_point,
        total_alloc_point: chef.total_alloc_point,
        rewarder,
        timestamp: clock::timestamp()?,
    });

    msg!("Added pool {} with alloc point {}", added, alloc_point);
    msg!("Total alloc point: {}", chef.total_alloc_point);

    Ok(())
}
