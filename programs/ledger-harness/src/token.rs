use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use anchor_spl::token::spl_token::{
    solana_program::{program_option::COption, program_pack::Pack},
    state::{Account as TokenAccount, AccountState, Mint},
};

use crate::{system, InvokeContext, LedgerAccount, LedgerError};

pub const TOKEN_PROGRAM_ID: Pubkey = anchor_spl::token::ID;
pub const TOKEN_2022_PROGRAM_ID: Pubkey = anchor_spl::token_2022::ID;

/// Both token programs share the base mint and account layouts, which is all
/// the ledger models.
pub fn is_token_program(program_id: &Pubkey) -> bool {
    *program_id == TOKEN_PROGRAM_ID || *program_id == TOKEN_2022_PROGRAM_ID
}

pub fn unpack_mint(account: &LedgerAccount) -> Result<Mint> {
    require!(
        is_token_program(&account.owner),
        LedgerError::InvalidAccountOwner
    );
    Mint::unpack(&account.data).map_err(|_| error!(LedgerError::InvalidAccountData))
}

pub fn unpack_token_account(account: &LedgerAccount) -> Result<TokenAccount> {
    require!(
        is_token_program(&account.owner),
        LedgerError::InvalidAccountOwner
    );
    TokenAccount::unpack(&account.data).map_err(|_| error!(LedgerError::InvalidAccountData))
}

/// Overwrites the packed state of a token account in place.
pub fn pack_token_account(account: &mut LedgerAccount, state: TokenAccount) -> Result<()> {
    TokenAccount::pack(state, &mut account.data).map_err(|_| error!(LedgerError::InvalidAccountData))
}

pub fn pack_mint(account: &mut LedgerAccount, state: Mint) -> Result<()> {
    Mint::pack(state, &mut account.data).map_err(|_| error!(LedgerError::InvalidAccountData))
}

/// A rent-exempt, initialized mint ready to be placed in the store.
pub fn mint_account(
    rent: &Rent,
    decimals: u8,
    mint_authority: Option<Pubkey>,
    token_program: &Pubkey,
) -> Result<LedgerAccount> {
    require!(
        is_token_program(token_program),
        LedgerError::InvalidAccountOwner
    );

    let mut account = LedgerAccount::new(rent.minimum_balance(Mint::LEN), Mint::LEN, token_program);
    pack_mint(
        &mut account,
        Mint {
            mint_authority: mint_authority.into(),
            supply: 0,
            decimals,
            is_initialized: true,
            freeze_authority: COption::None,
        },
    )?;

    Ok(account)
}

/// A rent-exempt, initialized token account ready to be placed in the store.
pub fn token_account(
    rent: &Rent,
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    token_program: &Pubkey,
) -> Result<LedgerAccount> {
    require!(
        is_token_program(token_program),
        LedgerError::InvalidAccountOwner
    );

    let mut account = LedgerAccount::new(
        rent.minimum_balance(TokenAccount::LEN),
        TokenAccount::LEN,
        token_program,
    );
    pack_token_account(
        &mut account,
        TokenAccount {
            mint: *mint,
            owner: *owner,
            amount,
            state: AccountState::Initialized,
            ..TokenAccount::default()
        },
    )?;

    Ok(account)
}

pub fn associated_token_address(wallet: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(wallet, mint, token_program)
}

/// Initializes an allocated, still blank token account for `mint`.
pub fn initialize_account(
    ctx: &mut InvokeContext,
    account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<()> {
    let mint_program = ctx.account(mint)?.owner;
    unpack_mint(ctx.account(mint)?)?;

    let target = ctx.account_mut(account)?;
    require_keys_eq!(target.owner, mint_program, LedgerError::InvalidAccountOwner);
    require_eq!(target.data.len(), TokenAccount::LEN, LedgerError::InvalidAccountData);

    let current =
        TokenAccount::unpack_unchecked(&target.data).map_err(|_| error!(LedgerError::InvalidAccountData))?;
    require!(
        current.state == AccountState::Uninitialized,
        LedgerError::AccountAlreadyInUse
    );

    pack_token_account(
        target,
        TokenAccount {
            mint: *mint,
            owner: *owner,
            state: AccountState::Initialized,
            ..TokenAccount::default()
        },
    )
}

/// Allocates and initializes a token account at `address`, which must sign
/// or be derived from `signer_seeds`.
pub fn create_token_account(
    ctx: &mut InvokeContext,
    payer: &Pubkey,
    address: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    token_program: &Pubkey,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    require!(
        is_token_program(token_program),
        LedgerError::InvalidAccountOwner
    );

    system::create_account(ctx, payer, address, TokenAccount::LEN, token_program, signer_seeds)?;
    initialize_account(ctx, address, mint, owner)
}

/// Returns the associated token address of `wallet` for `mint`, creating the
/// account when it is missing. An existing account must belong to `wallet`
/// and hold `mint`.
pub fn create_associated_token_account_idempotent(
    ctx: &mut InvokeContext,
    payer: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey> {
    let address = associated_token_address(wallet, mint, token_program);

    if let Some(existing) = ctx.get(&address)? {
        require_keys_eq!(existing.owner, *token_program, LedgerError::InvalidAccountOwner);
        let state = unpack_token_account(existing)?;
        require_keys_eq!(state.mint, *mint, LedgerError::MintMismatch);
        require_keys_eq!(state.owner, *wallet, LedgerError::OwnerMismatch);
        return Ok(address);
    }

    ctx.check_authority(payer, &[])?;
    require_keys_eq!(
        ctx.account(mint)?.owner,
        *token_program,
        LedgerError::InvalidAccountOwner
    );
    system::allocate_funded(ctx, payer, &address, TokenAccount::LEN, token_program)?;
    initialize_account(ctx, &address, mint, wallet)?;

    Ok(address)
}

/// Moves `amount` of `mint` between two token accounts.
///
/// `authority` must be the owner of `from`, either signing or derived from
/// `signer_seeds`. Delegates are not modelled.
#[allow(clippy::too_many_arguments)]
pub fn transfer_checked(
    ctx: &mut InvokeContext,
    from: &Pubkey,
    mint: &Pubkey,
    to: &Pubkey,
    authority: &Pubkey,
    amount: u64,
    decimals: u8,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let mint_info = ctx.account(mint)?;
    let mint_program = mint_info.owner;
    let mint_state = unpack_mint(mint_info)?;
    require_eq!(mint_state.decimals, decimals, LedgerError::MintDecimalsMismatch);

    let source_account = ctx.account(from)?;
    require_keys_eq!(source_account.owner, mint_program, LedgerError::InvalidAccountOwner);
    let mut source = unpack_token_account(source_account)?;

    let destination_account = ctx.account(to)?;
    require_keys_eq!(
        destination_account.owner,
        mint_program,
        LedgerError::InvalidAccountOwner
    );
    let mut destination = unpack_token_account(destination_account)?;

    require_keys_eq!(source.mint, *mint, LedgerError::MintMismatch);
    require_keys_eq!(destination.mint, *mint, LedgerError::MintMismatch);
    require!(
        !source.is_frozen() && !destination.is_frozen(),
        LedgerError::AccountFrozen
    );
    require_keys_eq!(source.owner, *authority, LedgerError::OwnerMismatch);
    ctx.check_authority(authority, signer_seeds)?;

    source.amount = source
        .amount
        .checked_sub(amount)
        .ok_or_else(|| error!(LedgerError::InsufficientTokenBalance))?;

    if from == to {
        return Ok(());
    }

    destination.amount = destination
        .amount
        .checked_add(amount)
        .ok_or_else(|| error!(LedgerError::Overflow))?;

    pack_token_account(ctx.account_mut(from)?, source)?;
    pack_token_account(ctx.account_mut(to)?, destination)
}

/// Closes an empty token account and sends its lamports to `destination`.
pub fn close_account(
    ctx: &mut InvokeContext,
    account: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    require_keys_neq!(*account, *destination, LedgerError::InvalidAccountData);

    let closing = ctx.account(account)?;
    let lamports = closing.lamports;
    let state = unpack_token_account(closing)?;

    require_eq!(state.amount, 0, LedgerError::NonZeroTokenBalance);
    require_keys_eq!(
        state.close_authority.unwrap_or(state.owner),
        *authority,
        LedgerError::OwnerMismatch
    );
    ctx.check_authority(authority, signer_seeds)?;

    ctx.transfer_lamports(account, destination, lamports)?;
    ctx.close(account)?;

    Ok(())
}
