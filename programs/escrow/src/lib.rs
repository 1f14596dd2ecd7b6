use anchor_lang::prelude::*;
use ledger_harness::InvokeContext;

declare_id!("2pDEXE7h7w7FK7cKqpgSHyzJZoQpGGAo32KnqHbbvMZE");

pub mod constants;
pub use constants::*;

pub mod errors;
pub use errors::*;

pub mod events;

pub mod pda;

pub mod state;
pub use state::*;

pub mod instructions;
pub use instructions::*;

pub mod client;

/// Program entrypoint: one discriminator byte, then the instruction's
/// arguments.
pub fn process_instruction(ctx: &mut InvokeContext, instruction_data: &[u8]) -> Result<()> {
    require_keys_eq!(*ctx.program_id(), ID, EscrowError::IncorrectProgramId);

    let accounts = ctx.metas();
    match instruction_data.split_first() {
        Some((&Make::DISCRIMINATOR, data)) => Make::try_from((accounts, data))?.process(ctx),
        Some((&Take::DISCRIMINATOR, _)) => Take::try_from(accounts)?.process(ctx),
        Some((&Refund::DISCRIMINATOR, _)) => Refund::try_from(accounts)?.process(ctx),
        _ => err!(EscrowError::InvalidInstructionData),
    }
}
