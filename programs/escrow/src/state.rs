use anchor_lang::prelude::borsh;
use anchor_lang::prelude::*;

use crate::EscrowError;

/// Terms of one open offer. Stored without a discriminator: the account's
/// owner and its derived address identify it.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Escrow {
    pub seed: u64,
    pub maker: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    /// Amount of mint B the maker wants in return.
    pub receive: u64,
    pub bump: u8,
}

impl Escrow {
    pub const LEN: usize = Escrow::INIT_SPACE;

    pub fn load(data: &[u8]) -> Result<Self> {
        require_eq!(data.len(), Self::LEN, EscrowError::InvalidAccountData);
        Self::try_from_slice(data).map_err(|_| error!(EscrowError::InvalidAccountData))
    }

    pub fn store(&self, data: &mut [u8]) -> Result<()> {
        require_eq!(data.len(), Self::LEN, EscrowError::InvalidAccountData);
        let mut cursor = data;
        self.serialize(&mut cursor)
            .map_err(|_| error!(EscrowError::InvalidAccountData))
    }

    pub fn seed_bytes(&self) -> [u8; 8] {
        self.seed.to_le_bytes()
    }

    pub fn bump_bytes(&self) -> [u8; 1] {
        [self.bump]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Escrow {
        Escrow {
            seed: 7,
            maker: Pubkey::new_from_array([1; 32]),
            mint_a: Pubkey::new_from_array([2; 32]),
            mint_b: Pubkey::new_from_array([3; 32]),
            receive: 500_000,
            bump: 254,
        }
    }

    #[test]
    fn layout_is_fixed_and_little_endian() {
        assert_eq!(Escrow::LEN, 113);

        let mut data = [0u8; Escrow::LEN];
        sample().store(&mut data).unwrap();

        assert_eq!(&data[0..8], &7u64.to_le_bytes());
        assert_eq!(&data[8..40], &[1; 32]);
        assert_eq!(&data[40..72], &[2; 32]);
        assert_eq!(&data[72..104], &[3; 32]);
        assert_eq!(&data[104..112], &500_000u64.to_le_bytes());
        assert_eq!(data[112], 254);

        assert_eq!(Escrow::load(&data).unwrap(), sample());
    }

    #[test]
    fn wrong_length_is_rejected() {
        let data = [0u8; Escrow::LEN - 1];
        assert_eq!(
            Escrow::load(&data).unwrap_err(),
            Error::from(EscrowError::InvalidAccountData)
        );

        let mut long = vec![0u8; Escrow::LEN + 1];
        assert_eq!(
            sample().store(&mut long).unwrap_err(),
            Error::from(EscrowError::InvalidAccountData)
        );
    }
}
