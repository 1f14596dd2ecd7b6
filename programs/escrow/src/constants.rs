pub const ESCROW_SEED: &[u8] = b"escrow";
pub const VAULT_SEED: &[u8] = b"vault";

/// Bytes in a Make payload: seed, deposit and receive, all little-endian u64.
pub const MAKE_DATA_LEN: usize = 24;
