pub mod address;
pub mod derivation;
pub mod recovery;
pub mod seed;

pub use address::{EncodingError, MAINNET, Network, TESTNET, np2wkh_address, p2wkh_address};
pub use derivation::{
    DerivationError,
    ExtendedKey,
    KeyMaterial,
    derive_account_key,
    derive_first_key,
};
pub use recovery::{RecoveryError, RecoveryReport, recover};
pub use seed::{CipherSeed, ENTROPY_SIZE};
