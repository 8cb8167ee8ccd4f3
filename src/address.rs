use bech32::{ToBase32, Variant, u5};
use bitcoin_hashes::{Hash, hash160};
use secp256k1::PublicKey;
use std::fmt;

/// The network parameters the address encodings depend on.
pub struct Network {
    pub bech32_hrp: &'static str,
    pub p2sh_version: u8,
}

pub const MAINNET: Network = Network {
    bech32_hrp: "bc",
    p2sh_version: 0x05,
};

pub const TESTNET: Network = Network {
    bech32_hrp: "tb",
    p2sh_version: 0xc4,
};

const WITNESS_V0: u8 = 0;
const WITNESS_V0_PROGRAM_LEN: usize = 20;

#[derive(Debug)]
pub enum EncodingError {
    InvalidProgramLength(usize),
    Bech32(bech32::Error),
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodingError::InvalidProgramLength(len) => {
                write!(f, "witness program must be {} bytes, got {}", WITNESS_V0_PROGRAM_LEN, len)
            }
            EncodingError::Bech32(e) => write!(f, "bech32 encoding failed: {}", e),
        }
    }
}

impl std::error::Error for EncodingError {}

impl From<bech32::Error> for EncodingError {
    fn from(err: bech32::Error) -> Self {
        EncodingError::Bech32(err)
    }
}

fn pubkey_hash(key: &PublicKey) -> Vec<u8> {
    let hash = hash160::Hash::hash(&key.serialize());
    <hash160::Hash as AsRef<[u8]>>::as_ref(&hash).to_vec()
}

/// Serializes a version-0 witness program as a script:
/// `OP_0 PUSH(len) <program>`. Spending through the wrapped address
/// presents exactly this script as the redemption script.
fn witness_program_script(program: &[u8]) -> Vec<u8> {
    let mut script = Vec::with_capacity(program.len() + 2);
    script.push(0x00); // OP_0
    script.push(program.len() as u8);
    script.extend_from_slice(program);
    script
}

fn base58check_address(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    bs58::encode(&data).with_check().into_string()
}

/// Encodes the native witness (P2WPKH) address of a compressed public
/// key: hash160 of the key as a version-0 witness program, bech32 under
/// the network's HRP.
pub fn p2wkh_address(key: &PublicKey, network: &Network) -> Result<String, EncodingError> {
    let program = pubkey_hash(key);
    if program.len() != WITNESS_V0_PROGRAM_LEN {
        return Err(EncodingError::InvalidProgramLength(program.len()));
    }

    let mut data = vec![u5::try_from_u8(WITNESS_V0)?];
    data.extend(program.to_base32());

    Ok(bech32::encode(network.bech32_hrp, data, Variant::Bech32)?)
}

/// Encodes the wrapped witness (P2SH-P2WPKH) address of a compressed
/// public key.
///
/// The version-0 witness program is serialized as a script and that
/// script is hashed again for the legacy script-hash encoding. Hashing
/// the pubkey hash directly instead of the serialized program would
/// produce an address nothing can spend from.
pub fn np2wkh_address(key: &PublicKey, network: &Network) -> Result<String, EncodingError> {
    let program = pubkey_hash(key);
    if program.len() != WITNESS_V0_PROGRAM_LEN {
        return Err(EncodingError::InvalidProgramLength(program.len()));
    }

    let redeem_script = witness_program_script(&program);
    let script_hash = hash160::Hash::hash(&redeem_script);

    Ok(base58check_address(
        network.p2sh_version,
        <hash160::Hash as AsRef<[u8]>>::as_ref(&script_hash),
    ))
}
