use chrono::{DateTime, Duration, Utc};
use zeroize::Zeroize;

/// Size of the entropy recovered from a cipher seed.
pub const ENTROPY_SIZE: usize = 16;

// Unix timestamp of the Bitcoin genesis block; wallet birthdays are
// counted in whole days from here.
const BITCOIN_GENESIS_UNIX: i64 = 1_231_006_505;

/// The decrypted cipher seed handed over by the upstream mnemonic
/// recovery step: the root entropy plus the metadata encoded alongside
/// it. This is the entire contract with that component; the mnemonic
/// words and passphrase never reach this crate.
///
/// The entropy is wiped when the value is dropped. There is
/// intentionally no `Debug` impl, so it cannot end up in logs or error
/// messages by accident.
pub struct CipherSeed {
    pub internal_version: u8,
    /// Days since the Bitcoin genesis block at which the wallet was
    /// created.
    pub birthday: u16,
    entropy: [u8; ENTROPY_SIZE],
}

impl CipherSeed {
    pub fn new(internal_version: u8, birthday: u16, entropy: [u8; ENTROPY_SIZE]) -> Self {
        CipherSeed {
            internal_version,
            birthday,
            entropy,
        }
    }

    pub fn entropy(&self) -> &[u8; ENTROPY_SIZE] {
        &self.entropy
    }

    /// The wallet birthday as an absolute point in time.
    pub fn birthday_time(&self) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
            + Duration::seconds(BITCOIN_GENESIS_UNIX)
            + Duration::days(i64::from(self.birthday))
    }
}

impl Drop for CipherSeed {
    fn drop(&mut self) {
        self.entropy.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birthday_zero_is_the_genesis_timestamp() {
        let seed = CipherSeed::new(0, 0, [0u8; ENTROPY_SIZE]);
        assert_eq!(seed.birthday_time().timestamp(), BITCOIN_GENESIS_UNIX);
        assert_eq!(seed.birthday_time().to_string(), "2009-01-03 18:15:05 UTC");
    }

    #[test]
    fn birthday_counts_days_from_genesis() {
        let seed = CipherSeed::new(0, 400, [0u8; ENTROPY_SIZE]);
        assert_eq!(
            seed.birthday_time().timestamp(),
            BITCOIN_GENESIS_UNIX + 400 * 86_400
        );
    }
}
