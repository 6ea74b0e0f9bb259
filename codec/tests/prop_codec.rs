use proptest::prelude::*;

use stele_codec::{
    CommitChain, CommitEntry, DecodeError, Entry, COMMIT_CHAIN_SIZE, COMMIT_ENTRY_SIZE,
};
use stele_crypto::keypair_from_seed;
use stele_types::{ChainId, EntryHash, MilliTime, PublicKey, Signature};

fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        prop::array::uniform32(0u8..),
        prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..8),
        prop::collection::vec(any::<u8>(), 0..2048),
    )
        .prop_map(|(chain, ext_ids, content)| Entry::new(ChainId::new(chain), ext_ids, content))
}

fn arb_commit_entry() -> impl Strategy<Value = CommitEntry> {
    (
        prop::array::uniform6(0u8..),
        prop::array::uniform32(0u8..),
        any::<u8>(),
        prop::array::uniform32(0u8..),
        prop::collection::vec(any::<u8>(), 64),
    )
        .prop_map(|(milli, hash, credits, key, sig)| CommitEntry {
            version: 0,
            milli_time: MilliTime::new(milli),
            entry_hash: EntryHash::new(hash),
            credits,
            pub_key: PublicKey(key),
            sig: Signature(sig.try_into().unwrap()),
        })
}

fn arb_commit_chain() -> impl Strategy<Value = CommitChain> {
    (
        prop::array::uniform6(0u8..),
        prop::array::uniform32(0u8..),
        prop::array::uniform32(0u8..),
        prop::array::uniform32(0u8..),
        10u8..,
        prop::array::uniform32(0u8..),
        prop::collection::vec(any::<u8>(), 64),
    )
        .prop_map(
            |(milli, chain_hash, weld, hash, credits, key, sig)| CommitChain {
                version: 0,
                milli_time: MilliTime::new(milli),
                chain_id_hash: chain_hash,
                weld,
                entry_hash: EntryHash::new(hash),
                credits,
                pub_key: PublicKey(key),
                sig: Signature(sig.try_into().unwrap()),
            },
        )
}

proptest! {
    /// Well-formed entries round-trip exactly.
    #[test]
    fn entry_round_trip(entry in arb_entry()) {
        let bytes = entry.encode();
        let decoded = Entry::decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &entry);
        prop_assert_eq!(decoded.encode(), bytes);
    }

    /// Decoding any byte slice either fails with a typed error or yields a
    /// record whose re-encoding reproduces the consumed input.
    #[test]
    fn entry_decode_total(bytes in prop::collection::vec(any::<u8>(), 0..10_240)) {
        match Entry::decode(&bytes) {
            Ok(entry) => prop_assert_eq!(entry.encode(), bytes),
            Err(
                DecodeError::Truncated { .. }
                | DecodeError::BadVersion(_)
                | DecodeError::ExtIdSectionOverrun { .. }
                | DecodeError::ExtIdLengthMismatch,
            ) => {}
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// KSize of a k-kilobyte content payload is max(1, k).
    #[test]
    fn entry_ksize_padded(k in 0usize..32) {
        let entry = Entry::new(ChainId::new([1; 32]), Vec::new(), vec![0u8; 1024 * k]);
        prop_assert_eq!(entry.ksize(), k.max(1));
    }

    /// Entry commits round-trip and are exactly 136 bytes.
    #[test]
    fn commit_entry_round_trip(commit in arb_commit_entry()) {
        let bytes = commit.encode();
        prop_assert_eq!(bytes.len(), COMMIT_ENTRY_SIZE);
        let decoded = CommitEntry::decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &commit);
        prop_assert_eq!(decoded.encode(), bytes);
    }

    /// Chain commits round-trip and are exactly 200 bytes.
    #[test]
    fn commit_chain_round_trip(commit in arb_commit_chain()) {
        let bytes = commit.encode();
        prop_assert_eq!(bytes.len(), COMMIT_CHAIN_SIZE);
        let decoded = CommitChain::decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &commit);
        prop_assert_eq!(decoded.encode(), bytes);
    }

    /// Entry-commit decoding of arbitrary bytes is total: typed error or a
    /// record that re-encodes to the consumed 136-byte prefix.
    #[test]
    fn commit_entry_decode_total(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        match CommitEntry::decode(&bytes) {
            Ok(commit) => {
                prop_assert_eq!(&commit.encode()[..], &bytes[..COMMIT_ENTRY_SIZE])
            }
            Err(DecodeError::Truncated { .. } | DecodeError::BadVersion(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Chain-commit decoding of arbitrary bytes is total.
    #[test]
    fn commit_chain_decode_total(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        match CommitChain::decode(&bytes) {
            Ok(commit) => {
                prop_assert_eq!(&commit.encode()[..], &bytes[..COMMIT_CHAIN_SIZE])
            }
            Err(
                DecodeError::Truncated { .. }
                | DecodeError::BadVersion(_)
                | DecodeError::CreditsOutOfRange(_),
            ) => {}
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Signing makes a commit valid; flipping any signed byte invalidates it.
    #[test]
    fn commit_entry_signing_validates(
        seed in prop::array::uniform32(0u8..),
        hash in prop::array::uniform32(0u8..),
        credits in 1u8..,
        flip in 0usize..40,
    ) {
        let mut commit = CommitEntry {
            version: 0,
            milli_time: MilliTime::from_millis(1_469_570_100_000),
            entry_hash: EntryHash::new(hash),
            credits,
            pub_key: PublicKey::ZERO,
            sig: Signature::ZERO,
        };
        commit.sign(&keypair_from_seed(&seed));
        prop_assert!(commit.is_valid());

        let mut tampered = commit.encode();
        tampered[flip] ^= 0x01;
        match CommitEntry::decode(&tampered) {
            Ok(t) => prop_assert!(!t.is_valid()),
            Err(_) => {} // flipping the version byte fails decode instead
        }
    }
}
